//! Todo resource subsystem.
//!
//! # Data Flow
//! ```text
//! Request body (bytes)
//!     → handlers.rs (decode, orchestrate)
//!     → validation.rs (title checks)
//!     → store.rs (SQL against the todos table)
//!     → JSON envelope
//! ```

pub mod handlers;
pub mod store;
pub mod types;
pub mod validation;

pub use types::{Todo, TodoInput};
