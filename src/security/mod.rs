//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-client admission decision)
//!     → limits.rs (request body size cap)
//!     → headers.rs (CORS)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any admission check failure
//! - Rejections carry the same JSON envelope as handler responses

pub mod clock;
pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rate_limit::RateLimiter;
