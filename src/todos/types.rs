//! Todo resource types.

use serde::{Deserialize, Serialize};

/// A row of the todos table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub is_complete: bool,
}

/// Request body for create and update. Any `id` in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub is_complete: bool,
}
