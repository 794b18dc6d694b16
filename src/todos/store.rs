//! SQL statements for the todos table.

use sqlx::SqlitePool;

use crate::todos::types::{Todo, TodoInput};

pub async fn list(pool: &SqlitePool) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>("SELECT id, title, is_complete FROM todos")
        .fetch_all(pool)
        .await
}

pub async fn insert(pool: &SqlitePool, input: &TodoInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO todos (title, is_complete) VALUES (?, ?)")
        .bind(&input.title)
        .bind(input.is_complete)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch(pool: &SqlitePool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>("SELECT id, title, is_complete FROM todos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns the number of rows updated (0 when the id does not exist).
pub async fn update(pool: &SqlitePool, id: i64, input: &TodoInput) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE todos SET title = ?, is_complete = ? WHERE id = ?")
        .bind(&input.title)
        .bind(input.is_complete)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Returns the number of rows deleted (0 when the id does not exist).
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
