use sea_orm::DbErr;

pub mod connection;
pub mod entities;
pub mod todo_repo;

/// Errors surfaced by the store layer. Validation failures carry the
/// user-facing field name so handlers can show them verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

pub type StoreResult<T> = Result<T, StoreError>;
