use sea_orm::{DbErr, SqlErr};

/// Failures surfaced by the schema runner, grouped by how an operator should react.
#[derive(Debug, thiserror::Error)]
pub enum CinemaError {
    /// A table or constraint being created already exists.
    #[error("schema conflict: {0}")]
    SchemaConflict(DbErr),

    /// A foreign key points at a missing row or a missing table.
    #[error("referential integrity violation: {0}")]
    Referential(DbErr),

    #[error("database connection failed: {0}")]
    Connection(DbErr),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error("unknown command `{0}` (expected one of: up, down, status)")]
    UnknownCommand(String),
}

impl From<DbErr> for CinemaError {
    fn from(err: DbErr) -> Self {
        if matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
            return Self::Connection(err);
        }
        if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = err.sql_err() {
            return Self::Referential(err);
        }

        let msg = err.to_string();
        if msg.contains("already exists") {
            Self::SchemaConflict(err)
        } else if msg.contains("no such table") || msg.contains("FOREIGN KEY constraint failed") {
            Self::Referential(err)
        } else {
            Self::Database(err)
        }
    }
}

pub type CinemaResult<T> = Result<T, CinemaError>;
