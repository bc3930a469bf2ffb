use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A `UNIQUE` constraint rejected the write (SQLSTATE 23505).
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(sqlx::Error),

    /// A referenced row does not exist (SQLSTATE 23503).
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(sqlx::Error),

    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return Self::Sqlx(err);
        };
        if db_err.is_unique_violation() {
            Self::UniqueViolation(err)
        } else if db_err.is_foreign_key_violation() {
            Self::ForeignKeyViolation(err)
        } else {
            Self::Sqlx(err)
        }
    }
}
