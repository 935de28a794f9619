/// Failures of the startup connection and the readiness probe.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The pool could not be opened, after any retries
    #[error("PostgreSQL connection failed: {0}")]
    Connection(#[from] sea_orm::DbErr),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_err_becomes_connection_error() {
        let err: DatabaseError = sea_orm::DbErr::Custom("connection refused".into()).into();
        assert!(matches!(err, DatabaseError::Connection(_)));
        assert!(err.to_string().starts_with("PostgreSQL connection failed"));
        assert!(err.to_string().contains("connection refused"));
    }
}
