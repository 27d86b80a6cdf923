use error_stack::Report;

use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(sqlx::Error),
    #[error(transparent)]
    Migrate(sqlx::migrate::MigrateError),
    #[error(transparent)]
    Env(dotenvy::Error),
    #[error("{0}")]
    Config(String),
}

impl From<sqlx::Error> for DriverError {
    fn from(value: sqlx::Error) -> Self {
        Self::SqlX(value)
    }
}

impl From<sqlx::migrate::MigrateError> for DriverError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Migrate(value)
    }
}

impl From<dotenvy::Error> for DriverError {
    fn from(value: dotenvy::Error) -> Self {
        Self::Env(value)
    }
}

impl DriverError {
    fn kind(&self) -> KernelError {
        match self {
            DriverError::SqlX(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            ) => KernelError::StorageUnavailable,
            DriverError::SqlX(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                KernelError::Conflict
            }
            _ => KernelError::Internal,
        }
    }
}

/// Single conversion point from driver failures into the kernel taxonomy.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T, E> ConvertError for Result<T, E>
where
    E: Into<DriverError>,
{
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let error = error.into();
            let kind = error.kind();
            Report::from(error).change_context(kind)
        })
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use crate::error::ConvertError;

    #[test]
    fn pool_exhaustion_is_retryable() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = result.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::StorageUnavailable);
        assert!(report.current_context().is_retryable());
    }

    #[test]
    fn missing_rows_are_internal() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let report = result.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);
    }
}
