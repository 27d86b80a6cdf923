use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    /// Referenced entity is absent.
    NotFound,
    /// Malformed or out-of-range input, e.g. an unknown status string.
    Validation,
    /// Actor lacks the required role or ownership.
    Authorization,
    /// Operation is not legal in the entity's current lifecycle state.
    InvalidState,
    /// Requested status change breaks the monotonic status order.
    InvalidTransition,
    /// Uniqueness or duplicate constraint violated.
    Conflict,
    /// A conditional write lost against a concurrent one.
    Concurrency,
    /// Transient backing-store failure or timeout. Safe to retry.
    StorageUnavailable,
    Internal,
}

impl KernelError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, KernelError::StorageUnavailable | KernelError::Concurrency)
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Authorization => write!(f, "Operation not permitted for this actor"),
            KernelError::InvalidState => write!(f, "Entity is not in a valid state for this operation"),
            KernelError::InvalidTransition => write!(f, "Invalid status transition"),
            KernelError::Conflict => write!(f, "Conflicting entity already exists"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::StorageUnavailable => write!(f, "Storage unavailable"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use crate::KernelError;

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(KernelError::StorageUnavailable.is_retryable());
        assert!(KernelError::Concurrency.is_retryable());
        assert!(!KernelError::Conflict.is_retryable());
        assert!(!KernelError::NotFound.is_retryable());
        assert!(!KernelError::Internal.is_retryable());
    }
}
