//! Errors raised while reconciling.

use thiserror::Error;

use crate::backend::Backend;
use crate::instance::Lifecycle;

/// Result of a reconciler operation running against backend `B`.
pub type ReconcileResult<T, B> = Result<T, Error<<B as Backend>::Error>>;

/// Reconciliation failure, generic over the backend's own error type.
///
/// None of these are retried and none are rolled back: display mutations issued before the
/// failure stay applied.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The element cannot be turned into an instance.
    #[error("unsupported element kind: {kind}")]
    UnsupportedElementKind {
        /// Description of the rejected element.
        kind: String,
    },
    /// An operation was attempted on an instance that is not in a state allowing it.
    #[error("cannot {operation} an instance that is {state}")]
    StaleInstanceAccess {
        /// The attempted operation.
        operation: &'static str,
        /// The lifecycle state the instance was in.
        state: Lifecycle,
    },
    /// An instance was handed an element of a type it cannot receive.
    #[error("instance of {expected} cannot receive {found}")]
    TypeMismatch {
        /// The type the instance was built for.
        expected: String,
        /// The type it was handed.
        found: String,
    },
    /// The display backend failed.
    #[error(transparent)]
    Backend(E),
}

impl<E> Error<E> {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedElementKind { kind: kind.into() }
    }

    pub(crate) const fn stale(operation: &'static str, state: Lifecycle) -> Self {
        Self::StaleInstanceAccess { operation, state }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
