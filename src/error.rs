use crate::Id;
use alloc::collections::TryReserveError;
use core::fmt;

/// Error returned by the checked operations of an [`IdVec`](crate::IdVec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The id does not refer to a value currently stored in the container.
    NotLive(Id),
    /// The handle was created by a different container.
    ForeignHandle,
    /// The value the handle referred to has been removed.
    StaleHandle(Id),
    /// Growing one of the internal tables failed.
    AllocationFailed,
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::AllocationFailed
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotLive(id) => write!(f, "id {} is not live", id),
            Error::ForeignHandle => f.write_str("handle belongs to a different IdVec"),
            Error::StaleHandle(id) => write!(f, "handle to id {} is stale", id),
            Error::AllocationFailed => f.write_str("memory allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(all(nightly, doc), doc(cfg(feature = "std")))]
impl std::error::Error for Error {}
