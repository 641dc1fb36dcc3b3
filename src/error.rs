use std::fmt::{self, Display, Formatter};

/// The result type for memoization.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that prevents a function variable from being memoized.
///
/// A failed wrap never touches the variable: it keeps its previous function
/// and stays callable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The handle does not refer to an assignable function variable.
    #[error("cannot memoize: invalid target ({0})")]
    InvalidTarget(Reason),
}

/// Why a target was rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reason {
    /// The handle was created with [`read_only`](crate::Var::read_only).
    ReadOnly,
    /// The variable holds no function yet.
    Unset,
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            Self::ReadOnly => "variable is read-only",
            Self::Unset => "variable holds no function",
        })
    }
}
