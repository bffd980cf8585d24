//! Error types for the authorization engine

use thiserror::Error;

/// Result type alias for authorization operations
pub type Result<T> = std::result::Result<T, PermitError>;

/// Errors that can occur during authorization operations
///
/// `Forbidden` is the only variant that represents an authorization decision;
/// callers branch on it (see [`PermitError::is_forbidden`]) and treat every
/// other variant as a fault to propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermitError {
    /// Access denied for the current principal
    #[error("access denied: {0}")]
    Forbidden(Denial),

    /// Roles argument had an invalid shape
    #[error("invalid roles: {reason}")]
    InvalidRoles { reason: String },

    /// No principal provider has been wired into the gate
    #[error("no principal provider configured")]
    MissingProvider,

    /// Attempted to register a role without a name
    #[error("role has no name")]
    UnnamedRole,

    /// Generic internal error
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// The reason an authorization check denied access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The provider produced no principal (nobody is authenticated)
    #[error("no authenticated principal")]
    NoPrincipal,

    /// The principal's effective abilities do not cover the desired ability
    #[error("missing ability '{ability}'")]
    MissingAbility { ability: String },

    /// The principal does not hold the desired role (or no such role exists)
    #[error("missing role '{role}'")]
    MissingRole { role: String },
}

impl PermitError {
    /// Returns true when the error is an access denial rather than a fault
    pub fn is_forbidden(&self) -> bool {
        matches!(self, PermitError::Forbidden(_))
    }

    /// The structured denial, when the error is one
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            PermitError::Forbidden(denial) => Some(denial),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for PermitError {
    fn from(err: anyhow::Error) -> Self {
        PermitError::Internal {
            message: err.to_string(),
        }
    }
}
