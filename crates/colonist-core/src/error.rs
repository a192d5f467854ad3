use colonist_logic::ids::ObjectId;
use thiserror::Error;

/// A fault while running one worker's behavior for one tick.
///
/// Caught per worker by the base controller; never aborts the colony loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("creep '{0}' has no memory")]
    MissingMemory(String),
    #[error("base '{0}' does not exist")]
    UnknownBase(String),
    #[error("object {0} vanished mid-tick")]
    Vanished(ObjectId),
    #[error("role '{role}' is misconfigured: {reason}")]
    Misconfigured { role: String, reason: String },
    #[error("creep '{creep}' failed: {reason}")]
    Fault { creep: String, reason: String },
}
