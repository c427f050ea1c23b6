//! Ceremony errors
//!
//! Guard failures and out-of-stage events are not errors; they are reported
//! as a [`Disposition`](crate::ceremony::Disposition). Only infrastructure
//! failures surface here.

use stellaris_core::effects::TimerError;
use stellaris_core::StellarisError;

/// Error raised while driving a ceremony
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CeremonyError {
    /// The timer collaborator failed
    #[error("timer failure: {0}")]
    Timer(#[from] TimerError),

    /// The runtime behind a handle has stopped
    #[error("ceremony runtime is no longer running")]
    RuntimeClosed,

    /// Configuration or collaborator failure from the core layer
    #[error(transparent)]
    Core(#[from] StellarisError),
}

impl From<CeremonyError> for StellarisError {
    fn from(err: CeremonyError) -> Self {
        match err {
            CeremonyError::Timer(e) => e.into(),
            CeremonyError::RuntimeClosed => {
                StellarisError::internal("ceremony runtime is no longer running")
            }
            CeremonyError::Core(e) => e,
        }
    }
}
