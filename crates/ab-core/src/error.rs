use thiserror::Error;

/// Errors raised while assembling the sound test screen.
///
/// Both kinds are load-time failures: they are never retried and they abort
/// the construction of the menu.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// An asset reference could not be turned into a playable resource.
    #[error("Ressource audio introuvable : {reference} ({reason})")]
    ResolutionFailure {
        /// The reference as given by the caller.
        reference: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The menu host refused to register an entry.
    #[error("Hôte de menu indisponible : {0}")]
    HostUnavailable(String),
}

impl MenuError {
    /// Shorthand for a [`MenuError::ResolutionFailure`].
    pub fn resolution(reference: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResolutionFailure {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}
