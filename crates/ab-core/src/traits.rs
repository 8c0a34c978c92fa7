use crate::asset::AssetRef;
use crate::error::MenuError;

/// Sens de déplacement d'une sélection cyclique.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// One step forward, wrapping to silence after the last entry.
    Next,
    /// One step backward, wrapping from silence to the last entry.
    Previous,
}

/// What an interactive menu entry does when the host activates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Music selector.
    Music,
    /// Sound effect selector.
    Effect,
    /// Leave the screen.
    Back,
}

/// Result of routing a host activation into the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The screen stays open.
    Stay,
    /// The user asked to leave the screen.
    Exit,
}

/// Identifiant opaque d'une entrée enregistrée auprès de l'hôte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

/// A loaded, playable sound effect.
///
/// # Example
/// ```
/// use ab_core::traits::SoundHandle;
///
/// struct Silent;
/// impl SoundHandle for Silent {
///     fn play(&self) {}
/// }
/// Silent.play();
/// ```
pub trait SoundHandle {
    /// Fire the sound once. Never blocks.
    fn play(&self);
}

/// Audio engine used by the sound test screen.
///
/// Implémenté par : `AudioManager` (ab-audio), et des doublures dans les tests.
///
/// # Example
/// ```
/// use ab_core::asset::AssetRef;
/// use ab_core::error::MenuError;
/// use ab_core::traits::{AudioService, SoundHandle};
///
/// struct Silent;
/// impl SoundHandle for Silent {
///     fn play(&self) {}
/// }
///
/// struct NullAudio;
/// impl AudioService for NullAudio {
///     type Sound = Silent;
///     fn stop_music(&mut self) {}
///     fn play_music(&mut self, _track: &AssetRef) {}
///     fn current_music_label(&self) -> String { "None".into() }
///     fn resolve_music(&mut self, _track: &AssetRef) -> Result<(), MenuError> { Ok(()) }
///     fn resolve_sound(&mut self, _effect: &AssetRef) -> Result<Silent, MenuError> { Ok(Silent) }
/// }
/// ```
pub trait AudioService {
    /// Handle type returned for sound effects.
    type Sound: SoundHandle;

    /// Stop the music voice. No-op when nothing plays.
    fn stop_music(&mut self);

    /// Start `track` as the music voice, replacing any current one.
    ///
    /// Best effort: failures are the service's concern and are not reported.
    fn play_music(&mut self, track: &AssetRef);

    /// Nom affichable de la musique en cours.
    fn current_music_label(&self) -> String;

    /// Check that `track` can be played later.
    ///
    /// # Errors
    /// [`MenuError::ResolutionFailure`] if the reference is unusable.
    fn resolve_music(&mut self, track: &AssetRef) -> Result<(), MenuError>;

    /// Load `effect` into a playable handle.
    ///
    /// # Errors
    /// [`MenuError::ResolutionFailure`] if the reference is unusable.
    fn resolve_sound(&mut self, effect: &AssetRef) -> Result<Self::Sound, MenuError>;
}

/// Menu surface that shows clickable entries with mutable text.
///
/// The host calls back into the menu synchronously (`on_activate`) when an
/// entry is clicked; it never holds closures.
pub trait MenuHost {
    /// Register an entry.
    ///
    /// # Errors
    /// [`MenuError::HostUnavailable`] if the host rejects the registration.
    fn add_entry(&mut self, label: &str, action: MenuAction) -> Result<EntryId, MenuError>;

    /// Remplace le texte d'une entrée. Unknown ids are ignored.
    fn set_text(&mut self, entry: EntryId, label: &str);

    /// Retire une entrée. Unknown ids are ignored.
    fn remove_entry(&mut self, entry: EntryId);
}
