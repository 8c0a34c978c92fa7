use ab_core::asset::AssetRef;
use ab_core::error::MenuError;
use ab_core::traits::{
    AudioService, Direction, EntryId, MenuAction, MenuHost, MenuOutcome, SoundHandle,
};

use crate::catalog::{EffectCatalog, TrackCatalog};
use crate::selection::Selection;

/// Texte de l'entrée de sortie.
pub const BACK_LABEL: &str = "Back";

/// Ids of the three entries registered on the host.
#[derive(Clone, Copy, Debug)]
struct Entries {
    music: EntryId,
    effect: EntryId,
    back: EntryId,
}

/// Sound test menu: cycles through music tracks and sound effects.
///
/// Owns its audio service and its menu host (both injected). Every
/// selection change plays or stops audio, then pushes a fresh label to the
/// host.
///
/// # Example
/// ```
/// use ab_core::asset::AssetRef;
/// use ab_core::error::MenuError;
/// use ab_core::traits::*;
/// use ab_menu::SelectionMenu;
///
/// struct Silent;
/// impl SoundHandle for Silent { fn play(&self) {} }
///
/// #[derive(Default)]
/// struct NullAudio { playing: Option<String> }
/// impl AudioService for NullAudio {
///     type Sound = Silent;
///     fn stop_music(&mut self) { self.playing = None; }
///     fn play_music(&mut self, t: &AssetRef) { self.playing = Some(t.label()); }
///     fn current_music_label(&self) -> String {
///         self.playing.clone().unwrap_or_else(|| "None".into())
///     }
///     fn resolve_music(&mut self, _: &AssetRef) -> Result<(), MenuError> { Ok(()) }
///     fn resolve_sound(&mut self, _: &AssetRef) -> Result<Silent, MenuError> { Ok(Silent) }
/// }
///
/// #[derive(Default)]
/// struct Labels(Vec<String>);
/// impl MenuHost for Labels {
///     fn add_entry(&mut self, label: &str, _: MenuAction) -> Result<EntryId, MenuError> {
///         self.0.push(label.into());
///         Ok(EntryId(self.0.len() - 1))
///     }
///     fn set_text(&mut self, id: EntryId, label: &str) { self.0[id.0] = label.into(); }
///     fn remove_entry(&mut self, _: EntryId) {}
/// }
///
/// let mut menu = SelectionMenu::new(NullAudio::default(), Labels::default());
/// menu.append_tracks(&[AssetRef::new("TrackA.ogg")]).unwrap();
/// menu.initialize().unwrap();
/// menu.advance_music(Direction::Next);
/// assert_eq!(menu.host().0[0], "Music: TrackA");
/// ```
pub struct SelectionMenu<A: AudioService, H: MenuHost> {
    audio: A,
    host: H,
    tracks: TrackCatalog,
    effects: EffectCatalog<A::Sound>,
    music: Selection,
    effect: Selection,
    entries: Option<Entries>,
}

impl<A: AudioService, H: MenuHost> SelectionMenu<A, H> {
    /// Build the menu around its collaborators. Stops any playing music.
    pub fn new(mut audio: A, host: H) -> Self {
        audio.stop_music();
        Self {
            audio,
            host,
            tracks: TrackCatalog::default(),
            effects: EffectCatalog::default(),
            music: Selection::Silence,
            effect: Selection::Silence,
            entries: None,
        }
    }

    /// Reset both selections and register the music, effect and back
    /// entries on the host. Stops any playing music.
    ///
    /// On failure every entry registered by this call is removed again, so
    /// the host never shows a partial menu.
    ///
    /// # Errors
    /// [`MenuError::HostUnavailable`] if the host rejects an entry.
    pub fn initialize(&mut self) -> Result<(), MenuError> {
        self.music = Selection::Silence;
        self.effect = Selection::Silence;
        self.audio.stop_music();

        if let Some(old) = self.entries.take() {
            for id in [old.music, old.effect, old.back] {
                self.host.remove_entry(id);
            }
        }

        let labels = [
            (self.current_music_label(), MenuAction::Music),
            (self.current_effect_label(), MenuAction::Effect),
            (BACK_LABEL.to_string(), MenuAction::Back),
        ];
        let mut ids = Vec::with_capacity(labels.len());
        for (label, action) in &labels {
            match self.host.add_entry(label, *action) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    for id in ids {
                        self.host.remove_entry(id);
                    }
                    log::error!("Enregistrement du menu refusé : {e}");
                    return Err(e);
                }
            }
        }

        self.entries = Some(Entries {
            music: ids[0],
            effect: ids[1],
            back: ids[2],
        });
        log::info!(
            "Menu sound test prêt : {} pistes, {} effets",
            self.tracks.len(),
            self.effects.len()
        );
        Ok(())
    }

    /// Append music tracks, all or nothing.
    ///
    /// # Errors
    /// [`MenuError::ResolutionFailure`] for the first track the audio service
    /// cannot resolve; no track from this call is added.
    pub fn append_tracks(&mut self, tracks: &[AssetRef]) -> Result<(), MenuError> {
        for track in tracks {
            self.audio.resolve_music(track)?;
        }
        self.tracks.extend(tracks.iter().cloned());
        log::debug!("{} pistes ajoutées", tracks.len());
        Ok(())
    }

    /// Load and append sound effects, all or nothing.
    ///
    /// # Errors
    /// [`MenuError::ResolutionFailure`] for the first effect the audio service
    /// cannot load; no effect from this call is added.
    pub fn append_effects(&mut self, effects: &[AssetRef]) -> Result<(), MenuError> {
        let mut loaded = Vec::with_capacity(effects.len());
        for effect in effects {
            let handle = self.audio.resolve_sound(effect)?;
            loaded.push((effect.label(), handle));
        }
        self.effects.extend(loaded);
        log::debug!("{} effets ajoutés", effects.len());
        Ok(())
    }

    /// Move the music selection, then play the new track or stop on silence.
    pub fn advance_music(&mut self, direction: Direction) {
        self.music = self.music.step(direction, self.tracks.len());
        log::debug!("Musique -> curseur {}", self.music.cursor());
        self.apply_music();
    }

    /// Move the effect selection and fire the new effect once (silence plays nothing).
    pub fn advance_effect(&mut self, direction: Direction) {
        self.effect = self.effect.step(direction, self.effects.len());
        log::debug!("Effet -> curseur {}", self.effect.cursor());
        self.refresh_effect_label();
        self.play_effect();
    }

    /// Re-issue playback for the current music selection.
    pub fn replay_music(&mut self) {
        self.apply_music();
    }

    /// Fire the current effect again without moving the cursor.
    pub fn replay_effect(&self) {
        self.play_effect();
    }

    /// Host entry point for a click on one of the registered entries.
    ///
    /// Selector entries advance to the next choice; `Back` asks to leave.
    pub fn on_activate(&mut self, action: MenuAction) -> MenuOutcome {
        self.on_adjust(action, Direction::Next)
    }

    /// Host entry point for a directional adjustment of an entry.
    pub fn on_adjust(&mut self, action: MenuAction, direction: Direction) -> MenuOutcome {
        match action {
            MenuAction::Music => self.advance_music(direction),
            MenuAction::Effect => self.advance_effect(direction),
            MenuAction::Back => return MenuOutcome::Exit,
        }
        MenuOutcome::Stay
    }

    /// `"Music: "` followed by the audio service's current music label.
    #[must_use]
    pub fn current_music_label(&self) -> String {
        format!("Music: {}", self.audio.current_music_label())
    }

    /// `"Sound: "` followed by the selected effect label (`None` for silence).
    #[must_use]
    pub fn current_effect_label(&self) -> String {
        format!("Sound: {}", self.effects.label(self.effect))
    }

    fn apply_music(&mut self) {
        match self.tracks.get(self.music) {
            Some(track) => self.audio.play_music(track),
            None => self.audio.stop_music(),
        }
        if let Some(entries) = self.entries {
            let label = self.current_music_label();
            self.host.set_text(entries.music, &label);
        }
    }

    fn refresh_effect_label(&mut self) {
        if let Some(entries) = self.entries {
            let label = self.current_effect_label();
            self.host.set_text(entries.effect, &label);
        }
    }

    fn play_effect(&self) {
        if let Some(handle) = self.effects.handle(self.effect) {
            handle.play();
        }
    }

    #[must_use]
    pub fn music_selection(&self) -> Selection {
        self.music
    }

    #[must_use]
    pub fn effect_selection(&self) -> Selection {
        self.effect
    }

    /// Curseur musique dans `[0, track_count]`.
    #[must_use]
    pub fn music_cursor(&self) -> usize {
        self.music.cursor()
    }

    /// Curseur effet dans `[0, effect_count)`.
    #[must_use]
    pub fn effect_cursor(&self) -> usize {
        self.effect.cursor()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of effect slots, the "None" slot included.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.effects.len() + 1
    }

    #[must_use]
    pub fn tracks(&self) -> &TrackCatalog {
        &self.tracks
    }

    #[must_use]
    pub fn effects(&self) -> &EffectCatalog<A::Sound> {
        &self.effects
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.entries.is_some()
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
