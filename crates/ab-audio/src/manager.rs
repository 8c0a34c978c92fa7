use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ab_core::asset::AssetRef;
use ab_core::config::AudioSettings;
use ab_core::error::MenuError;
use ab_core::traits::{AudioService, SoundHandle};
use rayon::prelude::*;

use crate::decode;
use crate::error::AudioError;
use crate::mixer::{Clip, Mixer, MixerCommand, Volumes};
use crate::output::{AudioOutput, OutputDevice};

/// Sample rate used when no output device is attached.
pub const HEADLESS_SAMPLE_RATE: u32 = 44_100;

/// Label reported while no music plays.
pub const NO_MUSIC_LABEL: &str = "None";

/// Playable sound effect: a decoded clip plus the mixer's command sender.
#[derive(Clone, Debug)]
pub struct EffectHandle {
    clip: Arc<Clip>,
    commands: flume::Sender<MixerCommand>,
}

impl EffectHandle {
    #[must_use]
    pub fn clip(&self) -> &Clip {
        &self.clip
    }
}

impl SoundHandle for EffectHandle {
    fn play(&self) {
        if self
            .commands
            .send(MixerCommand::PlayEffect(Arc::clone(&self.clip)))
            .is_err()
        {
            log::trace!("Mixer détaché, effet ignoré");
        }
    }
}

/// Audio service backed by the software mixer and a cpal output stream.
///
/// Clips are decoded once and cached by path. Without an output device the
/// manager runs headless: every call succeeds, nothing is heard.
///
/// # Example
/// ```
/// use ab_audio::AudioManager;
/// use ab_core::config::AudioSettings;
/// use ab_core::traits::AudioService;
///
/// let mut audio = AudioManager::headless(AudioSettings::default());
/// audio.stop_music();
/// assert_eq!(audio.current_music_label(), "None");
/// ```
pub struct AudioManager {
    commands: flume::Sender<MixerCommand>,
    output: Option<AudioOutput>,
    sample_rate: u32,
    settings: AudioSettings,
    clips: HashMap<PathBuf, Arc<Clip>>,
    current_music: Option<AssetRef>,
}

impl AudioManager {
    /// Open the default output device, falling back to headless mode.
    #[must_use]
    pub fn new(settings: AudioSettings) -> Self {
        let device = match OutputDevice::open_default() {
            Ok(device) => device,
            Err(e) => {
                log::warn!("Sortie audio indisponible, mode silencieux : {e}");
                return Self::headless(settings);
            }
        };

        let (mut manager, mixer) = Self::detached(settings, device.sample_rate());
        match device.start(mixer) {
            Ok(output) => manager.output = Some(output),
            Err(e) => log::warn!("Stream audio non démarré, mode silencieux : {e}"),
        }
        manager
    }

    /// Manager with no mixer behind it.
    #[must_use]
    pub fn headless(settings: AudioSettings) -> Self {
        Self::detached(settings, HEADLESS_SAMPLE_RATE).0
    }

    /// Manager plus a mixer not attached to any device.
    ///
    /// The caller drives the mixer (offline rendering, tests).
    #[must_use]
    pub fn detached(settings: AudioSettings, sample_rate: u32) -> (Self, Mixer) {
        let (mixer, commands) = Mixer::new(Volumes::from(&settings));
        (
            Self {
                commands,
                output: None,
                sample_rate,
                settings,
                clips: HashMap::new(),
                current_music: None,
            },
            mixer,
        )
    }

    /// `true` when no device stream is running.
    #[must_use]
    pub fn is_headless(&self) -> bool {
        self.output.is_none()
    }

    /// Rate every clip is resampled to.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Nombre de clips en cache.
    #[must_use]
    pub fn cached_clips(&self) -> usize {
        self.clips.len()
    }

    /// Decode `assets` in parallel into the clip cache.
    ///
    /// Returns the assets that failed, with their error. Already cached
    /// assets are skipped.
    pub fn prefetch(&mut self, assets: &[AssetRef]) -> Vec<(AssetRef, anyhow::Error)> {
        let rate = self.sample_rate;
        let pending: Vec<&AssetRef> = assets
            .iter()
            .filter(|a| !self.clips.contains_key(a.path()))
            .collect();

        let decoded: Vec<(AssetRef, anyhow::Result<Clip>)> = pending
            .par_iter()
            .map(|asset| ((*asset).clone(), decode::load_clip(asset.path(), rate)))
            .collect();

        let mut failures = Vec::new();
        for (asset, result) in decoded {
            match result {
                Ok(clip) => {
                    self.clips.insert(asset.path().to_path_buf(), Arc::new(clip));
                }
                Err(e) => {
                    log::warn!("Préchargement échoué pour {asset} : {e:#}");
                    failures.push((asset, e));
                }
            }
        }

        log::info!(
            "Préchargement : {} clips en cache, {} échecs",
            self.clips.len(),
            failures.len()
        );
        failures
    }

    fn clip(&mut self, asset: &AssetRef) -> anyhow::Result<Arc<Clip>> {
        if let Some(clip) = self.clips.get(asset.path()) {
            return Ok(Arc::clone(clip));
        }
        let clip = Arc::new(decode::load_clip(asset.path(), self.sample_rate)?);
        self.clips
            .insert(asset.path().to_path_buf(), Arc::clone(&clip));
        Ok(clip)
    }

    fn send(&self, command: MixerCommand) {
        if self.commands.send(command).is_err() {
            log::trace!("Mixer détaché, commande ignorée");
        }
    }
}

impl AudioService for AudioManager {
    type Sound = EffectHandle;

    fn stop_music(&mut self) {
        self.current_music = None;
        self.send(MixerCommand::StopMusic);
    }

    fn play_music(&mut self, track: &AssetRef) {
        match self.clip(track) {
            Ok(clip) => {
                log::info!("Musique : {track}");
                self.send(MixerCommand::PlayMusic {
                    clip,
                    looped: self.settings.loop_music,
                });
                self.current_music = Some(track.clone());
            }
            Err(e) => {
                log::error!("Lecture impossible de {track} : {e:#}");
                self.stop_music();
            }
        }
    }

    fn current_music_label(&self) -> String {
        self.current_music
            .as_ref()
            .map_or_else(|| NO_MUSIC_LABEL.to_string(), AssetRef::label)
    }

    fn resolve_music(&mut self, track: &AssetRef) -> Result<(), MenuError> {
        if !track.is_audio() {
            return Err(MenuError::resolution(
                track.to_string(),
                AudioError::UnsupportedFormat("extension audio non reconnue".to_string()),
            ));
        }
        decode::probe_file(track.path()).map(|_| ()).map_err(|e| {
            MenuError::resolution(track.to_string(), AudioError::DecodeError(format!("{e:#}")))
        })
    }

    fn resolve_sound(&mut self, effect: &AssetRef) -> Result<EffectHandle, MenuError> {
        let clip = self
            .clip(effect)
            .map_err(|e| {
                MenuError::resolution(effect.to_string(), AudioError::DecodeError(format!("{e:#}")))
            })?;
        Ok(EffectHandle {
            clip,
            commands: self.commands.clone(),
        })
    }
}
