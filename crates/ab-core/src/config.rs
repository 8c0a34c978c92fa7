use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::asset::{self, AssetRef};

/// Configuration complète de l'écran de test son.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ab_core::config::SoundTestConfig;
/// let config = SoundTestConfig::default();
/// assert_eq!(config.ui.target_fps, 30);
/// assert!(config.content.music.is_empty());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SoundTestConfig {
    /// Which tracks and effects to list.
    pub content: ContentConfig,
    /// Mixer settings.
    pub audio: AudioSettings,
    /// Terminal screen settings.
    pub ui: UiConfig,
}

/// Content listed by the screen. Relative paths are resolved against `root`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ContentConfig {
    /// Base directory for every relative path below.
    pub root: PathBuf,
    /// Music tracks, in selection order.
    pub music: Vec<PathBuf>,
    /// Optional folder scanned for extra tracks (sorted by name, appended).
    pub music_dir: Option<PathBuf>,
    /// Sound effects, in selection order.
    pub effects: Vec<PathBuf>,
    /// Optional folder scanned for extra effects (sorted by name, appended).
    pub effects_dir: Option<PathBuf>,
}

/// Volumes and playback style handed to the audio service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AudioSettings {
    /// Volume global [0.0, 1.0].
    pub master_volume: f32,
    /// Music voice volume [0.0, 1.0].
    pub music_volume: f32,
    /// Effect voices volume [0.0, 1.0].
    pub effect_volume: f32,
    /// Reboucler la musique en fin de piste.
    pub loop_music: bool,
}

/// Screen settings.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UiConfig {
    /// Titre affiché en haut du menu.
    pub title: String,
    /// Redraw rate [1, 120].
    pub target_fps: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            music: Vec::new(),
            music_dir: None,
            effects: Vec::new(),
            effects_dir: None,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.8,
            effect_volume: 1.0,
            loop_music: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Sound Test".to_string(),
            target_fps: 30,
        }
    }
}

impl AudioSettings {
    /// Clamp all volumes to [0, 1]. NaN and infinities fall back to the default.
    pub fn clamp_all(&mut self) {
        let defaults = Self::default();
        self.master_volume = unit_volume(self.master_volume, defaults.master_volume);
        self.music_volume = unit_volume(self.music_volume, defaults.music_volume);
        self.effect_volume = unit_volume(self.effect_volume, defaults.effect_volume);
    }
}

fn unit_volume(value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    }
}

impl SoundTestConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.audio.clamp_all();
        self.ui.target_fps = self.ui.target_fps.clamp(1, 120);
    }

    /// Music tracks: explicit list first, then the scanned folder.
    ///
    /// # Errors
    /// Returns an error if `music_dir` is set but cannot be read.
    pub fn music_refs(&self) -> Result<Vec<AssetRef>> {
        collect_refs(
            &self.content.root,
            &self.content.music,
            self.content.music_dir.as_deref(),
        )
    }

    /// Sound effects: explicit list first, then the scanned folder.
    ///
    /// # Errors
    /// Returns an error if `effects_dir` is set but cannot be read.
    pub fn effect_refs(&self) -> Result<Vec<AssetRef>> {
        collect_refs(
            &self.content.root,
            &self.content.effects,
            self.content.effects_dir.as_deref(),
        )
    }
}

fn collect_refs(root: &Path, listed: &[PathBuf], dir: Option<&Path>) -> Result<Vec<AssetRef>> {
    let mut refs: Vec<AssetRef> = listed
        .iter()
        .map(|p| AssetRef::new(p.as_path()).under(root))
        .collect();

    if let Some(dir) = dir {
        let dir = AssetRef::new(dir).under(root);
        for found in asset::scan_dir(dir.path())? {
            if !refs.contains(&found) {
                refs.push(found);
            }
        }
    }
    Ok(refs)
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    content: Option<ContentSection>,
    audio: Option<AudioSection>,
    ui: Option<UiSection>,
}

/// Content section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ContentSection {
    root: Option<PathBuf>,
    music: Option<Vec<PathBuf>>,
    music_dir: Option<PathBuf>,
    effects: Option<Vec<PathBuf>>,
    effects_dir: Option<PathBuf>,
}

/// Audio section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct AudioSection {
    master_volume: Option<f32>,
    music_volume: Option<f32>,
    effect_volume: Option<f32>,
    loop_music: Option<bool>,
}

/// UI section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct UiSection {
    title: Option<String>,
    target_fps: Option<u32>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<SoundTestConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = SoundTestConfig::default();

    if let Some(c) = file.content {
        if let Some(v) = c.root {
            config.content.root = v;
        }
        if let Some(v) = c.music {
            config.content.music = v;
        }
        if let Some(v) = c.music_dir {
            config.content.music_dir = Some(v);
        }
        if let Some(v) = c.effects {
            config.content.effects = v;
        }
        if let Some(v) = c.effects_dir {
            config.content.effects_dir = Some(v);
        }
    }

    if let Some(a) = file.audio {
        if let Some(v) = a.master_volume {
            config.audio.master_volume = v;
        }
        if let Some(v) = a.music_volume {
            config.audio.music_volume = v;
        }
        if let Some(v) = a.effect_volume {
            config.audio.effect_volume = v;
        }
        if let Some(v) = a.loop_music {
            config.audio.loop_music = v;
        }
    }

    if let Some(u) = file.ui {
        if let Some(v) = u.title {
            config.ui.title = v;
        }
        if let Some(v) = u.target_fps {
            config.ui.target_fps = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ab_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/soundtest.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SoundTestConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}
