use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extensions reconnues comme fichiers audio.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "aac", "m4a"];

/// Reference to an audio asset on disk (music track or sound effect).
///
/// The display label is the file name without its extension.
///
/// # Example
/// ```
/// use ab_core::asset::AssetRef;
/// let track = AssetRef::new("music/TrackA.ogg");
/// assert_eq!(track.label(), "TrackA");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetRef {
    path: PathBuf,
}

impl AssetRef {
    /// Wrap a path as an asset reference.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Chemin complet de l'asset.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, or the whole path when it has no stem.
    #[must_use]
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or_else(|| self.path.display().to_string(), String::from)
    }

    /// Rebase a relative reference onto `root`. Absolute references are kept.
    #[must_use]
    pub fn under(&self, root: &Path) -> Self {
        if self.path.is_absolute() {
            self.clone()
        } else {
            Self::new(root.join(&self.path))
        }
    }

    /// `true` if the extension is one of [`AUDIO_EXTENSIONS`].
    #[must_use]
    pub fn is_audio(&self) -> bool {
        is_audio_path(&self.path)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for AssetRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Classify a path as audio based on its extension (case-insensitive).
#[must_use]
pub fn is_audio_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// List every audio file directly inside `dir`, sorted by path.
///
/// # Errors
/// Returns an error if the directory cannot be read.
pub fn scan_dir(dir: &Path) -> Result<Vec<AssetRef>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Impossible de lire le dossier {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        if let Ok(ft) = entry.file_type()
            && ft.is_file()
            && is_audio_path(&entry.path())
        {
            found.push(AssetRef::new(entry.path()));
        }
    }
    found.sort();

    log::debug!("{} fichiers audio trouvés dans {}", found.len(), dir.display());
    Ok(found)
}
