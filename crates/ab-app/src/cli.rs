use std::path::PathBuf;

use clap::Parser;

/// soundtest : écran de test son : musiques et effets sonores.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/soundtest.toml.
    #[arg(short, long, default_value = "config/soundtest.toml")]
    pub config: PathBuf,

    /// Pistes musicales ajoutées après celles de la config.
    #[arg(long, num_args = 1..)]
    pub music: Vec<PathBuf>,

    /// Effets sonores ajoutés après ceux de la config.
    #[arg(long, num_args = 1..)]
    pub effects: Vec<PathBuf>,

    /// Ne pas ouvrir de périphérique audio (mode silencieux).
    #[arg(long, default_value_t = false)]
    pub mute: bool,

    /// Cadence de rafraîchissement de l'écran.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
