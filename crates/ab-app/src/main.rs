use std::io::stdout;

use ab_audio::AudioManager;
use ab_core::asset::AssetRef;
use ab_core::config::{SoundTestConfig, load_config};
use anyhow::Result;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

pub mod app;
pub mod cli;
pub mod host;
pub mod ui;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(fps) = cli.fps {
        config.ui.target_fps = fps;
    }
    config.clamp_all();

    // 4. Collecter le contenu : config puis ligne de commande
    let mut tracks = config.music_refs()?;
    tracks.extend(cli.music.iter().cloned().map(AssetRef::from));
    let mut effects = config.effect_refs()?;
    effects.extend(cli.effects.iter().cloned().map(AssetRef::from));
    log::info!("{} musiques, {} effets", tracks.len(), effects.len());

    // 5. Démarrer l'audio (silencieux si --mute ou sans périphérique)
    let mut audio = if cli.mute {
        AudioManager::headless(config.audio.clone())
    } else {
        AudioManager::new(config.audio.clone())
    };
    if audio.is_headless() {
        log::info!("Audio en mode silencieux");
    }
    // 5b. Décoder tout le contenu avant le TUI : aucun décodage dans la boucle
    let content: Vec<AssetRef> = tracks.iter().chain(&effects).cloned().collect();
    let failed = audio.prefetch(&content);
    if !failed.is_empty() {
        log::warn!("{} fichiers illisibles, le chargement va échouer", failed.len());
    }

    // 6. Construire l'App (une erreur de contenu arrête tout avant le TUI)
    let mut app_instance = app::App::load(audio, &tracks, &effects, &config.ui)?;

    // 7. Initialiser le terminal ratatui
    let terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(stdout(), EnableMouseCapture) {
        log::warn!("Capture souris indisponible : {e}");
    }

    // 8. Boucle principale
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    let _ = crossterm::execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Load `--config`, or fall back to defaults when the file is missing.
fn resolve_config(cli: &cli::Cli) -> Result<SoundTestConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SoundTestConfig::default())
    }
}
