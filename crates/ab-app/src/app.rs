use std::time::{Duration, Instant};

use ab_core::asset::AssetRef;
use ab_core::config::UiConfig;
use ab_core::traits::{AudioService, Direction, MenuAction, MenuOutcome};
use ab_menu::SelectionMenu;
use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::host::TuiMenuHost;
use crate::ui::{self, DrawContext};

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Menu affiché, touches actives.
    Running,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Sortie demandée.
    Quitting,
}

/// Sound test screen: the selection menu driven by terminal events.
pub struct App<A: AudioService> {
    pub state: AppState,
    menu: SelectionMenu<A, TuiMenuHost>,
    title: String,
    target_fps: u32,
    /// Inner area of the last drawn menu box, for mouse hit testing.
    menu_area: Rect,
}

impl<A: AudioService> App<A> {
    /// Build the menu, load the content and register the entries.
    ///
    /// # Errors
    /// Returns an error if a track or an effect cannot be resolved, or if
    /// the host refuses the entries.
    pub fn load(
        audio: A,
        tracks: &[AssetRef],
        effects: &[AssetRef],
        ui_config: &UiConfig,
    ) -> Result<Self> {
        let mut menu = SelectionMenu::new(audio, TuiMenuHost::new());
        menu.append_tracks(tracks)
            .context("Chargement des musiques impossible")?;
        menu.append_effects(effects)
            .context("Chargement des effets impossible")?;
        menu.initialize()
            .context("Initialisation du menu impossible")?;

        Ok(Self {
            state: AppState::Running,
            menu,
            title: ui_config.title.clone(),
            target_fps: ui_config.target_fps.clamp(1, 120),
            menu_area: Rect::default(),
        })
    }

    #[must_use]
    pub fn menu(&self) -> &SelectionMenu<A, TuiMenuHost> {
        &self.menu
    }

    /// Main event loop. Returns once the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.target_fps));
        let mut last_frame = Instant::now()
            .checked_sub(frame_duration)
            .unwrap_or_else(Instant::now);

        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let elapsed = last_frame.elapsed();
            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(frame_duration.saturating_sub(elapsed))? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            let menu = self.menu();
            let ctx = DrawContext {
                title: &self.title,
                entries: menu.host().entries(),
                selected: menu.host().selected(),
                track_count: menu.tracks().len(),
                effect_count: menu.effect_count(),
                show_help: self.state == AppState::Help,
            };
            let mut menu_area = self.menu_area;
            terminal.draw(|frame| {
                menu_area = ui::draw(frame, &ctx);
            })?;
            self.menu_area = menu_area;
        }

        log::info!("Sortie du sound test");
        Ok(())
    }

    /// Handle one terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.handle_click(column, row),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.state == AppState::Help {
            match code {
                KeyCode::Char('?') | KeyCode::Esc => self.state = AppState::Running,
                KeyCode::Char('q') => self.state = AppState::Quitting,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Up | KeyCode::Char('k') => self.menu.host_mut().select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.menu.host_mut().select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(action) = self.selected_action() {
                    let outcome = self.menu.on_activate(action);
                    self.apply(outcome);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.adjust(Direction::Next),
            KeyCode::Left | KeyCode::Char('h') => self.adjust(Direction::Previous),
            KeyCode::Char('r') => match self.selected_action() {
                Some(MenuAction::Music) => self.menu.replay_music(),
                Some(MenuAction::Effect) => self.menu.replay_effect(),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        if self.state != AppState::Running {
            return;
        }
        let count = self.menu.host().entries().len();
        let Some(index) = ui::entry_at(self.menu_area, count, column, row) else {
            return;
        };
        self.menu.host_mut().select(index);
        if let Some(action) = self.selected_action() {
            let outcome = self.menu.on_activate(action);
            self.apply(outcome);
        }
    }

    fn adjust(&mut self, direction: Direction) {
        // Back ne réagit qu'à l'activation.
        if let Some(action) = self.selected_action()
            && action != MenuAction::Back
        {
            let outcome = self.menu.on_adjust(action, direction);
            self.apply(outcome);
        }
    }

    fn selected_action(&self) -> Option<MenuAction> {
        self.menu.host().selected_entry().map(|e| e.action)
    }

    fn apply(&mut self, outcome: MenuOutcome) {
        if outcome == MenuOutcome::Exit {
            log::debug!("Back activé");
            self.menu.host_mut().close();
            self.state = AppState::Quitting;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use ab_core::error::MenuError;
    use ab_core::traits::SoundHandle;
    use crossterm::event::KeyModifiers;

    #[derive(Clone)]
    struct CountingSound(Rc<RefCell<Vec<String>>>, String);

    impl SoundHandle for CountingSound {
        fn play(&self) {
            self.0.borrow_mut().push(self.1.clone());
        }
    }

    #[derive(Default)]
    struct FakeAudio {
        playing: Option<String>,
        fired: Rc<RefCell<Vec<String>>>,
        play_calls: usize,
    }

    impl AudioService for FakeAudio {
        type Sound = CountingSound;

        fn stop_music(&mut self) {
            self.playing = None;
        }

        fn play_music(&mut self, track: &AssetRef) {
            self.play_calls += 1;
            self.playing = Some(track.label());
        }

        fn current_music_label(&self) -> String {
            self.playing.clone().unwrap_or_else(|| "None".to_string())
        }

        fn resolve_music(&mut self, track: &AssetRef) -> Result<(), MenuError> {
            if track.label() == "broken" {
                return Err(MenuError::resolution(track.to_string(), "absent"));
            }
            Ok(())
        }

        fn resolve_sound(&mut self, effect: &AssetRef) -> Result<CountingSound, MenuError> {
            Ok(CountingSound(Rc::clone(&self.fired), effect.label()))
        }
    }

    fn app() -> App<FakeAudio> {
        App::load(
            FakeAudio::default(),
            &[AssetRef::new("TrackA.ogg"), AssetRef::new("TrackB.ogg")],
            &[AssetRef::new("Boop.wav")],
            &UiConfig::default(),
        )
        .unwrap()
    }

    fn press(app: &mut App<FakeAudio>, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn labels(app: &App<FakeAudio>) -> Vec<String> {
        app.menu()
            .host()
            .entries()
            .iter()
            .map(|e| e.label.clone())
            .collect()
    }

    #[test]
    fn load_registers_three_entries() {
        let app = app();
        assert_eq!(labels(&app), ["Music: None", "Sound: None", "Back"]);
        assert_eq!(app.state, AppState::Running);
    }

    #[test]
    fn load_fails_on_unresolvable_track() {
        let result = App::load(
            FakeAudio::default(),
            &[AssetRef::new("broken.ogg")],
            &[],
            &UiConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn enter_advances_music_and_left_goes_back() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(labels(&app)[0], "Music: TrackA");
        press(&mut app, KeyCode::Right);
        assert_eq!(labels(&app)[0], "Music: TrackB");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(labels(&app)[0], "Music: None");
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(labels(&app)[0], "Music: TrackB");
    }

    #[test]
    fn effect_row_fires_and_replays() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(labels(&app)[1], "Sound: Boop");
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(*app.menu().audio().fired.borrow(), ["Boop", "Boop"]);

        press(&mut app, KeyCode::Enter);
        assert_eq!(labels(&app)[1], "Sound: None");
        assert_eq!(app.menu().audio().fired.borrow().len(), 2);
    }

    #[test]
    fn replay_music_reissues_playback() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.menu().audio().play_calls, 2);
    }

    #[test]
    fn back_entry_quits_but_ignores_adjust() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state, AppState::Running);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        press(&mut app, KeyCode::Enter);
        assert_eq!(labels(&app)[0], "Music: None");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Running);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn click_selects_and_activates() {
        let mut app = app();
        app.menu_area = Rect::new(5, 5, 30, 3);
        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };

        app.handle_event(&click(6, 6));
        assert_eq!(app.menu().host().selected(), 1);
        assert_eq!(labels(&app)[1], "Sound: Boop");

        app.handle_event(&click(0, 0));
        assert_eq!(app.menu().host().selected(), 1);

        app.handle_event(&click(6, 7));
        assert_eq!(app.state, AppState::Quitting);
    }
}
