//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    /// Last score published by the game; what the sidebar shows.
    displayed_score: u32,
    clear_effect: Option<Effect>,
    last_frame: Instant,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(&config);
        Self {
            config,
            theme,
            displayed_score: state.score(),
            state,
            clear_effect: None,
            last_frame: Instant::now(),
        }
    }

    /// Returns false when the player asked to quit.
    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => {
                self.state.player_move(-1);
            }
            Action::MoveRight => {
                self.state.player_move(1);
            }
            Action::SoftDrop => {
                self.state.player_drop();
            }
            Action::RotateCcw => {
                self.state.player_rotate(-1);
            }
            Action::RotateCw => {
                self.state.player_rotate(1);
            }
            Action::Quit => return false,
            Action::None => {}
        }
        true
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        let mut stdout = std::io::stdout();
        enter_or_undo(
            enable_raw_mode,
            || execute!(stdout, EnterAlternateScreen),
            disable_raw_mode,
        )?;

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| {
                terminal.hide_cursor()?;
                self.run_loop(&mut terminal)
            });

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)?;
        disable_raw_mode()?;

        info!("quit with score {}", self.state.score());
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let start = Instant::now();
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0));
        loop {
            let frame_start = Instant::now();
            let commands = self.state.update(frame_start.duration_since(start));
            self.publish(&commands);

            let effect_delta = frame_start.saturating_duration_since(self.last_frame);
            self.last_frame = frame_start;
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &commands,
                    self.displayed_score,
                    &self.theme,
                    &mut self.clear_effect,
                    effect_delta,
                );
            })?;

            // Every key event is applied in full before the next update.
            let timeout = frame_duration.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.apply_action(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Hand score changes to the sidebar and trigger the clear flash.
    fn publish(&mut self, commands: &[crate::game::RenderCommand]) {
        for command in commands {
            if let crate::game::RenderCommand::Score(score) = *command {
                self.displayed_score = score;
            }
        }
        if self.state.take_cleared_rows() > 0 && !self.config.no_animation {
            crate::ui::start_clear_flash(&mut self.clear_effect);
        }
    }
}

/// Run `first` then `second`; if `second` fails, `undo` reverts `first` before the error is returned.
fn enter_or_undo(
    first: impl FnOnce() -> std::io::Result<()>,
    second: impl FnOnce() -> std::io::Result<()>,
    undo: impl FnOnce() -> std::io::Result<()>,
) -> Result<()> {
    first()?;
    if let Err(e) = second() {
        let _ = undo();
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, RenderCommand};
    use crate::piece::PieceKind;

    fn app() -> App {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        App::new(config, Theme::classic())
    }

    #[test]
    fn test_enter_failure_reverts_first_step() {
        use std::cell::Cell;
        let undone = Cell::new(false);
        let result = enter_or_undo(
            || Ok(()),
            || Err(std::io::Error::other("no alternate screen")),
            || {
                undone.set(true);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(undone.get());
    }

    #[test]
    fn test_enter_success_keeps_state() {
        use std::cell::Cell;
        let undone = Cell::new(false);
        let result = enter_or_undo(
            || Ok(()),
            || Ok(()),
            || {
                undone.set(true);
                Ok(())
            },
        );
        assert!(result.is_ok());
        assert!(!undone.get());
    }

    #[test]
    fn test_actions_drive_player() {
        let mut app = app();
        app.state.spawn(PieceKind::O);
        assert!(app.apply_action(Action::MoveLeft));
        assert_eq!(app.state.player.pos, Position { x: 4, y: 0 });
        assert!(app.apply_action(Action::MoveRight));
        assert!(app.apply_action(Action::SoftDrop));
        assert_eq!(app.state.player.pos, Position { x: 5, y: 1 });
        assert!(app.apply_action(Action::None));
        assert!(!app.apply_action(Action::Quit));
    }

    #[test]
    fn test_publish_updates_score_and_flash() {
        let mut app = app();
        for x in 0..12 {
            app.state.arena.set(x, 19, 1);
        }
        app.state.arena_sweep();
        let commands = app.state.tick(Duration::ZERO);
        app.publish(&commands);
        assert_eq!(app.displayed_score, 10);
        assert!(app.clear_effect.is_some());
        assert!(commands.contains(&RenderCommand::Score(10)));
    }

    #[test]
    fn test_no_animation_skips_flash() {
        let config = GameConfig {
            seed: Some(3),
            no_animation: true,
            ..GameConfig::default()
        };
        let mut app = App::new(config, Theme::classic());
        for x in 0..12 {
            app.state.arena.set(x, 19, 1);
        }
        app.state.arena_sweep();
        let commands = app.state.tick(Duration::ZERO);
        app.publish(&commands);
        assert!(app.clear_effect.is_none());
        assert_eq!(app.displayed_score, 10);
    }
}
