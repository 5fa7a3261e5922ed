//! Layout and drawing: playfield from render commands, score and controls sidebar.

use crate::arena::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::game::RenderCommand;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per arena cell; two columns make a roughly square cell.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Length of the white flash over the board after rows are cleared.
const LINE_CLEAR_FLASH_MS: u32 = 250;

/// Board size in terminal cells, border included.
fn playfield_size() -> (u16, u16) {
    (ARENA_WIDTH as u16 * CELL_WIDTH + 2, ARENA_HEIGHT as u16 + 2)
}

/// Outer playfield rect (with border) centred in `area` alongside the sidebar.
fn playfield_rect(area: Rect) -> Rect {
    let (pw, ph) = playfield_size();
    let total_w = pw + SIDEBAR_WIDTH;
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(ph) / 2,
        width: pw.min(area.width),
        height: ph.min(area.height),
    }
}

/// Start the row-clear flash; it plays out over the next frames.
pub fn start_clear_flash(effect: &mut Option<Effect>) {
    *effect = Some(fx::fade_from(
        Color::White,
        Color::White,
        (LINE_CLEAR_FLASH_MS, Interpolation::Linear),
    ));
}

/// Paint one frame. `score` is the last value the game published.
pub fn draw(
    frame: &mut Frame,
    commands: &[RenderCommand],
    score: u32,
    theme: &Theme,
    clear_effect: &mut Option<Effect>,
    effect_delta: std::time::Duration,
) {
    let area = frame.area();
    let board_outer = playfield_rect(area);
    let sidebar = Rect {
        x: board_outer.x + board_outer.width,
        y: board_outer.y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(board_outer.right() - area.x)),
        height: board_outer.height,
    };

    let inner = draw_playfield(frame, commands, theme, board_outer);
    draw_sidebar(frame, score, theme, sidebar);

    let done = match clear_effect.as_mut() {
        Some(effect) => {
            let delta_ms = effect_delta.as_millis().min(u32::MAX as u128) as u32;
            frame.render_effect(effect, inner, TfxDuration::from_millis(delta_ms));
            effect.done()
        }
        None => false,
    };
    if done {
        *clear_effect = None;
    }
}

/// Draw the bordered board and its cells; returns the inner board rect.
fn draw_playfield(frame: &mut Frame, commands: &[RenderCommand], theme: &Theme, outer: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" arenatris ", Style::default().fg(theme.title)));
    let inner = block.inner(outer);
    block.render(outer, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for command in commands {
        match *command {
            RenderCommand::Clear => {
                let style = Style::default().bg(theme.bg);
                for ry in inner.top()..inner.bottom() {
                    for rx in inner.left()..inner.right() {
                        buf[(rx, ry)].set_symbol(" ").set_style(style);
                    }
                }
            }
            RenderCommand::Fill { x, y, color } => {
                let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                    continue;
                };
                let c = theme.cell_color(color);
                let style = Style::default().fg(c).bg(c);
                let ry = inner.y + y;
                for dx in 0..CELL_WIDTH {
                    let rx = inner.x + x * CELL_WIDTH + dx;
                    if rx < inner.right() && ry < inner.bottom() {
                        buf[(rx, ry)].set_symbol("█").set_style(style);
                    }
                }
            }
            RenderCommand::Score(_) => {}
        }
    }
    inner
}

fn draw_sidebar(frame: &mut Frame, score: u32, theme: &Theme, area: Rect) {
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let fg = Style::default().fg(theme.main_fg);
    let title = Style::default().fg(theme.title);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Length(1), // gap
            Constraint::Length(8), // Controls
            Constraint::Min(0),
        ])
        .split(area);

    let score_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Score ", title));
    Paragraph::new(Line::from(Span::styled(score.to_string(), fg)))
        .block(score_block)
        .render(chunks[0], frame.buffer_mut());

    let controls = [
        ("←/→", "move"),
        ("↓", "drop"),
        ("q", "rotate left"),
        ("w", "rotate right"),
        ("Esc", "quit"),
    ];
    let lines: Vec<Line> = controls
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {:<4}", key), title),
                Span::styled(*what, fg),
            ])
        })
        .collect();
    let controls_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Controls ", title));
    Paragraph::new(lines)
        .block(controls_block)
        .render(chunks[2], frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(commands: &[RenderCommand], score: u32) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        let theme = Theme::classic();
        let mut effect = None;
        terminal
            .draw(|f| draw(f, commands, score, &theme, &mut effect, std::time::Duration::ZERO))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_fill_paints_two_columns() {
        let buf = render(
            &[RenderCommand::Clear, RenderCommand::Fill { x: 0, y: 0, color: 2 }],
            0,
        );
        let board = playfield_rect(Rect::new(0, 0, 60, 24));
        let (x0, y0) = (board.x + 1, board.y + 1);
        let want = Theme::classic().cell_color(2);
        assert_eq!(buf[(x0, y0)].symbol(), "█");
        assert_eq!(buf[(x0, y0)].fg, want);
        assert_eq!(buf[(x0 + 1, y0)].fg, want);
        assert_eq!(buf[(x0 + 2, y0)].symbol(), " ");
    }

    #[test]
    fn test_fill_outside_board_is_skipped() {
        let buf = render(
            &[
                RenderCommand::Clear,
                RenderCommand::Fill { x: -1, y: 0, color: 1 },
                RenderCommand::Fill { x: 12, y: 25, color: 1 },
            ],
            0,
        );
        let painted = buf.content().iter().filter(|c| c.symbol() == "█").count();
        assert_eq!(painted, 0);
    }

    #[test]
    fn test_score_shown_in_sidebar() {
        let buf = render(&[RenderCommand::Clear], 1230);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("1230"));
        assert!(text.contains("Score"));
    }

    #[test]
    fn test_clear_flash_starts() {
        let mut effect = None;
        start_clear_flash(&mut effect);
        assert!(effect.is_some());
    }
}
