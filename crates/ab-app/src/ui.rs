use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::host::MenuEntry;

/// Largeur de la boîte du menu.
pub const MENU_WIDTH: u16 = 44;

/// Everything needed to draw one frame.
pub struct DrawContext<'a> {
    pub title: &'a str,
    pub entries: &'a [MenuEntry],
    pub selected: usize,
    pub track_count: usize,
    pub effect_count: usize,
    pub show_help: bool,
}

/// Draw the menu box, the status line and the optional help overlay.
///
/// Returns the inner area of the menu box, one row per entry, used for
/// mouse hit testing.
pub fn draw(frame: &mut Frame, ctx: &DrawContext<'_>) -> Rect {
    let area = frame.area();

    let width = MENU_WIDTH.min(area.width);
    let height = (ctx.entries.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let menu_area = Rect::new(x, y, width, height);

    let lines: Vec<Line> = ctx
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i == ctx.selected {
                Line::from(Span::styled(
                    format!("> {}", entry.label),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", entry.label))
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", ctx.title));
    let inner = block.inner(menu_area);
    frame.render_widget(Paragraph::new(lines).block(block), menu_area);

    // === Status line ===
    if area.height > 0 {
        let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        let status = format!(
            " {} musiques · {} effets · ? = help",
            ctx.track_count,
            ctx.effect_count.saturating_sub(1)
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(Color::DarkGray),
            ))),
            status_area,
        );
    }

    if ctx.show_help {
        draw_help_overlay(frame, area);
    }

    inner
}

/// Row index under a click, if it hits an entry.
#[must_use]
pub fn entry_at(inner: Rect, entry_count: usize, column: u16, row: u16) -> Option<usize> {
    let inside = column >= inner.x
        && column < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    if !inside {
        return None;
    }
    let index = usize::from(row - inner.y);
    (index < entry_count).then_some(index)
}

/// Draw a help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " Sound Test : Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" ↑/↓ k/j    Move"),
        Line::from(" Enter/Spc  Next choice"),
        Line::from(" →/l        Next choice"),
        Line::from(" ←/h        Previous choice"),
        Line::from(" r          Replay current"),
        Line::from(" Click      Select + next"),
        Line::from(" q/Esc      Quit"),
        Line::from(" ?          Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 32u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(help, help_area);
}
