//! Shared modal layout and event loop for the prompts

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
    DefaultTerminal, Frame,
};

use lwcp_core::prelude::*;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Center a rectangle within another rectangle
pub(crate) fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Modal width for a terminal of width `available`
pub(crate) fn modal_width(available: u16) -> u16 {
    let preferred = (u32::from(available) * 70 / 100) as u16;
    preferred.clamp(40, 72).min(available)
}

pub(crate) fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
}

/// Shorten `text` to `max_width` characters, marking the cut with `...`
pub(crate) fn truncate_text(text: &str, max_width: usize) -> String {
    let count = text.chars().count();
    if count <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let kept: String = text.chars().take(max_width - 3).collect();
    format!("{}...", kept)
}

/// Esc or Ctrl+C
pub(crate) fn is_interrupt(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Take over the terminal, draw with `render` and feed key presses to
/// `handle` until it yields a result. The terminal is restored on every path.
pub(crate) fn run_modal<S, T, R, H>(state: &mut S, mut render: R, mut handle: H) -> Result<T>
where
    R: FnMut(&mut Frame, &mut S),
    H: FnMut(&mut S, KeyEvent) -> Option<T>,
{
    let mut terminal = ratatui::try_init().map_err(|e| Error::terminal(e.to_string()))?;
    let result = event_loop(&mut terminal, state, &mut render, &mut handle);
    ratatui::restore();
    result
}

fn event_loop<S, T, R, H>(
    terminal: &mut DefaultTerminal,
    state: &mut S,
    render: &mut R,
    handle: &mut H,
) -> Result<T>
where
    R: FnMut(&mut Frame, &mut S),
    H: FnMut(&mut S, KeyEvent) -> Option<T>,
{
    loop {
        terminal
            .draw(|frame| render(frame, state))
            .map_err(|e| Error::terminal(e.to_string()))?;

        if !event::poll(POLL_INTERVAL).map_err(|e| Error::terminal(e.to_string()))? {
            continue;
        }

        if let Event::Key(key) = event::read().map_err(|e| Error::terminal(e.to_string()))? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(result) = handle(state, key) {
                return Ok(result);
            }
        }
    }
}
