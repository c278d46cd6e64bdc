//! Platform picker modal

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use lwcp_core::prelude::*;
use lwcp_core::PlatformOption;

use crate::widgets::{center_rect, is_interrupt, modal_block, modal_width, run_modal, truncate_text};

/// Result of the platform picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    Picked(usize),
    Cancelled,
}

#[derive(Debug)]
pub(crate) struct PickerState {
    pub list_state: ListState,
    len: usize,
}

impl PickerState {
    /// Starts on the pre-picked option, or the first one
    pub fn new(options: &[PlatformOption]) -> Self {
        let initial = options.iter().position(|o| o.picked).unwrap_or(0);
        let mut list_state = ListState::default();
        if !options.is_empty() {
            list_state.select(Some(initial));
        }
        Self {
            list_state,
            len: options.len(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn select_next(&mut self) {
        if self.len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 >= self.len => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.len == 0 {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(0) | None => self.len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(prev));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PickResult> {
        if is_interrupt(key.code, key.modifiers) {
            return Some(PickResult::Cancelled);
        }
        match key.code {
            KeyCode::Char('q') => Some(PickResult::Cancelled),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Enter => self.selected().map(PickResult::Picked),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c.to_digit(10)? as usize;
                (1..=self.len).contains(&n).then_some(PickResult::Picked(n - 1))
            }
            _ => None,
        }
    }
}

/// Show the picker until the user chooses or cancels.
///
/// Keys: ↑/↓ or j/k to move, Enter or 1-9 to choose, Esc/q/Ctrl+C to cancel.
pub fn pick_platform(title: &str, placeholder: &str, options: &[PlatformOption]) -> Result<PickResult> {
    if options.is_empty() {
        return Ok(PickResult::Cancelled);
    }

    let mut state = PickerState::new(options);
    run_modal(
        &mut state,
        |frame, state| render_picker(frame, title, placeholder, options, state),
        |state, key| state.handle_key(key),
    )
}

pub(crate) fn render_picker(
    frame: &mut Frame,
    title: &str,
    placeholder: &str,
    options: &[PlatformOption],
    state: &mut PickerState,
) {
    let area = frame.area();
    let width = modal_width(area.width);
    let height = (options.len() as u16 + 7).min(area.height);
    let modal = center_rect(width, height, area);

    frame.render_widget(Clear, modal);

    let block = modal_block(title);
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let [header, list_area, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    render_header(frame, header, placeholder);

    let text_width = inner.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let label = format!("{}. {}", i + 1, option.label);
            let room = text_width.saturating_sub(label.chars().count() + 2);
            let mut spans = vec![Span::styled(label, Style::default().fg(Color::White))];
            if room > 0 && !option.description.is_empty() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    truncate_text(&option.description, room),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut state.list_state);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::raw(" move  "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" select  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(" cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, footer);
}

fn render_header(frame: &mut Frame, area: Rect, placeholder: &str) {
    let text = truncate_text(placeholder, area.width as usize);
    let header = Paragraph::new(text).style(Style::default().fg(Color::Gray));
    frame.render_widget(header, area);
}
