//! Single-line text input modal

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use lwcp_core::prelude::*;

use crate::widgets::{center_rect, is_interrupt, modal_block, modal_width, run_modal, truncate_text};

/// Result of the text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Submitted text; may be empty
    Submitted(String),
    Cancelled,
}

/// Text buffer with a cursor measured in characters
#[derive(Debug, Default)]
pub(crate) struct InputState {
    value: String,
    cursor: usize,
}

impl InputState {
    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Display column of the cursor
    pub fn cursor_column(&self) -> u16 {
        let before = &self.value[..self.byte_index()];
        before.width() as u16
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputResult> {
        if is_interrupt(key.code, key.modifiers) {
            return Some(InputResult::Cancelled);
        }
        match key.code {
            KeyCode::Enter => return Some(InputResult::Submitted(self.value.clone())),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                *self = Self::default();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            _ => {}
        }
        None
    }
}

/// Read one line of text. Enter submits, Esc or Ctrl+C cancels.
pub fn read_input(title: &str, placeholder: &str) -> Result<InputResult> {
    let mut state = InputState::default();
    run_modal(
        &mut state,
        |frame, state| render_input(frame, title, placeholder, state),
        |state, key| state.handle_key(key),
    )
}

pub(crate) fn render_input(frame: &mut Frame, title: &str, placeholder: &str, state: &InputState) {
    let area = frame.area();
    let modal = center_rect(modal_width(area.width), 8.min(area.height), area);

    frame.render_widget(Clear, modal);

    let block = modal_block(title);
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let [field_area, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(inner);

    let field_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let field_inner = field_block.inner(field_area);

    let text = if state.value().is_empty() {
        Line::from(Span::styled(
            truncate_text(placeholder, field_inner.width as usize),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            state.value().to_string(),
            Style::default().fg(Color::White),
        ))
    };
    frame.render_widget(Paragraph::new(text).block(field_block), field_area);

    let column = state
        .cursor_column()
        .min(field_inner.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(field_inner.x + column, field_inner.y));

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" confirm (empty keeps default)  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(" cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, footer);
}
