use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerSmartWidget, TuiWidgetEvent, TuiWidgetState};

use crate::viz::util::pressed_key;

use super::Component;

/// Log records captured by `tui_logger`, with a per-target level selector
pub struct Logs {
    state: TuiWidgetState,
}

impl Logs {
    pub fn new() -> Self {
        Self {
            state: TuiWidgetState::new().set_default_display_level(log::LevelFilter::Debug),
        }
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self::new()
    }
}

fn widget_event(key: KeyCode) -> Option<TuiWidgetEvent> {
    let event = match key {
        KeyCode::Char(' ') => TuiWidgetEvent::SpaceKey,
        KeyCode::Esc => TuiWidgetEvent::EscapeKey,
        KeyCode::PageUp => TuiWidgetEvent::PrevPageKey,
        KeyCode::PageDown => TuiWidgetEvent::NextPageKey,
        KeyCode::Up => TuiWidgetEvent::UpKey,
        KeyCode::Down => TuiWidgetEvent::DownKey,
        KeyCode::Left => TuiWidgetEvent::LeftKey,
        KeyCode::Right => TuiWidgetEvent::RightKey,
        KeyCode::Char('+' | '=') => TuiWidgetEvent::PlusKey,
        KeyCode::Char('-' | '_') => TuiWidgetEvent::MinusKey,
        KeyCode::Char('s') => TuiWidgetEvent::HideKey,
        KeyCode::Char('f') => TuiWidgetEvent::FocusKey,
        _ => return None,
    };
    Some(event)
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        TuiLoggerSmartWidget::default()
            .style(Style::default().white())
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator(' ')
            .output_timestamp(Some(String::from("%H:%M:%S")))
            .state(&self.state)
            .render(area, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        let Some(widget_event) = pressed_key(event).and_then(widget_event) else {
            return false;
        };
        self.state.transition(widget_event);
        true
    }
}
