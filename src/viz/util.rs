use crossterm::event::{Event, KeyCode, KeyEventKind};

/// The key of a key press event; releases and repeats are ignored
pub(super) fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}
