pub mod help;
pub mod log;
pub mod policy;

use crossterm::event::Event;
pub use log::Logs;
pub use policy::PolicyPanel;
use ratatui::widgets::WidgetRef;

/// A widget that also reacts to terminal input
pub trait Component: WidgetRef {
    /// **Returns** whether the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
