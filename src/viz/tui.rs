use std::{
    io::{self, stdout, Stdout},
    panic,
};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// The terminal the viewer draws to
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switch to the alternate screen in raw mode
///
/// A panic anywhere afterwards restores the terminal before the panic message is printed.
pub fn init() -> io::Result<Tui> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));

    execute!(stdout(), EnterAlternateScreen, Hide)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

/// Undo [`init`]
pub fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()
}
