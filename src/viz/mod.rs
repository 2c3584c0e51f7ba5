use std::{
    io,
    thread::{self, JoinHandle},
};

use crate::{
    config::{ConfigError, PolicyMapConfig},
    render::PolicyMapRenderer,
    scheduler::RedrawScheduler,
    table::ValueTable,
};

pub use app::App;

mod app;
mod components;
mod tui;
mod util;

/// Start the policy map viewer on its own thread
///
/// Installs [`tui_logger`] as the global logger, unless another logger is already set, so
/// that records from the learner and the renderer show up in the Logs tab.
///
/// **Returns** a handle to the viewer thread, which finishes when the user quits
pub fn init<T>(
    table: T,
    config: PolicyMapConfig,
) -> Result<JoinHandle<io::Result<()>>, ConfigError>
where
    T: ValueTable + Send + 'static,
{
    let renderer = PolicyMapRenderer::new(config)?;

    if tui_logger::init_logger(log::LevelFilter::Trace).is_ok() {
        tui_logger::set_default_level(log::LevelFilter::Debug);
    }

    let scheduler = RedrawScheduler::new(table, renderer);
    Ok(thread::spawn(move || App::new(scheduler).run()))
}
