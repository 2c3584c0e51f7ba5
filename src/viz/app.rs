use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, Component, Logs, PolicyPanel},
    tui,
    util::pressed_key,
};
use crate::{
    scheduler::{RedrawScheduler, TickHandler},
    table::ValueTable,
};

const TABS: [&str; 2] = ["Policy", "Logs"];

/// Time the loop waits for input each frame, which also paces the redraw ticks
const FRAME: Duration = Duration::from_millis(16);

#[derive(Default, PartialEq, Eq)]
enum State {
    #[default]
    Running,
    Quit,
}

/// The root TUI component, which owns the frame loop that drives the policy map
pub struct App<T: ValueTable> {
    state: State,
    selected_tab: usize,
    show_help: bool,
    policy: PolicyPanel<T>,
    logs: Logs,
}

impl<T: ValueTable> App<T> {
    pub fn new(scheduler: RedrawScheduler<T>) -> Self {
        Self {
            state: State::default(),
            selected_tab: 0,
            show_help: false,
            policy: PolicyPanel::new(scheduler),
            logs: Logs::new(),
        }
    }

    /// Initialize the terminal and run the main loop until the user quits
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = tui::init()?;
        self.policy.scheduler_mut().redraw(true);

        while self.state == State::Running {
            self.policy.on_tick();
            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(FRAME)? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }

        tui::restore()
    }

    fn handle_event(&mut self, event: &Event) {
        match pressed_key(event) {
            Some(KeyCode::Char('q')) => self.state = State::Quit,
            Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
            Some(KeyCode::Tab) => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            _ => {
                match self.selected_tab {
                    0 => self.policy.handle_ui_event(event),
                    1 => self.logs.handle_ui_event(event),
                    _ => false,
                };
            }
        }
    }
}

impl<T: ValueTable> Widget for &App<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.policy.render_ref(main_area, buf),
            1 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        Line::from(" q quit  h help  Tab switch  r redraw  a auto")
            .dark_gray()
            .render(footer_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}
