use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, widgets::*};

use crate::{
    map::{PolicyMap, Scene},
    scheduler::{MapState, RedrawScheduler, TickHandler},
    table::ValueTable,
    viz::util::pressed_key,
};

use super::Component;

/// The policy map surface with its placeholder and automatic-mode button
pub struct PolicyPanel<T: ValueTable> {
    scheduler: RedrawScheduler<T>,
}

impl<T: ValueTable> PolicyPanel<T> {
    pub fn new(scheduler: RedrawScheduler<T>) -> Self {
        Self { scheduler }
    }

    pub fn scheduler_mut(&mut self) -> &mut RedrawScheduler<T> {
        &mut self.scheduler
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let palette = self.scheduler.renderer().config().palette;
        let button = self.scheduler.surface().auto_button();
        let button = Span::from(format!("[ {} ]", button.label()));
        let button = if self.scheduler.is_auto() {
            button.light_green().bold()
        } else {
            button.dark_gray()
        };

        let status = match (self.scheduler.state(), self.scheduler.scene()) {
            (MapState::Rendered, Some(scene)) => status(scene),
            _ => String::from("waiting for data"),
        };

        Line::from(vec![
            button,
            Span::raw("  "),
            Span::styled("▲ jump", Style::default().fg(palette.jump)),
            Span::raw("  "),
            Span::styled("▼ stay", Style::default().fg(palette.stay)),
            Span::raw("  "),
            Span::from(status).dark_gray(),
        ])
        .render(area, buf);
    }
}

fn status(scene: &Scene) -> String {
    let samples: u32 = scene.buckets.values().map(|bucket| bucket.samples).sum();
    format!("{} buckets from {samples} entries", scene.glyphs.len())
}

impl<T: ValueTable> WidgetRef for PolicyPanel<T> {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        self.render_header(header, buf);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Policy map");
        let inner = block.inner(body);
        block.render(body, buf);

        // drawn straight into the panel rather than copied from the surface, so the whole map
        // scales to the terminal
        match self.scheduler.scene() {
            Some(scene) => {
                let config = self.scheduler.renderer().config();
                PolicyMap::new(scene, config).render(inner, buf);
            }
            None => {
                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(inner);
                Paragraph::new("No data yet")
                    .alignment(Alignment::Center)
                    .dark_gray()
                    .render(middle, buf);
            }
        }
    }
}

impl<T: ValueTable> TickHandler for PolicyPanel<T> {
    fn on_tick(&mut self) {
        self.scheduler.on_tick();
    }
}

impl<T: ValueTable> Component for PolicyPanel<T> {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match pressed_key(event) {
            Some(KeyCode::Char('r')) => {
                self.scheduler.redraw(true);
                true
            }
            Some(KeyCode::Char('a')) => {
                self.scheduler.toggle_auto();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        render::PolicyMapRenderer,
        table::{Action, SharedTable, StateActionKey},
    };

    fn panel(entries: &[(&str, f64)]) -> PolicyPanel<SharedTable> {
        let mut map = entries
            .iter()
            .map(|&(k, v)| (String::from(k), v))
            .collect::<HashMap<_, _>>();
        // far from the obstacle, so only counted towards the key minimum
        for i in 0..15 {
            let key = StateActionKey::new(i, 0, 100, Action::Jump);
            map.insert(key.to_string(), 1.0);
        }
        let table = SharedTable::from(map);
        PolicyPanel::new(RedrawScheduler::new(table, PolicyMapRenderer::default()))
    }

    fn body_has_fg(buf: &Buffer, color: Color) -> bool {
        let area = buf.area;
        // skip the header line and the top border
        (area.y + 2..area.bottom())
            .flat_map(|y| (area.x..area.right()).map(move |x| (x, y)))
            .any(|(x, y)| buf.get(x, y).fg == color)
    }

    #[test]
    fn whole_map_fits_a_small_panel() {
        let mut panel = panel(&[("0,100,5,0", 1.0), ("30,0,5,1", 2.0)]);
        panel.scheduler_mut().redraw(true);
        let palette = panel.scheduler.renderer().config().palette;

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        panel.render_ref(area, &mut buf);

        assert!(body_has_fg(&buf, palette.jump), "top left glyph shown");
        assert!(body_has_fg(&buf, palette.stay), "bottom right glyph shown");
        assert!(body_has_fg(&buf, palette.axis), "axes shown");
    }

    #[test]
    fn placeholder_until_data() {
        let panel = panel(&[]);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        panel.render_ref(area, &mut buf);

        let palette = panel.scheduler.renderer().config().palette;
        assert!(!body_has_fg(&buf, palette.jump));
        let text = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert!(text.iter().any(|line| line.contains("No data yet")));
    }

    #[test]
    fn status_counts_entries() {
        let mut panel = panel(&[("0,0,5,0", 1.0), ("1,0,5,1", 0.5), ("9,40,5,0", 0.2)]);
        panel.scheduler_mut().redraw(true);
        let scene = panel.scheduler.scene().unwrap();
        assert_eq!(status(scene), "2 buckets from 3 entries");
    }
}
