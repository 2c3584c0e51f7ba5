use ratatui::{prelude::*, widgets::*};

const GLOBAL_KEYS: [(&str, &str); 3] = [
    ("  q  ", "Quit the viewer"),
    ("  h  ", "Toggle this help"),
    (" Tab ", "Switch between the policy map and the logs"),
];

const POLICY_KEYS: [(&str, &str); 2] = [
    ("  r  ", "Redraw the map now"),
    ("  a  ", "Toggle automatic redraws"),
];

const LOG_KEYS: [(&str, &str); 6] = [
    ("⬆ / ⬇", "Select log target"),
    ("⬅ / ➡", "Show fewer/more levels for the target"),
    ("- / +", "Capture fewer/more levels for the target"),
    ("  s  ", "Show/hide the target selector"),
    ("  f  ", "Focus on the selected target"),
    ("PgUp ", "Scroll back; Esc returns to the tail"),
];

/// Draw the key reference for the selected tab as a popup centered in `area`
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let tab_keys: &[(&str, &str)] = match selected_tab {
        0 => &POLICY_KEYS,
        1 => &LOG_KEYS,
        _ => &[],
    };

    let lines = GLOBAL_KEYS
        .iter()
        .chain(tab_keys)
        .map(|&(key, action)| {
            Line::from(vec![
                Span::from(key).light_cyan().bold(),
                Span::raw(format!(" : {action}")),
            ])
        })
        .collect::<Vec<_>>();

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(64),
        Constraint::Fill(1),
    ])
    .areas(middle);

    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title("Help"),
        )
        .render(popup, buf);
}
