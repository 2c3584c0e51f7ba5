use ratatui::{buffer::Buffer, layout::Rect, widgets::WidgetRef};

/// The host's button for switching automatic redraws on and off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleButton {
    pressed: bool,
}

impl ToggleButton {
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn label(&self) -> &'static str {
        if self.pressed {
            "Auto On"
        } else {
            "Auto Off"
        }
    }
}

/// A fixed-size drawing surface plus the two sibling elements the map controls
///
/// The buffer is mutated in place by every redraw. Alongside it sit the "no data yet"
/// placeholder, which is visible whenever the map is not, and the automatic-mode button.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    buffer: Buffer,
    placeholder_visible: bool,
    auto_button: ToggleButton,
}

impl Surface {
    /// A blank surface covering `area`, with the placeholder showing
    pub fn new(area: Rect) -> Self {
        Self {
            buffer: Buffer::empty(area),
            placeholder_visible: true,
            auto_button: ToggleButton::default(),
        }
    }

    pub fn area(&self) -> Rect {
        self.buffer.area
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Whether nothing has been drawn since the last clear
    pub fn is_blank(&self) -> bool {
        self.buffer == Buffer::empty(self.buffer.area)
    }

    pub fn clear(&mut self) {
        self.buffer.reset();
    }

    /// Render a widget over the whole surface
    pub fn draw<W: WidgetRef + ?Sized>(&mut self, widget: &W) {
        let area = self.buffer.area;
        widget.render_ref(area, &mut self.buffer);
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    pub fn show_placeholder(&mut self) {
        self.placeholder_visible = true;
    }

    pub fn hide_placeholder(&mut self) {
        self.placeholder_visible = false;
    }

    pub fn auto_button(&self) -> ToggleButton {
        self.auto_button
    }

    pub fn set_auto(&mut self, on: bool) {
        self.auto_button.pressed = on;
    }
}
