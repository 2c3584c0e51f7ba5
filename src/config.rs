use ratatui::{layout::Rect, style::Color};
use thiserror::Error;

/// Reasons a [`PolicyMapConfig`] cannot drive a renderer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{0}` must be a positive step, got {1}")]
    Step(&'static str, i32),
    #[error("`frame_interval` must be at least 1")]
    FrameInterval,
    #[error("Invalid value for `{0}`. Must be in the interval [0, 1], got {1}.")]
    Opacity(&'static str, f64),
    #[error("surface must be at least 2x4 pixels, got {0}x{1}")]
    Surface(f64, f64),
    #[error("insets leave no drawable region on a {0}x{1} surface")]
    Insets(f64, f64),
    #[error("`{0}` must be finite and non-negative, got {1}")]
    Radius(&'static str, f64),
    #[error("`degenerate_margin` must be finite and positive, got {0}")]
    Margin(f64),
    #[error("`grid_divisions` must be at least 1")]
    GridDivisions,
}

/// Space reserved around the plotted region for axes and labels, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: 30.0,
            right: 10.0,
            top: 10.0,
            bottom: 30.0,
        }
    }
}

/// Colors used on the policy map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Glyph fill for buckets that prefer jumping
    ///
    /// **Default**: `#ff3161`
    pub jump: Color,
    /// Glyph fill for buckets that prefer staying
    ///
    /// **Default**: `#2dd6a7`
    pub stay: Color,
    /// Orientation marks drawn on top of the glyphs
    ///
    /// **Default**: `#111111`
    pub ink: Color,
    /// **Default**: `#444444`
    pub grid: Color,
    /// Opacity of the grid lines, blended over [`Palette::background`]
    ///
    /// **Default**: `0.25`
    pub grid_opacity: f64,
    /// **Default**: `#666666`
    pub axis: Color,
    /// Axis titles and extent labels
    ///
    /// **Default**: `#888888`
    pub label: Color,
    /// **Default**: `#000000`
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            jump: Color::Rgb(0xff, 0x31, 0x61),
            stay: Color::Rgb(0x2d, 0xd6, 0xa7),
            ink: Color::Rgb(0x11, 0x11, 0x11),
            grid: Color::Rgb(0x44, 0x44, 0x44),
            grid_opacity: 0.25,
            axis: Color::Rgb(0x66, 0x66, 0x66),
            label: Color::Rgb(0x88, 0x88, 0x88),
            background: Color::Rgb(0x00, 0x00, 0x00),
        }
    }
}

/// Configuration for the [`PolicyMapRenderer`](crate::render::PolicyMapRenderer) and
/// [`RedrawScheduler`](crate::scheduler::RedrawScheduler)
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyMapConfig {
    /// Raw key count below which the map stays hidden
    ///
    /// **Default**: `15`
    pub min_keys: usize,
    /// Number of host ticks between automatic redraws
    ///
    /// **Default**: `30`
    pub frame_interval: u64,
    /// Whether automatic redraws start enabled
    ///
    /// **Default**: `true`
    pub auto_redraw: bool,
    /// Entries with a larger `tubeX` are left out of the map
    ///
    /// **Default**: `28`
    pub proximity_threshold: i32,
    /// **Default**: `3`
    pub diff_y_step: i32,
    /// `speedY` is stored scaled by 100, hence the coarser step
    ///
    /// **Default**: `20`
    pub speed_y_step: i32,
    /// Added on both sides of an axis whose buckets all share one value
    ///
    /// **Default**: `1.0`
    pub degenerate_margin: f64,
    /// Surface width in pixels
    ///
    /// **Default**: `360.0`
    pub width: f64,
    /// Surface height in pixels
    ///
    /// **Default**: `240.0`
    pub height: f64,
    pub insets: Insets,
    /// Grid cells per axis; one more line than this is drawn
    ///
    /// **Default**: `5`
    pub grid_divisions: u16,
    /// **Default**: `4.0`
    pub min_radius: f64,
    /// Extra radius given to the bucket with the largest jump/stay gap
    ///
    /// **Default**: `10.0`
    pub radius_scale: f64,
    pub palette: Palette,
}

impl Default for PolicyMapConfig {
    fn default() -> Self {
        Self {
            min_keys: 15,
            frame_interval: 30,
            auto_redraw: true,
            proximity_threshold: 28,
            diff_y_step: 3,
            speed_y_step: 20,
            degenerate_margin: 1.0,
            width: 360.0,
            height: 240.0,
            insets: Insets::default(),
            grid_divisions: 5,
            min_radius: 4.0,
            radius_scale: 10.0,
            palette: Palette::default(),
        }
    }
}

impl PolicyMapConfig {
    /// Check every field that the drawing math divides by or scales with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diff_y_step <= 0 {
            return Err(ConfigError::Step("diff_y_step", self.diff_y_step));
        }
        if self.speed_y_step <= 0 {
            return Err(ConfigError::Step("speed_y_step", self.speed_y_step));
        }
        if self.frame_interval == 0 {
            return Err(ConfigError::FrameInterval);
        }
        if self.grid_divisions == 0 {
            return Err(ConfigError::GridDivisions);
        }
        let opacity = self.palette.grid_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::Opacity("grid_opacity", opacity));
        }
        if !(self.width >= 2.0 && self.height >= 4.0) {
            return Err(ConfigError::Surface(self.width, self.height));
        }
        let Insets {
            left,
            right,
            top,
            bottom,
        } = self.insets;
        if left + right >= self.width || top + bottom >= self.height {
            return Err(ConfigError::Insets(self.width, self.height));
        }
        for (name, value) in [
            ("min_radius", self.min_radius),
            ("radius_scale", self.radius_scale),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Radius(name, value));
            }
        }
        if !(self.degenerate_margin.is_finite() && self.degenerate_margin > 0.0) {
            return Err(ConfigError::Margin(self.degenerate_margin));
        }
        Ok(())
    }

    /// Terminal cells covered by the surface, at 2x4 braille dots per cell
    pub fn cell_area(&self) -> Rect {
        let cols = (self.width / 2.0).ceil() as u16;
        let rows = (self.height / 4.0).ceil() as u16;
        Rect::new(0, 0, cols, rows)
    }
}
