use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context},
        WidgetRef,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::{
    aggregate::Buckets,
    config::PolicyMapConfig,
    scale::{PlotArea, Scales},
};

pub use glyph::{radius, Discs, Glyph, Marks};
pub use grid::{Axes, Grid, Segment};

mod glyph;
mod grid;

/// Everything one redraw puts on the surface
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub buckets: Buckets,
    pub scales: Scales,
    pub area: PlotArea,
    /// One glyph per bucket, in bucket order
    pub glyphs: Vec<Glyph>,
}

impl Scene {
    /// Lay out the glyphs for a bucket set, or `None` if there is nothing to show
    pub fn build(buckets: Buckets, config: &PolicyMapConfig) -> Option<Self> {
        let scales = Scales::from_buckets(&buckets, config.degenerate_margin)?;
        let area = PlotArea::from_config(config);
        let glyphs = buckets
            .iter()
            .map(|(key, bucket)| Glyph::new(*key, bucket, &scales, &area, config))
            .collect();
        Some(Self {
            buckets,
            scales,
            area,
            glyphs,
        })
    }
}

/// Mix `fg` over `bg` at the given opacity
///
/// Terminal cells have no alpha channel, so translucent strokes are baked into an opaque color.
/// Only RGB colors can be mixed; anything else is returned as is.
pub fn blend(fg: Color, bg: Color, alpha: f64) -> Color {
    let (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) = (fg, bg) else {
        return fg;
    };
    let channel = |a: u8, b: u8| interpolate(f64::from(b), f64::from(a), alpha).round() as u8;
    Color::Rgb(channel(r1, r2), channel(g1, g2), channel(b1, b2))
}

fn interpolate(a: f64, b: f64, p: f64) -> f64 {
    a + (p * (b - a))
}

/// Draws a [`Scene`]: grid, axes and labels, glyph fills, then orientation marks
///
/// The scene's pixel space is stretched over the whole render area using braille dots. Glyphs
/// are never covered by labels.
#[derive(Debug, Clone, Copy)]
pub struct PolicyMap<'a> {
    scene: &'a Scene,
    config: &'a PolicyMapConfig,
}

impl<'a> PolicyMap<'a> {
    pub fn new(scene: &'a Scene, config: &'a PolicyMapConfig) -> Self {
        Self { scene, config }
    }

    /// Axis titles and extent labels with their top-left anchor in surface pixels
    fn labels(&self) -> Vec<(f64, f64, String)> {
        let PlotArea {
            width,
            height,
            insets,
        } = self.scene.area;
        let Scales {
            diff_y, speed_y, ..
        } = self.scene.scales;
        // one terminal column is two braille dots wide
        let text_width = |text: &str| text.width() as f64 * 2.0;

        let diff_max = format!("{:.0}", diff_y.max);
        vec![
            (width / 2.0 - 12.0, height - 6.0, String::from("diffY")),
            (2.0, height / 2.0, String::from("speedY")),
            (insets.left, height - 12.0, format!("{:.0}", diff_y.min)),
            (
                width - insets.right - text_width(&diff_max),
                height - 12.0,
                diff_max,
            ),
            (2.0, insets.top, format!("{:.0}", speed_y.max)),
            (2.0, height - insets.bottom, format!("{:.0}", speed_y.min)),
        ]
    }

    /// Grid, axes and labels on the background color
    fn render_backdrop(&self, area: Rect, buf: &mut Buffer) {
        let scene = self.scene;
        let palette = &self.config.palette;
        let height = scene.area.height;

        let grid = Grid {
            scales: scene.scales,
            area: scene.area,
            divisions: self.config.grid_divisions,
            color: blend(palette.grid, palette.background, palette.grid_opacity),
        };
        let axes = Axes {
            area: scene.area,
            color: palette.axis,
        };
        let labels = self.labels();

        self.canvas(|ctx| {
            ctx.draw(&grid);
            ctx.layer();
            ctx.draw(&axes);
            for (x, y, text) in &labels {
                let text = Line::styled(text.clone(), Style::default().fg(palette.label));
                ctx.print(*x, height - y, text);
            }
        })
        .render(area, buf);
    }

    /// Glyph fills with their orientation marks on top
    fn render_glyphs(&self, area: Rect, buf: &mut Buffer) {
        let scene = self.scene;
        let height = scene.area.height;
        let discs = Discs {
            glyphs: &scene.glyphs,
            height,
        };
        let marks = Marks {
            glyphs: &scene.glyphs,
            height,
            ink: self.config.palette.ink,
        };

        self.canvas(|ctx| {
            ctx.draw(&discs);
            ctx.layer();
            ctx.draw(&marks);
        })
        .render(area, buf);
    }

    /// A braille canvas spanning the scene's pixel space
    fn canvas<F: Fn(&mut Context)>(&self, paint: F) -> Canvas<'static, F> {
        Canvas::default()
            .background_color(self.config.palette.background)
            .x_bounds([0.0, self.scene.area.width])
            .y_bounds([0.0, self.scene.area.height])
            .marker(Marker::Braille)
            .paint(paint)
    }
}

impl WidgetRef for PolicyMap<'_> {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        // canvas text lands above every layer of its canvas, so glyphs get a canvas of their own
        // that only overwrites the cells it paints
        self.render_backdrop(area, buf);
        self.render_glyphs(area, buf);
    }
}

impl Widget for PolicyMap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_ref(area, buf);
    }
}
