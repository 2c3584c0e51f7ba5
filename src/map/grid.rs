use ratatui::{
    style::Color,
    widgets::canvas::{Line, Painter, Shape},
};

use crate::scale::{PlotArea, Scales};

/// Gap between the surface edge and the ends of the grid lines
const GRID_MARGIN: f64 = 10.0;
/// Distance of the axis lines from the left and bottom edges
const AXIS_OFFSET: f64 = 20.0;

/// A straight line in surface pixels
pub type Segment = ((f64, f64), (f64, f64));

fn draw_segments(segments: &[Segment], height: f64, color: Color, painter: &mut Painter) {
    for &((x1, y1), (x2, y2)) in segments {
        Line {
            x1,
            y1: height - y1,
            x2,
            y2: height - y2,
            color,
        }
        .draw(painter);
    }
}

/// Evenly spaced reference lines across both extents
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub scales: Scales,
    pub area: PlotArea,
    pub divisions: u16,
    pub color: Color,
}

impl Grid {
    /// `divisions + 1` vertical lines followed by `divisions + 1` horizontal ones
    pub fn segments(&self) -> Vec<Segment> {
        let PlotArea { width, height, .. } = self.area;
        let n = f64::from(self.divisions);
        let steps = (0..=self.divisions).map(|i| f64::from(i) / n);

        let vertical = steps.clone().map(|t| {
            let x = self.area.x(&self.scales, self.scales.diff_y.lerp(t));
            ((x, GRID_MARGIN), (x, height - GRID_MARGIN))
        });
        let horizontal = steps.map(|t| {
            let y = self.area.y(&self.scales, self.scales.speed_y.lerp(t));
            ((GRID_MARGIN, y), (width - GRID_MARGIN, y))
        });
        vertical.chain(horizontal).collect()
    }
}

impl Shape for Grid {
    fn draw(&self, painter: &mut Painter) {
        draw_segments(&self.segments(), self.area.height, self.color, painter);
    }
}

/// The `speedY` axis on the left and the `diffY` axis along the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub area: PlotArea,
    pub color: Color,
}

impl Axes {
    pub fn segments(&self) -> [Segment; 2] {
        let PlotArea { width, height, .. } = self.area;
        let origin = (AXIS_OFFSET, height - AXIS_OFFSET);
        [
            ((AXIS_OFFSET, GRID_MARGIN), origin),
            (origin, (width - GRID_MARGIN, height - AXIS_OFFSET)),
        ]
    }
}

impl Shape for Axes {
    fn draw(&self, painter: &mut Painter) {
        draw_segments(&self.segments(), self.area.height, self.color, painter);
    }
}
