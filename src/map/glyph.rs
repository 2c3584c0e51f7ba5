use ratatui::{
    style::Color,
    widgets::canvas::{Painter, Shape},
};

use crate::{
    aggregate::{Bucket, BucketKey},
    config::PolicyMapConfig,
    scale::{PlotArea, Scales},
    table::Action,
};

/// Distance from the glyph center to the tip of the orientation mark, as a share of the radius
const MARK_APEX: f64 = 0.7;
/// Half the width of the mark's base, as a share of the radius
const MARK_HALF_WIDTH: f64 = 0.6;
/// Distance from the glyph center to the mark's base, as a share of the radius
const MARK_BASE: f64 = 0.5;

/// Gap used in place of an exact tie when some other bucket has a nonzero gap
const MIN_GAP: f64 = 0.01;

/// The marker drawn for one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub bucket: BucketKey,
    /// Surface pixel coordinates, `y` growing downwards
    pub center: (f64, f64),
    pub radius: f64,
    pub action: Action,
    pub fill: Color,
}

impl Glyph {
    pub fn new(
        key: BucketKey,
        bucket: &Bucket,
        scales: &Scales,
        area: &PlotArea,
        config: &PolicyMapConfig,
    ) -> Self {
        let action = bucket.dominant_action();
        let fill = match action {
            Action::Jump => config.palette.jump,
            Action::Stay => config.palette.stay,
        };
        Self {
            bucket: key,
            center: area.project(scales, key),
            radius: radius(bucket.gap(), scales.max_gap, config),
            action,
            fill,
        }
    }

    /// Vertices of the orientation mark: apex first, then the two base corners
    ///
    /// The apex points up for [`Action::Jump`] and down for [`Action::Stay`].
    pub fn mark(&self) -> [(f64, f64); 3] {
        let (cx, cy) = self.center;
        let r = self.radius;
        // screen y grows downwards, so "up" is negative
        let dir = match self.action {
            Action::Jump => -1.0,
            Action::Stay => 1.0,
        };
        [
            (cx, cy + dir * MARK_APEX * r),
            (cx + MARK_HALF_WIDTH * r, cy - dir * MARK_BASE * r),
            (cx - MARK_HALF_WIDTH * r, cy - dir * MARK_BASE * r),
        ]
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.center.0, y - self.center.1);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Glyph radius for a bucket with the given gap
///
/// Scales linearly from [`PolicyMapConfig::min_radius`] up to `min_radius + radius_scale` at
/// the largest gap. When every bucket is tied the radius is exactly `min_radius`; a gap that
/// overflowed to infinity counts as the largest.
pub fn radius(gap: f64, max_gap: f64, config: &PolicyMapConfig) -> f64 {
    if max_gap > 0.0 {
        let gap = if gap > 0.0 { gap } else { MIN_GAP };
        let ratio = if gap.is_infinite() {
            1.0
        } else {
            (gap / max_gap).min(1.0)
        };
        config.min_radius + ratio * config.radius_scale
    } else {
        config.min_radius
    }
}

fn triangle_contains([a, b, c]: [(f64, f64); 3], (x, y): (f64, f64)) -> bool {
    let edge = |(x1, y1): (f64, f64), (x2, y2): (f64, f64)| {
        (x - x2) * (y1 - y2) - (x1 - x2) * (y - y2)
    };
    let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Paint every whole surface pixel inside `[x0, x1] x [y0, y1]` accepted by `inside`
fn fill_region(
    painter: &mut Painter,
    height: f64,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    color: Color,
    inside: impl Fn(f64, f64) -> bool,
) {
    let (x0, x1) = (x0.floor() as i64, x1.ceil() as i64);
    let (y0, y1) = (y0.floor() as i64, y1.ceil() as i64);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let (x, y) = (px as f64, py as f64);
            if !inside(x, y) {
                continue;
            }
            if let Some((gx, gy)) = painter.get_point(x, height - y) {
                painter.paint(gx, gy, color);
            }
        }
    }
}

/// The filled discs of a set of glyphs
#[derive(Debug, Clone, PartialEq)]
pub struct Discs<'a> {
    pub glyphs: &'a [Glyph],
    /// Surface height, for flipping into canvas coordinates
    pub height: f64,
}

impl<'a> Shape for Discs<'a> {
    fn draw(&self, painter: &mut Painter) {
        for glyph in self.glyphs {
            let (cx, cy) = glyph.center;
            let r = glyph.radius;
            fill_region(
                painter,
                self.height,
                (cx - r, cy - r),
                (cx + r, cy + r),
                glyph.fill,
                |x, y| glyph.contains(x, y),
            );
        }
    }
}

/// The orientation marks of a set of glyphs
#[derive(Debug, Clone, PartialEq)]
pub struct Marks<'a> {
    pub glyphs: &'a [Glyph],
    pub height: f64,
    pub ink: Color,
}

impl<'a> Shape for Marks<'a> {
    fn draw(&self, painter: &mut Painter) {
        for glyph in self.glyphs {
            let mark = glyph.mark();
            let (x0, x1) = (mark[2].0, mark[1].0);
            let (y0, y1) = (
                mark.iter().map(|p| p.1).fold(f64::INFINITY, f64::min),
                mark.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max),
            );
            fill_region(painter, self.height, (x0, y0), (x1, y1), self.ink, |x, y| {
                triangle_contains(mark, (x, y))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Extent;

    fn scales(max_gap: f64) -> Scales {
        Scales {
            diff_y: Extent {
                min: -10.0,
                max: 10.0,
            },
            speed_y: Extent {
                min: -10.0,
                max: 10.0,
            },
            max_gap,
        }
    }

    fn glyph(q_jump: f64, q_stay: f64, max_gap: f64) -> Glyph {
        let config = PolicyMapConfig::default();
        let bucket = Bucket {
            q_jump,
            q_stay,
            has_jump: true,
            has_stay: true,
            samples: 2,
        };
        let key = BucketKey {
            diff_y: 0,
            speed_y: 0,
        };
        Glyph::new(
            key,
            &bucket,
            &scales(max_gap),
            &PlotArea::from_config(&config),
            &config,
        )
    }

    #[test]
    fn radius_scales_with_gap() {
        let config = PolicyMapConfig::default();
        assert_eq!(radius(2.0, 2.0, &config), 14.0);
        assert_eq!(radius(1.0, 2.0, &config), 9.0);
        assert_eq!(radius(0.0, 0.0, &config), 4.0, "all tied");
        assert_eq!(radius(f64::NAN, 0.0, &config), 4.0);
        assert!(radius(0.0, 1.0, &config) > 4.0, "tie among untied buckets");
    }

    #[test]
    fn overflowed_gap_gets_the_largest_radius() {
        let config = PolicyMapConfig::default();
        assert_eq!(radius(f64::INFINITY, f64::INFINITY, &config), 14.0);
        assert_eq!(radius(1.0, f64::INFINITY, &config), 4.0);

        let overflowed = glyph(1e308, -1e308, f64::INFINITY);
        assert_eq!(overflowed.action, Action::Jump);
        assert_eq!(overflowed.radius, 14.0);
        let (cx, cy) = overflowed.center;
        assert!(overflowed.contains(cx, cy - 13.0));
    }

    #[test]
    fn fill_follows_dominant_action() {
        let palette = PolicyMapConfig::default().palette;

        let jump = glyph(1.0, 0.2, 0.8);
        assert_eq!(jump.action, Action::Jump);
        assert_eq!(jump.fill, palette.jump);

        let tie = glyph(0.5, 0.5, 0.8);
        assert_eq!(tie.action, Action::Stay);
        assert_eq!(tie.fill, palette.stay);
    }

    #[test]
    fn mark_points_towards_action() {
        let jump = glyph(1.0, 0.0, 1.0);
        let [apex, right, left] = jump.mark();
        let (cx, cy) = jump.center;
        assert!(apex.1 < cy && right.1 > cy && left.1 > cy, "jump points up");
        assert_eq!(apex.0, cx);
        assert!((cy - apex.1 - 0.7 * jump.radius).abs() < 1e-9);
        assert!((right.0 - cx - 0.6 * jump.radius).abs() < 1e-9);
        assert_eq!(right.1, left.1);

        let stay = glyph(0.0, 1.0, 1.0);
        let [apex, right, _] = stay.mark();
        assert!(apex.1 > cy && right.1 < cy, "stay points down");
    }

    #[test]
    fn triangle_test() {
        let tri = [(0.0, -7.0), (6.0, 5.0), (-6.0, 5.0)];
        assert!(triangle_contains(tri, (0.0, 0.0)));
        assert!(
            triangle_contains(tri, (0.0, -7.0)),
            "vertices count as inside"
        );
        assert!(!triangle_contains(tri, (6.0, -6.0)));
        assert!(!triangle_contains(tri, (0.0, 6.0)));
    }
}
