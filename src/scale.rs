use crate::{
    aggregate::{BucketKey, Buckets},
    config::{Insets, PolicyMapConfig},
};

/// Closed range of values shown along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Smallest extent covering every value, or `None` if there are none
    fn covering(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |extent, v| match extent {
            None => Some(Self { min: v, max: v }),
            Some(Self { min, max }) => Some(Self {
                min: min.min(v),
                max: max.max(v),
            }),
        })
    }

    /// Widen a single-value extent by `margin` on both sides
    fn widened(self, margin: f64) -> Self {
        if self.min == self.max {
            Self {
                min: self.min - margin,
                max: self.max + margin,
            }
        } else {
            self
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `v` within the extent, `0.0` at `min` and `1.0` at `max`
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / self.span()
    }

    /// Inverse of [`Extent::normalize`]
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * self.span()
    }
}

/// Axis extents and glyph normalization for one pass over the buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub diff_y: Extent,
    pub speed_y: Extent,
    /// Largest `|q_jump - q_stay|` over all buckets
    pub max_gap: f64,
}

impl Scales {
    /// Compute scales over a bucket set, or `None` if it is empty
    ///
    /// An axis on which every bucket shares one value is widened by `margin` both ways so that
    /// the mapping onto the surface never divides by zero.
    pub fn from_buckets(buckets: &Buckets, margin: f64) -> Option<Self> {
        let diff_y = Extent::covering(buckets.keys().map(|k| f64::from(k.diff_y)))?;
        let speed_y = Extent::covering(buckets.keys().map(|k| f64::from(k.speed_y)))?;
        // NaN gaps never compare greater, so they drop out here
        let max_gap = buckets
            .values()
            .map(|b| b.gap())
            .fold(0.0, |max, gap| if gap > max { gap } else { max });

        Some(Self {
            diff_y: diff_y.widened(margin),
            speed_y: speed_y.widened(margin),
            max_gap,
        })
    }
}

/// The region of the surface that bucket coordinates are mapped into
///
/// Coordinates are in surface pixels with the origin at the top left and `y` growing
/// downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
}

impl PlotArea {
    pub fn new(width: f64, height: f64, insets: Insets) -> Self {
        Self {
            width,
            height,
            insets,
        }
    }

    pub fn from_config(config: &PolicyMapConfig) -> Self {
        Self::new(config.width, config.height, config.insets)
    }

    /// Horizontal pixel position of a `diffY` value
    pub fn x(&self, scales: &Scales, diff_y: f64) -> f64 {
        let Insets { left, right, .. } = self.insets;
        left + scales.diff_y.normalize(diff_y) * (self.width - left - right)
    }

    /// Vertical pixel position of a `speedY` value, with larger speeds drawn higher
    pub fn y(&self, scales: &Scales, speed_y: f64) -> f64 {
        let Insets { top, bottom, .. } = self.insets;
        self.height - bottom - scales.speed_y.normalize(speed_y) * (self.height - top - bottom)
    }

    /// Pixel position of a bucket's center
    pub fn project(&self, scales: &Scales, key: BucketKey) -> (f64, f64) {
        (
            self.x(scales, f64::from(key.diff_y)),
            self.y(scales, f64::from(key.speed_y)),
        )
    }
}
