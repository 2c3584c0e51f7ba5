use std::collections::BTreeMap;

use crate::{
    config::PolicyMapConfig,
    table::{parse_key, Action, TableSnapshot},
};

/// Rounded `(diffY, speedY)` coordinates of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub diff_y: i32,
    pub speed_y: i32,
}

/// Accumulated action values of every raw state that rounds to one [`BucketKey`]
///
/// Values are summed rather than averaged, so a densely sampled bucket reads as a stronger
/// preference than a sparse one with the same per-state values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub q_jump: f64,
    pub q_stay: f64,
    pub has_jump: bool,
    pub has_stay: bool,
    /// Raw entries that landed here, including ones with an unknown action
    pub samples: u32,
}

impl Bucket {
    fn accumulate(&mut self, action: Option<Action>, value: f64) {
        self.samples += 1;
        match action {
            Some(Action::Jump) => {
                self.q_jump += value;
                self.has_jump = true;
            }
            Some(Action::Stay) => {
                self.q_stay += value;
                self.has_stay = true;
            }
            None => {}
        }
    }

    /// Absolute difference between the two action sums
    pub fn gap(&self) -> f64 {
        (self.q_jump - self.q_stay).abs()
    }

    /// The preferred action, with ties going to [`Action::Stay`]
    pub fn dominant_action(&self) -> Action {
        if self.q_jump > self.q_stay {
            Action::Jump
        } else {
            Action::Stay
        }
    }
}

/// Buckets ordered by `diffY`, then `speedY`
pub type Buckets = BTreeMap<BucketKey, Bucket>;

/// Round `value` to the nearest multiple of `step`, with halves going up
///
/// `step` must be positive.
pub fn round_to_step(value: i32, step: i32) -> i32 {
    let (value, step) = (i64::from(value), i64::from(step));
    let rounded = (2 * value + step).div_euclid(2 * step) * step;
    rounded.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Collapse a table snapshot into display buckets
///
/// Keys that do not parse are skipped, as are states whose obstacle is farther than
/// [`PolicyMapConfig::proximity_threshold`].
pub fn aggregate(snapshot: &TableSnapshot, config: &PolicyMapConfig) -> Buckets {
    let mut buckets = Buckets::new();
    let mut malformed = 0usize;

    for (raw, value) in snapshot.iter() {
        let Some(fields) = parse_key(raw) else {
            malformed += 1;
            continue;
        };
        if fields.tube_x > config.proximity_threshold {
            continue;
        }

        let key = BucketKey {
            diff_y: round_to_step(fields.diff_y, config.diff_y_step),
            speed_y: round_to_step(fields.speed_y, config.speed_y_step),
        };
        buckets
            .entry(key)
            .or_default()
            .accumulate(fields.action(), value);
    }

    log::trace!(
        "aggregated {} keys into {} buckets ({malformed} malformed)",
        snapshot.len(),
        buckets.len()
    );
    buckets
}
