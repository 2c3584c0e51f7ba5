use crate::{map::Scene, render::PolicyMapRenderer, surface::Surface, table::ValueTable};

/// Whether the map or the placeholder is currently showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapState {
    #[default]
    Hidden,
    Rendered,
}

/// What a redraw request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// The table has fewer keys than [`min_keys`](crate::config::PolicyMapConfig::min_keys)
    TooFewKeys,
    /// Not forced and the key count has not changed since the last pass
    Skipped,
    /// Every entry was filtered out
    NoBuckets,
    Drawn { buckets: usize },
}

/// Something driven by the host's own frame loop
///
/// The host owns the loop and calls [`TickHandler::on_tick`] once per iteration.
pub trait TickHandler {
    fn on_tick(&mut self);
}

/// Decides when the policy map is redrawn and keeps the surface in step with the table
///
/// Starts [`MapState::Hidden`]. A redraw needs at least `min_keys` keys in the table; a
/// non-forced redraw is also skipped when the key count has not changed since the last pass,
/// which stands in for "nothing new was learned". In automatic mode every
/// `frame_interval`-th tick requests a non-forced redraw.
pub struct RedrawScheduler<T: ValueTable> {
    table: T,
    renderer: PolicyMapRenderer,
    surface: Surface,
    state: MapState,
    auto: bool,
    frames: u64,
    last_drawn_count: Option<usize>,
    passes: u64,
    scene: Option<Scene>,
}

impl<T: ValueTable> RedrawScheduler<T> {
    pub fn new(table: T, renderer: PolicyMapRenderer) -> Self {
        let mut surface = renderer.surface();
        let auto = renderer.config().auto_redraw;
        surface.set_auto(auto);
        Self {
            table,
            renderer,
            surface,
            state: MapState::Hidden,
            auto,
            frames: 0,
            last_drawn_count: None,
            passes: 0,
            scene: None,
        }
    }

    /// Redraw from a fresh snapshot of the table
    ///
    /// With `force` the key-count check is bypassed, so the map is rebuilt even if the table
    /// looks unchanged.
    pub fn redraw(&mut self, force: bool) -> Redraw {
        let snapshot = self.table.snapshot();
        let count = snapshot.len();
        let min_keys = self.renderer.config().min_keys;

        if count < min_keys {
            self.hide();
            log::trace!("policy map waiting for data: {count} of {min_keys} keys");
            return Redraw::TooFewKeys;
        }

        if !force && self.last_drawn_count == Some(count) {
            log::trace!("policy map unchanged at {count} keys");
            return Redraw::Skipped;
        }
        self.last_drawn_count = Some(count);
        self.passes += 1;

        self.scene = self.renderer.run(&snapshot, &mut self.surface);
        match &self.scene {
            Some(scene) => {
                let buckets = scene.glyphs.len();
                if self.state == MapState::Hidden {
                    log::debug!("policy map shown with {buckets} buckets from {count} keys");
                }
                self.state = MapState::Rendered;
                Redraw::Drawn { buckets }
            }
            None => {
                if self.state == MapState::Rendered {
                    log::debug!("policy map hidden: all {count} keys filtered out");
                }
                self.state = MapState::Hidden;
                Redraw::NoBuckets
            }
        }
    }

    fn hide(&mut self) {
        if self.state == MapState::Rendered {
            log::debug!("policy map hidden: table shrank below the minimum");
        }
        self.surface.clear();
        self.surface.show_placeholder();
        self.state = MapState::Hidden;
        self.scene = None;
        self.last_drawn_count = None;
    }

    /// Count one host frame, redrawing on every `frame_interval`-th while automatic mode is on
    pub fn tick(&mut self) -> Option<Redraw> {
        if !self.auto {
            return None;
        }
        self.frames += 1;
        if self.frames % self.renderer.config().frame_interval != 0 {
            return None;
        }
        Some(self.redraw(false))
    }

    /// Flip automatic mode and update the button to match
    ///
    /// **Returns** whether automatic mode is now on
    pub fn toggle_auto(&mut self) -> bool {
        self.auto = !self.auto;
        self.surface.set_auto(self.auto);
        let label = self.surface.auto_button().label();
        log::debug!("automatic policy map redraws {label}");
        self.auto
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The scene currently on the surface, if any
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Number of aggregation passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn renderer(&self) -> &PolicyMapRenderer {
        &self.renderer
    }
}

impl<T: ValueTable> TickHandler for RedrawScheduler<T> {
    fn on_tick(&mut self) {
        self.tick();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        config::PolicyMapConfig,
        map::radius,
        table::{Action, SharedTable, StateActionKey},
    };

    /// Keys far enough from the obstacle to be filtered out of every bucket
    fn padding(n: usize) -> impl Iterator<Item = (String, f64)> {
        (0..n).map(|i| {
            let key = StateActionKey::new(i as i32, 0, 100, Action::Stay);
            (key.to_string(), 5.0)
        })
    }

    fn scheduler(table: SharedTable) -> RedrawScheduler<SharedTable> {
        RedrawScheduler::new(table, PolicyMapRenderer::default())
    }

    fn table_with(entries: &[(&str, f64)], pad_to: usize) -> SharedTable {
        let mut map = entries
            .iter()
            .map(|&(k, v)| (String::from(k), v))
            .collect::<HashMap<_, _>>();
        map.extend(padding(pad_to.saturating_sub(map.len())));
        SharedTable::from(map)
    }

    #[test]
    fn empty_table_stays_hidden() {
        let mut scheduler = scheduler(SharedTable::new());
        assert_eq!(scheduler.state(), MapState::Hidden);
        assert!(scheduler.surface().placeholder_visible());

        assert_eq!(scheduler.redraw(true), Redraw::TooFewKeys);
        assert_eq!(scheduler.redraw(false), Redraw::TooFewKeys);
        for _ in 0..90 {
            scheduler.on_tick();
        }

        assert_eq!(scheduler.state(), MapState::Hidden);
        assert!(scheduler.surface().placeholder_visible());
        assert!(scheduler.surface().is_blank());
        assert!(scheduler.scene().is_none());
        assert_eq!(scheduler.passes(), 0, "nothing was aggregated");
    }

    #[test]
    fn sparse_table_draws_no_glyphs() {
        let table = table_with(&[("0,0,5,0", 1.0), ("3,20,5,1", 0.4)], 0);
        let mut scheduler = scheduler(table.clone());
        for _ in 0..12 {
            table.insert(format!("{},0,5,0", table.len() * 3), 1.0);
        }
        assert_eq!(table.len(), 14);

        assert_eq!(scheduler.redraw(true), Redraw::TooFewKeys);
        assert!(scheduler.surface().is_blank());
        assert!(scheduler.scene().is_none());

        table.insert("99,0,5,0", 1.0);
        assert_eq!(scheduler.redraw(false), Redraw::Drawn { buckets: 15 });
        assert_eq!(scheduler.state(), MapState::Rendered);
        assert!(!scheduler.surface().placeholder_visible());
    }

    #[test]
    fn jump_preferred_bucket() {
        let table = table_with(&[("0,0,5,0", 1.0), ("0,0,5,1", 0.2)], 15);
        let mut scheduler = scheduler(table);

        assert_eq!(scheduler.redraw(true), Redraw::Drawn { buckets: 1 });
        let scene = scheduler.scene().unwrap();
        let glyph = scene.glyphs[0];
        assert_eq!((glyph.bucket.diff_y, glyph.bucket.speed_y), (0, 0));
        assert_eq!(glyph.action, Action::Jump);
        assert_eq!(glyph.fill, PolicyMapConfig::default().palette.jump);

        let jump = PolicyMapConfig::default().palette.jump;
        assert!(
            scheduler
                .surface()
                .buffer()
                .content
                .iter()
                .any(|cell| cell.fg == jump),
            "jump hue painted"
        );
    }

    #[test]
    fn exact_ties_prefer_stay() {
        let table = table_with(
            &[
                ("0,0,5,0", 0.5),
                ("0,0,5,1", 0.5),
                ("9,40,5,0", -1.0),
                ("9,40,5,1", -1.0),
            ],
            15,
        );
        let mut scheduler = scheduler(table);
        scheduler.redraw(true);

        let scene = scheduler.scene().unwrap();
        assert_eq!(scene.glyphs.len(), 2);
        for glyph in &scene.glyphs {
            assert_eq!(glyph.action, Action::Stay);
            assert_eq!(glyph.fill, PolicyMapConfig::default().palette.stay);
        }
    }

    #[test]
    fn all_tied_glyphs_have_min_radius() {
        let table = table_with(
            &[
                ("0,0,5,0", 1.0),
                ("0,0,5,1", 1.0),
                ("6,20,5,0", 0.0),
                ("-6,-20,5", 9.0),
                ("12,60,1,7", 3.0),
            ],
            20,
        );
        let mut scheduler = scheduler(table);
        assert_eq!(scheduler.redraw(true), Redraw::Drawn { buckets: 3 });

        let scene = scheduler.scene().unwrap();
        assert_eq!(scene.scales.max_gap, 0.0);
        let min_radius = PolicyMapConfig::default().min_radius;
        for glyph in &scene.glyphs {
            assert_eq!(glyph.radius, min_radius);
            assert_eq!(glyph.radius, radius(0.0, 0.0, &PolicyMapConfig::default()));
        }
    }

    #[test]
    fn far_entries_hide_the_map() {
        let table = table_with(&[], 40);
        let mut scheduler = scheduler(table.clone());

        assert_eq!(scheduler.redraw(true), Redraw::NoBuckets);
        assert_eq!(scheduler.state(), MapState::Hidden);
        assert!(scheduler.surface().placeholder_visible());
        assert!(scheduler.surface().is_blank());

        table.insert("0,0,5,0", 1.0);
        assert!(matches!(scheduler.redraw(false), Redraw::Drawn { .. }));
        assert_eq!(scheduler.state(), MapState::Rendered);

        table.update(|map| map.retain(|k, _| k != "0,0,5,0"));
        table.insert("0,0,50,0", 1.0);
        assert_eq!(
            scheduler.redraw(true),
            Redraw::NoBuckets,
            "rendered back to hidden"
        );
        assert_eq!(scheduler.state(), MapState::Hidden);
        assert!(scheduler.surface().placeholder_visible());
        assert!(scheduler.surface().is_blank());
    }

    #[test]
    fn forced_redraw_is_idempotent() {
        let table = table_with(
            &[
                ("0,0,5,0", 1.0),
                ("0,0,5,1", 0.2),
                ("-9,-60,3,1", 2.5),
                ("15,80,20,0", 0.7),
            ],
            18,
        );
        let mut scheduler = scheduler(table);

        scheduler.redraw(true);
        let first = scheduler.surface().clone();
        scheduler.redraw(true);
        assert_eq!(scheduler.surface(), &first);
        assert_eq!(scheduler.passes(), 2);
    }

    #[test]
    fn unchanged_table_is_not_redrawn() {
        let table = table_with(&[("0,0,5,0", 1.0), ("0,0,5,1", 0.2)], 15);
        let mut scheduler = scheduler(table.clone());

        assert!(matches!(scheduler.redraw(false), Redraw::Drawn { .. }));
        assert_eq!(scheduler.redraw(false), Redraw::Skipped);
        assert_eq!(scheduler.passes(), 1);

        table.insert("0,0,5,1", 3.0);
        assert_eq!(
            scheduler.redraw(false),
            Redraw::Skipped,
            "value changes alone do not count as growth"
        );

        table.insert("3,0,5,1", 3.0);
        assert!(matches!(scheduler.redraw(false), Redraw::Drawn { .. }));
        assert_eq!(scheduler.passes(), 2);
    }

    #[test]
    fn unchanged_filtered_table_is_not_reaggregated() {
        let mut scheduler = scheduler(table_with(&[], 20));
        assert_eq!(scheduler.redraw(false), Redraw::NoBuckets);
        assert_eq!(scheduler.redraw(false), Redraw::Skipped);
        assert_eq!(scheduler.passes(), 1);
        assert!(scheduler.surface().placeholder_visible());
    }

    #[test]
    fn regrowth_after_shrinking_redraws() {
        let table = table_with(&[("0,0,5,0", 1.0)], 15);
        let mut scheduler = scheduler(table.clone());
        assert!(matches!(scheduler.redraw(false), Redraw::Drawn { .. }));

        let full = table.snapshot();
        table.update(|map| map.retain(|key, _| key == "0,0,5,0"));
        assert_eq!(scheduler.redraw(false), Redraw::TooFewKeys);
        assert_eq!(scheduler.state(), MapState::Hidden);

        let restored = full.iter().map(|(k, v)| (k.to_owned(), v));
        table.update(|map| map.extend(restored));
        assert!(matches!(scheduler.redraw(false), Redraw::Drawn { .. }));
        assert_eq!(scheduler.state(), MapState::Rendered);
    }

    #[test]
    fn auto_mode_redraws_on_interval() {
        let table = table_with(&[("0,0,5,0", 1.0)], 15);
        let mut scheduler = scheduler(table.clone());
        assert!(scheduler.is_auto());
        assert_eq!(scheduler.surface().auto_button().label(), "Auto On");

        for _ in 0..29 {
            assert_eq!(scheduler.tick(), None);
        }
        assert!(matches!(scheduler.tick(), Some(Redraw::Drawn { .. })));
        assert_eq!(scheduler.passes(), 1);

        for _ in 0..30 {
            scheduler.on_tick();
        }
        assert_eq!(scheduler.passes(), 1, "no growth, no pass");

        assert!(!scheduler.toggle_auto());
        assert!(!scheduler.surface().auto_button().pressed());
        assert_eq!(scheduler.surface().auto_button().label(), "Auto Off");

        table.insert("3,0,5,0", 1.0);
        for _ in 0..90 {
            assert_eq!(scheduler.tick(), None);
        }
        assert_eq!(scheduler.passes(), 1, "ticks ignored while off");

        assert!(matches!(scheduler.redraw(true), Redraw::Drawn { .. }));
        assert!(scheduler.toggle_auto());
        assert_eq!(scheduler.surface().auto_button().label(), "Auto On");
    }

    #[test]
    fn auto_mode_can_start_off() {
        let config = PolicyMapConfig {
            auto_redraw: false,
            frame_interval: 1,
            ..Default::default()
        };
        let renderer = PolicyMapRenderer::new(config).unwrap();
        let mut scheduler = RedrawScheduler::new(table_with(&[("0,0,5,0", 1.0)], 15), renderer);
        assert_eq!(scheduler.surface().auto_button().label(), "Auto Off");
        assert_eq!(scheduler.tick(), None);

        scheduler.toggle_auto();
        assert!(matches!(scheduler.tick(), Some(Redraw::Drawn { .. })));
    }
}
