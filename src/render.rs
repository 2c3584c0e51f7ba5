use crate::{
    aggregate::aggregate,
    config::{ConfigError, PolicyMapConfig},
    map::{PolicyMap, Scene},
    surface::Surface,
    table::TableSnapshot,
};

/// Turns a value table snapshot into a glyph map on a [`Surface`]
///
/// Holds no state between passes: buckets, scales and glyphs are rebuilt from the snapshot on
/// every call.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyMapRenderer {
    config: PolicyMapConfig,
}

impl PolicyMapRenderer {
    pub fn new(config: PolicyMapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PolicyMapConfig {
        &self.config
    }

    /// A blank surface sized for this renderer
    pub fn surface(&self) -> Surface {
        Surface::new(self.config.cell_area())
    }

    /// Aggregate and lay out a snapshot without drawing it
    pub fn scene(&self, snapshot: &TableSnapshot) -> Option<Scene> {
        Scene::build(aggregate(snapshot, &self.config), &self.config)
    }

    /// Redraw `surface` from `snapshot`
    ///
    /// The surface is always cleared first. If no bucket survives aggregation the placeholder is
    /// shown and `None` is returned.
    pub fn run(&self, snapshot: &TableSnapshot, surface: &mut Surface) -> Option<Scene> {
        let scene = self.scene(snapshot);
        surface.clear();
        match &scene {
            Some(scene) => {
                surface.hide_placeholder();
                surface.draw(&PolicyMap::new(scene, &self.config));
            }
            None => surface.show_placeholder(),
        }
        scene
    }
}

impl Default for PolicyMapRenderer {
    fn default() -> Self {
        Self {
            config: PolicyMapConfig::default(),
        }
    }
}
