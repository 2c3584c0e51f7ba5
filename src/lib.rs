//! A glyph map of what a tabular jump/stay agent has learned.
//!
//! The agent's value table is read through a [`ValueTable`](table::ValueTable) snapshot,
//! collapsed into `(diffY, speedY)` buckets, and drawn onto a fixed-size
//! [`Surface`](surface::Surface) with one glyph per bucket: colored by the preferred action and
//! sized by how strongly it is preferred. A [`RedrawScheduler`](scheduler::RedrawScheduler) decides when to redraw.

/// Bucketing of raw table entries
pub mod aggregate;

/// Renderer and scheduler configuration
pub mod config;

/// Drawing of grid, axes and glyphs
pub mod map;

/// One redraw pass from snapshot to surface
pub mod render;

/// Axis extents and coordinate mapping
pub mod scale;

/// Redraw gating and automatic mode
pub mod scheduler;

/// The drawing surface and its sibling elements
pub mod surface;

/// State-action keys and read-only access to the value table
pub mod table;

/// Interactive terminal view
#[cfg(feature = "viz")]
pub mod viz;

pub use config::PolicyMapConfig;
pub use render::PolicyMapRenderer;
pub use scheduler::{RedrawScheduler, TickHandler};
pub use table::{SharedTable, ValueTable};
