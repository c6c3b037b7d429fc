//! Low-level building blocks for custom detection pipelines.
//!
//! These expose the scanner, refiner, validator and ordering helpers that
//! `Detector` chains together. Most users should prefer `Detector`.

pub use crate::detect::palette::{ReservedColor, ReservedPalette, MAGENTA, MAGENTA_CMYK};
pub use crate::detect::refine::{refine_region, tighten_bounds, RefineParams, Refinement};
pub use crate::detect::scan::{scan_regions, RegionBox};
pub use crate::detect::validate::validate_holes;
pub use crate::slot::transform::{cover_scale, VisibleRect};
pub use crate::template::classify::{classify, classify_by_geometry, mean_aspect_ratio};
pub use crate::template::order::{renumber, sort_row_major};
