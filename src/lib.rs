//! holematch detects photo holes in print templates and binds photos to them.
//!
//! Detection scans an RGBA raster for reserved marker colors, refines the
//! regions into exact rectangles, validates and classifies them, and returns
//! an immutable `TemplateDefinition`. The assignment side instantiates one
//! slot per hole and manages photo bindings, pan/zoom transforms and
//! position-based template replacement as pure value transitions.

pub mod assign;
pub mod detect;
pub mod image;
pub mod lowlevel;
pub mod registry;
pub mod slot;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use assign::{Action, AssignmentController, AutoAdvance, Session, SlotRef};
pub use detect::validate::{ValidationReport, Violation};
pub use detect::{detect_template, DetectConfig, Detection, DetectionWarning, Detector};
pub use crate::image::{RgbaImage, RgbaView};
pub use registry::TemplateRegistry;
pub use slot::{
    first_empty, instantiate, is_complete, Assignment, ContainerTransform, Photo, PhotoTransform,
    TemplateGroup, TemplateSlot, Transform, TransformEngine,
};
pub use template::{Dimensions, Hole, TemplateDefinition, TemplateMeta, TemplateType};
pub use util::{HoleMatchError, HoleMatchResult};
