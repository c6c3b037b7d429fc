//! Hole detection pipeline: scan, refine, validate, build.
//!
//! Detection is pure and synchronous. A `Detector` holds only its
//! configuration, so it can be shared across threads or moved onto a
//! background worker by the caller.

pub mod palette;
pub mod refine;
pub mod scan;
pub mod validate;

use crate::detect::palette::ReservedPalette;
use crate::detect::refine::{refine_region, RefineParams, Refinement};
use crate::detect::scan::{scan_regions, RegionBox};
use crate::detect::validate::validate_holes;
use crate::image::RgbaView;
use crate::template::{Dimensions, Hole, TemplateDefinition, TemplateMeta, DEFAULT_ROW_BAND};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{HoleMatchError, HoleMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for hole detection.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Marker colors, tolerance and alpha threshold.
    pub palette: ReservedPalette,
    /// Minimum hole width and height in pixels.
    pub min_hole_size: u32,
    /// Regions smaller than this in both dimensions are discarded as noise.
    pub speckle_size: u32,
    /// Vertical band in pixels within which holes share a row.
    pub row_band: u32,
    /// Both rough-box dimensions must reach this before a split is attempted.
    pub split_min_extent: u32,
    /// Grid stride used when sampling for compound regions.
    pub split_stride: u32,
    /// Refine regions in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            palette: ReservedPalette::default(),
            min_hole_size: 50,
            speckle_size: 3,
            row_band: DEFAULT_ROW_BAND,
            split_min_extent: 100,
            split_stride: 10,
            parallel: false,
        }
    }
}

impl DetectConfig {
    /// Checks parameter consistency.
    pub fn validate(&self) -> HoleMatchResult<()> {
        if self.palette.colors().is_empty() {
            return Err(HoleMatchError::InvalidConfig {
                reason: "palette must contain at least one color",
            });
        }
        if self.min_hole_size == 0 {
            return Err(HoleMatchError::InvalidConfig {
                reason: "min_hole_size must be > 0",
            });
        }
        if self.split_stride == 0 {
            return Err(HoleMatchError::InvalidConfig {
                reason: "split_stride must be > 0",
            });
        }
        if self.speckle_size > self.min_hole_size {
            return Err(HoleMatchError::InvalidConfig {
                reason: "speckle_size must not exceed min_hole_size",
            });
        }
        Ok(())
    }

    fn refine_params(&self) -> RefineParams {
        RefineParams {
            min_hole_size: self.min_hole_size as usize,
            split_min_extent: self.split_min_extent as usize,
            split_stride: self.split_stride as usize,
        }
    }
}

/// Non-fatal observation made during detection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectionWarning {
    /// A large region contained several components; the split decision is heuristic.
    AmbiguousSplit {
        /// Rough bounds of the region.
        region: RegionBox,
        /// Components found by the sampling grid.
        components: usize,
        /// Holes emitted for the region.
        holes: usize,
    },
}

/// A validated template plus any warnings raised while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub definition: TemplateDefinition,
    pub warnings: Vec<DetectionWarning>,
}

/// Hole detector over decoded RGBA rasters.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    cfg: DetectConfig,
}

impl Detector {
    /// Creates a detector after validating the configuration.
    pub fn new(cfg: DetectConfig) -> HoleMatchResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Detects holes and returns unvalidated, unsorted hole boxes with their warnings.
    pub fn detect_regions(&self, image: RgbaView<'_>) -> (Vec<RegionBox>, Vec<DetectionWarning>) {
        let palette = &self.cfg.palette;
        let speckle = self.cfg.speckle_size as usize;
        let scanned = scan_regions(image, palette);
        let total = scanned.len();
        let rough: Vec<RegionBox> = scanned
            .into_iter()
            .filter(|r| r.width() >= speckle || r.height() >= speckle)
            .collect();
        if rough.len() < total {
            trace_event!("speckle_discarded", count = total - rough.len());
        }

        let _span = trace_span!("refine_regions", regions = rough.len()).entered();
        let params = self.cfg.refine_params();
        let refinements = self.refine_all(image, &rough, &params);

        let mut boxes: Vec<RegionBox> = Vec::new();
        let mut warnings = Vec::new();
        for (region, refinement) in rough.iter().zip(refinements) {
            if refinement.is_ambiguous() {
                trace_warn!(
                    "ambiguous_split",
                    x = region.min_x,
                    y = region.min_y,
                    components = refinement.components,
                    holes = refinement.holes.len()
                );
                warnings.push(DetectionWarning::AmbiguousSplit {
                    region: *region,
                    components: refinement.components,
                    holes: refinement.holes.len(),
                });
            }
            for hole in refinement.holes {
                if !boxes.iter().any(|b| same_bounds(b, &hole)) {
                    boxes.push(hole);
                }
            }
        }
        (boxes, warnings)
    }

    #[cfg(feature = "rayon")]
    fn refine_all(
        &self,
        image: RgbaView<'_>,
        rough: &[RegionBox],
        params: &RefineParams,
    ) -> Vec<Refinement> {
        let palette = &self.cfg.palette;
        if self.cfg.parallel {
            return rough
                .par_iter()
                .map(|r| refine_region(image, palette, r, params))
                .collect();
        }
        rough
            .iter()
            .map(|r| refine_region(image, palette, r, params))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn refine_all(
        &self,
        image: RgbaView<'_>,
        rough: &[RegionBox],
        params: &RefineParams,
    ) -> Vec<Refinement> {
        let palette = &self.cfg.palette;
        rough
            .iter()
            .map(|r| refine_region(image, palette, r, params))
            .collect()
    }

    /// Runs the full pipeline and returns a validated template definition.
    ///
    /// Validation failures are returned together as
    /// [`HoleMatchError::InvalidTemplate`].
    pub fn detect(&self, image: RgbaView<'_>, meta: TemplateMeta) -> HoleMatchResult<Detection> {
        let _span = trace_span!(
            "detect",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let (boxes, warnings) = self.detect_regions(image);
        let holes: Vec<Hole> = boxes.iter().map(hole_from_box).collect();
        let dimensions = Dimensions::new(image.width() as u32, image.height() as u32);
        let definition = TemplateDefinition::build(meta, dimensions, holes, self.cfg.row_band);

        let report = validate_holes(&definition.holes, self.cfg.min_hole_size);
        if !report.is_valid() {
            return Err(HoleMatchError::InvalidTemplate(report));
        }

        trace_event!(
            "holes_detected",
            count = definition.holes.len(),
            warnings = warnings.len()
        );
        Ok(Detection {
            definition,
            warnings,
        })
    }
}

/// Detects a template with the default configuration.
pub fn detect_template(image: RgbaView<'_>, meta: TemplateMeta) -> HoleMatchResult<Detection> {
    Detector::default().detect(image, meta)
}

fn same_bounds(a: &RegionBox, b: &RegionBox) -> bool {
    (a.min_x, a.min_y, a.max_x, a.max_y) == (b.min_x, b.min_y, b.max_x, b.max_y)
}

fn hole_from_box(b: &RegionBox) -> Hole {
    Hole::new(
        String::new(),
        b.min_x as u32,
        b.min_y as u32,
        b.width() as u32,
        b.height() as u32,
    )
}
