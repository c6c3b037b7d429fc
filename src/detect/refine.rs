//! Pixel-exact bound refinement and compound-region splitting.
//!
//! Refinement re-scans the rough box and recomputes bounds from matching
//! pixels only. Large boxes are additionally sampled on a coarse grid; each
//! unvisited marker sample seeds a fill restricted to the box, and when more
//! than one sufficiently large component turns up the region becomes several
//! holes.

use crate::detect::palette::ReservedPalette;
use crate::detect::scan::{FillArea, RegionBox};
use crate::image::RgbaView;

/// Parameters controlling refinement and splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefineParams {
    /// Minimum hole width and height for a split component to count.
    pub min_hole_size: usize,
    /// Both box dimensions must reach this extent before splitting is attempted.
    pub split_min_extent: usize,
    /// Sampling stride of the split grid.
    pub split_stride: usize,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            min_hole_size: 50,
            split_min_extent: 100,
            split_stride: 10,
        }
    }
}

/// Result of refining one rough region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refinement {
    /// Exact hole boxes produced from the region.
    pub holes: Vec<RegionBox>,
    /// Independent components seen by the split grid (0 when no split was attempted).
    pub components: usize,
}

impl Refinement {
    /// True when the grid saw several components, so one-hole-vs-many was a judgment call.
    pub fn is_ambiguous(&self) -> bool {
        self.components > 1
    }
}

/// Recomputes the bounds of `rough` from the marker pixels it contains.
///
/// Returns `None` if the box holds no marker pixel.
pub fn tighten_bounds(
    image: RgbaView<'_>,
    palette: &ReservedPalette,
    rough: &RegionBox,
) -> Option<RegionBox> {
    let mut bounds: Option<RegionBox> = None;
    for y in rough.min_y..=rough.max_y {
        for x in rough.min_x..=rough.max_x {
            if !image.pixel(x, y).is_some_and(|px| palette.matches(px)) {
                continue;
            }
            let b = bounds.get_or_insert(RegionBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                pixels: 0,
            });
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
            b.pixels += 1;
        }
    }
    bounds
}

/// Refines a rough region into one or more exact hole boxes.
pub fn refine_region(
    image: RgbaView<'_>,
    palette: &ReservedPalette,
    rough: &RegionBox,
    params: &RefineParams,
) -> Refinement {
    let Some(refined) = tighten_bounds(image, palette, rough) else {
        return Refinement {
            holes: Vec::new(),
            components: 0,
        };
    };

    let extent = params.split_min_extent;
    if rough.width() < extent || rough.height() < extent {
        return Refinement {
            holes: vec![refined],
            components: 0,
        };
    }

    let components = split_components(image, palette, rough, params.split_stride.max(1));
    let large: Vec<RegionBox> = components
        .iter()
        .copied()
        .filter(|c| c.width() >= params.min_hole_size && c.height() >= params.min_hole_size)
        .collect();

    let holes = if large.len() > 1 { large } else { vec![refined] };
    Refinement {
        holes,
        components: components.len(),
    }
}

fn split_components(
    image: RgbaView<'_>,
    palette: &ReservedPalette,
    rough: &RegionBox,
    stride: usize,
) -> Vec<RegionBox> {
    let mut area = FillArea::of_region(rough);
    let mut components = Vec::new();
    for y in (rough.min_y..=rough.max_y).step_by(stride) {
        for x in (rough.min_x..=rough.max_x).step_by(stride) {
            if area.is_visited(x, y) {
                continue;
            }
            if image.pixel(x, y).is_some_and(|px| palette.matches(px)) {
                components.push(area.fill(&image, palette, x, y));
            }
        }
    }
    components
}
