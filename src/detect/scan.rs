//! Reserved-color region scanning via 4-connected flood fill.
//!
//! The scanner walks the image row-major. Every unvisited marker pixel seeds
//! a flood fill with an explicit stack; the fill marks the whole connected
//! component visited and records its bounding box. Time and auxiliary
//! storage are both O(width * height).

use crate::detect::palette::ReservedPalette;
use crate::image::RgbaView;
use crate::trace::{trace_event, trace_span};

/// Inclusive pixel bounds of a connected marker region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionBox {
    /// Leftmost column.
    pub min_x: usize,
    /// Topmost row.
    pub min_y: usize,
    /// Rightmost column (inclusive).
    pub max_x: usize,
    /// Bottom row (inclusive).
    pub max_y: usize,
    /// Number of marker pixels found by the fill that produced this box.
    pub pixels: usize,
}

impl RegionBox {
    fn seed(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            pixels: 0,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.pixels += 1;
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// Fill bounds and a visited bitmap local to those bounds.
pub(crate) struct FillArea {
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
    visited: Vec<bool>,
}

impl FillArea {
    /// Covers the whole image.
    pub(crate) fn full(image: &RgbaView<'_>) -> Self {
        Self::within(0, 0, image.width(), image.height())
    }

    /// Covers the inclusive bounds of `region` only.
    pub(crate) fn of_region(region: &RegionBox) -> Self {
        Self::within(region.min_x, region.min_y, region.width(), region.height())
    }

    fn within(x0: usize, y0: usize, width: usize, height: usize) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
            visited: vec![false; width * height],
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        (y - self.y0) * self.width + (x - self.x0)
    }

    #[inline]
    pub(crate) fn is_visited(&self, x: usize, y: usize) -> bool {
        self.visited[self.index(x, y)]
    }

    /// Flood-fills from `(x, y)` over matching, unvisited pixels inside the area.
    ///
    /// The seed must be inside the area and must match the palette.
    pub(crate) fn fill(
        &mut self,
        image: &RgbaView<'_>,
        palette: &ReservedPalette,
        x: usize,
        y: usize,
    ) -> RegionBox {
        let x_end = self.x0 + self.width;
        let y_end = self.y0 + self.height;
        let mut region = RegionBox::seed(x, y);
        let mut stack = vec![(x, y)];
        let seed_idx = self.index(x, y);
        self.visited[seed_idx] = true;

        while let Some((cx, cy)) = stack.pop() {
            region.include(cx, cy);

            let mut neighbors = [None; 4];
            if cx > self.x0 {
                neighbors[0] = Some((cx - 1, cy));
            }
            if cx + 1 < x_end {
                neighbors[1] = Some((cx + 1, cy));
            }
            if cy > self.y0 {
                neighbors[2] = Some((cx, cy - 1));
            }
            if cy + 1 < y_end {
                neighbors[3] = Some((cx, cy + 1));
            }

            for (nx, ny) in neighbors.into_iter().flatten() {
                let idx = self.index(nx, ny);
                if self.visited[idx] {
                    continue;
                }
                if image.pixel(nx, ny).is_some_and(|px| palette.matches(px)) {
                    self.visited[idx] = true;
                    stack.push((nx, ny));
                }
            }
        }

        region
    }
}

/// Finds every connected reserved-color region and returns rough bounds in discovery order.
pub fn scan_regions(image: RgbaView<'_>, palette: &ReservedPalette) -> Vec<RegionBox> {
    let _span = trace_span!(
        "scan_regions",
        width = image.width(),
        height = image.height()
    )
    .entered();

    let mut area = FillArea::full(&image);
    let mut regions = Vec::new();
    for y in 0..image.height() {
        let Some(row) = image.row(y) else {
            continue;
        };
        for (x, px) in row.chunks_exact(4).enumerate() {
            if area.is_visited(x, y) || !palette.matches([px[0], px[1], px[2], px[3]]) {
                continue;
            }
            regions.push(area.fill(&image, palette, x, y));
        }
    }

    trace_event!("rough_regions", count = regions.len());
    regions
}
