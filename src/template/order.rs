//! Row-major hole ordering with a vertical tolerance band.

use crate::template::Hole;

/// Default band: holes whose tops are within this many pixels share a row.
pub const DEFAULT_ROW_BAND: u32 = 20;

/// Sorts holes row-major.
///
/// Holes are first ordered by `y`. A new row starts whenever a hole's top
/// lies more than `row_band` pixels below the top of the row's first hole.
/// Within a row holes are ordered by `x`, then `y`, then size, which keeps
/// the result a deterministic total order.
pub fn sort_row_major(holes: &mut Vec<Hole>, row_band: u32) {
    holes.sort_by_key(|h| (h.y, h.x, h.width, h.height));

    let mut rows: Vec<Vec<Hole>> = Vec::new();
    let mut anchor = 0u32;
    for hole in holes.drain(..) {
        match rows.last_mut() {
            Some(row) if hole.y - anchor <= row_band => row.push(hole),
            _ => {
                anchor = hole.y;
                rows.push(vec![hole]);
            }
        }
    }

    for mut row in rows {
        row.sort_by_key(|h| (h.x, h.y, h.width, h.height));
        holes.extend(row);
    }
}

/// Reassigns ids `hole_1..hole_N` in the current order.
pub fn renumber(holes: &mut [Hole]) {
    for (idx, hole) in holes.iter_mut().enumerate() {
        hole.id = format!("hole_{}", idx + 1);
    }
}
