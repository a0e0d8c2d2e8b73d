//! Greedy merge on 64-bit row words.
//!
//! A plane is held as one `u64` per row, bit `c` set if the face at column `c`
//! is visible. Rows and columns are padded grid coordinates, so only bits and
//! rows 1..=62 are ever used.
//!
//! Material equality is folded into two link words per row:
//! - `right[r]` bit `c`: cells (r, c) and (r, c + 1) are visible and match
//! - `down[r]` bit `c`: cells (r, c) and (r + 1, c) are visible and match
//!
//! Width growth is then a run of set bits in the row's link word, and height
//! growth is a masked compare of the span against the next row.

use super::Rect;
use crate::core::{MaterialId, CS_P, INNER_MAX, INNER_MIN};

/// Row words of one plane plus merge bookkeeping.
#[derive(Clone)]
pub struct PlaneRows {
    /// Visible faces, `rows[row]` bit `col`.
    pub rows: [u64; CS_P],
    right: [u64; CS_P],
    down: [u64; CS_P],
    /// Bits already claimed by a taller rectangle from an earlier row.
    forward_merged: [u64; CS_P],
}

impl PlaneRows {
    pub fn new() -> Self {
        Self {
            rows: [0; CS_P],
            right: [0; CS_P],
            down: [0; CS_P],
            forward_merged: [0; CS_P],
        }
    }

    pub fn clear(&mut self) {
        self.rows.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }

    /// Rebuild link words from `rows` and the plane's materials.
    fn link(&mut self, material: &impl Fn(usize, usize) -> MaterialId) {
        for r in INNER_MIN..INNER_MAX {
            let row = self.rows[r];
            let next = self.rows[r + 1];
            let mut right = 0u64;
            let mut down = 0u64;

            let mut bits = row;
            while bits != 0 {
                let c = bits.trailing_zeros() as usize;
                bits &= bits - 1;

                let m = material(r, c);
                if row & (2u64 << c) != 0 && material(r, c + 1) == m {
                    right |= 1 << c;
                }
                if next & (1u64 << c) != 0 && material(r + 1, c) == m {
                    down |= 1 << c;
                }
            }

            self.right[r] = right;
            self.down[r] = down;
        }
        self.forward_merged.fill(0);
    }
}

impl Default for PlaneRows {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy merge one plane of row words.
///
/// `material(row, col)` returns the material of the visible cell at that
/// padded position; it is only called for visible cells. Rectangles are
/// emitted row-major with ascending columns.
pub fn greedy_merge_rows(
    plane: &mut PlaneRows,
    material: impl Fn(usize, usize) -> MaterialId,
    mut emit: impl FnMut(Rect),
) {
    plane.link(&material);

    for r in INNER_MIN..INNER_MAX {
        let mut avail = plane.rows[r] & !plane.forward_merged[r];
        if avail == 0 {
            continue;
        }
        let link = avail & (avail >> 1) & plane.right[r];

        while avail != 0 {
            let c = avail.trailing_zeros() as usize;

            // Run of link bits starting at c
            let width = 1 + (!(link >> c)).trailing_zeros() as usize;
            let span = (u64::MAX >> (64 - width)) << c;

            let mut height = 1;
            while r + height < INNER_MAX {
                let n = r + height;
                let open = plane.rows[n] & !plane.forward_merged[n] & plane.down[n - 1];
                if open & span != span {
                    break;
                }
                plane.forward_merged[n] |= span;
                height += 1;
            }

            emit(Rect {
                row: r,
                col: c,
                width,
                height,
                material: material(r, c),
            });
            avail &= !span;
        }
    }
}
