//! Greedy merge over a per-plane material mask.

use super::Rect;
use crate::core::{MaterialId, CS, INNER_MIN, MATERIAL_EMPTY};

/// Greedy merge one `CS × CS` mask, as built by
/// [`build_face_mask`](crate::cull::build_face_mask).
///
/// Claimed cells are zeroed, so the mask is empty afterwards. Rectangles are
/// emitted row-major with ascending columns.
pub fn greedy_merge_mask(mask: &mut [MaterialId], mut emit: impl FnMut(Rect)) {
    debug_assert_eq!(mask.len(), CS * CS);

    for row in 0..CS {
        let mut col = 0;
        while col < CS {
            let material = mask[row * CS + col];
            if material == MATERIAL_EMPTY {
                col += 1;
                continue;
            }

            // Extend width along the row
            let mut width = 1;
            while col + width < CS && mask[row * CS + col + width] == material {
                width += 1;
            }

            // Extend height while the full span matches
            let mut height = 1;
            while row + height < CS {
                let start = (row + height) * CS + col;
                if !mask[start..start + width].iter().all(|&m| m == material) {
                    break;
                }
                height += 1;
            }

            for r in row..row + height {
                mask[r * CS + col..r * CS + col + width].fill(MATERIAL_EMPTY);
            }

            emit(Rect {
                row: row + INNER_MIN,
                col: col + INNER_MIN,
                width,
                height,
                material,
            });
            col += width;
        }
    }
}
