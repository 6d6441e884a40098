//! Spatial indexing: Morton (Z-order) codes, blocked pixel addressing and
//! box/sphere intersection.
//!
//! All Morton helpers work on 16-bit coordinates packed into a `u32`. Values
//! above 65535 are out of contract; use [`checked_morton_code_2d`] where the
//! input is not already validated.

use glam::Vec3;

use crate::error::{ConfigError, ensure_power_of_two};

/// Largest coordinate accepted by the 2D Morton helpers.
pub const MORTON_MAX_COORD: u32 = 0xffff;

/// Spread the low 16 bits of `x` so they occupy every other bit.
///
/// Inputs above [`MORTON_MAX_COORD`] fail a debug assertion. Release builds
/// keep only the low 16 bits, so two distinct coordinates can share a code.
/// Use [`checked_morton_code_2d`] for unvalidated input.
pub fn interleave_bits(x: u32) -> u32 {
    debug_assert!(x <= MORTON_MAX_COORD, "morton coordinate {x} exceeds 16 bits");
    let mut x = x & 0x0000_ffff;
    x = (x | (x << 8)) & 0x00ff_00ff;
    x = (x | (x << 4)) & 0x0f0f_0f0f;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;
    x
}

/// Collect every other bit of `x` back into the low 16 bits.
pub fn deinterleave_bits(x: u32) -> u32 {
    let mut x = x & 0x5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333;
    x = (x | (x >> 2)) & 0x0f0f_0f0f;
    x = (x | (x >> 4)) & 0x00ff_00ff;
    x = (x | (x >> 8)) & 0x0000_ffff;
    x
}

/// Encode a 2D coordinate as a Morton code, `x` on the even bits.
pub fn morton_code_2d(x: u32, y: u32) -> u32 {
    interleave_bits(x) | (interleave_bits(y) << 1)
}

/// Morton encode with an explicit range check instead of a debug assertion.
pub fn checked_morton_code_2d(x: u32, y: u32) -> Result<u32, ConfigError> {
    if x > MORTON_MAX_COORD || y > MORTON_MAX_COORD {
        return Err(ConfigError::CoordinateOutOfRange { x, y });
    }
    Ok(morton_code_2d(x, y))
}

/// Decode a Morton code produced by [`morton_code_2d`].
pub fn decode_morton_2d(code: u32) -> (u32, u32) {
    (deinterleave_bits(code), deinterleave_bits(code >> 1))
}

/// Squared distance from `point` to the closest point of the box.
///
/// Zero when the point is inside. Degenerate boxes (min == max on any axis)
/// are fine: the clamp collapses to that plane.
pub fn box_distance_squared(box_min: Vec3, box_max: Vec3, point: Vec3) -> f32 {
    let closest = point.clamp(box_min, box_max);
    point.distance_squared(closest)
}

/// Whether the sphere touches or overlaps the box.
pub fn box_intersects_sphere(box_min: Vec3, box_max: Vec3, center: Vec3, radius: f32) -> bool {
    box_distance_squared(box_min, box_max, center) <= radius * radius
}

/// Blocked Z-order addressing for a square grid.
///
/// The grid is cut into `block × block` squares. Blocks are ordered along the
/// Morton curve and pixels inside a block are row-major, so stencil and
/// bilinear neighbourhoods stay close in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    side: u32,
    log2_block: u32,
}

impl TileLayout {
    /// Layout for a `side × side` grid cut into `block × block` squares.
    pub fn new(side: u32, block: u32) -> Result<Self, ConfigError> {
        ensure_power_of_two("grid side", side)?;
        ensure_power_of_two("block size", block)?;
        if block > side {
            return Err(ConfigError::InvalidParameter {
                name: "block size",
                reason: format!("block {block} is larger than grid side {side}"),
            });
        }
        let blocks = side / block;
        if blocks - 1 > MORTON_MAX_COORD {
            return Err(ConfigError::CoordinateOutOfRange {
                x: blocks - 1,
                y: blocks - 1,
            });
        }
        Ok(Self {
            side,
            log2_block: block.trailing_zeros(),
        })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn block(&self) -> u32 {
        1 << self.log2_block
    }

    /// Number of addressable pixels.
    pub fn len(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.side == 0
    }

    /// Linear index of pixel `(x, y)`.
    #[inline]
    pub fn pixel_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.side && y < self.side, "pixel ({x}, {y}) outside layout");
        let shift = self.log2_block;
        let mask = (1 << shift) - 1;
        let block = morton_code_2d(x >> shift, y >> shift) as usize;
        (block << (2 * shift)) | (((y & mask) << shift) | (x & mask)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn morton_ordering() {
        assert_eq!(morton_code_2d(0, 0), 0);
        assert_eq!(morton_code_2d(1, 0), 1);
        assert_eq!(morton_code_2d(0, 1), 2);
        assert_eq!(morton_code_2d(1, 1), 3);
        assert_eq!(morton_code_2d(2, 0), 4);
        assert_eq!(morton_code_2d(0xffff, 0xffff), u32::MAX);
    }

    #[test]
    fn morton_roundtrip_each_axis_exhaustive() {
        // Bits of x and y never mix, so sweeping each axis fully against a
        // spread of partner values covers the whole 16-bit range.
        let partners = [0u32, 1, 0x00ff, 0x5555, 0xaaaa, 0xffff];
        for v in 0..=MORTON_MAX_COORD {
            for &p in &partners {
                assert_eq!(decode_morton_2d(morton_code_2d(v, p)), (v, p));
                assert_eq!(decode_morton_2d(morton_code_2d(p, v)), (p, v));
            }
        }
    }

    #[test]
    fn checked_morton_rejects_wide_coordinates() {
        assert!(checked_morton_code_2d(65535, 0).is_ok());
        assert_eq!(
            checked_morton_code_2d(65536, 3),
            Err(ConfigError::CoordinateOutOfRange { x: 65536, y: 3 })
        );
        assert!(checked_morton_code_2d(3, 0x1_0003).is_err());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "exceeds 16 bits"))]
    fn wide_coordinate_truncates_in_release() {
        assert_eq!(interleave_bits(0x1_0003), interleave_bits(3));
    }

    #[test]
    fn sphere_box_intersection() {
        let min = Vec3::new(0.0, 0.0, 0.0);
        let max = Vec3::new(10.0, 2.0, 10.0);
        assert!(box_intersects_sphere(min, max, Vec3::new(5.0, 1.0, 5.0), 0.1));
        assert!(box_intersects_sphere(min, max, Vec3::new(13.0, 0.0, 5.0), 3.0));
        assert!(!box_intersects_sphere(min, max, Vec3::new(13.0, 0.0, 5.0), 2.9));
        // Diagonal from the corner: distance sqrt(2) * 3.
        assert!(!box_intersects_sphere(min, max, Vec3::new(-3.0, 0.0, -3.0), 4.0));
        assert!(box_intersects_sphere(min, max, Vec3::new(-3.0, 0.0, -3.0), 4.3));
    }

    #[test]
    fn degenerate_box_is_handled() {
        let p = Vec3::new(4.0, 0.0, 4.0);
        assert!(box_intersects_sphere(p, p, p, 0.0));
        assert!(box_intersects_sphere(p, p, Vec3::new(4.0, 3.0, 4.0), 3.0));
        assert!(!box_intersects_sphere(p, p, Vec3::new(4.0, 3.0, 4.0), 2.0));

        let flat_min = Vec3::new(0.0, 0.0, 0.0);
        let flat_max = Vec3::new(8.0, 0.0, 8.0);
        assert_eq!(box_distance_squared(flat_min, flat_max, Vec3::new(4.0, 2.0, 4.0)), 4.0);
    }

    #[test]
    fn layout_rejects_bad_sizes() {
        assert!(TileLayout::new(64, 8).is_ok());
        assert!(TileLayout::new(60, 4).is_err());
        assert!(TileLayout::new(64, 6).is_err());
        assert!(TileLayout::new(8, 16).is_err());
    }

    #[test]
    fn layout_is_a_bijection() {
        let layout = TileLayout::new(32, 4).unwrap();
        let mut seen = HashSet::new();
        for y in 0..32 {
            for x in 0..32 {
                let i = layout.pixel_index(x, y);
                assert!(i < layout.len());
                assert!(seen.insert(i), "index {i} reused");
            }
        }
        assert_eq!(seen.len(), layout.len());
    }

    #[test]
    fn layout_keeps_blocks_contiguous() {
        let layout = TileLayout::new(16, 4).unwrap();
        // First block is row-major over the top-left 4x4.
        assert_eq!(layout.pixel_index(0, 0), 0);
        assert_eq!(layout.pixel_index(3, 0), 3);
        assert_eq!(layout.pixel_index(0, 1), 4);
        assert_eq!(layout.pixel_index(3, 3), 15);
        // Next block along the Morton curve is the one to the right.
        assert_eq!(layout.pixel_index(4, 0), 16);
        // Then the one below.
        assert_eq!(layout.pixel_index(0, 4), 32);
    }

    #[test]
    fn single_block_layout_is_row_major() {
        let layout = TileLayout::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(layout.pixel_index(x, y), (y * 8 + x) as usize);
            }
        }
    }
}
