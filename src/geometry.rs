//! # Surface Geometry and Pixel Format
//!
//! Resolves the fixed display mode into an immutable surface descriptor.
//! There is no mode negotiation: the panel timing and the packed 32-bit
//! truecolor layout are fixed at build time, the resolver only derives the
//! byte-level quantities and performs defensive overflow checks.
//!
//! Pixel layout (ARGB8888):
//!
//! ```text
//! bit 31          24 23          16 15           8 7            0
//!    ┌──────────────┬──────────────┬──────────────┬──────────────┐
//!    │  transparency│     red      │    green     │     blue     │
//!    └──────────────┴──────────────┴──────────────┴──────────────┘
//! ```

use static_assertions::const_assert;

use crate::{FbResult, VdmaFbError};

/// Fixed panel width in pixels.
pub const WIDTH: u32 = 800;

/// Fixed panel height in pixels.
pub const HEIGHT: u32 = 480;

/// Fixed color depth in bits per pixel.
pub const BITS_PER_PIXEL: u32 = 32;

/// Panel pixel clock in kHz.
pub const PIXEL_CLOCK_KHZ: u32 = 33_260;

// The interleaved transfer math below assumes whole bytes per pixel.
const_assert!(BITS_PER_PIXEL % 8 == 0);
const_assert!(WIDTH > 0 && HEIGHT > 0);

/// Pixel clock period in picoseconds for a rate in kHz.
#[inline]
pub const fn khz_to_picos(khz: u32) -> u32 {
    1_000_000_000 / khz
}

/// Bit position and width of one color channel inside a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    /// Bit offset of the channel's least significant bit.
    pub offset: u32,
    /// Channel width in bits. Zero means the channel is absent.
    pub length: u32,
}

impl ChannelLayout {
    /// Create a channel layout.
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Channel mask shifted into position.
    #[inline]
    pub const fn mask(&self) -> u32 {
        if self.length == 0 {
            0
        } else {
            ((1u32 << self.length) - 1) << self.offset
        }
    }

    /// Pack a 16-bit component into this channel's position.
    ///
    /// The component is right-shifted to the channel width first, so a
    /// full-scale 16-bit input maps to a full-scale channel value.
    #[inline]
    pub const fn pack(&self, component: u16) -> u32 {
        if self.length == 0 {
            0
        } else {
            ((component >> (16 - self.length)) as u32) << self.offset
        }
    }

    /// Extract this channel's raw bits from a packed pixel.
    #[inline]
    pub const fn extract(&self, pixel: u32) -> u32 {
        if self.length == 0 {
            0
        } else {
            (pixel >> self.offset) & ((1u32 << self.length) - 1)
        }
    }
}

/// Immutable description of the streamed surface.
///
/// Derived once by [`SurfaceGeometry::resolve`] and never mutated
/// afterwards. Invariants:
///
/// - `offset + length <= bits_per_pixel` for every channel, channels do
///   not overlap
/// - `stride_bytes == width_px * bytes_per_pixel`
/// - `total_bytes == stride_bytes * height_px`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceGeometry {
    /// Visible width in pixels.
    pub width_px: u32,
    /// Visible height in pixels.
    pub height_px: u32,
    /// Color depth in bits per pixel.
    pub bits_per_pixel: u32,
    /// Red channel position.
    pub red: ChannelLayout,
    /// Green channel position.
    pub green: ChannelLayout,
    /// Blue channel position.
    pub blue: ChannelLayout,
    /// Transparency channel position.
    pub transp: ChannelLayout,
    /// Bytes per scanline.
    pub stride_bytes: usize,
    /// Total frame buffer size in bytes.
    pub total_bytes: usize,
    /// Pixel clock period in picoseconds.
    pub pixel_clock_ps: u32,
}

impl SurfaceGeometry {
    /// Derive the fixed display geometry.
    ///
    /// Fails only if the size computation would overflow the addressable
    /// range, which cannot happen for the built-in mode; the check guards
    /// against bad edits to the constants above.
    pub fn resolve() -> FbResult<Self> {
        Self::with_mode(WIDTH, HEIGHT)
    }

    /// Derive the geometry for an explicit resolution.
    ///
    /// Keeps the fixed ARGB8888 packing; only the pixel counts vary.
    pub fn with_mode(width_px: u32, height_px: u32) -> FbResult<Self> {
        let bytes_per_pixel = (BITS_PER_PIXEL / 8) as usize;

        let stride_bytes = (width_px as usize)
            .checked_mul(bytes_per_pixel)
            .ok_or(VdmaFbError::OutOfMemory)?;
        let total_bytes = stride_bytes
            .checked_mul(height_px as usize)
            .ok_or(VdmaFbError::OutOfMemory)?;

        Ok(Self {
            width_px,
            height_px,
            bits_per_pixel: BITS_PER_PIXEL,
            transp: ChannelLayout::new(24, 8),
            red: ChannelLayout::new(16, 8),
            green: ChannelLayout::new(8, 8),
            blue: ChannelLayout::new(0, 8),
            stride_bytes,
            total_bytes,
            pixel_clock_ps: khz_to_picos(PIXEL_CLOCK_KHZ),
        })
    }

    /// Bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mode_sizes() {
        let geo = SurfaceGeometry::resolve().unwrap();
        assert_eq!(geo.width_px, 800);
        assert_eq!(geo.height_px, 480);
        assert_eq!(geo.bits_per_pixel, 32);
        assert_eq!(geo.stride_bytes, 800 * 4);
        assert_eq!(geo.total_bytes, 800 * 4 * 480);
        assert_eq!(geo.total_bytes, 1_536_000);
    }

    #[test]
    fn test_stride_and_total_identities() {
        for (w, h) in [(1, 1), (320, 240), (800, 480), (1920, 1080)] {
            let geo = SurfaceGeometry::with_mode(w, h).unwrap();
            assert_eq!(geo.stride_bytes, w as usize * geo.bytes_per_pixel());
            assert_eq!(geo.total_bytes, geo.stride_bytes * h as usize);
        }
    }

    #[test]
    fn test_channel_layout_fixed() {
        let geo = SurfaceGeometry::resolve().unwrap();
        assert_eq!(geo.transp, ChannelLayout::new(24, 8));
        assert_eq!(geo.red, ChannelLayout::new(16, 8));
        assert_eq!(geo.green, ChannelLayout::new(8, 8));
        assert_eq!(geo.blue, ChannelLayout::new(0, 8));
    }

    #[test]
    fn test_channels_within_depth_and_disjoint() {
        let geo = SurfaceGeometry::resolve().unwrap();
        let channels = [geo.red, geo.green, geo.blue, geo.transp];

        for ch in channels {
            assert!(ch.offset + ch.length <= geo.bits_per_pixel);
        }

        // Pairwise disjoint masks
        for (i, a) in channels.iter().enumerate() {
            for b in &channels[i + 1..] {
                assert_eq!(a.mask() & b.mask(), 0);
            }
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            SurfaceGeometry::with_mode(u32::MAX, u32::MAX),
            Err(VdmaFbError::OutOfMemory)
        );
    }

    #[test]
    fn test_channel_pack_extract() {
        let ch = ChannelLayout::new(16, 8);
        let packed = ch.pack(0xABCD);
        assert_eq!(packed, 0x00AB_0000);
        assert_eq!(ch.extract(packed), 0xAB);

        // Absent channel packs to nothing
        let none = ChannelLayout::new(0, 0);
        assert_eq!(none.pack(0xFFFF), 0);
        assert_eq!(none.mask(), 0);
    }

    #[test]
    fn test_pixel_clock() {
        let geo = SurfaceGeometry::resolve().unwrap();
        assert_eq!(geo.pixel_clock_ps, 1_000_000_000 / 33_260);
    }
}
