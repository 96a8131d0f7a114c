//! # Indexed-Color Palette
//!
//! Compatibility path for indexed-color drawing on top of the truecolor
//! surface: a small table mapping palette indices to packed pixel values,
//! precomputed against the resolved channel layout so blit and fill
//! helpers can write table entries straight into the frame buffer.
//!
//! The table is owned by the device instance; there is no process-wide
//! palette state.

use crate::geometry::SurfaceGeometry;
use crate::{FbResult, VdmaFbError};

/// Number of palette slots.
pub const PALETTE_SIZE: usize = 16;

/// Packed-pixel lookup table.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    entries: [u32; PALETTE_SIZE],
}

impl Palette {
    /// Create a palette with all slots black.
    pub const fn new() -> Self {
        Self {
            entries: [0; PALETTE_SIZE],
        }
    }

    /// Resolve a color into a slot.
    ///
    /// Each 16-bit component is right-shifted to its channel width, moved
    /// to the channel offset and OR-combined. When the format carries a
    /// transparency channel its bits are forced fully opaque; the caller's
    /// `transp` value is ignored in this profile.
    ///
    /// Out-of-range indices fail with [`VdmaFbError::InvalidIndex`] and
    /// leave the table untouched.
    pub fn set(
        &mut self,
        index: usize,
        red: u16,
        green: u16,
        blue: u16,
        _transp: u16,
        geometry: &SurfaceGeometry,
    ) -> FbResult<u32> {
        if index >= PALETTE_SIZE {
            return Err(VdmaFbError::InvalidIndex);
        }

        let mut value = geometry.red.pack(red)
            | geometry.green.pack(green)
            | geometry.blue.pack(blue);

        if geometry.transp.length > 0 {
            value |= geometry.transp.mask();
        }

        self.entries[index] = value;
        Ok(value)
    }

    /// Read a slot.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.entries.get(index).copied()
    }

    /// The full table, for fill/blit consumers.
    #[inline]
    pub fn entries(&self) -> &[u32; PALETTE_SIZE] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
