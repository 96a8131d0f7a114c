//! # Coherent Frame Buffer
//!
//! The frame buffer lives in a physically contiguous, CPU/DMA-coherent
//! region: the VDMA engine reads it with the physical address while
//! software draws through the CPU mapping, with no cache maintenance in
//! between. Allocation and release belong to the platform (see
//! [`crate::hal::VdmaPlatform`]); this module only carries the handle and
//! the volatile access rules.
//!
//! Software writes and in-flight DMA reads are deliberately unsynchronized.
//! A frame updated mid-scanout may tear; that is the documented trade-off
//! of the free-running design, not a bug.

use core::ptr;

use crate::PAGE_SIZE;

/// Round a byte count up to the platform page granularity.
#[inline]
pub const fn page_align(len: usize) -> usize {
    (len + PAGE_SIZE - 1) & !(PAGE_SIZE - 1)
}

/// Handle to one coherent memory region.
///
/// Owned exclusively by the device instance. Created during acquisition,
/// zero-filled before first use, and handed back to the platform only
/// after the DMA channel has been torn down — the engine must never be
/// left able to read freed memory.
#[derive(Debug)]
pub struct CoherentBuffer {
    phys_addr: usize,
    ptr: *mut u8,
    len: usize,
}

impl CoherentBuffer {
    /// Wrap an allocated coherent region.
    ///
    /// # Safety
    /// `ptr` must be a valid CPU mapping of `len` bytes backing the
    /// device-visible region at `phys_addr`, and must stay valid until the
    /// buffer is passed back to the allocating platform.
    pub const unsafe fn from_raw_parts(phys_addr: usize, ptr: *mut u8, len: usize) -> Self {
        Self {
            phys_addr,
            ptr,
            len,
        }
    }

    /// Device-visible physical address.
    #[inline]
    pub const fn phys_addr(&self) -> usize {
        self.phys_addr
    }

    /// CPU mapping of the region.
    #[inline]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Region length in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zero the whole region through the CPU mapping.
    ///
    /// Volatile word stores: device memory, the compiler must not elide
    /// or reorder them.
    pub fn zero_fill(&mut self) {
        let words = self.len / 4;
        let word_ptr = self.ptr as *mut u32;
        for i in 0..words {
            unsafe { ptr::write_volatile(word_ptr.add(i), 0) };
        }
        // Tail bytes for lengths that are not word multiples
        for i in words * 4..self.len {
            unsafe { ptr::write_volatile(self.ptr.add(i), 0) };
        }
    }

    /// Write one packed pixel at a byte offset.
    ///
    /// Returns false if the write would fall outside the region.
    #[inline]
    pub fn write_pixel(&mut self, byte_offset: usize, value: u32) -> bool {
        if byte_offset % 4 != 0 || byte_offset + 4 > self.len {
            return false;
        }
        unsafe {
            ptr::write_volatile(self.ptr.add(byte_offset) as *mut u32, value);
        }
        true
    }

    /// Read one packed pixel at a byte offset.
    #[inline]
    pub fn read_pixel(&self, byte_offset: usize) -> Option<u32> {
        if byte_offset % 4 != 0 || byte_offset + 4 > self.len {
            return None;
        }
        Some(unsafe { ptr::read_volatile(self.ptr.add(byte_offset) as *const u32) })
    }
}
