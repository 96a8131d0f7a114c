//! # AXI VDMA Framebuffer Driver Core
//!
//! Driver core for a fixed-mode streaming framebuffer on Xilinx Zynq. The
//! AXI VDMA engine is programmed once with an interleaved transfer that
//! re-reads the frame buffer row by row and pushes it to the display sink
//! without any per-frame CPU involvement.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Device Lifecycle               │
//! │  ┌─────────────────────────────────┐    │
//! │  │   Geometry / Format Resolver    │    │
//! │  │   (fixed 800x480 ARGB8888)      │    │
//! │  └──────────────┬──────────────────┘    │
//! │  ┌──────────────┴──────────────────┐    │
//! │  │   Coherent Frame Buffer         │    │
//! │  │   (zeroed, page aligned)        │    │
//! │  └──────────────┬──────────────────┘    │
//! │  ┌──────────────┴──────────────────┐    │
//! │  │   Interleaved Transfer Builder  │    │
//! │  │   (one chunk per row, parked)   │    │
//! │  └──────────────┬──────────────────┘    │
//! ├─────────────────┼───────────────────────┤
//! │  AXI VDMA (MM2S) │  Display Sink        │
//! │  free-running    │  (no addressing)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Channel acquisition, coherent allocation and surface registration are
//! platform services; they enter through the traits in [`hal`] so the core
//! stays independent of the hosting environment.

#![cfg_attr(not(test), no_std)]
#![allow(dead_code)]

pub mod coherent;
pub mod device;
pub mod geometry;
pub mod hal;
pub mod palette;
pub mod transfer;

pub use coherent::CoherentBuffer;
pub use device::{FbConfig, LifecycleState, VdmaFb};
pub use geometry::{ChannelLayout, SurfaceGeometry};
pub use hal::{ChannelConfig, ChannelFlags, DmaChannel, SurfaceId, SurfaceRegistry, VdmaPlatform};
pub use palette::Palette;
pub use transfer::{DataChunk, TransferDirection, TransferTemplate};

/// Platform page granularity for coherent allocations.
pub const PAGE_SIZE: usize = 4096;

/// Driver errors.
///
/// Everything except [`VdmaFbError::InvalidIndex`] is fatal on the startup
/// path: it aborts probing, rolls back whatever was already acquired and is
/// returned to the caller unretried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdmaFbError {
    /// Coherent frame buffer allocation failed (or a size computation
    /// overflowed the addressable range).
    OutOfMemory,
    /// The named DMA channel is missing or already held.
    ChannelUnavailable,
    /// The engine rejected the interleaved transfer shape.
    DescriptorPreparationFailed,
    /// The surface subsystem refused the device.
    RegistrationFailed,
    /// Palette access out of range. Recoverable; the table is unmodified.
    InvalidIndex,
}

/// Result type for driver operations.
pub type FbResult<T> = Result<T, VdmaFbError>;
