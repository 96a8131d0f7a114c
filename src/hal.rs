//! # Platform and Engine Interfaces
//!
//! The driver core does not talk to hardware or to the surface subsystem
//! directly. Three seams cover everything it needs from the outside:
//!
//! - [`VdmaPlatform`] — coherent memory and DMA channel ownership
//! - [`DmaChannel`] — the VDMA engine's descriptor verbs (the engine's
//!   internals are a black box; the core only shapes and hands over work)
//! - [`SurfaceRegistry`] — the generic display-surface subsystem
//!
//! Platform glue implements these against the real environment; tests
//! implement them with recording mocks.

use bitflags::bitflags;

use crate::coherent::CoherentBuffer;
use crate::geometry::SurfaceGeometry;
use crate::transfer::TransferTemplate;
use crate::FbResult;

bitflags! {
    /// VDMA channel run-mode bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelFlags: u32 {
        /// Park on the programmed frame: after the last row the engine
        /// re-presents the same descriptor instead of stopping.
        const PARK = 1 << 0;
        /// Lock frame advance to an external sync master.
        const GEN_LOCK = 1 << 1;
        /// Stop after a fixed number of frames.
        const FRAME_COUNT_EN = 1 << 2;
        /// Soft-reset the channel before applying the configuration.
        const RESET = 1 << 3;
    }
}

/// Channel configuration applied before descriptor submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Run-mode flags.
    pub flags: ChannelFlags,
    /// Frame index to park on when [`ChannelFlags::PARK`] is set.
    pub park_frame: u32,
}

impl ChannelConfig {
    /// Free-running video output: park on frame zero and keep
    /// re-presenting it.
    pub const fn parked() -> Self {
        Self {
            flags: ChannelFlags::PARK,
            park_frame: 0,
        }
    }
}

/// One acquired VDMA channel.
///
/// Prepare-then-submit-then-issue is a fixed hardware protocol; every call
/// completes synchronously from the caller's perspective and the engine
/// runs autonomously afterwards.
pub trait DmaChannel {
    /// Token for a prepared but not yet submitted descriptor.
    type Descriptor;

    /// Halt any in-flight transfer and drop its descriptors.
    fn terminate(&mut self);

    /// Apply a run-mode configuration.
    fn configure(&mut self, config: &ChannelConfig);

    /// Ask the engine to build a descriptor for an interleaved transfer.
    ///
    /// Fails with [`crate::VdmaFbError::DescriptorPreparationFailed`] when
    /// the descriptor pool is exhausted or the shape is invalid for the
    /// hardware. Nothing is submitted on failure.
    fn prepare_interleaved(&mut self, template: &TransferTemplate)
        -> FbResult<Self::Descriptor>;

    /// Queue a prepared descriptor.
    fn submit(&mut self, descriptor: Self::Descriptor);

    /// Tell the engine to start issuing queued work.
    fn issue_pending(&mut self);
}

/// Platform services backing one device instance.
///
/// Mirrors what the hosting environment provides during discovery:
/// coherent allocations and slave-channel ownership. A channel may be held
/// by at most one device; acquiring a held channel must fail cleanly with
/// [`crate::VdmaFbError::ChannelUnavailable`].
pub trait VdmaPlatform {
    /// Channel handle type produced by this platform.
    type Channel: DmaChannel;

    /// Allocate a zeroable coherent region of at least `len` bytes,
    /// rounded up to page granularity.
    fn alloc_coherent(&mut self, len: usize) -> FbResult<CoherentBuffer>;

    /// Return a coherent region. Must be called exactly once per
    /// successful allocation, and only after DMA can no longer touch it.
    fn free_coherent(&mut self, buffer: CoherentBuffer);

    /// Acquire the DMA channel registered under `name`.
    fn acquire_channel(&mut self, name: &str) -> FbResult<Self::Channel>;

    /// Release a previously acquired channel.
    fn release_channel(&mut self, channel: Self::Channel);
}

/// Opaque identifier for a registered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceId(pub usize);

/// The external display-surface subsystem.
///
/// Registration exposes the buffer to consumers (draw primitives, console
/// binding, user mappings); those paths live outside this crate. The
/// indexed-color `set_color` operation is answered by the device itself
/// through [`crate::device::VdmaFb::set_color`].
pub trait SurfaceRegistry {
    /// Register a surface over the given geometry and buffer view.
    fn register_surface(
        &mut self,
        geometry: &SurfaceGeometry,
        buffer: &CoherentBuffer,
    ) -> FbResult<SurfaceId>;

    /// Remove a previously registered surface.
    fn unregister_surface(&mut self, id: SurfaceId);
}
