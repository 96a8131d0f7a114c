//! # Device Lifecycle
//!
//! Orchestrates one framebuffer device from discovery to removal. Startup
//! is a straight line:
//!
//! ```text
//! resolve geometry → allocate buffer → acquire channel
//!                  → start stream    → register surface
//! ```
//!
//! Every transition runs exactly once. A failure rolls back each completed
//! transition in reverse order and returns the originating error; nothing
//! is retried. Removal runs the same reverse sequence unconditionally.
//!
//! Hard invariant: the coherent buffer is never handed back while the
//! channel is still held — the engine must not be able to read freed
//! memory.

use log::{debug, error, info};

use crate::coherent::CoherentBuffer;
use crate::geometry::SurfaceGeometry;
use crate::hal::{DmaChannel, SurfaceId, SurfaceRegistry, VdmaPlatform};
use crate::palette::Palette;
use crate::transfer::start_frame_stream;
use crate::FbResult;

/// Devicetree compatible string the device is discovered under.
pub const COMPATIBLE: &str = "topic,vdma-fb";

/// Identification string reported to the surface subsystem.
pub const SURFACE_ID: &str = "vdma-fb";

/// Static discovery configuration.
///
/// The only negotiated parameter is the logical name of the DMA channel;
/// resolution and format are fixed by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbConfig {
    /// Logical name of the MM2S channel to acquire.
    pub channel_name: &'static str,
}

impl Default for FbConfig {
    fn default() -> Self {
        Self {
            channel_name: "axivdma",
        }
    }
}

/// Startup progress of a device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing acquired.
    Unconfigured,
    /// Surface descriptor derived.
    GeometryResolved,
    /// Coherent buffer owned and zeroed.
    BufferAllocated,
    /// DMA channel owned.
    ChannelAcquired,
    /// Free-running transfer submitted.
    TransferSubmitted,
    /// Surface registered; the device is live.
    Active,
}

/// One live framebuffer device.
///
/// Exists only in the [`LifecycleState::Active`] state: [`VdmaFb::probe`]
/// either returns a fully started device or nothing. At most one instance
/// may hold a given hardware channel.
#[derive(Debug)]
pub struct VdmaFb<C: DmaChannel> {
    geometry: SurfaceGeometry,
    buffer: CoherentBuffer,
    channel: C,
    palette: Palette,
    surface: SurfaceId,
    state: LifecycleState,
}

impl<C: DmaChannel> VdmaFb<C> {
    /// Bring up the device.
    ///
    /// Acquisition order is geometry → buffer → channel → transfer →
    /// surface registration; any failure unwinds the completed steps in
    /// reverse before returning the original error.
    pub fn probe<P, R>(platform: &mut P, registry: &mut R, config: &FbConfig) -> FbResult<Self>
    where
        P: VdmaPlatform<Channel = C>,
        R: SurfaceRegistry,
    {
        let geometry = SurfaceGeometry::resolve()?;

        let mut buffer = match platform.alloc_coherent(geometry.total_bytes) {
            Ok(buffer) => buffer,
            Err(err) => {
                error!("vdma-fb: frame buffer allocation failed");
                return Err(err);
            }
        };
        buffer.zero_fill();
        debug!(
            "vdma-fb: buffer virt={:p} phys={:#x} size={}",
            buffer.as_ptr(),
            buffer.phys_addr(),
            buffer.len()
        );

        let mut channel = match platform.acquire_channel(config.channel_name) {
            Ok(channel) => channel,
            Err(err) => {
                error!("vdma-fb: failed to acquire channel '{}'", config.channel_name);
                platform.free_coherent(buffer);
                return Err(err);
            }
        };

        if let Err(err) = start_frame_stream(&mut channel, &geometry, buffer.phys_addr()) {
            error!("vdma-fb: failed to prepare streaming descriptor");
            platform.release_channel(channel);
            platform.free_coherent(buffer);
            return Err(err);
        }

        let surface = match registry.register_surface(&geometry, &buffer) {
            Ok(surface) => surface,
            Err(err) => {
                error!("vdma-fb: surface registration failed");
                channel.terminate();
                platform.release_channel(channel);
                platform.free_coherent(buffer);
                return Err(err);
            }
        };

        info!(
            "vdma-fb: active, {}x{}x{}bpp streaming from {:#x}",
            geometry.width_px,
            geometry.height_px,
            geometry.bits_per_pixel,
            buffer.phys_addr()
        );

        Ok(Self {
            geometry,
            buffer,
            channel,
            palette: Palette::new(),
            surface,
            state: LifecycleState::Active,
        })
    }

    /// Tear the device down.
    ///
    /// Unregister the surface, halt and release the channel, then free the
    /// buffer — strictly in that order.
    pub fn remove<P, R>(mut self, platform: &mut P, registry: &mut R)
    where
        P: VdmaPlatform<Channel = C>,
        R: SurfaceRegistry,
    {
        registry.unregister_surface(self.surface);
        self.channel.terminate();
        platform.release_channel(self.channel);
        platform.free_coherent(self.buffer);
        info!("vdma-fb: removed");
    }

    /// Rebuild and resubmit the streaming descriptor.
    ///
    /// Runs the full halt/configure/prepare/submit sequence; there is no
    /// partial reconfiguration. On failure the old descriptor is already
    /// halted and the engine idles until the next successful call.
    pub fn restart_stream(&mut self) -> FbResult<()> {
        start_frame_stream(&mut self.channel, &self.geometry, self.buffer.phys_addr())
    }

    /// Resolve an indexed color against the live format.
    ///
    /// Serves the surface subsystem's `set_color` operation. Invalid
    /// indices are rejected locally and leave the device untouched.
    pub fn set_color(
        &mut self,
        index: usize,
        red: u16,
        green: u16,
        blue: u16,
        transp: u16,
    ) -> FbResult<u32> {
        self.palette
            .set(index, red, green, blue, transp, &self.geometry)
    }

    /// The resolved surface descriptor.
    #[inline]
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// The frame buffer.
    #[inline]
    pub fn buffer(&self) -> &CoherentBuffer {
        &self.buffer
    }

    /// Mutable frame buffer access for draw paths.
    ///
    /// Writes race the free-running DMA reads by design; a frame updated
    /// mid-scanout may tear.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut CoherentBuffer {
        &mut self.buffer
    }

    /// The palette table.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Registered surface identifier.
    #[inline]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}
