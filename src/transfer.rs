//! # Interleaved Transfer Builder
//!
//! Describes the 2-D frame buffer to the VDMA engine as a 1-D streaming
//! transfer: one chunk per row, `height` rows, no inter-chunk gap. The
//! source side walks the buffer with scatter-gather address increment;
//! the destination is the display sink, which takes no addresses at all.
//!
//! Submitted once in parked mode, the descriptor free-runs: the engine
//! re-reads the full frame for every output frame with no CPU involvement
//! until reconfiguration or teardown.

use log::debug;

use crate::geometry::SurfaceGeometry;
use crate::hal::{ChannelConfig, DmaChannel};
use crate::FbResult;

/// Transfer direction relative to memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Memory to device (frame buffer to display sink).
    MemToDev,
    /// Device to memory. Unused by this driver; capture engines share the
    /// template shape.
    DevToMem,
}

/// One scatter-gather chunk of an interleaved frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    /// Chunk payload in bytes.
    pub size: u32,
    /// Inter-chunk gap in bytes, inserted after the chunk on the
    /// incrementing side. Zero when rows are packed back to back.
    pub icg: u32,
}

/// Template for one interleaved DMA transfer.
///
/// Field names follow the engine's programming model: `frame_size` is the
/// number of chunks per interleaved frame, `frame_count` the number of
/// frames per descriptor execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferTemplate {
    /// Direction of the transfer.
    pub direction: TransferDirection,
    /// Source start address (device-visible).
    pub src_start: usize,
    /// Chunks per interleaved frame.
    pub frame_size: usize,
    /// Interleaved frames per execution.
    pub frame_count: u32,
    /// Source address increments across chunks.
    pub src_increment: bool,
    /// Source side uses the scatter-gather chunk list.
    pub src_scatter_gather: bool,
    /// Destination address increments across chunks.
    pub dst_increment: bool,
    /// Destination side uses the scatter-gather chunk list.
    pub dst_scatter_gather: bool,
    /// The single chunk describing one row.
    pub chunk: DataChunk,
}

impl TransferTemplate {
    /// Build the streaming template for one full frame.
    ///
    /// Each interleaved frame is one row in a single chunk; the number of
    /// frames is the row count. The sink has no per-row addressing, so the
    /// destination side is fixed with scatter-gather disabled.
    pub fn frame_stream(geometry: &SurfaceGeometry, src_start: usize) -> Self {
        let hsize = geometry.width_px * 4;

        Self {
            direction: TransferDirection::MemToDev,
            src_start,
            frame_size: 1,
            frame_count: geometry.height_px,
            src_increment: true,
            src_scatter_gather: true,
            dst_increment: false,
            dst_scatter_gather: false,
            chunk: DataChunk {
                size: hsize,
                // Rows are packed; reserve stride - hsize here if the
                // allocation ever carries padding.
                icg: 0,
            },
        }
    }
}

/// Configure the channel and start the free-running frame stream.
///
/// The full sequence, also used for reconfiguration (there is no partial
/// reconfiguration):
///
/// 1. halt any in-flight transfer — a stale descriptor must never race
///    the new one, even on first configuration where none exists yet
/// 2. apply the parked run mode
/// 3. derive the interleaved template from the geometry
/// 4. have the engine prepare a descriptor; a rejection is fatal and
///    nothing is submitted
/// 5. submit and tell the engine to issue pending work
///
/// Whether the hardware re-presents one parked descriptor tear-free is an
/// assumption inherited from the programming model, not validated here.
pub fn start_frame_stream<C: DmaChannel>(
    channel: &mut C,
    geometry: &SurfaceGeometry,
    src_start: usize,
) -> FbResult<()> {
    channel.terminate();
    channel.configure(&ChannelConfig::parked());

    let template = TransferTemplate::frame_stream(geometry, src_start);
    debug!(
        "vdma stream: src={:#x} rows={} row_bytes={}",
        template.src_start, template.frame_count, template.chunk.size
    );

    let descriptor = channel.prepare_interleaved(&template)?;
    channel.submit(descriptor);
    channel.issue_pending();

    Ok(())
}
