//! K-way merge of time-ordered packet channels.
//!
//! Every input channel must deliver packets in non-decreasing timestamp
//! order; this is trusted, not checked. The merge keeps one pending packet
//! per input in a min-heap and repeatedly forwards the earliest one, so the
//! merged channel is non-decreasing as well.
//!
//! The first terminal error seen on any input stops the merge at once and
//! becomes the terminal error of the merged channel. Packets forwarded
//! before that point stay delivered. Whatever the reason the merge stops,
//! every input is discarded so no producer is left blocked.
//!
//! Packets with equal timestamps from different inputs are emitted in
//! ascending input index order.

use crate::channel::{packet_channel, PacketReceiver, PacketSender};
use crate::config::{MergeConfig, Verbosity};
use crate::error::StreamError;
use crate::heap::{IndexedPacket, PacketHeap};
use tokio::runtime::Handle;
use tracing::debug;

/// Merges time-ordered packet channels into one.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    /// Creates a merger with the given configuration.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merges `inputs` into a single channel ordered by capture time.
    ///
    /// The merge runs in a spawned task and ends when every input is
    /// exhausted, when any input reports an error, or when the returned
    /// receiver is dropped.
    ///
    /// Outside a Tokio runtime nothing can be spawned: the inputs are
    /// dropped, releasing their producers, and the returned channel is
    /// already closed with [`StreamError::NoRuntime`].
    pub fn merge(&self, inputs: Vec<PacketReceiver>) -> PacketReceiver {
        let (out, merged) = packet_channel(self.config.output_buffer);
        let verbosity = self.config.verbosity;
        let sources = Sources { inputs };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(coordinate(sources, out, verbosity));
            }
            Err(_) => {
                drop(sources);
                out.close(Some(StreamError::NoRuntime));
            }
        }
        merged.with_verbosity(verbosity)
    }
}

/// Merges `inputs` with the default configuration.
pub fn merge_packet_chans(inputs: Vec<PacketReceiver>) -> PacketReceiver {
    Merger::default().merge(inputs)
}

/// Why the merge loop stopped early.
enum Stop {
    Input(StreamError),
    OutputDropped,
}

/// Input channels owned by the merge task; discarded on every exit path.
struct Sources {
    inputs: Vec<PacketReceiver>,
}

impl Drop for Sources {
    fn drop(&mut self) {
        for input in self.inputs.drain(..) {
            // A missing runtime drops the receiver, which releases the
            // producer just as well.
            let _ = input.discard();
        }
    }
}

async fn coordinate(mut sources: Sources, out: PacketSender, verbosity: Verbosity) {
    let mut merged = 0usize;
    let result = merge_sources(&mut sources.inputs, &out, &mut merged).await;

    if verbosity.enabled(1) {
        debug!(
            streams = sources.inputs.len(),
            packets = merged,
            "merged packet streams"
        );
    }

    match result {
        Ok(()) => out.close(None),
        Err(Stop::Input(err)) => out.close(Some(err)),
        Err(Stop::OutputDropped) => {
            if verbosity.enabled(1) {
                debug!("merged receiver dropped, abandoning inputs");
            }
        }
    }
}

async fn merge_sources(
    inputs: &mut [PacketReceiver],
    out: &PacketSender,
    merged: &mut usize,
) -> Result<(), Stop> {
    let streams = inputs.len();
    let mut heap = PacketHeap::with_capacity(streams);

    for (source, input) in inputs.iter_mut().enumerate() {
        if let Some(packet) = input.recv().await {
            heap.push(packet, source);
        }
        if let Some(err) = input.err() {
            return Err(Stop::Input(err));
        }
    }

    while let Some(IndexedPacket { packet, source }) = heap.pop() {
        *merged += 1;
        let input = &mut inputs[source];
        if let Some(next) = input.recv().await {
            heap.push(next, source);
        }
        debug_assert!(heap.len() <= streams);

        out.send(packet).await.map_err(|_| Stop::OutputDropped)?;

        if let Some(err) = input.err() {
            return Err(Stop::Input(err));
        }
    }
    Ok(())
}
