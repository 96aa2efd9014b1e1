//! Ordered packet channels.
//!
//! A packet channel connects one producer to one consumer. It carries two
//! separate signals:
//!
//! - a bounded FIFO stream of packets, and
//! - a single terminal outcome, set when the producer closes the channel.
//!
//! The outcome is stored before the packet stream ends, so once
//! [`PacketReceiver::recv`] has returned `None` the value reported by
//! [`PacketReceiver::err`] is authoritative. Reading it earlier is allowed
//! and returns `None` while the producer is still running.
//!
//! # Example
//!
//! ```
//! use steno_base::{packet_channel, timestamp_from_unix_nanos, Packet};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let (tx, mut rx) = packet_channel(4);
//! tx.send(Packet::new(vec![1, 2, 3], timestamp_from_unix_nanos(10)))
//!     .await
//!     .unwrap();
//! tx.close(None);
//!
//! assert!(rx.recv().await.is_some());
//! assert!(rx.recv().await.is_none());
//! assert!(rx.err().is_none());
//! # });
//! ```

use crate::config::Verbosity;
use crate::error::{ChannelError, ChannelResult, StreamError};
use crate::packet::Packet;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug)]
enum Outcome {
    Open,
    Closed(Option<StreamError>),
}

#[derive(Debug)]
struct Shared {
    outcome: Mutex<Outcome>,
}

impl Shared {
    fn finish(&self, err: Option<StreamError>) {
        let mut outcome = self.outcome.lock();
        debug_assert!(
            matches!(*outcome, Outcome::Open),
            "packet channel closed twice"
        );
        *outcome = Outcome::Closed(err);
    }
}

/// Creates a packet channel that queues up to `buffer` packets.
///
/// With `buffer == 0` every send is a synchronous handoff: it completes only
/// after the consumer has taken the packet.
pub fn packet_channel(buffer: usize) -> (PacketSender, PacketReceiver) {
    let shared = Arc::new(Shared {
        outcome: Mutex::new(Outcome::Open),
    });
    // Tokio needs at least one slot; the handoff makes zero-capacity
    // channels wait for the consumer anyway.
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let (received, taken) = if buffer == 0 {
        let (received, taken) = watch::channel(0u64);
        (Some(received), Some(taken))
    } else {
        (None, None)
    };

    let sender = PacketSender {
        tx: Some(tx),
        shared: Arc::clone(&shared),
        queued: AtomicU64::new(0),
        taken,
    };
    let receiver = PacketReceiver {
        rx,
        shared,
        received,
        verbosity: Verbosity::QUIET,
    };
    (sender, receiver)
}

/// Producing half of a packet channel.
///
/// Closing consumes the sender, so a channel is closed exactly once and
/// nothing can be sent afterwards. Dropping a sender without closing it
/// ends the stream with [`StreamError::ProducerDropped`].
#[derive(Debug)]
pub struct PacketSender {
    tx: Option<mpsc::Sender<Packet>>,
    shared: Arc<Shared>,
    /// Packets queued so far; the sequence number of the latest one.
    queued: AtomicU64,
    /// Zero-capacity only: number of packets the consumer has taken.
    taken: Option<watch::Receiver<u64>>,
}

impl PacketSender {
    /// Sends a packet, waiting while the channel is full.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ReceiverDropped`] if the receiving half has
    /// been dropped. The packet is lost in that case.
    pub async fn send(&self, packet: Packet) -> ChannelResult<()> {
        let tx = self.tx.as_ref().ok_or(ChannelError::ReceiverDropped)?;
        tx.send(packet)
            .await
            .map_err(|_| ChannelError::ReceiverDropped)?;

        let seq = self.queued.fetch_add(1, Ordering::SeqCst) + 1;

        // Done once the consumer has taken packet `seq`, counting packets
        // left queued by cancelled sends.
        if let Some(taken) = &self.taken {
            let mut taken = taken.clone();
            taken
                .wait_for(|&count| count >= seq)
                .await
                .map_err(|_| ChannelError::ReceiverDropped)?;
        }
        Ok(())
    }

    /// Returns true once the receiving half is gone.
    pub fn is_receiver_dropped(&self) -> bool {
        self.tx.as_ref().map_or(true, mpsc::Sender::is_closed)
    }

    /// Closes the channel, recording `err` as its terminal outcome.
    ///
    /// Packets already queued are still delivered; the consumer sees the
    /// end of the stream after the last of them.
    pub fn close(mut self, err: Option<StreamError>) {
        if let Some(tx) = self.tx.take() {
            self.shared.finish(err);
            drop(tx);
        }
    }
}

impl Drop for PacketSender {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            self.shared.finish(Some(StreamError::ProducerDropped));
            drop(tx);
        }
    }
}

/// Consuming half of a packet channel.
///
/// A consumer that stops reading before the end of the stream should call
/// [`discard`](Self::discard) so the producer is never left blocked on a
/// full queue.
#[derive(Debug)]
pub struct PacketReceiver {
    rx: mpsc::Receiver<Packet>,
    shared: Arc<Shared>,
    /// Zero-capacity only: bumped once per received packet.
    received: Option<watch::Sender<u64>>,
    verbosity: Verbosity,
}

impl PacketReceiver {
    /// Sets the diagnostic threshold used by [`discard`](Self::discard).
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Returns the diagnostic threshold.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Receives the next packet, or `None` once the channel is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<Packet> {
        let packet = self.rx.recv().await;
        if packet.is_some() {
            if let Some(received) = &self.received {
                received.send_modify(|count| *count += 1);
            }
        }
        packet
    }

    /// Returns the terminal error, if the channel was closed with one.
    ///
    /// `None` before the end of the stream only means no error has been
    /// reported yet.
    pub fn err(&self) -> Option<StreamError> {
        match &*self.shared.outcome.lock() {
            Outcome::Open => None,
            Outcome::Closed(err) => err.clone(),
        }
    }

    /// Returns true once the producer has closed (or dropped) its half.
    pub fn is_closed(&self) -> bool {
        matches!(*self.shared.outcome.lock(), Outcome::Closed(_))
    }

    /// Reads every remaining packet and returns them with the terminal error.
    pub async fn read_all(mut self) -> (Vec<Packet>, Option<StreamError>) {
        let mut packets = Vec::new();
        while let Some(packet) = self.recv().await {
            packets.push(packet);
        }
        let err = self.err();
        (packets, err)
    }

    /// Drops every remaining packet in a background task.
    ///
    /// The task ends when the producer closes the channel and yields the
    /// number of packets it threw away. Outside a Tokio runtime no task can
    /// be spawned; the receiver is dropped instead, which fails the
    /// producer's pending and future sends rather than blocking them.
    pub fn discard(mut self) -> Option<JoinHandle<usize>> {
        let handle = Handle::try_current().ok()?;
        let verbosity = self.verbosity;
        Some(handle.spawn(async move {
            let mut discarded = 0usize;
            while self.recv().await.is_some() {
                discarded += 1;
            }
            if discarded > 0 && verbosity.enabled(2) {
                trace!(discarded, "discarded packets");
            }
            discarded
        }))
    }
}
