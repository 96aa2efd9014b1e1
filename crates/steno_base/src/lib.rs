//! # Steno Base
//!
//! Shared building blocks for packet capture readers.
//!
//! This crate provides:
//! - Ordered packet channels with a single terminal error
//! - Background discarding of abandoned channels
//! - K-way merge of time-ordered channels into one
//! - Union and intersection of sorted position lists
//!
//! ## Key Invariants
//!
//! - Each channel is FIFO and is closed exactly once
//! - A channel's terminal error is authoritative once its stream has ended
//! - The merged stream is non-decreasing in capture time when every input is
//! - The first input error ends a merge and is surfaced verbatim
//! - Every merge input is drained on every exit path, so producers never leak

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod config;
mod error;
mod heap;
mod merge;
mod packet;
pub mod positions;

pub use channel::{packet_channel, PacketReceiver, PacketSender};
pub use config::{MergeConfig, Verbosity, DEFAULT_MERGE_BUFFER};
pub use error::{ChannelError, ChannelResult, StreamError};
pub use merge::{merge_packet_chans, Merger};
pub use packet::{timestamp_from_unix_nanos, CaptureInfo, Packet};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
