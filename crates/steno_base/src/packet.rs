//! Captured packets and their metadata.

use bytes::Bytes;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Metadata describing when and how a packet was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureInfo {
    /// Capture time. Streams are ordered by this field.
    pub timestamp: SystemTime,
    /// Number of bytes actually captured.
    pub capture_length: usize,
    /// Original length of the packet on the wire.
    pub length: usize,
    /// Index of the interface the packet was captured on.
    pub interface_index: usize,
}

impl CaptureInfo {
    /// Creates capture metadata for a fully captured packet of `length` bytes.
    pub fn new(timestamp: SystemTime, length: usize) -> Self {
        Self {
            timestamp,
            capture_length: length,
            length,
            interface_index: 0,
        }
    }
}

/// A single packet with its metadata.
///
/// The payload is reference counted; cloning a packet never copies or
/// mutates the captured bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// The bytes that make up the packet.
    pub data: Bytes,
    /// Metadata about when and how the packet was captured.
    pub info: CaptureInfo,
}

impl Packet {
    /// Creates a packet whose lengths are taken from the payload.
    pub fn new(data: impl Into<Bytes>, timestamp: SystemTime) -> Self {
        let data = data.into();
        let info = CaptureInfo::new(timestamp, data.len());
        Self { data, info }
    }

    /// Creates a packet with explicit capture metadata.
    pub fn with_info(data: impl Into<Bytes>, info: CaptureInfo) -> Self {
        Self {
            data: data.into(),
            info,
        }
    }

    /// Returns the capture timestamp.
    pub fn timestamp(&self) -> SystemTime {
        self.info.timestamp
    }

    /// Returns the capture timestamp as nanoseconds since the Unix epoch,
    /// or `None` for timestamps before the epoch.
    pub fn unix_nanos(&self) -> Option<u128> {
        self.info
            .timestamp
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_nanos())
    }
}

/// Converts nanoseconds since the Unix epoch to a timestamp.
pub fn timestamp_from_unix_nanos(nanos: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_follow_payload() {
        let packet = Packet::new(vec![1u8, 2, 3], timestamp_from_unix_nanos(5));
        assert_eq!(packet.info.capture_length, 3);
        assert_eq!(packet.info.length, 3);
        assert_eq!(packet.unix_nanos(), Some(5));
    }

    #[test]
    fn explicit_info_is_kept() {
        let info = CaptureInfo {
            timestamp: timestamp_from_unix_nanos(1_000),
            capture_length: 64,
            length: 1500,
            interface_index: 2,
        };
        let packet = Packet::with_info(Bytes::from_static(&[0u8; 64]), info);
        assert_eq!(packet.info, info);
        assert_eq!(packet.timestamp(), timestamp_from_unix_nanos(1_000));
    }

    #[test]
    fn pre_epoch_has_no_nanos() {
        let before = UNIX_EPOCH - Duration::from_secs(1);
        let packet = Packet::new(Bytes::new(), before);
        assert_eq!(packet.unix_nanos(), None);
    }

    #[test]
    fn clone_shares_payload() {
        let packet = Packet::new(vec![9u8; 32], timestamp_from_unix_nanos(0));
        let copy = packet.clone();
        assert_eq!(packet.data.as_ptr(), copy.data.as_ptr());
    }
}
