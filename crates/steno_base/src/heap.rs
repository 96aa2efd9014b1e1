//! Min-heap of pending packets used by the merge engine.

use crate::packet::Packet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A packet tagged with the index of the input it came from.
#[derive(Debug, Clone)]
pub(crate) struct IndexedPacket {
    pub(crate) packet: Packet,
    pub(crate) source: usize,
}

impl PartialEq for IndexedPacket {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexedPacket {}

impl Ord for IndexedPacket {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest packet. Equal timestamps
        // pop the lowest source index first.
        other
            .packet
            .timestamp()
            .cmp(&self.packet.timestamp())
            .then_with(|| other.source.cmp(&self.source))
    }
}

impl PartialOrd for IndexedPacket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of pending packets keyed by capture time.
///
/// Holds at most one packet per still-active input.
#[derive(Debug, Default)]
pub(crate) struct PacketHeap {
    heap: BinaryHeap<IndexedPacket>,
}

impl PacketHeap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, packet: Packet, source: usize) {
        self.heap.push(IndexedPacket { packet, source });
    }

    /// Removes the earliest pending packet.
    pub(crate) fn pop(&mut self) -> Option<IndexedPacket> {
        self.heap.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::timestamp_from_unix_nanos;

    fn packet(ts: u64) -> Packet {
        Packet::new(Vec::new(), timestamp_from_unix_nanos(ts))
    }

    #[test]
    fn pops_earliest_first() {
        let mut heap = PacketHeap::with_capacity(3);
        heap.push(packet(30), 0);
        heap.push(packet(10), 1);
        heap.push(packet(20), 2);
        assert_eq!(heap.len(), 3);

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop())
            .map(|p| p.source)
            .collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn ties_pop_lowest_source_first() {
        let mut heap = PacketHeap::default();
        heap.push(packet(5), 2);
        heap.push(packet(5), 0);
        heap.push(packet(5), 1);

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop())
            .map(|p| p.source)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
