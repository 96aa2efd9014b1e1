//! Benchmark utilities.

use rand::Rng;
use steno_base::{packet_channel, timestamp_from_unix_nanos, Packet, PacketReceiver};

/// Generate `count` ascending timestamps with random gaps.
pub fn sorted_timestamps(count: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    let mut now = 0u64;
    (0..count)
        .map(|_| {
            now += rng.gen_range(0..1_000);
            now
        })
        .collect()
}

/// Generate a sorted position list with roughly `count` entries.
pub fn sorted_positions(count: usize, max: i64) -> Vec<i64> {
    let mut rng = rand::thread_rng();
    let mut positions: Vec<i64> = (0..count).map(|_| rng.gen_range(0..max)).collect();
    steno_base::positions::sort(&mut positions);
    positions
}

/// Spawn a producer streaming one small packet per timestamp.
///
/// Must be called inside a Tokio runtime.
pub fn spawn_stream(timestamps: Vec<u64>, buffer: usize) -> PacketReceiver {
    let (tx, rx) = packet_channel(buffer);
    tokio::spawn(async move {
        for ts in timestamps {
            let packet = Packet::new(vec![0u8; 64], timestamp_from_unix_nanos(ts));
            if tx.send(packet).await.is_err() {
                return;
            }
        }
        tx.close(None);
    });
    rx
}
