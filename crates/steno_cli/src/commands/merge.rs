//! Merge command implementation.
//!
//! Each input file is read by its own producer task. Lines have the form
//! `<unix-nanos> <payload>`; blank lines and lines starting with `#` are
//! skipped. A file that cannot be read, has a malformed line, or goes back
//! in time closes its channel with an error, which aborts the whole merge.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use steno_base::{
    packet_channel, timestamp_from_unix_nanos, MergeConfig, Merger, Packet, PacketReceiver,
    PacketSender, StreamError, Verbosity,
};
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

/// Errors found while reading a packet file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line has no valid timestamp.
    #[error("{path:?} line {line}: invalid timestamp: {source}")]
    Malformed {
        /// File being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Parse failure.
        source: ParseIntError,
    },

    /// A timestamp is earlier than the one before it.
    #[error("{path:?} line {line}: timestamp {timestamp} is earlier than {previous}")]
    OutOfOrder {
        /// File being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Offending timestamp.
        timestamp: u64,
        /// Timestamp of the previous packet.
        previous: u64,
    },
}

/// Runs the merge command, writing merged packets to stdout.
pub async fn run(
    files: &[PathBuf],
    buffer: usize,
    output_buffer: usize,
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Merging {} packet files", files.len());

    let merger = Merger::new(
        MergeConfig::new()
            .with_output_buffer(output_buffer)
            .with_verbosity(verbosity),
    );
    let mut merged = merger.merge(open_inputs(files, buffer, verbosity));

    let mut out = BufWriter::new(tokio::io::stdout());
    let mut count = 0usize;
    while let Some(packet) = merged.recv().await {
        let line = format!(
            "{} {}\n",
            packet.unix_nanos().unwrap_or_default(),
            String::from_utf8_lossy(&packet.data)
        );
        if let Err(e) = out.write_all(line.as_bytes()).await {
            let _ = merged.discard();
            return Err(e.into());
        }
        count += 1;
    }
    out.flush().await?;

    if let Some(err) = merged.err() {
        return Err(err.into());
    }
    info!(packets = count, "merge complete");
    Ok(())
}

/// Starts one producer per file and returns their channels.
pub fn open_inputs(files: &[PathBuf], buffer: usize, verbosity: Verbosity) -> Vec<PacketReceiver> {
    files
        .iter()
        .map(|path| {
            let (tx, rx) = packet_channel(buffer);
            tokio::spawn(produce(path.clone(), tx));
            rx.with_verbosity(verbosity)
        })
        .collect()
}

async fn produce(path: PathBuf, tx: PacketSender) {
    match send_file(&path, &tx).await {
        Ok(sent) => {
            debug!(path = %path.display(), sent, "finished packet file");
            tx.close(None);
        }
        Err(e) => tx.close(Some(StreamError::new(e))),
    }
}

async fn send_file(path: &Path, tx: &PacketSender) -> Result<usize, InputError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut previous = 0u64;
    let mut sent = 0usize;
    for (idx, line) in contents.lines().enumerate() {
        let parsed = parse_line(line).map_err(|source| InputError::Malformed {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        let Some((timestamp, payload)) = parsed else {
            continue;
        };
        if timestamp < previous {
            return Err(InputError::OutOfOrder {
                path: path.to_path_buf(),
                line: idx + 1,
                timestamp,
                previous,
            });
        }
        previous = timestamp;

        let packet = Packet::new(payload.as_bytes().to_vec(), timestamp_from_unix_nanos(timestamp));
        if tx.send(packet).await.is_err() {
            // Merge stopped reading; nothing left to do.
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

/// Parses a packet line. Returns `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<(u64, &str)>, ParseIntError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (timestamp, payload) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    Ok(Some((timestamp.parse()?, payload.trim_start())))
}
