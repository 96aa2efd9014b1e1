//! Error types for packet channels and merges.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Terminal error attached to a packet stream when it is closed.
///
/// A stream that ends with one of these delivered fewer packets than its
/// producer intended. The merge engine forwards the first one it sees
/// verbatim, so the value is cheaply clonable and compares by content
/// through its `Display` form.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// The sending half was dropped without an explicit close.
    #[error("producer dropped the channel without closing it")]
    ProducerDropped,

    /// A merge was started outside a Tokio runtime.
    #[error("no Tokio runtime available to run the merge")]
    NoRuntime,

    /// Plain-text failure reported by a producer.
    #[error("{0}")]
    Message(String),

    /// Arbitrary error reported by a producer.
    #[error(transparent)]
    Source(Arc<dyn StdError + Send + Sync + 'static>),
}

impl StreamError {
    /// Creates a stream error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an arbitrary error as a stream error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Source(Arc::new(error))
    }
}

impl From<std::io::Error> for StreamError {
    fn from(error: std::io::Error) -> Self {
        Self::new(error)
    }
}

/// Errors returned to a producer while sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The receiving half is gone; nothing will read further packets.
    #[error("packet receiver dropped")]
    ReceiverDropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_display() {
        assert_eq!(
            StreamError::msg("capture file truncated").to_string(),
            "capture file truncated"
        );
        assert_eq!(
            StreamError::ProducerDropped.to_string(),
            "producer dropped the channel without closing it"
        );
    }

    #[test]
    fn source_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = StreamError::from(io);
        assert_eq!(err.to_string(), "short read");

        let cloned = err.clone();
        match (err, cloned) {
            (StreamError::Source(a), StreamError::Source(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("unexpected variants: {other:?}"),
        }
    }

    #[test]
    fn channel_error_display() {
        assert_eq!(
            ChannelError::ReceiverDropped.to_string(),
            "packet receiver dropped"
        );
    }
}
