//! Merge configuration and diagnostic verbosity.

/// Default capacity of a merged output channel.
pub const DEFAULT_MERGE_BUFFER: usize = 100;

/// Verbosity threshold for diagnostic events.
///
/// Diagnostics are tagged with a level; an event is emitted only when the
/// configured threshold is at least that level, so level-0 events are
/// always emitted. The threshold is handed to the components that log instead of being read
/// from process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Only level-0 diagnostics.
    pub const QUIET: Self = Self(0);

    /// Creates a verbosity threshold.
    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Returns the configured threshold.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Returns true if events at `level` should be emitted.
    #[must_use]
    pub const fn enabled(self, level: u8) -> bool {
        self.0 >= level
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

/// Configuration for a [`Merger`](crate::Merger).
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Capacity of the merged output channel.
    pub output_buffer: usize,

    /// Diagnostic threshold for the merge and its output channel.
    pub verbosity: Verbosity,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output_buffer: DEFAULT_MERGE_BUFFER,
            verbosity: Verbosity::QUIET,
        }
    }
}

impl MergeConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity of the merged output channel.
    #[must_use]
    pub const fn with_output_buffer(mut self, size: usize) -> Self {
        self.output_buffer = size;
        self
    }

    /// Sets the diagnostic threshold.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}
