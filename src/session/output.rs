//! Seam between the session and whatever actually makes sound.

use thiserror::Error;

/// Identifies one binding of the output to a source.
///
/// Every `load` gets a fresh generation; events carrying an older one come
/// from a source that has since been replaced and are dropped by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot open audio source {url}: {reason}")]
    Load { url: String, reason: String },

    #[error("audio output error: {0}")]
    Output(String),
}

/// Reported by the output while a source is bound.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// offsets in seconds
    Progress { position: f64, total: f64 },
    Ended,
    Failed(String),
}

/// A single audio output.
///
/// Implementations hold at most one bound source. Starting is fire-and-forget:
/// progress, completion and late failures come back as [`PlaybackEvent`]s
/// tagged with the generation passed to `load`.
pub trait AudioOutput {
    /// Binds `url` and starts it from the beginning.
    fn load(&mut self, url: &str, generation: Generation) -> Result<(), AudioError>;

    /// Continues the bound source where it was paused.
    fn resume(&mut self) -> Result<(), AudioError>;

    fn pause(&mut self);

    /// Drops the bound source.
    fn release(&mut self);
}
