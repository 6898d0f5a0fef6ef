use thiserror::Error;

/// Failures raised by the playback core.
///
/// The variants are distinct so the session controller can tell a bad
/// chart apart from a dead device: an empty chart sends the user back
/// to selection, a channel failure ends the session.
#[derive(Debug, Error)]
pub enum PlayError {
    /// The chart contains no notes, so no schedule can be derived.
    #[error("chart contains no notes")]
    EmptyChart,

    /// Writing or flushing the device channel failed. Not retried: a
    /// broken pipe almost always means the device disconnected.
    #[error("device channel write failed: {0}")]
    ChannelWrite(#[from] std::io::Error),
}
