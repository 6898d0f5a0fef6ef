use std::io;

/// Abstraction over the device-facing command sink.
/// Implementations: AdbShellChannel (production), test recorders.
pub trait TapSink {
    /// Queue one tap command line for the device.
    fn send_tap(&mut self, x: i32, y: i32) -> io::Result<()>;

    /// Flush queued commands to the device. Called once per timestamp
    /// group, not once per tap, to batch pipe I/O.
    fn flush(&mut self) -> io::Result<()>;
}
