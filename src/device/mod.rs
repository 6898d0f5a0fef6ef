// Device bridge: adb process management and the tap command channel.

pub mod adb;
pub mod channel;

pub use channel::AdbShellChannel;
