use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use log::debug;

use crate::traits::TapSink;

/// A persistent `adb shell` process used as the tap command sink.
///
/// Tap commands are written to the child's stdin as text lines of the
/// form `"<tap_command> <x> <y>"` and flushed once per timestamp
/// group; the shell executes them on the device. The channel is
/// fire-and-forget: nothing is read back.
pub struct AdbShellChannel {
    child: Child,
    stdin: Option<ChildStdin>,
    tap_command: String,
}

impl AdbShellChannel {
    /// Spawn `adb shell`, optionally bound to a device serial, with a
    /// piped stdin and silenced output.
    pub fn open(serial: Option<&str>, tap_command: &str) -> Result<Self> {
        let mut cmd = Command::new("adb");
        if let Some(serial) = serial {
            cmd.args(["-s", serial]);
        }
        let mut child = cmd
            .arg("shell")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn `adb shell`")?;
        let stdin = child
            .stdin
            .take()
            .context("adb shell child has no piped stdin")?;
        debug!("adb shell channel opened");
        Ok(Self {
            child,
            stdin: Some(stdin),
            tap_command: tap_command.to_string(),
        })
    }

    /// Close the write side and wait for the shell to drain its input
    /// and exit, so no buffered command is lost.
    pub fn close(mut self) -> io::Result<ExitStatus> {
        drop(self.stdin.take());
        let status = self.child.wait();
        debug!("adb shell channel closed");
        status
    }
}

impl TapSink for AdbShellChannel {
    fn send_tap(&mut self, x: i32, y: i32) -> io::Result<()> {
        match &mut self.stdin {
            Some(stdin) => writeln!(stdin, "{} {} {}", self.tap_command, x, y),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "channel already closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.stdin {
            Some(stdin) => stdin.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AdbShellChannel {
    fn drop(&mut self) {
        // Normal shutdown goes through close(); this covers early
        // error returns so the child never outlives the session.
        drop(self.stdin.take());
        let _ = self.child.wait();
    }
}
