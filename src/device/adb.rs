use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use log::info;

/// List serials of devices currently attached to the adb server.
pub fn list_devices() -> Result<Vec<String>> {
    let output = Command::new("adb")
        .arg("devices")
        .output()
        .context("failed to run `adb devices` (is adb on PATH?)")?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_device_list(&stdout))
}

/// Parse `adb devices` output.
///
/// The first line is a header; attached devices follow as
/// "<serial>\tdevice" lines. Offline and unauthorized entries are
/// skipped.
fn parse_device_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (serial, state) = line.split_once('\t')?;
            (state.trim() == "device").then(|| serial.to_string())
        })
        .collect()
}

/// Connect to a device over wireless debugging.
pub fn connect_wireless(ip: &str, port: u16) -> Result<()> {
    let target = format!("{ip}:{port}");
    info!("connecting to {target} over wireless debugging");
    let output = Command::new("adb")
        .args(["connect", &target])
        .output()
        .context("failed to run `adb connect`")?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    // `adb connect` reports failure on stdout with a zero exit code,
    // so the message text is the only reliable signal.
    if stdout.contains("connected to") {
        info!("wireless connection established: {target}");
        Ok(())
    } else {
        bail!("wireless connection to {target} failed: {}", stdout.trim());
    }
}

/// Disconnect a device from the adb server.
pub fn disconnect(serial: &str) -> Result<()> {
    Command::new("adb")
        .args(["disconnect", serial])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to disconnect {serial}"))?;
    Ok(())
}
