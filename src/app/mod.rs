//! Outer session loop: device setup, chart selection, playback.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::config::Settings;
use crate::device::{AdbShellChannel, adb};
use crate::model::{group_notes, load_chart};
use crate::play::Dispatcher;
use crate::util::PlayError;
use crate::util::file;

/// Extension of chart files picked up from the working directory.
const CHART_EXTENSION: &str = "skym";

/// Session states. Transitions are driven by explicit results rather
/// than a catch-all error handler: an empty chart returns to
/// selection, a channel failure aborts the session.
enum SessionState {
    SelectingChart,
    Playing(PathBuf),
    Finished,
    Aborted(PlayError),
}

pub struct App {
    settings: Settings,
    /// Chart given on the command line; consumed by the first
    /// selection pass.
    chart_arg: Option<PathBuf>,
    /// Skip interactive prompts (single-shot playback).
    assume_yes: bool,
    serial: Option<String>,
}

impl App {
    pub fn new(settings: Settings, chart_arg: Option<PathBuf>, assume_yes: bool) -> Self {
        Self {
            settings,
            chart_arg,
            assume_yes,
            serial: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.connect_device()?;

        let mut state = SessionState::SelectingChart;
        loop {
            state = match state {
                SessionState::SelectingChart => match self.select_chart()? {
                    Some(path) => SessionState::Playing(path),
                    None => SessionState::Finished,
                },
                SessionState::Playing(path) => self.play_chart(&path)?,
                SessionState::Finished => {
                    info!("session finished");
                    return Ok(());
                }
                SessionState::Aborted(err) => {
                    return Err(err).context("playback aborted");
                }
            };
        }
    }

    /// Establish the adb connection and pick the target device.
    /// With several devices attached, the user chooses one and the
    /// rest are disconnected so the shell binds unambiguously.
    fn connect_device(&mut self) -> Result<()> {
        if self.settings.use_wireless {
            if let Err(e) = adb::connect_wireless(
                &self.settings.wireless_ip,
                self.settings.wireless_port,
            ) {
                warn!("{e:#}");
            }
        }

        let devices = adb::list_devices()?;
        match devices.as_slice() {
            [] => bail!("no device detected, check the adb connection"),
            [only] => {
                info!("using device {only}");
                self.serial = Some(only.clone());
            }
            _ => {
                let serial = self.pick_device(&devices)?;
                for dev in &devices {
                    if *dev != serial {
                        info!("disconnecting {dev}");
                        let _ = adb::disconnect(dev);
                    }
                }
                self.serial = Some(serial);
            }
        }
        Ok(())
    }

    fn pick_device(&self, devices: &[String]) -> Result<String> {
        println!("\nMultiple devices detected:");
        for (idx, dev) in devices.iter().enumerate() {
            println!("[{idx}] {dev}");
        }
        let choice = prompt_index("Select a device number: ", devices.len())?;
        Ok(devices[choice].clone())
    }

    /// Pick the next chart: the command-line argument on the first
    /// pass, otherwise a listing of the working directory.
    fn select_chart(&mut self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.chart_arg.take() {
            return Ok(Some(path));
        }
        if self.assume_yes {
            bail!("no chart given for non-interactive playback");
        }

        let charts = file::find_by_extension(Path::new("."), CHART_EXTENSION)?;
        if charts.is_empty() {
            bail!("no .{CHART_EXTENSION} chart files in the current directory");
        }

        println!("\nAvailable charts:");
        for (idx, path) in charts.iter().enumerate() {
            println!("[{idx}] {}", path.display());
        }
        let choice = prompt_index("Select a chart number: ", charts.len())?;
        Ok(Some(charts[choice].clone()))
    }

    fn play_chart(&self, path: &Path) -> Result<SessionState> {
        let chart = load_chart(path)?;

        for key in chart.distinct_keys() {
            if !self.settings.key_mapping.contains(key) {
                warn!("no mapping for {key}, its taps will land at (0, 0)");
            }
        }

        let schedule = match group_notes(&chart.notes) {
            Ok(schedule) => schedule,
            Err(err) => {
                if matches!(err, PlayError::EmptyChart) {
                    warn!("chart {} has no notes, pick another", path.display());
                }
                return Ok(next_state(Err(err), false));
            }
        };

        println!(
            "\nPlaying: {} ({} steps, {}ms)\n",
            chart.name,
            schedule.len(),
            schedule.total_duration_ms()
        );

        let mut channel =
            AdbShellChannel::open(self.serial.as_deref(), &self.settings.tap_command)?;
        let result = Dispatcher::new().run(
            &schedule,
            &self.settings.key_mapping,
            &mut channel,
            &mut io::stdout(),
        );
        // Closed-and-joined on both outcomes so no command is lost to
        // buffering and the child never leaks.
        let close_result = channel.close();
        println!();

        // A close failure after a clean run still means buffered
        // commands may have been dropped.
        let result = match (result, close_result) {
            (Ok(()), Err(e)) => Err(PlayError::ChannelWrite(e)),
            (result, _) => result,
        };
        if result.is_ok() {
            info!("playback of {} complete", chart.name);
        }
        let replay = result.is_ok() && self.prompt_replay()?;
        Ok(next_state(result, replay))
    }

    fn prompt_replay(&self) -> Result<bool> {
        if self.assume_yes {
            return Ok(false);
        }
        loop {
            print!("\nPlay another chart? [y/n]: ");
            io::stdout().flush()?;
            let Some(line) = read_line()? else {
                return Ok(false);
            };
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n."),
            }
        }
    }
}

/// Decide the next session state from a playback outcome.
///
/// An empty chart sends the user back to selection, a channel failure
/// aborts the session, and a clean run either replays or finishes
/// depending on the user's answer.
fn next_state(result: Result<(), PlayError>, replay: bool) -> SessionState {
    match result {
        Ok(()) if replay => SessionState::SelectingChart,
        Ok(()) => SessionState::Finished,
        Err(PlayError::EmptyChart) => SessionState::SelectingChart,
        Err(err) => SessionState::Aborted(err),
    }
}

/// Prompt until the user enters an index below `len`.
fn prompt_index(prompt: &str, len: usize) -> Result<usize> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        let Some(line) = read_line()? else {
            bail!("stdin closed during selection");
        };
        match line.trim().parse::<usize>() {
            Ok(idx) if idx < len => return Ok(idx),
            _ => println!("Invalid selection, try again."),
        }
    }
}

/// Read one line from stdin; None on EOF.
fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}
