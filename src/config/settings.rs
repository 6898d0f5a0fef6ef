use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_TAP_COMMAND: &str = "input tap";
const DEFAULT_WIRELESS_IP: &str = "192.168.1.100";
const DEFAULT_WIRELESS_PORT: u16 = 5555;

/// Screen grid for the default key mapping: three rows of five
/// columns, matching the in-game keyboard layout.
const DEFAULT_COORDS: [(i32, i32); 15] = [
    (900, 220),
    (1100, 220),
    (1280, 220),
    (1450, 220),
    (1650, 220),
    (900, 400),
    (1100, 400),
    (1280, 400),
    (1450, 400),
    (1650, 400),
    (900, 580),
    (1100, 580),
    (1280, 580),
    (1450, 580),
    (1650, 580),
];

/// Key-to-screen-coordinate lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct KeyMapping(HashMap<String, (i32, i32)>);

impl KeyMapping {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Resolve a key to screen coordinates.
    ///
    /// Unmapped keys fall back to (0, 0) so a partially configured
    /// mapping degrades instead of aborting playback.
    pub fn coord(&self, key: &str) -> (i32, i32) {
        self.0.get(key).copied().unwrap_or((0, 0))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, x: i32, y: i32) {
        self.0.insert(key.to_string(), (x, y));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for KeyMapping {
    /// Both tracks mapped onto the default screen grid:
    /// "1Key0".."1Key14" and "2Key0".."2Key14".
    fn default() -> Self {
        let mut map = HashMap::new();
        for track in 1..=2 {
            for (i, &(x, y)) in DEFAULT_COORDS.iter().enumerate() {
                map.insert(format!("{track}Key{i}"), (x, y));
            }
        }
        Self(map)
    }
}

/// User settings for the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Command prefix written to the device shell for each tap.
    pub tap_command: String,
    /// Connect over wireless debugging before looking for devices.
    pub use_wireless: bool,
    pub wireless_ip: String,
    pub wireless_port: u16,
    /// Key-to-screen-coordinate mapping for the target device.
    pub key_mapping: KeyMapping,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tap_command: DEFAULT_TAP_COMMAND.to_string(),
            use_wireless: false,
            wireless_ip: DEFAULT_WIRELESS_IP.to_string(),
            wireless_port: DEFAULT_WIRELESS_PORT,
            key_mapping: KeyMapping::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a specified path.
    /// Returns default settings if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Saves settings to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
