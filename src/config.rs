//! Startup configuration.
//!
//! Loaded from an optional JSON file. Every key has a default, so an empty
//! object (or no file at all) yields the stock three-category hospital.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the category emergency admissions draw beds from.
pub const EMERGENCY_ROOM: &str = "emergency room";

/// A room category as declared in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomSetup {
    pub name: String,
    pub beds: u32,
    pub nightly_price: f64,
}

impl RoomSetup {
    pub fn new(name: &str, beds: u32, nightly_price: f64) -> Self {
        Self {
            name: name.to_string(),
            beds,
            nightly_price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rooms: Vec<RoomSetup>,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rooms: vec![
                RoomSetup::new("general room", 20, 1500.0),
                RoomSetup::new("private room", 15, 3000.0),
                RoomSetup::new(EMERGENCY_ROOM, 10, 5000.0),
            ],
            log_file: PathBuf::from("wardbook.log"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration file, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the room
    /// list is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the room list is invalid.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw).context("Failed to parse JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for room in &self.rooms {
            let name = room.name.trim().to_lowercase();
            if name.is_empty() {
                bail!("Room names cannot be empty");
            }
            if !seen.insert(name) {
                bail!("Room '{}' is declared more than once", room.name);
            }
        }
        Ok(())
    }
}
