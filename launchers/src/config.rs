use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::script::{file_name, ScriptFlavor};

pub const DEFAULT_COLLECTION_URL: &str = "https://digitalghoststudy.com/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserLauncher {
    pub name: String,
    pub path: String,
}

/// A locale/timezone combination a session is run under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoProfile {
    pub label: String,
    #[serde(alias = "TZ")]
    pub timezone: String,
    #[serde(alias = "LANG_ARG")]
    pub lang_arg: String,
}

/// Bounds (inclusive) of the pause suggested to the operator between launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub weeks: u32,
    pub devices: Vec<u32>,
    pub browsers: Vec<BrowserLauncher>,
    pub profiles: Vec<GeoProfile>,
    pub output_dir: PathBuf,
    pub collection_url: String,
    pub wait_seconds: WaitRange,
    pub flavor: ScriptFlavor,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let browser = |name: &str, path: &str| BrowserLauncher {
            name: name.to_string(),
            path: path.to_string(),
        };
        let profile = |label: &str, timezone: &str, lang_arg: &str| GeoProfile {
            label: label.to_string(),
            timezone: timezone.to_string(),
            lang_arg: lang_arg.to_string(),
        };

        GeneratorConfig {
            weeks: 4,
            devices: (1..=50).collect(),
            browsers: vec![
                browser(
                    "Chrome",
                    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                ),
                browser("Firefox", r"C:\Program Files\Mozilla Firefox\firefox.exe"),
                browser(
                    "Edge",
                    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
                ),
            ],
            profiles: vec![
                profile("01_Irish_Base", "Europe/Dublin", "--lang=en-IE"),
                profile("02_US_Mismatch", "America/New_York", "--lang=en-US"),
                profile("03_UK_Overlap", "Europe/London", "--lang=en-GB"),
                profile("04_German_EU", "Europe/Berlin", "--lang=de-DE"),
                profile("05_French_EU", "Europe/Paris", "--lang=fr-FR"),
            ],
            output_dir: PathBuf::from("Weekly_Launchers"),
            collection_url: DEFAULT_COLLECTION_URL.to_string(),
            wait_seconds: WaitRange { min: 3, max: 10 },
            flavor: ScriptFlavor::default(),
        }
    }
}

impl GeneratorConfig {
    /// Reads a JSON config; fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, GeneratorError> {
        let raw = std::fs::read_to_string(path).map_err(|source| GeneratorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| GeneratorError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of launcher files a run produces.
    pub fn launcher_count(&self) -> usize {
        self.weeks as usize * self.devices.len() * self.browsers.len() * self.profiles.len()
    }

    /// Checks that every (device, browser, profile) triple maps to its own file name.
    ///
    /// Names are joined with `_`, so distinct browsers and labels can still
    /// produce the same file (`Chrome` + `Beta_X` and `Chrome_Beta` + `X`).
    /// They are compared case-insensitively since batch launchers end up on Windows.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let mut devices = HashSet::new();
        for device in &self.devices {
            if !devices.insert(*device) {
                return Err(GeneratorError::DuplicateDevice(*device));
            }
        }

        let mut browsers = HashSet::new();
        for browser in &self.browsers {
            check_name(&browser.name)?;
            if !browsers.insert(browser.name.as_str()) {
                return Err(GeneratorError::DuplicateBrowser(browser.name.clone()));
            }
        }

        let mut labels = HashSet::new();
        for profile in &self.profiles {
            check_name(&profile.label)?;
            if !labels.insert(profile.label.as_str()) {
                return Err(GeneratorError::DuplicateProfile(profile.label.clone()));
            }
        }

        let mut names = HashSet::new();
        for device in &self.devices {
            for browser in &self.browsers {
                for profile in &self.profiles {
                    let name = file_name(*device, browser, profile, self.flavor);
                    if !names.insert(name.to_lowercase()) {
                        return Err(GeneratorError::NameCollision(name));
                    }
                }
            }
        }

        let WaitRange { min, max } = self.wait_seconds;
        if min > max {
            return Err(GeneratorError::EmptyWaitRange { min, max });
        }

        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), GeneratorError> {
    let forbidden = |c: char| matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
    if name.is_empty() || name.contains(forbidden) || name == "." || name == ".." {
        return Err(GeneratorError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Device ids given on the command line, e.g. `1-50`, `1,2,7` or `1-3,9`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceList(pub Vec<u32>);

impl FromStr for DeviceList {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GeneratorError::InvalidDevices(s.to_string());
        let mut devices = Vec::new();

        for part in s.split(',').map(str::trim) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                    let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                    if start > end {
                        return Err(invalid());
                    }
                    devices.extend(start..=end);
                }
                None => devices.push(part.parse().map_err(|_| invalid())?),
            }
        }

        Ok(DeviceList(devices))
    }
}
