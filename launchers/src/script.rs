use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::{BrowserLauncher, GeoProfile};

/// Kind of script written for each launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ScriptFlavor {
    /// Windows batch file
    #[default]
    #[serde(rename = "bat")]
    #[value(name = "bat")]
    Batch,
    /// POSIX shell script
    #[serde(rename = "sh")]
    #[value(name = "sh")]
    Shell,
}

impl ScriptFlavor {
    pub fn extension(&self) -> &'static str {
        match self {
            ScriptFlavor::Batch => "bat",
            ScriptFlavor::Shell => "sh",
        }
    }

    fn header(&self) -> &'static str {
        match self {
            ScriptFlavor::Batch => "@echo off",
            ScriptFlavor::Shell => "#!/bin/sh",
        }
    }

    fn comment(&self, text: &str) -> String {
        let marker = match self {
            ScriptFlavor::Batch => "REM",
            ScriptFlavor::Shell => "#",
        };
        if text.is_empty() {
            marker.to_string()
        } else {
            format!("{marker} {text}")
        }
    }

    fn quote(&self, arg: &str) -> String {
        match self {
            ScriptFlavor::Batch => format!("\"{arg}\""),
            // Single quotes keep `$` and backticks in URLs literal
            ScriptFlavor::Shell => format!("'{}'", arg.replace('\'', r"'\''")),
        }
    }
}

/// `D<device>_<browser>_<label>.<ext>`, the same in every week directory.
pub fn file_name(
    device: u32,
    browser: &BrowserLauncher,
    profile: &GeoProfile,
    flavor: ScriptFlavor,
) -> String {
    format!(
        "D{:02}_{}_{}.{}",
        device,
        browser.name,
        profile.label,
        flavor.extension()
    )
}

/// One (week, device, browser, profile) combination.
#[derive(Debug, Clone, Copy)]
pub struct Launcher<'a> {
    pub week: u32,
    pub device: u32,
    pub browser: &'a BrowserLauncher,
    pub profile: &'a GeoProfile,
    pub collection_url: &'a str,
    /// Cosmetic, only shows up in the operator instructions.
    pub wait_seconds: u32,
}

impl Launcher<'_> {
    pub fn week_dir(&self) -> String {
        format!("Week_{}", self.week)
    }

    pub fn file_name(&self, flavor: ScriptFlavor) -> String {
        file_name(self.device, self.browser, self.profile, flavor)
    }

    /// `"<browser>" --new-window "<lang>" "<url>"`
    pub fn command(&self, flavor: ScriptFlavor) -> String {
        format!(
            "{} --new-window {} {}",
            flavor.quote(&self.browser.path),
            flavor.quote(&self.profile.lang_arg),
            flavor.quote(self.collection_url)
        )
    }

    pub fn render(&self, flavor: ScriptFlavor) -> String {
        let device = format!("{:02}", self.device);
        let banner = [
            "--- VAE ACQUISITION LAUNCHER ---".to_string(),
            format!(
                "DEVICE: {device} | BROWSER: {} | PROFILE: {}",
                self.browser.name, self.profile.label
            ),
            format!(
                "EXPECTED TIMEZONE: {}",
                self.profile.timezone
            ),
            "ACTION: Launches browser with the profile language. You must manually click the collect button.".to_string(),
            String::new(),
            "*** HUMAN ACTION REQUIRED: ***".to_string(),
            format!("1. ENSURE Device {device} is ON and READY."),
            "2. CLICK 'collect' BUTTON on the website.".to_string(),
            "3. CLOSE this browser after submission is confirmed.".to_string(),
            format!(
                "4. WAIT AT LEAST {} SECONDS before running the next launcher.",
                self.wait_seconds
            ),
            "--------------------------------".to_string(),
        ];

        let mut script = String::new();
        script.push_str(flavor.header());
        script.push('\n');
        for line in banner {
            script.push_str(&flavor.comment(&line));
            script.push('\n');
        }
        script.push_str(&self.command(flavor));
        script.push('\n');
        script.push_str("exit\n");
        script
    }
}
