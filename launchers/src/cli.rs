use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{DeviceList, GeneratorConfig};
use crate::generate::{generate, GenerationReport};
use crate::script::ScriptFlavor;

#[derive(Parser, Debug)]
#[command(version, about = "Generate weekly browser launcher scripts", long_about = None)]
pub struct Cli {
    /// JSON file with the generator configuration. Missing fields use the built-in defaults
    #[arg(long, env = "FP_LAUNCHERS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of weeks to plan
    #[arg(long)]
    weeks: Option<u32>,

    /// Device ids, e.g. `1-50`, `1,2,7` or `1-3,9`
    #[arg(long)]
    devices: Option<DeviceList>,

    /// Root directory the Week_<n> folders are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Collection page the browsers are pointed at
    #[arg(long)]
    url: Option<String>,

    /// Script type to write, bat or sh
    #[arg(long, value_enum)]
    flavor: Option<ScriptFlavor>,

    /// Seed for the suggested waits, for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print the resolved configuration as JSON instead of generating
    #[arg(long, default_value = "false")]
    print_config: bool,
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();

        let config = cli.resolve_config()?;
        if cli.print_config {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }

        let report = cli.execute(&config)?;
        println!(
            "Generated {} launcher files in '{}'.",
            report.count(),
            report.output_dir.display()
        );

        Ok(())
    }

    /// Defaults, then the config file, then command line flags.
    pub fn resolve_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        if let Some(DeviceList(devices)) = &self.devices {
            config.devices = devices.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(url) = &self.url {
            config.collection_url = url.clone();
        }
        if let Some(flavor) = self.flavor {
            config.flavor = flavor;
        }

        Ok(config)
    }

    pub fn execute(&self, config: &GeneratorConfig) -> anyhow::Result<GenerationReport> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        generate(config, &mut rng).context("failed to generate launchers")
    }
}
