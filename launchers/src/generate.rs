use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::script::{Launcher, ScriptFlavor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn count(&self) -> usize {
        self.files.len()
    }
}

/// Writes one launcher script per (week, device, browser, profile) under
/// `output_dir/Week_<n>/`. Existing files with the same name are replaced.
#[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn generate<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<GenerationReport, GeneratorError> {
    config.validate()?;

    create_dir(&config.output_dir)?;
    let mut files = Vec::with_capacity(config.launcher_count());

    for week in 1..=config.weeks {
        let week_dir = config.output_dir.join(format!("Week_{week}"));
        create_dir(&week_dir)?;

        for device in &config.devices {
            for browser in &config.browsers {
                for profile in &config.profiles {
                    let launcher = Launcher {
                        week,
                        device: *device,
                        browser,
                        profile,
                        collection_url: &config.collection_url,
                        wait_seconds: rng
                            .gen_range(config.wait_seconds.min..=config.wait_seconds.max),
                    };

                    let path = week_dir.join(launcher.file_name(config.flavor));
                    write_script(&path, &launcher.render(config.flavor), config.flavor)?;
                    debug!("wrote {}", path.display());
                    files.push(path);
                }
            }
        }
    }

    info!(
        "generated {} launcher files in {}",
        files.len(),
        config.output_dir.display()
    );

    Ok(GenerationReport {
        output_dir: config.output_dir.clone(),
        files,
    })
}

fn create_dir(path: &Path) -> Result<(), GeneratorError> {
    fs::create_dir_all(path).map_err(|source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_script(path: &Path, content: &str, flavor: ScriptFlavor) -> Result<(), GeneratorError> {
    let to_error = |source: std::io::Error| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::write(path, content).map_err(to_error)?;
    if flavor == ScriptFlavor::Shell {
        make_executable(path).map_err(to_error)?;
    }

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
