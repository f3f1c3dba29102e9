//! `pysbom.toml` configuration and command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use pysbom_metadata::DecoderOptions;

pub const CONFIG_FILE: &str = "pysbom.toml";

/// The top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PysbomConfig {
    /// Project section.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Python toolchain section.
    #[serde(default)]
    pub python: PythonConfig,
    /// Metadata fetch tuning.
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Name of the project's own package.
    #[serde(default)]
    pub root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// pip invocation, e.g. `pip` or `python3 -m pip`.
    #[serde(default = "default_pip")]
    pub pip: String,
}

impl Default for PythonConfig {
    fn default() -> Self {
        PythonConfig { pip: default_pip() }
    }
}

fn default_pip() -> String {
    "pip".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-package fetch timeout in seconds; 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum concurrent `pip show` processes.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    16
}

impl PysbomConfig {
    /// Search upward from `start_dir` for `pysbom.toml`, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = PysbomConfig::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line; each wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<String>,
    pub pip: Option<String>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory pip commands run in.
    pub project_dir: PathBuf,
    /// Root package name.
    pub root: String,
    /// pip invocation.
    pub pip: String,
    pub options: DecoderOptions,
}

impl Settings {
    pub fn resolve(
        project_dir: PathBuf,
        config: PysbomConfig,
        overrides: Overrides,
    ) -> Result<Self> {
        let Some(root) = overrides.root.or(config.project.root) else {
            bail!("no root package: pass --root or set `root` under [project] in {CONFIG_FILE}");
        };
        let timeout_secs = overrides.timeout_secs.unwrap_or(config.fetch.timeout_secs);
        let max_concurrent = overrides.jobs.unwrap_or(config.fetch.max_concurrent);

        Ok(Settings {
            project_dir,
            root,
            pip: overrides.pip.unwrap_or(config.python.pip),
            options: DecoderOptions {
                fetch_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                max_concurrent: max_concurrent.max(1),
            },
        })
    }
}
