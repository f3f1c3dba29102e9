//! pip-backed collaborators: package listing and `pip show` metadata.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::debug;

use pysbom_metadata::{parse_pip_list, MetadataError, MetadataSource, Package};

/// A pip invocation split into program and leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipCommand {
    program: String,
    args: Vec<String>,
}

impl PipCommand {
    /// Split an invocation such as `python3 -m pip` on whitespace.
    pub fn parse(invocation: &str) -> anyhow::Result<Self> {
        let mut parts = invocation.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("empty pip command");
        };
        Ok(PipCommand {
            program,
            args: parts.collect(),
        })
    }

    fn command(&self, dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(dir).kill_on_drop(true);
        command
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Fetches metadata with `pip show <name>`.
#[derive(Debug, Clone)]
pub struct PipSource {
    pip: PipCommand,
    dir: PathBuf,
}

impl PipSource {
    pub fn new(pip: PipCommand, dir: PathBuf) -> Self {
        PipSource { pip, dir }
    }
}

impl MetadataSource for PipSource {
    async fn fetch(&self, name: &str) -> pysbom_metadata::Result<String> {
        let fetch_error = |detail: String| MetadataError::Fetch {
            name: name.to_string(),
            detail,
        };

        debug!(package = name, "pip show");
        let output = self
            .pip
            .command(&self.dir)
            .arg("show")
            .arg(name)
            .output()
            .await
            .map_err(|e| fetch_error(format!("running {}: {e}", self.pip.program())))?;

        if !output.status.success() {
            return Err(fetch_error(failure_detail(&output)));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(fetch_error("pip show produced no output".to_string()));
        }
        Ok(text)
    }
}

/// List installed packages with `pip list --format=json`.
pub async fn list_installed(pip: &PipCommand, dir: &Path) -> anyhow::Result<Vec<Package>> {
    let output = pip
        .command(dir)
        .args(["list", "--format=json"])
        .output()
        .await
        .with_context(|| format!("running {} list", pip.program()))?;

    if !output.status.success() {
        bail!("{} list failed: {}", pip.program(), failure_detail(&output));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    let packages = parse_pip_list(&listing).context("parsing pip list output")?;
    if packages.is_empty() {
        bail!("no installed packages found; install the project's dependencies first");
    }
    Ok(packages)
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_pip() {
        let pip = PipCommand::parse("pip").unwrap();
        assert_eq!(pip.program(), "pip");
        assert!(pip.args.is_empty());
    }

    #[test]
    fn parse_module_invocation() {
        let pip = PipCommand::parse("  python3 -m   pip ").unwrap();
        assert_eq!(pip.program(), "python3");
        assert_eq!(pip.args, vec!["-m", "pip"]);
    }

    #[test]
    fn parse_empty_invocation() {
        assert!(PipCommand::parse("   ").is_err());
    }

    #[tokio::test]
    async fn missing_program_is_a_fetch_error() {
        let pip = PipCommand::parse("pysbom-test-no-such-pip-binary").unwrap();
        let source = PipSource::new(pip, std::env::temp_dir());

        match source.fetch("requests").await {
            Err(MetadataError::Fetch { name, detail }) => {
                assert_eq!(name, "requests");
                assert!(detail.contains("pysbom-test-no-such-pip-binary"));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
