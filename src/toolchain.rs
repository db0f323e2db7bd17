//! Go toolchain invocation
//!
//! The resolver and installer talk to the toolchain through the [`Toolchain`]
//! trait so they can be exercised against an in-memory fake; [`GoToolchain`]
//! is the real implementation, spawning `go get`, `go list -json`, and
//! `go install` subprocesses. A `proxy` of `None` leaves GOPROXY untouched
//! (network allowed); `Some(url)` pins the fetch source for that call.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use console::style;
use serde::Deserialize;

use crate::error::{GobinError, Result};

/// One record from the streamed `go list -json` output
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ListedPackage {
    #[serde(default)]
    pub import_path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub module: ListedModule,
}

/// Module owning a listed package
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ListedModule {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub version: String,
}

/// Capability interface over the external toolchain
pub trait Toolchain {
    /// Resolve and download a package spec into the module cache
    fn fetch(&self, work_dir: &Path, spec: &str, proxy: Option<&str>) -> Result<()>;

    /// Introspect the packages matched by a pattern
    fn list(
        &self,
        work_dir: &Path,
        pattern: &str,
        proxy: Option<&str>,
    ) -> Result<Vec<ListedPackage>>;

    /// Build an import path into an executable under `bin_dir`
    fn build(
        &self,
        work_dir: &Path,
        import_path: &str,
        bin_dir: &Path,
        proxy: &str,
    ) -> Result<()>;
}

/// Real toolchain backed by `go` subprocesses
#[derive(Debug)]
pub struct GoToolchain {
    debug: bool,
}

impl GoToolchain {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn trace(&self, args: &[&str], work_dir: &Path, env: &str, start: Instant) {
        if self.debug {
            eprintln!(
                "{}",
                style(format!(
                    "ran [go {}] in [{}] with [{}] in {:?}",
                    args.join(" "),
                    work_dir.display(),
                    env,
                    start.elapsed()
                ))
                .dim()
            );
        }
    }
}

impl Toolchain for GoToolchain {
    fn fetch(&self, work_dir: &Path, spec: &str, proxy: Option<&str>) -> Result<()> {
        let args = ["get", "-d", spec];
        let mut cmd = Command::new("go");
        cmd.args(args).current_dir(work_dir);
        if let Some(proxy) = proxy {
            cmd.env("GOPROXY", proxy);
        }

        let start = Instant::now();
        let output = cmd.output().map_err(|e| spawn_error(&args, &e))?;
        self.trace(&args, work_dir, proxy.unwrap_or("GOPROXY inherited"), start);

        if !output.status.success() {
            // go get reports diagnostics across both streams
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(GobinError::ToolchainFailed {
                command: command_line(&args),
                reason: output.status.to_string(),
                output: combined,
            });
        }

        Ok(())
    }

    fn list(
        &self,
        work_dir: &Path,
        pattern: &str,
        proxy: Option<&str>,
    ) -> Result<Vec<ListedPackage>> {
        let args = ["list", "-json", pattern];
        let mut cmd = Command::new("go");
        cmd.args(args).current_dir(work_dir);
        if let Some(proxy) = proxy {
            cmd.env("GOPROXY", proxy);
        }

        let start = Instant::now();
        let output = cmd.output().map_err(|e| spawn_error(&args, &e))?;
        self.trace(&args, work_dir, proxy.unwrap_or("GOPROXY inherited"), start);

        if !output.status.success() {
            return Err(GobinError::ToolchainFailed {
                command: command_line(&args),
                reason: output.status.to_string(),
                output: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        decode_packages(&output.stdout)
    }

    fn build(
        &self,
        work_dir: &Path,
        import_path: &str,
        bin_dir: &Path,
        proxy: &str,
    ) -> Result<()> {
        let args = ["install", import_path];
        let mut cmd = Command::new("go");
        cmd.args(args)
            .current_dir(work_dir)
            .env("GOBIN", bin_dir)
            .env("GOPROXY", proxy);

        let start = Instant::now();
        let output = cmd.output().map_err(|e| spawn_error(&args, &e))?;
        self.trace(
            &args,
            work_dir,
            &format!("GOBIN={}, GOPROXY={}", bin_dir.display(), proxy),
            start,
        );

        if !output.status.success() {
            return Err(GobinError::ToolchainFailed {
                command: command_line(&args),
                reason: output.status.to_string(),
                output: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

/// Decode the newline-delimited JSON records emitted by `go list -json`
fn decode_packages(stdout: &[u8]) -> Result<Vec<ListedPackage>> {
    let mut packages = Vec::new();
    for record in serde_json::Deserializer::from_slice(stdout).into_iter::<ListedPackage>() {
        packages.push(record?);
    }
    Ok(packages)
}

fn command_line(args: &[&str]) -> String {
    format!("go {}", args.join(" "))
}

fn spawn_error(args: &[&str], err: &std::io::Error) -> GobinError {
    GobinError::ToolchainFailed {
        command: command_line(args),
        reason: err.to_string(),
        output: String::new(),
    }
}
