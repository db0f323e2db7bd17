//! Common test utilities for gobin integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A sandbox giving each test its own cache root, install dir, GOPATH, and
/// (optionally) a stub `go` toolchain on PATH.
pub struct TestSpace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub cache_dir: PathBuf,
    pub install_dir: PathBuf,
    gopath: PathBuf,
    stub_dir: PathBuf,
}

impl TestSpace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let cache_dir = temp.path().join("cache");
        let install_dir = temp.path().join("bin");
        let gopath = temp.path().join("gopath");
        let stub_dir = temp.path().join("stub");
        std::fs::create_dir_all(&stub_dir).expect("Failed to create stub directory");
        Self {
            temp,
            cache_dir,
            install_dir,
            gopath,
            stub_dir,
        }
    }

    /// Install a stub `go` executable responding to get/list/install
    #[cfg(unix)]
    pub fn stub_go(&self, script_body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.stub_dir.join("go");
        std::fs::write(&path, format!("#!/bin/sh\n{script_body}")).expect("Failed to write stub");
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat stub")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod stub");
    }

    /// A gobin command wired to this sandbox
    pub fn gobin(&self) -> Command {
        let mut cmd = Command::cargo_bin("gobin").expect("Failed to find gobin binary");
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.stub_dir.clone()];
        paths.extend(std::env::split_paths(&path));
        let joined = std::env::join_paths(paths).expect("Failed to join PATH");
        cmd.env("PATH", joined)
            .env("GOBIN_CACHE_DIR", &self.cache_dir)
            .env("GOBIN", &self.install_dir)
            .env("GOPATH", &self.gopath)
            .env_remove("GOBIN_DEBUG");
        cmd
    }
}
