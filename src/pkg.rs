//! Package argument model
//!
//! One [`PackageArg`] per command-line `path[@version]` token. Resolution
//! phases report their outcome as a [`Resolution`] value rather than by
//! mutating optional fields, so the resolver can pattern-match on exactly
//! one of: resolved packages, a non-executable target, or a pending network
//! retry.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::{GobinError, Result};
use crate::temp;

/// Contents of the stub go.mod seeding each scratch module
const SCRATCH_GO_MOD: &str = "module gobin\n";

/// A single command-line provided package specification
#[derive(Debug)]
pub struct PackageArg {
    /// The original `path[@version]` token
    pub spec: String,
    /// The package part of the spec
    pub pkg_pattern: String,
    /// The version part of the spec; empty means "latest" (or the version
    /// currently recorded by the main module, in main-module mode).
    /// Overwritten with the concrete resolved version once introspection
    /// succeeds.
    pub ver_pattern: String,
    /// Directory the toolchain runs in when resolving this argument
    pub work_dir: PathBuf,
    /// Keeps the scratch module alive until the argument is dropped
    _scratch: Option<TempDir>,
}

impl PackageArg {
    /// Parse a spec and resolve it from within `work_dir` (main-module mode:
    /// the caller's project directory).
    pub fn in_dir(spec: &str, work_dir: PathBuf) -> Result<Self> {
        let (pkg_pattern, ver_pattern) = split_spec(spec)?;
        Ok(Self {
            spec: spec.to_string(),
            pkg_pattern,
            ver_pattern,
            work_dir,
            _scratch: None,
        })
    }

    /// Parse a spec and give it a throwaway module directory to resolve in,
    /// so resolution never touches the caller's project. The directory is
    /// removed when the argument is dropped.
    pub fn in_scratch_module(spec: &str) -> Result<Self> {
        let (pkg_pattern, ver_pattern) = split_spec(spec)?;

        let scratch = tempfile::Builder::new()
            .prefix("gobin")
            .tempdir_in(temp::temp_dir_base())
            .map_err(|e| GobinError::ScratchModuleFailed {
                reason: e.to_string(),
            })?;
        fs::write(scratch.path().join("go.mod"), SCRATCH_GO_MOD).map_err(|e| {
            GobinError::ScratchModuleFailed {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            spec: spec.to_string(),
            pkg_pattern,
            ver_pattern,
            work_dir: scratch.path().to_path_buf(),
            _scratch: Some(scratch),
        })
    }
}

/// Split a `path[@version]` token on the first `@`.
///
/// The package part must be non-empty; deeper validation is left to the Go
/// toolchain when the argument is resolved.
fn split_spec(spec: &str) -> Result<(String, String)> {
    let (pkg, ver) = match spec.split_once('@') {
        Some((pkg, ver)) => (pkg, ver),
        None => (spec, ""),
    };
    if pkg.is_empty() {
        return Err(GobinError::InvalidPackageSpec {
            spec: spec.to_string(),
        });
    }
    Ok((pkg.to_string(), ver.to_string()))
}

/// A main package produced by toolchain introspection, ready to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Fully qualified import path of the package
    pub import_path: String,
    /// Path of the module containing the package
    pub module_path: String,
    /// Concrete version of the containing module; may be empty in
    /// main-module mode when the module is the one being developed
    pub module_version: String,
}

/// Outcome of one resolution phase for one argument
#[derive(Debug)]
pub enum Resolution {
    /// Introspection succeeded and every matched package is a main package
    Resolved(Vec<ResolvedPackage>),
    /// Introspection succeeded but the target is not a main package
    NotExecutable,
    /// The local phase could not resolve this argument; retry with network
    /// access allowed
    NeedsNetwork,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_spec_with_version() {
        let (pkg, ver) = split_spec("example.com/cmd/foo@v1.0.0").unwrap();
        assert_eq!(pkg, "example.com/cmd/foo");
        assert_eq!(ver, "v1.0.0");
    }

    #[test]
    fn test_split_spec_without_version() {
        let (pkg, ver) = split_spec("example.com/cmd/foo").unwrap();
        assert_eq!(pkg, "example.com/cmd/foo");
        assert_eq!(ver, "");
    }

    #[test]
    fn test_split_spec_splits_on_first_at() {
        // Only the first @ separates package from version
        let (pkg, ver) = split_spec("example.com/cmd/foo@v1@beta").unwrap();
        assert_eq!(pkg, "example.com/cmd/foo");
        assert_eq!(ver, "v1@beta");
    }

    #[test]
    fn test_split_spec_empty_package_rejected() {
        assert!(split_spec("@v1.0.0").is_err());
        assert!(split_spec("").is_err());
    }

    #[test]
    fn test_in_dir_keeps_spec() {
        let arg = PackageArg::in_dir("example.com/cmd/foo@latest", PathBuf::from("/proj")).unwrap();
        assert_eq!(arg.spec, "example.com/cmd/foo@latest");
        assert_eq!(arg.pkg_pattern, "example.com/cmd/foo");
        assert_eq!(arg.ver_pattern, "latest");
        assert_eq!(arg.work_dir, PathBuf::from("/proj"));
    }

    #[test]
    fn test_scratch_module_seeded_with_go_mod() {
        let arg = PackageArg::in_scratch_module("example.com/cmd/foo").unwrap();
        let go_mod = arg.work_dir.join("go.mod");
        assert!(go_mod.exists());
        assert_eq!(fs::read_to_string(go_mod).unwrap(), "module gobin\n");
    }

    #[test]
    fn test_scratch_module_removed_on_drop() {
        let arg = PackageArg::in_scratch_module("example.com/cmd/foo").unwrap();
        let dir = arg.work_dir.clone();
        assert!(dir.exists());
        drop(arg);
        assert!(!dir.exists());
    }
}
