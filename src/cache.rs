//! Install cache layout
//!
//! Built binaries are content-addressed by (module path, module version,
//! import path): `cacheRoot/encode(module)[/@v/version]/encode(importPath)`.
//! Identical triples always map to the identical directory, regardless of
//! which resolution phase produced them.

use std::path::PathBuf;

use crate::encode;
use crate::error::Result;
use crate::pkg::ResolvedPackage;

/// Version marker segment between the encoded module path and its version
const VERSION_DIR: &str = "@v";

/// The gobin install cache rooted at a user- or project-scoped directory
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory a package's binary is built into, exclusive to this
    /// (module, version, import path) triple
    pub fn package_dir(&self, pkg: &ResolvedPackage) -> Result<PathBuf> {
        let mut dir = self.root.join(segments(&encode::escape_path(&pkg.module_path)?));
        if !pkg.module_version.is_empty() {
            dir = dir.join(VERSION_DIR).join(&pkg.module_version);
        }
        Ok(dir.join(segments(&encode::escape_path(&pkg.import_path)?)))
    }

    /// Full path of the built binary inside the cache
    pub fn binary_path(&self, pkg: &ResolvedPackage) -> Result<PathBuf> {
        Ok(self.package_dir(pkg)?.join(binary_name(&pkg.import_path)))
    }
}

/// Executable filename for an import path: its last path element
pub fn binary_name(import_path: &str) -> &str {
    import_path.rsplit('/').next().unwrap_or(import_path)
}

/// Turn an encoded slash-separated path into platform path components
fn segments(encoded: &str) -> PathBuf {
    encoded.split('/').collect()
}
