//! Install orchestration and disposition dispatch
//!
//! Every resolved main package is built into its own directory under the
//! install cache (GOBIN pinned per invocation, GOPROXY pinned to the local
//! module download cache) and then dispatched: download-only, print the
//! cache path, run in place, or copy into the user's install directory.
//! The one shared-mutable hazard, gobin overwriting its own running binary,
//! is handled with an explicit remove-then-exclusive-create sequence.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use console::style;

use crate::cache::{self, CacheLayout};
use crate::config::{Config, Disposition, SELF_IMPORT_PATH};
use crate::error::{GobinError, Result};
use crate::pkg::{PackageArg, ResolvedPackage};
use crate::toolchain::Toolchain;

/// Builds resolved packages and performs the configured disposition
pub struct Installer<'a, T: Toolchain> {
    config: &'a Config,
    toolchain: &'a T,
    layout: CacheLayout,
    /// Whether an import path identifies this tool's own binary; injected so
    /// the self-overwrite path is testable without installing gobin itself
    is_self: Box<dyn Fn(&str) -> bool + 'a>,
}

impl<'a, T: Toolchain> Installer<'a, T> {
    pub fn new(config: &'a Config, toolchain: &'a T) -> Self {
        Self::with_self_predicate(config, toolchain, |import_path| {
            import_path == SELF_IMPORT_PATH
        })
    }

    pub fn with_self_predicate(
        config: &'a Config,
        toolchain: &'a T,
        is_self: impl Fn(&str) -> bool + 'a,
    ) -> Self {
        Self {
            config,
            toolchain,
            layout: CacheLayout::new(config.cache_root.clone()),
            is_self: Box::new(is_self),
        }
    }

    /// Build and dispatch every package: arguments in command-line order,
    /// sub-packages in introspection order. `resolved` is aligned with
    /// `args` as produced by [`crate::resolve::resolve_all`].
    pub fn install_all(
        &self,
        args: &[PackageArg],
        resolved: &[Vec<ResolvedPackage>],
        run_args: &[String],
    ) -> Result<()> {
        for (arg, pkgs) in args.iter().zip(resolved) {
            for pkg in pkgs {
                self.install_one(arg, pkg, run_args)?;
            }
        }
        Ok(())
    }

    fn install_one(
        &self,
        arg: &PackageArg,
        pkg: &ResolvedPackage,
        run_args: &[String],
    ) -> Result<()> {
        let bin_dir = self.layout.package_dir(pkg)?;
        let target = self.layout.binary_path(pkg)?;

        // A stale cache binary could be the image currently executing; drop
        // it before the build recreates it.
        if (self.is_self)(&pkg.import_path) {
            let _ = fs::remove_file(&target);
        }

        // Each build gets an exclusive GOBIN. Resolution already happened,
        // so the proxy stays pinned to the local download cache.
        self.toolchain.build(
            &arg.work_dir,
            &pkg.import_path,
            &bin_dir,
            &self.config.local_proxy(),
        )?;

        match self.config.disposition {
            Disposition::Download => Ok(()),
            Disposition::Print => {
                println!("{}", dunce::simplified(&target).display());
                Ok(())
            }
            Disposition::Run => run_in_place(&target, run_args),
            Disposition::Install => self.copy_to_install_dir(pkg, &target),
        }
    }

    fn copy_to_install_dir(&self, pkg: &ResolvedPackage, target: &Path) -> Result<()> {
        fs::create_dir_all(&self.config.install_dir).map_err(|e| GobinError::CreateDirFailed {
            path: self.config.install_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut src = File::open(target).map_err(|e| GobinError::OpenFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        })?;

        let dest_path = self
            .config
            .install_dir
            .join(cache::binary_name(&pkg.import_path));

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o755);
        }
        if (self.is_self)(&pkg.import_path) {
            // Never write into the currently-executing image: remove it and
            // require the copy to land in a brand-new file.
            let _ = fs::remove_file(&dest_path);
            options.create_new(true);
        }

        let mut dest = options
            .open(&dest_path)
            .map_err(|e| GobinError::OpenFailed {
                path: dest_path.display().to_string(),
                reason: e.to_string(),
            })?;

        io::copy(&mut src, &mut dest).map_err(|e| GobinError::CopyFailed {
            src: target.display().to_string(),
            dest: dest_path.display().to_string(),
            reason: e.to_string(),
        })?;

        println!(
            "{} {}@{} to {}",
            style("Installed").green(),
            pkg.import_path,
            pkg.module_version,
            dest_path.display()
        );

        Ok(())
    }
}

/// Hand control to the built binary, forwarding the trailing run arguments.
/// Replaces the process image on Unix; elsewhere, waits for the child and
/// exits with its code.
fn run_in_place(target: &Path, run_args: &[String]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = std::process::Command::new(target).args(run_args).exec();
        // exec only returns on failure
        Err(GobinError::ExecFailed {
            path: target.display().to_string(),
            reason: err.to_string(),
        })
    }
    #[cfg(not(unix))]
    {
        let status = std::process::Command::new(target)
            .args(run_args)
            .status()
            .map_err(|e| GobinError::ExecFailed {
                path: target.display().to_string(),
                reason: e.to_string(),
            })?;
        std::process::exit(status.code().unwrap_or(1));
    }
}
