//! Two-phase package resolution
//!
//! Each argument is first resolved against the local module download cache
//! (skipped entirely under force-upgrade); arguments the local phase cannot
//! answer are queued for a network-enabled retry. Non-executable targets are
//! collected across all arguments and reported together instead of failing
//! on the first one.

use crate::config::Config;
use crate::error::{GobinError, Result};
use crate::pkg::{PackageArg, Resolution, ResolvedPackage};
use crate::toolchain::{ListedPackage, Toolchain};

/// Resolve every argument, in command-line order. On success the returned
/// vector is aligned with `args`: element `i` holds the main packages for
/// `args[i]`, and each argument's version pattern has been overwritten with
/// the concrete version introspection reported.
pub fn resolve_all<T: Toolchain>(
    config: &Config,
    toolchain: &T,
    args: &mut [PackageArg],
) -> Result<Vec<Vec<ResolvedPackage>>> {
    let mut outcomes: Vec<Vec<ResolvedPackage>> = vec![Vec::new(); args.len()];
    let mut net_queue: Vec<usize> = Vec::new();
    let mut non_main: Vec<usize> = Vec::new();

    if config.upgrade {
        // Force-upgrade resolves everything against the network
        net_queue.extend(0..args.len());
    } else {
        let proxy = config.local_proxy();
        for (i, arg) in args.iter_mut().enumerate() {
            match local_phase(config, toolchain, &proxy, arg)? {
                Resolution::Resolved(pkgs) => outcomes[i] = pkgs,
                Resolution::NotExecutable => non_main.push(i),
                Resolution::NeedsNetwork => net_queue.push(i),
            }
        }
    }

    // Local failures are fatal under --nonet, so nothing can be queued here.
    assert!(
        !(config.no_network && !net_queue.is_empty()),
        "invariant on network queue failed"
    );

    for i in net_queue {
        match network_phase(config, toolchain, &mut args[i])? {
            Resolution::Resolved(pkgs) => outcomes[i] = pkgs,
            Resolution::NotExecutable => non_main.push(i),
            Resolution::NeedsNetwork => unreachable!("network phase cannot queue itself"),
        }
    }

    if !non_main.is_empty() {
        non_main.sort_unstable();
        for &i in &non_main {
            eprintln!(
                "{}@{}: not a main package",
                args[i].pkg_pattern, args[i].ver_pattern
            );
        }
        return Err(GobinError::NonMainPackages {
            count: non_main.len(),
        });
    }

    Ok(outcomes)
}

/// Resolve one argument against the local module download cache only.
///
/// In main-module mode with no explicit version, the recorded version is
/// read straight from the enclosing go.mod (introspection without a fetch);
/// otherwise a local-proxy fetch precedes introspection. Any failure queues
/// the argument for the network phase, except under --nonet where it is
/// fatal.
fn local_phase<T: Toolchain>(
    config: &Config,
    toolchain: &T,
    proxy: &str,
    arg: &mut PackageArg,
) -> Result<Resolution> {
    let use_module_current = config.main_module && arg.ver_pattern.is_empty();

    let listed = (|| {
        if !use_module_current {
            toolchain.fetch(&arg.work_dir, &arg.spec, Some(proxy))?;
        }
        toolchain.list(&arg.work_dir, &arg.pkg_pattern, Some(proxy))
    })();

    match listed {
        Ok(pkgs) => Ok(inspect(arg, pkgs)),
        Err(err) if config.no_network => Err(err),
        Err(_) => Ok(Resolution::NeedsNetwork),
    }
}

/// Resolve one argument with network access allowed; any failure is fatal
fn network_phase<T: Toolchain>(
    config: &Config,
    toolchain: &T,
    arg: &mut PackageArg,
) -> Result<Resolution> {
    let use_module_current = config.main_module && arg.ver_pattern.is_empty();

    if !use_module_current {
        toolchain.fetch(&arg.work_dir, &arg.spec, None)?;
    }
    let pkgs = toolchain.list(&arg.work_dir, &arg.pkg_pattern, None)?;
    Ok(inspect(arg, pkgs))
}

/// Pin the argument's version to what introspection reported and check that
/// every matched package is a main package. A non-main match discards any
/// packages gathered so far; an argument never ends up with both.
fn inspect(arg: &mut PackageArg, pkgs: Vec<ListedPackage>) -> Resolution {
    let mut resolved = Vec::with_capacity(pkgs.len());
    for pkg in pkgs {
        arg.ver_pattern.clone_from(&pkg.module.version);
        if pkg.name != "main" {
            return Resolution::NotExecutable;
        }
        resolved.push(ResolvedPackage {
            import_path: pkg.import_path,
            module_path: pkg.module.path,
            module_version: pkg.module.version,
        });
    }
    Resolution::Resolved(resolved)
}
