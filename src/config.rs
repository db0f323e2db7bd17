//! Immutable run configuration
//!
//! Built once at startup from the parsed CLI and the environment; the
//! resolver and installer receive it by reference instead of consulting
//! process-global flags. Mutual-exclusion checks happen here, before any
//! toolchain subprocess is invoked.

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{GobinError, Result};

/// Import path under which gobin itself is published; installing it over the
/// currently-running binary triggers the self-overwrite protection.
pub const SELF_IMPORT_PATH: &str = "github.com/gobin-rs/gobin";

/// Environment variable overriding the user-scoped install cache root
pub const CACHE_DIR_ENV: &str = "GOBIN_CACHE_DIR";

/// Cache directory name under the user cache directory
const CACHE_DIR: &str = "gobin";

/// Cache directory name next to the main module's go.mod (main-module mode)
const MAIN_MODULE_CACHE_DIR: &str = ".gobincache";

/// Terminal action taken on each successfully built package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Copy the cache binary into the install directory (default)
    Install,
    /// Replace this process with the cache binary
    Run,
    /// Print the cache binary path
    Print,
    /// Stop once the binary is in the install cache
    Download,
}

/// Immutable configuration for one gobin run
#[derive(Debug)]
pub struct Config {
    pub main_module: bool,
    pub disposition: Disposition,
    pub upgrade: bool,
    pub no_network: bool,
    pub debug: bool,
    /// Directory gobin was invoked from
    pub cwd: PathBuf,
    /// Module download cache consulted during the local phase and pinned as
    /// the proxy during builds
    pub module_download_cache: PathBuf,
    /// Root of the gobin install cache
    pub cache_root: PathBuf,
    /// Destination directory for the default install disposition
    pub install_dir: PathBuf,
}

impl Config {
    /// Validate flag combinations and discover the cache layout from the
    /// environment. No subprocess runs before this returns.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        check_exclusions(cli)?;

        let cwd = env::current_dir().map_err(|e| GobinError::CurrentDirFailed {
            reason: e.to_string(),
        })?;

        let gopath = match env::var_os("GOPATH") {
            Some(val) if !val.is_empty() => env::split_paths(&val)
                .next()
                .ok_or(GobinError::HomeDirNotFound)?,
            _ => dirs::home_dir().ok_or(GobinError::HomeDirNotFound)?.join("go"),
        };

        // The module cache path is not advertised anywhere public, but this
        // is where the go tool keeps it.
        let module_download_cache = gopath.join("pkg").join("mod").join("cache").join("download");

        let cache_root = if cli.main_module {
            main_module_dir(&cwd)?.join(MAIN_MODULE_CACHE_DIR)
        } else {
            user_cache_root()?
        };

        let install_dir = match env::var_os("GOBIN") {
            Some(val) if !val.is_empty() => PathBuf::from(val),
            _ => gopath.join("bin"),
        };

        Ok(Self {
            main_module: cli.main_module,
            disposition: disposition(cli),
            upgrade: cli.upgrade,
            no_network: cli.no_network,
            debug: cli.debug,
            cwd,
            module_download_cache,
            cache_root,
            install_dir,
        })
    }

    /// Proxy value pinning the toolchain to the local module download cache
    pub fn local_proxy(&self) -> String {
        format!("file://{}", self.module_download_cache.display())
    }
}

fn disposition(cli: &Cli) -> Disposition {
    if cli.run {
        Disposition::Run
    } else if cli.print {
        Disposition::Print
    } else if cli.download {
        Disposition::Download
    } else {
        Disposition::Install
    }
}

fn check_exclusions(cli: &Cli) -> Result<()> {
    let dispositions: &[(&'static str, bool)] =
        &[("--run", cli.run), ("-p", cli.print), ("-d", cli.download)];
    for i in 0..dispositions.len() {
        for j in i + 1..dispositions.len() {
            let (first, first_set) = dispositions[i];
            let (second, second_set) = dispositions[j];
            if first_set && second_set {
                return Err(GobinError::FlagsMutuallyExclusive { first, second });
            }
        }
    }
    if cli.upgrade && cli.no_network {
        return Err(GobinError::FlagsMutuallyExclusive {
            first: "-u",
            second: "--nonet",
        });
    }
    Ok(())
}

/// Walk up from `start` to the nearest directory containing go.mod
fn main_module_dir(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("go.mod").is_file() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return Err(GobinError::MainModuleNotFound),
        }
    }
}

/// User-scoped install cache root: `GOBIN_CACHE_DIR` if set, otherwise the
/// platform cache directory (XDG on Linux, Library/Caches on macOS) plus a
/// `gobin` subdirectory.
fn user_cache_root() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CACHE_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let base = dirs::cache_dir().ok_or(GobinError::CacheDirNotFound)?;
    Ok(base.join(CACHE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gobin"];
        argv.extend_from_slice(args);
        argv.push("example.com/cmd/foo");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_and_print_mutually_exclusive() {
        let err = check_exclusions(&cli(&["--run", "-p"])).unwrap_err();
        assert!(matches!(err, GobinError::FlagsMutuallyExclusive { .. }));
        assert!(err.to_string().contains("--run"));
        assert!(err.to_string().contains("-p"));
    }

    #[test]
    fn test_print_and_download_mutually_exclusive() {
        assert!(check_exclusions(&cli(&["-p", "-d"])).is_err());
        assert!(check_exclusions(&cli(&["--run", "-d"])).is_err());
    }

    #[test]
    fn test_upgrade_and_nonet_mutually_exclusive() {
        let err = check_exclusions(&cli(&["-u", "--nonet"])).unwrap_err();
        assert!(
            err.to_string()
                .contains("the -u and --nonet flags are mutually exclusive")
        );
    }

    #[test]
    fn test_single_flags_accepted() {
        assert!(check_exclusions(&cli(&["--run"])).is_ok());
        assert!(check_exclusions(&cli(&["-p", "--nonet"])).is_ok());
        assert!(check_exclusions(&cli(&["-d", "-u"])).is_ok());
    }

    #[test]
    fn test_disposition_default_is_install() {
        assert_eq!(disposition(&cli(&[])), Disposition::Install);
        assert_eq!(disposition(&cli(&["--run"])), Disposition::Run);
        assert_eq!(disposition(&cli(&["-p"])), Disposition::Print);
        assert_eq!(disposition(&cli(&["-d"])), Disposition::Download);
    }

    #[test]
    fn test_main_module_dir_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/m\n").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = main_module_dir(&nested).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn test_main_module_dir_not_found() {
        let temp = TempDir::new().unwrap();
        let err = main_module_dir(temp.path()).unwrap_err();
        assert!(matches!(err, GobinError::MainModuleNotFound));
    }

    #[test]
    #[serial]
    fn test_user_cache_root_env_override() {
        unsafe {
            env::set_var(CACHE_DIR_ENV, "/custom/cache");
        }
        let root = user_cache_root().unwrap();
        unsafe {
            env::remove_var(CACHE_DIR_ENV);
        }
        assert_eq!(root, PathBuf::from("/custom/cache"));
    }

    #[test]
    #[serial]
    fn test_local_proxy_is_file_url() {
        unsafe {
            env::set_var(CACHE_DIR_ENV, "/custom/cache");
            env::remove_var("GOPATH");
        }
        let config = Config::from_cli(&cli(&[])).unwrap();
        unsafe {
            env::remove_var(CACHE_DIR_ENV);
        }
        assert!(config.local_proxy().starts_with("file://"));
        assert!(config.local_proxy().ends_with("download"));
    }
}
