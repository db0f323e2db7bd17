//! gobin - installs and runs versioned Go main packages
//!
//! Each `main_pkg[@version]` argument is resolved (local module cache first,
//! network as a fallback), built in isolation into a content-addressed
//! install cache, and then installed, run, printed, or left in the cache.

use clap::Parser;

mod cache;
mod cli;
mod config;
mod encode;
mod error;
mod install;
mod pkg;
mod resolve;
mod temp;
mod toolchain;

use cli::Cli;
use config::{Config, Disposition};
use error::Result;
use install::Installer;
use pkg::PackageArg;
use toolchain::GoToolchain;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;

    // With --run only the first positional is a package spec; the rest is
    // the program's own command line.
    let (specs, run_args) = if config.disposition == Disposition::Run {
        cli.packages.split_at(1)
    } else {
        cli.packages.split_at(cli.packages.len())
    };

    let mut args = Vec::with_capacity(specs.len());
    for spec in specs {
        let arg = if config.main_module {
            PackageArg::in_dir(spec, config.cwd.clone())?
        } else {
            PackageArg::in_scratch_module(spec)?
        };
        args.push(arg);
    }

    let toolchain = GoToolchain::new(config.debug);
    let resolved = resolve::resolve_all(&config, &toolchain, &mut args)?;

    Installer::new(&config, &toolchain).install_all(&args, &resolved, run_args)
}
