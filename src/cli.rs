//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};

/// gobin - install and run versioned Go main packages
#[derive(Parser, Debug)]
#[command(
    name = "gobin",
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installs and runs versioned Go main packages",
    long_about = "gobin builds, installs, and possibly runs an executable binary for each of the \
                  named main packages. Each argument takes the form main_pkg[@version]; the \
                  version \"latest\" matches the latest available tagged version for the module \
                  containing the main package. Resolution consults the local module download \
                  cache first and only reaches the network when needed. Built binaries live \
                  under gobin/$module@$version/$main_pkg in your user cache directory (or under \
                  .gobincache next to go.mod when -m is given).",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  gobin example.com/cmd/foo@v1.0.0       \x1b[90m# Install a pinned version to $GOBIN\x1b[0m\n   \
                  gobin -p example.com/cmd/foo           \x1b[90m# Print its install cache location\x1b[0m\n   \
                  gobin --run example.com/cmd/foo -- -h  \x1b[90m# Run it with pass-through arguments\x1b[0m\n   \
                  gobin -m -u example.com/cmd/foo        \x1b[90m# Upgrade via the main module's go.mod\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Resolve dependencies via the main module (the enclosing go.mod)
    #[arg(short = 'm', long = "main-module")]
    pub main_module: bool,

    /// Run the provided main package
    #[arg(long = "run")]
    pub run: bool,

    /// Print the install cache location of each main package
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Stop after installing the main packages to the install cache
    #[arg(short = 'd', long = "download")]
    pub download: bool,

    /// Check the network for the latest tagged version of each main package
    #[arg(short = 'u', long = "upgrade")]
    pub upgrade: bool,

    /// Prevent network access; resolve from the local module cache only
    #[arg(long = "nonet")]
    pub no_network: bool,

    /// Print each toolchain invocation and its timing
    #[arg(long, env = "GOBIN_DEBUG")]
    pub debug: bool,

    /// Main packages as main_pkg[@version]; with --run, everything after the
    /// first package is passed to the program as its command line
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "PKG[@VERSION] [ARGS]..."
    )]
    pub packages: Vec<String>,
}
