//! Error types and handling for gobin
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every fatal condition surfaces as a single diagnostic line on stderr; the
//! only multi-error path is the non-main-package aggregation in the resolver.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for gobin operations
#[derive(Error, Diagnostic, Debug)]
pub enum GobinError {
    // Configuration errors
    #[error("the {first} and {second} flags are mutually exclusive")]
    #[diagnostic(
        code(gobin::config::mutually_exclusive),
        help("Pick one disposition (--run, -p, -d) and one network policy (-u, --nonet)")
    )]
    FlagsMutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },

    // Environment errors
    #[error("failed to determine user home directory")]
    #[diagnostic(code(gobin::env::home_dir))]
    HomeDirNotFound,

    #[error("failed to determine user cache directory")]
    #[diagnostic(code(gobin::env::cache_dir))]
    CacheDirNotFound,

    #[error("failed to get working directory: {reason}")]
    #[diagnostic(code(gobin::env::working_dir))]
    CurrentDirFailed { reason: String },

    #[error("could not find main module")]
    #[diagnostic(
        code(gobin::env::main_module),
        help("Run inside a directory tree containing go.mod, or drop the -m flag")
    )]
    MainModuleNotFound,

    // Package argument errors
    #[error("invalid package specification: {spec}")]
    #[diagnostic(
        code(gobin::pkg::invalid_spec),
        help("Arguments take the form main_pkg[@version], e.g. example.com/cmd/foo@v1.0.0")
    )]
    InvalidPackageSpec { spec: String },

    #[error("failed to initialise temporary module: {reason}")]
    #[diagnostic(code(gobin::pkg::scratch_module))]
    ScratchModuleFailed { reason: String },

    // Cache path encoding errors
    #[error("failed to encode path {path}: {reason}")]
    #[diagnostic(
        code(gobin::cache::encoding_failed),
        help(
            "Module and package paths may only contain ASCII letters, digits, and -._~+ between / separators"
        )
    )]
    EncodingFailed { path: String, reason: String },

    // Toolchain errors
    #[error("failed to {command}: {reason}\n{output}")]
    #[diagnostic(code(gobin::toolchain::command_failed))]
    ToolchainFailed {
        command: String,
        reason: String,
        output: String,
    },

    #[error("failed to decode package listing: {reason}")]
    #[diagnostic(code(gobin::toolchain::decode_failed))]
    ListDecodeFailed { reason: String },

    // Resolution errors
    #[error("failed to resolve module-based main package{}", plural_s(.count))]
    #[diagnostic(
        code(gobin::resolve::non_main),
        help("Every package argument must name a main (executable) package")
    )]
    NonMainPackages { count: usize },

    // Dispatch errors
    #[error("failed to exec {path}: {reason}")]
    #[diagnostic(code(gobin::install::exec_failed))]
    ExecFailed { path: String, reason: String },

    #[error("failed to mkdir {path}: {reason}")]
    #[diagnostic(code(gobin::install::mkdir_failed))]
    CreateDirFailed { path: String, reason: String },

    #[error("failed to open {path}: {reason}")]
    #[diagnostic(code(gobin::install::open_failed))]
    OpenFailed { path: String, reason: String },

    #[error("failed to copy {src} to {dest}: {reason}")]
    #[diagnostic(code(gobin::install::copy_failed))]
    CopyFailed {
        src: String,
        dest: String,
        reason: String,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(gobin::fs::io_error))]
    IoError { message: String },
}

fn plural_s(count: &usize) -> &'static str {
    if *count == 1 { "" } else { "s" }
}

impl From<std::io::Error> for GobinError {
    fn from(err: std::io::Error) -> Self {
        GobinError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GobinError {
    fn from(err: serde_json::Error) -> Self {
        GobinError::ListDecodeFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, GobinError>;
