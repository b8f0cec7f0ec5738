//! Command line tool clearing the process manifest of a Windows executable.
//!
//! `rmmanifest <exe>` stores an empty manifest resource in the executable and prints nothing on success.
//! Errors print the usage text or the raw platform error code and exit with status 1.
//! A leading `--` ends option parsing and is not taken as the executable, `rmmanifest -- <exe>`
//! patches `<exe>`.
//! Set `RUST_LOG=debug` for a detailed log of the resource update.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{debug, error};
use rmmanifest::{FileUpdater, ManifestPatch};

/// Remove the manifest of a Windows executable.
#[derive(Parser, Debug)]
#[command(name = "rmmanifest", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Executable to patch. Additional arguments are ignored, a leading `--` is skipped.
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = match Cli::try_parse() {
        Ok(cli) => cli.args,
        Err(error) => {
            debug!("failed to parse arguments: {}", error);
            Vec::new()
        }
    };
    if args.len() > 1 {
        debug!("ignoring {} additional arguments", args.len() - 1);
    }

    match ManifestPatch::default().run(&FileUpdater, args.first().map(PathBuf::as_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            eprintln!("{}", error.diagnostic());
            ExitCode::from(error.exit_code())
        }
    }
}
