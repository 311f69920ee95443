//! # sofainfo
//!
//! Prints the attributes, dimensions, positions and response data of a SOFA
//! file.
//!
//! ## Usage
//!
//! ```bash
//! # Summary of a file
//! sofainfo hrtf.sofa
//!
//! # Only some sections
//! sofainfo --config sofainfo.toml directivity.sofa
//!
//! # Validation report against every supported convention
//! sofainfo --report hrtf.sofa
//! ```
//!
//! Exit code 0 on success, on help, and for files that are not valid SOFA
//! (a verdict is printed); 1 on open or read errors and on failed reports.

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match cli::dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
