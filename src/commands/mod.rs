//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.  Every file the tool produces is
//! created fresh; an existing file is refused rather than overwritten.

pub mod capture;
pub mod scan;
pub mod decode;
pub mod catalog;
pub mod completions;

use std::path::{Path,PathBuf};
use crate::DYNERR;

const RCH: &str = "unreachable was reached";

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("Refusing to overwrite an existing file")]
    FileExists,
    #[error("Controller self test failed")]
    TestFailed
}

/// Open the drive session named by `--port` and hand it back ready for commands.
fn open_session(cmd: &clap::ArgMatches) -> Result<crate::drive::SerialSession,DYNERR> {
    let device = cmd.get_one::<String>("port").expect(RCH);
    crate::drive::SerialSession::open(device)
}

/// Resolve the working directory named by `--dir`, creating it if necessary.
fn working_dir(cmd: &clap::ArgMatches) -> Result<PathBuf,DYNERR> {
    let dir = PathBuf::from(cmd.get_one::<String>("dir").expect(RCH));
    if !dir.is_dir() {
        log::info!("creating working directory {}",dir.display());
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Create an output file, refusing to clobber anything that already exists.
fn create_output(path: &Path) -> Result<std::fs::File,DYNERR> {
    match std::fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind()==std::io::ErrorKind::AlreadyExists => {
            log::error!("file {} already exists",path.display());
            Err(Box::new(CommandError::FileExists))
        },
        Err(e) => Err(Box::new(e))
    }
}
