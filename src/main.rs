//! # Command Line Interface
//!
//! Dispatch commands to `commands` module.

use env_logger;
use a2recover::commands;
use a2recover::commands::CommandError;
mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let main_cmd = cli::build_cli();
    let matches = main_cmd.get_matches();

    // Completions

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    // Controller self test

    if let Some(cmd) = matches.subcommand_matches("test") {
        return commands::scan::test(cmd);
    }

    // Quick scan of the diagnostic tracks

    if let Some(cmd) = matches.subcommand_matches("scan") {
        return commands::scan::scan(cmd);
    }

    // Read the catalog straight from the drive

    if let Some(cmd) = matches.subcommand_matches("dir") {
        return commands::scan::dir(cmd);
    }

    // Capture a disk in DOS 3.3 format

    if let Some(cmd) = matches.subcommand_matches("capture") {
        return commands::capture::capture(cmd);
    }

    // Capture a disk raw

    if let Some(cmd) = matches.subcommand_matches("raw") {
        return commands::capture::raw(cmd);
    }

    // Decode a raw capture offline

    if let Some(cmd) = matches.subcommand_matches("decode") {
        return commands::decode::decode(cmd);
    }

    // Catalog the images in the working directory

    if let Some(cmd) = matches.subcommand_matches("catalog") {
        return commands::catalog::catalog(cmd);
    }

    log::error!("No subcommand was found, try `a2recover --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
