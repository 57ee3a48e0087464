//! ## capture commands
//!
//! `capture` recovers a DOS 3.3 disk sector by sector and writes the logical
//! image plus its status log.  `raw` stores the controller's captures untouched
//! so a marginal disk can be decoded (and re-decoded) later without spinning
//! the drive again.

use std::io::Write;
use crate::STDRESULT;
use crate::drive::DrivePort;
use crate::image;

const RCH: &str = "unreachable was reached";

pub fn capture(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("output").expect(RCH);
    let retries = *cmd.get_one::<usize>("retries").expect(RCH);
    let dir = super::working_dir(cmd)?;
    // claim both output files before bothering the drive
    let mut bin_file = super::create_output(&dir.join(format!("{}.bin",name)))?;
    let mut txt_file = super::create_output(&dir.join(format!("{}.txt",name)))?;

    let mut session = super::open_session(cmd)?;
    session.enter_single_track_mode()?;
    println!("Reading VTOC to check DOS version and track count...");
    let (vtoc,tracks) = image::probe_vtoc(&mut session)?;
    println!("{}",vtoc);
    println!("Capturing {} tracks.",tracks);
    let disk = image::capture_disk(&mut session,tracks,retries)?;
    session.enter_main_loop()?;

    bin_file.write_all(&disk.data)?;
    for line in &disk.log {
        println!("{}",line);
        writeln!(txt_file,"{}",line)?;
    }
    Ok(())
}

pub fn raw(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("output").expect(RCH);
    let dir = super::working_dir(cmd)?;
    let mut raw_file = super::create_output(&dir.join(format!("{}.raw",name)))?;

    let mut session = super::open_session(cmd)?;
    session.enter_single_track_mode()?;
    println!("Capturing 40 raw tracks, best effort.");
    let raw = image::capture_raw_disk(&mut session)?;
    session.enter_main_loop()?;

    raw_file.write_all(&raw)?;
    Ok(())
}
