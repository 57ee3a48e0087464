//! ## drive inspection commands
//!
//! `test` exercises the serial link and the controller's capture buffer,
//! `scan` gives a quick judgement of a disk without committing to a full
//! capture, and `dir` shows the catalog straight off the drive.

use crate::{MAX_SECTORS,STDRESULT};
use crate::drive::DrivePort;
use crate::commands::CommandError;
use crate::dos33::{self,VTOC_TRACK};
use crate::track;

/// tracks worth looking at in a quick scan: the boot area and the directory
const QUICK_SCAN_TRACKS: [u8;6] = [0,1,2,3,4,VTOC_TRACK];

pub fn test(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut session = super::open_session(cmd)?;
    println!("Testing serial connection to the controller...");
    if session.self_test()? {
        println!("ok.");
        Ok(())
    } else {
        println!("failed.");
        Err(Box::new(CommandError::TestFailed))
    }
}

pub fn scan(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut session = super::open_session(cmd)?;
    session.enter_single_track_mode()?;
    for trk in QUICK_SCAN_TRACKS {
        // fast mode: flat budget of 8 attempts, no repositioning
        let reading = track::read_track(&mut session,trk,0)?;
        println!("Track {}: {} of {} sectors decoded.",trk,reading.sectors_read,MAX_SECTORS);
    }
    session.enter_main_loop()?;
    Ok(())
}

pub fn dir(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut session = super::open_session(cmd)?;
    session.enter_single_track_mode()?;
    let reading = track::read_track(&mut session,VTOC_TRACK,1)?;
    session.enter_main_loop()?;
    let vtoc = dos33::parse_vtoc(&reading.data,&reading.missing);
    println!("{}",vtoc);
    for entry in dos33::read_catalog(&reading.data) {
        println!("{}",dos33::catalog_line(&entry));
    }
    Ok(())
}
