//! ## offline decode command
//!
//! Runs the same decoder as `capture` against a stored `.raw` image, with no
//! drive in the loop.  Useful for re-running recovery after the disk has gone
//! back in its sleeve.

use std::io::Write;
use crate::STDRESULT;
use crate::dos33::{self,VTOC_TRACK};
use crate::image;

const RCH: &str = "unreachable was reached";

pub fn decode(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("file").expect(RCH);
    let dir = super::working_dir(cmd)?;
    let raw_path = dir.join(format!("{}.raw",name));
    let raw = std::fs::read(&raw_path)?;
    println!("Decoding {} ...",raw_path.display());
    let disk = image::decode_raw_image(&raw)?;
    for line in &disk.log {
        println!("{}",line);
    }

    let mut bin_file = super::create_output(&dir.join(format!("{}.bin",name)))?;
    bin_file.write_all(&disk.data)?;
    println!("Output written to {}.bin",dir.join(name).display());

    let dir_track = disk.track(VTOC_TRACK as usize);
    let vtoc = dos33::parse_vtoc(dir_track,&disk.missing[VTOC_TRACK as usize]);
    println!("{}",vtoc);
    for entry in dos33::read_catalog(dir_track) {
        println!("{}",dos33::catalog_line(&entry));
    }
    Ok(())
}
