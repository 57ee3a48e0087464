//! ## catalog command
//!
//! Walks every `.bin` image in the working directory and reports the DOS 3.3
//! catalogs it finds.  Two flavors are written: the short report is the legacy
//! catalog listing per image, the long report adds each file's track/sector
//! allocation list.  With `--json` the same information goes to stdout as JSON.

use std::io::Write;
use std::path::PathBuf;
use crate::{MAX_TRACKS,STDRESULT,TRACK_SIZE};
use crate::dos33::{self,VTOC_TRACK};
use crate::dos33::types::{DirectoryEntry,TsEntry};

const RCH: &str = "unreachable was reached";

/// track 17 must be entirely inside the image for a catalog to exist
const MIN_IMAGE_SIZE: usize = (VTOC_TRACK as usize + 1) * TRACK_SIZE;
const MAX_IMAGE_SIZE: usize = MAX_TRACKS * TRACK_SIZE;

fn heavy_rule(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out,"{}","=".repeat(98))
}

fn light_rule(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out,"{}","-".repeat(98))
}

fn write_header(out: &mut dyn Write,fname: &str) -> std::io::Result<()> {
    writeln!(out)?;
    heavy_rule(out)?;
    writeln!(out,"FILE: {}",fname)?;
    heavy_rule(out)
}

/// the short report: catalog listing only
fn write_short(out: &mut dyn Write,fname: &str,directory: &[DirectoryEntry]) -> std::io::Result<()> {
    write_header(out,fname)?;
    for entry in directory {
        writeln!(out,"{}",dos33::catalog_line(entry))?;
    }
    Ok(())
}

/// the long report: catalog listing plus allocation lists, ten pairs per line
fn write_long(out: &mut dyn Write,fname: &str,directory: &[DirectoryEntry],lists: &[Vec<TsEntry>]) -> std::io::Result<()> {
    write_short(out,fname,directory)?;
    writeln!(out)?;
    writeln!(out,"Detailed Track/Sector lists:")?;
    for (entry,list) in directory.iter().zip(lists) {
        light_rule(out)?;
        writeln!(out,"{}",dos33::catalog_line(entry))?;
        light_rule(out)?;
        for (i,ts) in list.iter().enumerate() {
            write!(out,"{:8}",ts.to_string())?;
            if (i+1) % 10 == 0 {
                writeln!(out)?;
            } else if i+1 != list.len() {
                write!(out,"  ")?;
            }
        }
        if list.len() % 10 != 0 {
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn json_catalog(fname: &str,directory: &[DirectoryEntry],lists: &[Vec<TsEntry>]) -> json::JsonValue {
    let mut files = json::JsonValue::new_array();
    for (entry,list) in directory.iter().zip(lists) {
        let mut tslist = json::JsonValue::new_array();
        for ts in list {
            match ts {
                TsEntry::Pair(t,s) => {
                    let mut pair = json::JsonValue::new_array();
                    pair.push(*t).expect(RCH);
                    pair.push(*s).expect(RCH);
                    tslist.push(pair).expect(RCH);
                },
                other => tslist.push(other.to_string()).expect(RCH)
            };
        }
        let mut file = json::JsonValue::new_object();
        file["name"] = entry.name.clone().into();
        file["type"] = entry.file_type.trim().into();
        file["locked"] = entry.file_type.contains('*').into();
        file["sectors"] = entry.sectors.into();
        file["tslist"] = tslist;
        files.push(file).expect(RCH);
    }
    let mut ans = json::JsonValue::new_object();
    ans["image"] = fname.into();
    ans["files"] = files;
    ans
}

pub fn catalog(cmd: &clap::ArgMatches) -> STDRESULT {
    let name = cmd.get_one::<String>("output").expect(RCH);
    let as_json = cmd.get_flag("json");
    let dir = super::working_dir(cmd)?;
    let pattern = dir.join("*.bin");
    let mut images: Vec<PathBuf> = glob::glob(pattern.to_str().expect(RCH))?
        .filter_map(Result::ok)
        .collect();
    images.sort();
    if images.is_empty() {
        log::warn!("no .bin images found in {}",dir.display());
    }

    let mut report = json::JsonValue::new_array();
    let mut short_file: Option<std::fs::File> = None;
    let mut long_file: Option<std::fs::File> = None;
    if !as_json {
        short_file = Some(super::create_output(&dir.join(format!("{}.info",name)))?);
        long_file = Some(super::create_output(&dir.join(format!("{}_with_sector_list.info",name)))?);
    }

    for path in &images {
        let fname = path.file_name().expect(RCH).to_string_lossy().to_string();
        let image = std::fs::read(path)?;
        if image.len() < MIN_IMAGE_SIZE || image.len() > MAX_IMAGE_SIZE {
            log::error!("file length of {} invalid ({} bytes)",fname,image.len());
            continue;
        }
        log::info!("processing {}",fname);
        let dir_track = &image[VTOC_TRACK as usize*TRACK_SIZE..MIN_IMAGE_SIZE];
        let directory = dos33::read_catalog(dir_track);
        let lists = dos33::read_sector_lists(&image,&directory);
        if as_json {
            report.push(json_catalog(&fname,&directory,&lists)).expect(RCH);
        } else {
            write_short(short_file.as_mut().expect(RCH),&fname,&directory)?;
            write_long(long_file.as_mut().expect(RCH),&fname,&directory,&lists)?;
        }
    }

    if as_json {
        println!("{}",json::stringify_pretty(report,4));
    } else {
        println!("Info written to {}.info and {}_with_sector_list.info",
            dir.join(name).display(),dir.join(name).display());
    }
    Ok(())
}
