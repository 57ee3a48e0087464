//! # DOS 3.3 catalog module
//!
//! This interprets a recovered disk image as a DOS 3.3 volume.  Nothing here
//! touches the drive; the input is always a flat image of 4096 byte logical
//! tracks, possibly with zero-filled holes where sectors never decoded.
//!
//! The walkers are deliberately forgiving.  A recovered directory can be partly
//! garbage, so every structural check failure ends the walk cleanly with whatever
//! was parsed so far, and every out of range reference is skipped.  Walks over
//! pointer chains are bounded, so a looped or corrupt chain always terminates.

pub mod types;

use log::{debug,warn};
use types::*;
use crate::{MAX_SECTORS,MAX_TRACKS,SECTOR_SIZE,TRACK_SIZE};

/// track number hosting the VTOC and the catalog
pub const VTOC_TRACK: u8 = 17;
/// bound on catalog chain walks, in sectors
const MAX_DIRECTORY_REPS: usize = 100;
/// bound on T/S list chain walks, in sectors
const MAX_TSLIST_REPS: usize = 1000;

/// zero in every well formed catalog sector
const ZERO_BYTE_OFFSETS: [usize;9] = [0,3,4,5,6,7,8,9,10];
/// byte offsets of the seven file entries in a catalog sector
const FILE_ENTRY_OFFSETS: [usize;7] = [11,46,81,116,151,186,221];
/// byte offset of the first data pair in a T/S list sector
const FIRST_PAIR_OFFSET: usize = 12;
/// data pairs held by one T/S list sector
const MAX_PAIRS: usize = 122;

/// filenames are negative ASCII, drop the sign and the pad blanks
fn file_name_to_string(raw: &[u8]) -> String {
    let masked: Vec<u8> = raw.iter().map(|b| b & 0x7f).collect();
    match String::from_utf8(masked) {
        Ok(s) => s.trim_end().to_string(),
        Err(_) => String::from("FILE NAME COULD NOT BE DECODED")
    }
}

/// Interpret logical sector 0 of the directory track.  If that sector is in the
/// missing list the VTOC was never recovered and stand-in values come back.
pub fn parse_vtoc(dir_track: &[u8],missing: &[u8]) -> Vtoc {
    if missing.contains(&0) || dir_track.len() < TRACK_SIZE {
        warn!("VTOC info not present");
        return Vtoc::defaults();
    }
    Vtoc::from_track(dir_track)
}

/// Decode one catalog sector into directory entries.
/// Returns false if the sector fails its structural zero checks, which ends the
/// catalog walk.
fn decode_catalog_sector(sector: &[u8],directory: &mut Vec<DirectoryEntry>) -> bool {
    for i in ZERO_BYTE_OFFSETS {
        if sector[i] != 0 {
            debug!("catalog sector badly formatted at offset {}",i);
            return false;
        }
    }
    for i in FILE_ENTRY_OFFSETS {
        let tsl_track = sector[i];
        // 0 is an empty slot, 255 a deleted file
        if tsl_track == 0 || tsl_track == 0xff {
            continue;
        }
        if tsl_track as usize >= MAX_TRACKS || sector[i+1] as usize >= MAX_SECTORS {
            debug!("entry at offset {} points outside the disk, skipping",i);
            continue;
        }
        directory.push(DirectoryEntry {
            name: file_name_to_string(&sector[i+3..i+33]),
            file_type: file_type_tag(sector[i+2]),
            sectors: u16::from_le_bytes([sector[i+33],sector[i+34]]),
            tsl_track,
            tsl_sector: sector[i+1]
        });
    }
    true
}

/// Walk the catalog chain inside the directory track and return the directory.
/// `dir_track` is the 4096 byte logical image of the directory track, VTOC in
/// sector 0.  The walk ends at a null link, an out of range link, a structural
/// failure, or the rep bound, always returning what was parsed so far.
pub fn read_catalog(dir_track: &[u8]) -> Vec<DirectoryEntry> {
    let mut directory: Vec<DirectoryEntry> = Vec::new();
    if dir_track.len() < TRACK_SIZE {
        warn!("directory track is truncated");
        return directory;
    }
    let vtoc = Vtoc::from_track(dir_track);
    if !vtoc.catalog_on_dir_track() {
        warn!("catalog chain starts on track {}, expected track {}",vtoc.track1,VTOC_TRACK);
        return directory;
    }
    let mut sector = vtoc.sector1;
    for _rep in 0..MAX_DIRECTORY_REPS {
        if sector as usize >= MAX_SECTORS {
            warn!("invalid catalog link to sector {}",sector);
            break;
        }
        let offset = sector as usize * SECTOR_SIZE;
        let cat = &dir_track[offset..offset+SECTOR_SIZE];
        if !decode_catalog_sector(cat,&mut directory) {
            break;
        }
        let (next_track,next_sector) = (cat[1],cat[2]);
        if next_track == 0 && next_sector == 0 {
            break;
        }
        if next_track as usize >= MAX_TRACKS || next_sector as usize >= MAX_SECTORS {
            warn!("invalid catalog link to track {} sector {}",next_track,next_sector);
            break;
        }
        sector = next_sector;
    }
    directory
}

/// Walk one file's T/S list chain and return its allocation list, starting with
/// the first T/S list sector itself.  One unit of the declared length is
/// consumed per entry, T/S list sectors included.
fn read_sector_list(image: &[u8],entry: &DirectoryEntry) -> Vec<TsEntry> {
    let mut list: Vec<TsEntry> = Vec::new();
    let mut track = entry.tsl_track as usize;
    let mut sector = entry.tsl_sector as usize;
    if track >= MAX_TRACKS || sector >= MAX_SECTORS {
        return list;
    }
    list.push(TsEntry::Pair(track as u8,sector as u8));
    let mut remaining = (entry.sectors as usize).saturating_sub(1);
    for _rep in 0..MAX_TSLIST_REPS {
        if remaining == 0 {
            break;
        }
        let offset = track * TRACK_SIZE + sector * SECTOR_SIZE;
        if offset + SECTOR_SIZE > image.len() {
            list.push(TsEntry::Invalid);
            break;
        }
        let tsl = &image[offset..offset+SECTOR_SIZE];
        if (tsl[0] | tsl[3] | tsl[4]) != 0 {
            list.push(TsEntry::Invalid);
            break;
        }
        let count = usize::min(MAX_PAIRS,remaining);
        for p in 0..count {
            list.push(TsEntry::Pair(tsl[FIRST_PAIR_OFFSET+2*p],tsl[FIRST_PAIR_OFFSET+2*p+1]));
        }
        remaining -= count;
        if remaining == 0 {
            break;
        }
        // the file spills into another T/S list sector
        let (next_track,next_sector) = (tsl[1],tsl[2]);
        if next_track == 0 {
            list.push(TsEntry::InvalidContinuation);
            break;
        }
        if next_track as usize >= MAX_TRACKS || next_sector as usize >= MAX_SECTORS {
            list.push(TsEntry::Invalid);
            break;
        }
        list.push(TsEntry::Pair(next_track,next_sector));
        remaining -= 1;
        track = next_track as usize;
        sector = next_sector as usize;
    }
    list
}

/// Build the allocation list of every directory entry against the full disk
/// image.
pub fn read_sector_lists(image: &[u8],directory: &[DirectoryEntry]) -> Vec<Vec<TsEntry>> {
    directory.iter().map(|entry| read_sector_list(image,entry)).collect()
}

/// One line of the legacy catalog listing.
pub fn catalog_line(entry: &DirectoryEntry) -> String {
    format!("{} {:03} {}",entry.file_type,entry.sectors,entry.name)
}
