//! ## Disk Image Module
//!
//! Composes the track layer into whole-disk operations: capturing every track of
//! a disk from the drive, and decoding a previously captured raw image offline.
//! Either way the product is the same: a flat image of 4096 byte logical tracks
//! plus one human readable status line per track.

use crate::{DYNERR,DEF_TRACKS,MAX_TRACKS,RAW_TRACK_SIZE,TRACK_SIZE};
use crate::drive::DrivePort;
use crate::dos33::{self,types::Vtoc,VTOC_TRACK};
use crate::track;

/// round value for best effort raw captures, where the format is unknown
pub const DEF_ROUND: u8 = 32;

#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("image size did not match the request")]
    ImageSizeMismatch
}

/// A recovered logical disk image with its per-track recovery record.
pub struct DiskImage {
    /// logical track images, concatenated
    pub data: Vec<u8>,
    /// one status line per track
    pub log: Vec<String>,
    /// per track, the logical sectors that never decoded
    pub missing: Vec<Vec<u8>>
}

impl DiskImage {
    /// The 4096 byte logical image of one track.
    pub fn track(&self,track: usize) -> &[u8] {
        &self.data[track*TRACK_SIZE..(track+1)*TRACK_SIZE]
    }
}

/// Read the directory track and decide how many tracks the capture should
/// cover.  The VTOC's declared count is honored only when the OS version byte
/// is 3 and the count is sane; anything else falls back to 35 tracks.
pub fn probe_vtoc(port: &mut dyn DrivePort) -> Result<(Vtoc,usize),DYNERR> {
    let reading = track::read_track(port,VTOC_TRACK,1)?;
    let vtoc = dos33::parse_vtoc(&reading.data,&reading.missing);
    let tracks = match (vtoc.version,vtoc.tracks as usize) {
        (3,t) if t >= 1 && t <= MAX_TRACKS => t,
        _ => {
            log::warn!("VTOC version or track count not usable, assuming {} tracks",DEF_TRACKS);
            DEF_TRACKS
        }
    };
    Ok((vtoc,tracks))
}

/// Capture a DOS 3.3 disk: every track goes through the retry controller and
/// lands in the image in logical order, zero filled where recovery failed.
/// The caller owns the session mode switches.
pub fn capture_disk(port: &mut dyn DrivePort,tracks: usize,repos_budget: usize) -> Result<DiskImage,DYNERR> {
    let mut ans = DiskImage {
        data: Vec::with_capacity(tracks*TRACK_SIZE),
        log: Vec::with_capacity(tracks),
        missing: Vec::with_capacity(tracks)
    };
    for trk in 0..tracks {
        let reading = track::read_track(port,trk as u8,repos_budget)?;
        ans.log.push(reading.status(trk));
        ans.missing.push(reading.missing);
        ans.data.extend_from_slice(&reading.data);
    }
    Ok(ans)
}

/// Capture all 40 tracks raw, one attempt each with the default round value.
/// A failed capture leaves a zero filled track in the file; with an unknown
/// format there is nothing better to do.
pub fn capture_raw_disk(port: &mut dyn DrivePort) -> Result<Vec<u8>,DYNERR> {
    let mut ans: Vec<u8> = Vec::with_capacity(MAX_TRACKS*RAW_TRACK_SIZE);
    for trk in 0..MAX_TRACKS {
        match port.capture_track(trk as u8,DEF_ROUND) {
            Ok(raw) => ans.extend_from_slice(&raw),
            Err(e) => {
                log::warn!("track {}: raw capture failed ({}), zero filling",trk,e);
                ans.extend_from_slice(&vec![0;RAW_TRACK_SIZE]);
            }
        }
    }
    Ok(ans)
}

/// Decode a raw disk image offline: 40 raw tracks of 7168 bytes each, no drive
/// interaction and no retries, the capture is what it is.
pub fn decode_raw_image(raw: &[u8]) -> Result<DiskImage,DYNERR> {
    if raw.len() != MAX_TRACKS*RAW_TRACK_SIZE {
        log::error!("expected {} bytes of raw tracks, found {}",MAX_TRACKS*RAW_TRACK_SIZE,raw.len());
        return Err(Box::new(Error::ImageSizeMismatch));
    }
    let mut ans = DiskImage {
        data: Vec::with_capacity(MAX_TRACKS*TRACK_SIZE),
        log: Vec::with_capacity(MAX_TRACKS),
        missing: Vec::with_capacity(MAX_TRACKS)
    };
    for trk in 0..MAX_TRACKS {
        let reading = track::decode_raw_track(&raw[trk*RAW_TRACK_SIZE..(trk+1)*RAW_TRACK_SIZE]);
        ans.log.push(reading.status(trk));
        ans.missing.push(reading.missing);
        ans.data.extend_from_slice(&reading.data);
    }
    Ok(ans)
}
