//! ## Track Retry Controller
//!
//! A single capture rarely yields all sixteen sectors of a worn disk.  The
//! controller samples a self-clocked medium, so small changes in its rounding of
//! inter-pulse times shift which sectors come out clean.  The retry loop walks a
//! fixed schedule of round values, accumulates every newly decoded sector, and
//! after each full pass over the schedule forces the track motor to recalibrate.
//! Sectors that never decode are zero-filled and reported.

use std::collections::HashMap;
use crate::{DYNERR,MAX_SECTORS,SECTOR_SIZE,TRACK_SIZE};
use crate::drive::DrivePort;
use crate::{gcr,skew};

/// Round values handed to the controller, one per attempt, cycled.  The spread
/// explores sampling cadences on both sides of the nominal 32.
pub const ROUND_SCHEDULE: [u8;16] = [32,32,32,32,34,34,36,36,38,38,30,30,28,28,26,26];
/// Attempt budget when the reposition budget is zero (quick scan)
const FAST_MODE_ATTEMPTS: usize = 8;

/// Result of reading one track, with sectors already in logical order.
pub struct TrackRead {
    /// how many distinct physical sectors decoded
    pub sectors_read: usize,
    /// logical ids of the sectors that never decoded, ascending
    pub missing: Vec<u8>,
    /// round value that produced each newly decoded sector, in decode order
    pub rounds: Vec<u8>,
    /// 4096 bytes, sixteen sectors in logical order, missing ones zero filled
    pub data: Vec<u8>
}

impl TrackRead {
    /// One status log line in the fixed format of the capture log.
    pub fn status(&self,track: usize) -> String {
        if self.missing.is_empty() {
            format!("Track: {}: ok.",track)
        } else {
            format!("Track: {}: corrupt sectors: {:?}. List of round values: {:?}.",
                track,self.missing,self.rounds)
        }
    }
}

/// Lay a physical sector map out in logical order, zero-filling whatever is
/// missing.  Returns the 4096 byte logical track image and the ascending list of
/// missing logical sector ids.
pub fn assemble(phys: &HashMap<u8,Vec<u8>>) -> (Vec<u8>,Vec<u8>) {
    let mut data: Vec<u8> = Vec::with_capacity(TRACK_SIZE);
    let mut missing: Vec<u8> = Vec::new();
    for logical in 0..MAX_SECTORS {
        let physical = skew::DOS_LSEC_TO_DOS_PSEC[logical] as u8;
        match phys.get(&physical) {
            Some(dat) => data.extend_from_slice(dat),
            None => {
                missing.push(logical as u8);
                data.extend_from_slice(&[0;SECTOR_SIZE]);
            }
        }
    }
    (data,missing)
}

/// Read one track from the drive, retrying until all sixteen sectors decode or
/// the attempt budget is exhausted.
///
/// `repos_budget` is the number of motor repositioning cycles allowed; each one
/// buys a full pass over the round schedule.  Zero selects fast mode with a flat
/// budget of eight attempts and no repositioning.  Every capture consumes one
/// attempt, whether or not its address fields match the requested track.
pub fn read_track(port: &mut dyn DrivePort,track: u8,repos_budget: usize) -> Result<TrackRead,DYNERR> {
    let max_attempts = match repos_budget {
        0 => FAST_MODE_ATTEMPTS,
        n => ROUND_SCHEDULE.len() * n
    };
    let mut acc: HashMap<u8,Vec<u8>> = HashMap::new();
    let mut rounds: Vec<u8> = Vec::new();
    let mut attempts = 0;
    while acc.len() < MAX_SECTORS && attempts < max_attempts {
        let round = ROUND_SCHEDULE[attempts % ROUND_SCHEDULE.len()];
        attempts += 1;
        match port.capture_track(track,round) {
            Ok(raw) => {
                let (track_id,phys) = gcr::decode_track(&raw);
                if track_id == track {
                    for (sector,dat) in phys {
                        // first good copy wins, later ones are discarded
                        if !acc.contains_key(&sector) {
                            log::debug!("track {}: sector {} decoded with round {}",track,sector,round);
                            rounds.push(round);
                            acc.insert(sector,dat);
                        }
                    }
                } else {
                    log::debug!("track {}: capture reported track {}, discarding",track,track_id);
                }
            },
            Err(e) => log::warn!("track {}: capture attempt failed: {}",track,e)
        }
        // a full schedule pass without a complete track means the head may be
        // sitting badly, recalibrate before the next pass
        if acc.len() < MAX_SECTORS && attempts < max_attempts
            && repos_budget > 0 && attempts % ROUND_SCHEDULE.len() == 0 {
            if let Err(e) = port.reposition(track) {
                log::warn!("track {}: reposition failed: {}",track,e);
            }
        }
    }
    let sectors_read = acc.len();
    let (data,missing) = assemble(&acc);
    if sectors_read == MAX_SECTORS {
        log::info!("track {}: {} sectors decoded correctly",track,MAX_SECTORS);
    } else {
        log::warn!("track {}: incomplete read, logical sectors {:?} could not be decoded",track,missing);
    }
    Ok(TrackRead {
        sectors_read,
        missing,
        rounds,
        data
    })
}

/// Decode one previously captured raw track with no drive interaction.
/// The capture is fixed, so there is exactly one attempt and no round log.
pub fn decode_raw_track(raw: &[u8]) -> TrackRead {
    let (_track,phys) = gcr::decode_track(raw);
    let sectors_read = phys.len();
    let (data,missing) = assemble(&phys);
    TrackRead {
        sectors_read,
        missing,
        rounds: Vec::new(),
        data
    }
}
