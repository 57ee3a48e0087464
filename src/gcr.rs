//! ## GCR 6-and-2 decoding module
//!
//! This handles one raw track capture as delivered by the controller: 7168 bytes,
//! one nibble per byte, already latched on the controller side.  A 16-sector track
//! carries per sector an address field (prolog `D5 AA 96`, four 4-and-4 pairs,
//! epilog `DE AA`) and a data field (prolog `D5 AA AD`, 342 encoded bytes plus one
//! checksum nibble, epilog `DE AA EB`).
//!
//! The 6-and-2 scheme stores the high six bits of each byte as one nibble and
//! multiplexes the low two bits of three bytes into shared auxiliary nibbles.  All
//! nibbles are chained with a running XOR, so one final nibble checks the whole
//! field.  The auxiliary block covers 258 low-bit slots for 256 bytes, which is why
//! the first demultiplexer column runs 84 entries while the other two run 86; do
//! not try to even them out.
//!
//! The forward encoder lives here too.  The tool never writes disks; the encoder
//! exists so the decoder can be proven against it.

use std::collections::HashMap;
use crate::{MAX_SECTORS,MAX_TRACKS,SECTOR_SIZE};

pub const ADDRESS_PROLOG: [u8;3] = [0xd5,0xaa,0x96];
pub const DATA_PROLOG: [u8;3] = [0xd5,0xaa,0xad];
pub const EPILOG: [u8;3] = [0xde,0xaa,0xeb];

/// prolog, four 4-and-4 pairs, first two epilog bytes
const ADDRESS_FIELD_SIZE: usize = 13;
/// 342 encoded bytes, checksum nibble, three epilog bytes; the prolog is not counted
const DATA_FIELD_SIZE: usize = 346;
/// a data field prolog more than this many bytes past the address field belongs to some other sector
const DATA_PROLOG_WINDOW: usize = 50;
/// track id reported when no address field on the capture could be decoded
pub const NO_TRACK: u8 = 255;

/// Enumerates field decoding errors.  All of these are recovered inside the track
/// scanner; they surface only in logs.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bad checksum found in a sector")]
    BadChecksum,
    #[error("field epilog mismatch")]
    EpilogMismatch,
    #[error("track or sector id out of range")]
    IdOutOfRange,
    #[error("field is truncated")]
    Truncated
}

/// encode a 6-bit value as a 6&2 nibble
const FWD_62: [u8;64] = [
    0x96, 0x97, 0x9a, 0x9b, 0x9d, 0x9e, 0x9f, 0xa6,
    0xa7, 0xab, 0xac, 0xad, 0xae, 0xaf, 0xb2, 0xb3,
    0xb4, 0xb5, 0xb6, 0xb7, 0xb9, 0xba, 0xbb, 0xbc,
    0xbd, 0xbe, 0xbf, 0xcb, 0xcd, 0xce, 0xcf, 0xd3,
    0xd6, 0xd7, 0xd9, 0xda, 0xdb, 0xdc, 0xdd, 0xde,
    0xdf, 0xe5, 0xe6, 0xe7, 0xe9, 0xea, 0xeb, 0xec,
    0xed, 0xee, 0xef, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6,
    0xf7, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe, 0xff
];

/// decode a 6&2 nibble, indexed by the low seven bits.  Invalid nibbles map to
/// zero and are left for the field checksum to catch.
const REV_62: [u8;128] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x03, 0x00, 0x04, 0x05, 0x06,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x08, 0x00, 0x00, 0x00, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
    0x00, 0x00, 0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x00, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1b, 0x00, 0x1c, 0x1d, 0x1e,
    0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x20, 0x21, 0x00, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x29, 0x2a, 0x2b, 0x00, 0x2c, 0x2d, 0x2e, 0x2f, 0x30, 0x31, 0x32,
    0x00, 0x00, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x00, 0x39, 0x3a, 0x3b, 0x3c, 0x3d, 0x3e, 0x3f
];

/// the low-bit pairs ride the disk with bits 0 and 1 exchanged
const FLIP: [u8;4] = [0,2,1,3];

/// encode a normal byte as two 4&4 nibbles
pub fn encode_44(val: u8) -> [u8;2] {
    [(val >> 1) | 0xaa, val | 0xaa]
}

/// decode two 4&4 nibbles as a normal byte
fn decode_44(nibs: [u8;2]) -> u8 {
    ((nibs[0] << 1) | (nibs[0] >> 7)) & nibs[1]
}

/// Decode an address field, given the 13 bytes starting at its prolog.
/// Returns (track,sector) if the epilog, the XOR checksum, and the id ranges all
/// check out.
pub fn decode_addr_field(field: &[u8]) -> Result<(u8,u8),Error> {
    if field.len() < ADDRESS_FIELD_SIZE {
        return Err(Error::Truncated);
    }
    if field[11] != EPILOG[0] || field[12] != EPILOG[1] {
        return Err(Error::EpilogMismatch);
    }
    let vol = decode_44([field[3],field[4]]);
    let track = decode_44([field[5],field[6]]);
    let sector = decode_44([field[7],field[8]]);
    let chksum = decode_44([field[9],field[10]]);
    if chksum != vol ^ track ^ sector {
        return Err(Error::BadChecksum);
    }
    if track as usize >= MAX_TRACKS || sector as usize >= MAX_SECTORS {
        return Err(Error::IdOutOfRange);
    }
    log::trace!("address field: volume {}, track {}, sector {}",vol,track,sector);
    Ok((track,sector))
}

/// Decode a data field, given the 346 bytes following its prolog.
/// Returns the 256 byte sector payload, or an error if the epilog or the running
/// XOR checksum fails.
pub fn decode_data_field(field: &[u8]) -> Result<Vec<u8>,Error> {
    if field.len() < DATA_FIELD_SIZE {
        return Err(Error::Truncated);
    }
    if field[343] != EPILOG[0] || field[344] != EPILOG[1] || field[345] != EPILOG[2] {
        return Err(Error::EpilogMismatch);
    }
    // undo the XOR chain; the first 86 values are the auxiliary low-bit block in
    // reverse order, the next 256 are the high six bits of each output byte
    let mut dec: u8 = 0;
    let mut aux: [u8;86] = [0;86];
    for i in 0..86 {
        dec ^= REV_62[(field[i] & 0x7f) as usize];
        aux[85-i] = dec;
    }
    let mut ans = vec![0;SECTOR_SIZE];
    for i in 0..SECTOR_SIZE {
        dec ^= REV_62[(field[86+i] & 0x7f) as usize];
        ans[i] = dec << 2;
    }
    if REV_62[(field[342] & 0x7f) as usize] != dec {
        return Err(Error::BadChecksum);
    }
    // demultiplex the auxiliary block into the low two bits of each byte.
    // 86 nibbles hold 258 pair slots for 256 bytes, hence 84/86/86.
    for i in 0..84 {
        ans[255-i] |= FLIP[((aux[2+i] >> 4) & 3) as usize];
    }
    for i in 0..86 {
        ans[171-i] |= FLIP[((aux[i] >> 2) & 3) as usize];
    }
    for i in 0..86 {
        ans[85-i] |= FLIP[(aux[i] & 3) as usize];
    }
    Ok(ans)
}

/// Encode a 256 byte sector payload as 343 nibbles, checksum included, prolog and
/// epilog excluded.  Inverse of `decode_data_field`.
pub fn encode_data_field(dat: &[u8;256]) -> Vec<u8> {
    let mut aux: [u8;86] = [0;86];
    let mut shift = 0;
    let mut pos = 85;
    for i in 0..SECTOR_SIZE {
        aux[pos] |= FLIP[(dat[i] & 3) as usize] << shift;
        if pos == 0 {
            pos = 86;
            shift += 2;
        }
        pos -= 1;
    }
    let mut ans = Vec::with_capacity(343);
    let mut chksum: u8 = 0;
    for i in (0..86).rev() {
        ans.push(FWD_62[(aux[i] ^ chksum) as usize]);
        chksum = aux[i];
    }
    for i in 0..SECTOR_SIZE {
        let torso = dat[i] >> 2;
        ans.push(FWD_62[(torso ^ chksum) as usize]);
        chksum = torso;
    }
    ans.push(FWD_62[chksum as usize]);
    ans
}

/// Encode an address field, prolog and epilog included.
pub fn encode_addr_field(vol: u8,track: u8,sector: u8) -> [u8;13] {
    let v = encode_44(vol);
    let t = encode_44(track);
    let s = encode_44(sector);
    let c = encode_44(vol ^ track ^ sector);
    [ADDRESS_PROLOG[0],ADDRESS_PROLOG[1],ADDRESS_PROLOG[2],
        v[0],v[1],t[0],t[1],s[0],s[1],c[0],c[1],
        EPILOG[0],EPILOG[1]]
}

/// Build a synthetic raw track the way the controller would capture a clean one:
/// for each physical sector an address field, one pad byte, and a data field,
/// padded out to the capture size with sync bytes.  This is the reference encoder
/// the decoder tests run against.
pub fn encode_track(vol: u8,track: u8,payloads: &[[u8;256];16]) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::with_capacity(crate::RAW_TRACK_SIZE);
    for sec in 0..MAX_SECTORS {
        ans.extend_from_slice(&[0xff;16]);
        ans.extend_from_slice(&encode_addr_field(vol,track,sec as u8));
        ans.push(EPILOG[2]);
        ans.extend_from_slice(&DATA_PROLOG);
        ans.extend_from_slice(&encode_data_field(&payloads[sec]));
        ans.extend_from_slice(&EPILOG);
    }
    ans.resize(crate::RAW_TRACK_SIZE,0xff);
    ans
}

fn find_pattern(buf: &[u8],patt: &[u8;3]) -> Option<usize> {
    buf.windows(patt.len()).position(|w| w==patt)
}

/// Scan a raw track capture and decode every sector that checks out.
/// Returns the track id recovered from the address fields (`NO_TRACK` if none
/// decoded) and the map from physical sector id to 256 byte payload.  The first
/// good copy of a sector wins; every failure is local, the scanner just moves on.
pub fn decode_track(raw: &[u8]) -> (u8,HashMap<u8,Vec<u8>>) {
    let mut sectors: HashMap<u8,Vec<u8>> = HashMap::new();
    let mut track_id = NO_TRACK;
    let mut ptr = 0;
    while sectors.len() < MAX_SECTORS {
        let start = match find_pattern(&raw[ptr..],&ADDRESS_PROLOG) {
            Some(off) => ptr + off,
            None => break
        };
        if raw.len() - start < ADDRESS_FIELD_SIZE {
            break;
        }
        let (track,sector) = match decode_addr_field(&raw[start..start+ADDRESS_FIELD_SIZE]) {
            Ok(ids) => ids,
            Err(e) => {
                log::trace!("skip address field at {} ({}): {}",start,
                    hex::encode(&raw[start..start+ADDRESS_FIELD_SIZE]),e);
                ptr = start + ADDRESS_PROLOG.len();
                continue;
            }
        };
        track_id = track;
        ptr = start + ADDRESS_FIELD_SIZE;
        // the matching data field prolog has to start within the gap window
        let horizon = usize::min(ptr + DATA_PROLOG_WINDOW + DATA_PROLOG.len(),raw.len());
        let body = match find_pattern(&raw[ptr..horizon],&DATA_PROLOG) {
            Some(off) => ptr + off + DATA_PROLOG.len(),
            None => {
                log::trace!("sector {} has no data field within {} bytes",sector,DATA_PROLOG_WINDOW);
                continue;
            }
        };
        if raw.len() - body < DATA_FIELD_SIZE {
            log::trace!("capture ends inside the data field of sector {}",sector);
            break;
        }
        match decode_data_field(&raw[body..body+DATA_FIELD_SIZE]) {
            Ok(dat) => {
                log::debug!("decoded track {} sector {}",track,sector);
                sectors.entry(sector).or_insert(dat);
                ptr = body + DATA_FIELD_SIZE;
            },
            Err(e) => {
                log::trace!("skip data field of sector {}: {}",sector,e);
                ptr = body;
            }
        }
    }
    (track_id,sectors)
}

#[test]
fn nibble_tables_are_inverse() {
    for val in 0..64 {
        assert_eq!(REV_62[(FWD_62[val as usize] & 0x7f) as usize],val);
    }
}
