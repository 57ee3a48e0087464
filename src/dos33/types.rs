use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use crate::dos33::VTOC_TRACK;

/// Enumerates the DOS 3.3 file types that have a catalog tag.  The low seven
/// bits of the type byte select the type, the high bit marks the file locked.
/// Available conversions: `as u8`, and `FileType::from_u8` via the
/// FromPrimitive trait.
#[derive(FromPrimitive,Clone,Copy,PartialEq)]
pub enum FileType {
    Text = 0x00,
    Integer = 0x01,
    Applesoft = 0x02,
    Binary = 0x04,
    TypeS = 0x08,
    Relocatable = 0x10,
    NewA = 0x20,
    NewB = 0x40
}

impl fmt::Display for FileType {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f,"T"),
            Self::Integer => write!(f,"I"),
            Self::Applesoft => write!(f,"A"),
            Self::Binary => write!(f,"B"),
            Self::TypeS => write!(f,"S"),
            Self::Relocatable => write!(f,"R"),
            Self::NewA => write!(f,"AT"),
            Self::NewB => write!(f,"BT")
        }
    }
}

/// Render a raw type byte as the 3 character catalog tag, e.g. `  T`, ` *T`,
/// `*AT`.  Locked files carry a star.  Bytes outside the 16 entry table come
/// back as `UDF`.
pub fn file_type_tag(byte: u8) -> String {
    match FileType::from_u8(byte & 0x7f) {
        Some(typ) => {
            let lock = match byte & 0x80 {
                0 => "",
                _ => "*"
            };
            format!("{:>3}",format!("{}{}",lock,typ))
        },
        None => String::from("UDF")
    }
}

/// Volume Table of Contents, the interesting subset of logical sector 0 of the
/// directory track.
pub struct Vtoc {
    pub version: u8,
    pub vol: u8,
    pub tracks: u8,
    pub sectors: u8,
    /// track of the first catalog sector
    pub track1: u8,
    /// sector of the first catalog sector
    pub sector1: u8
}

impl Vtoc {
    /// Pull the VTOC fields out of the directory track image (logical sector 0).
    pub fn from_track(dir_track: &[u8]) -> Self {
        Self {
            version: dir_track[3],
            vol: dir_track[6],
            tracks: dir_track[0x34],
            sectors: dir_track[0x35],
            track1: dir_track[1],
            sector1: dir_track[2]
        }
    }
    /// Stand-in values when the VTOC sector could not be recovered: assume the
    /// largest geometry so nothing is skipped, version 0 so nobody trusts it.
    pub fn defaults() -> Self {
        Self {
            version: 0,
            vol: 0,
            tracks: crate::MAX_TRACKS as u8,
            sectors: crate::MAX_SECTORS as u8,
            track1: 0,
            sector1: 0
        }
    }
    /// True when the catalog chain can be walked inside the directory track.
    pub fn catalog_on_dir_track(&self) -> bool {
        self.track1 == VTOC_TRACK
    }
}

impl fmt::Display for Vtoc {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"VTOC Info: DOS 3.{}, Volume: {}, Tracks: {}, Sectors: {}",
            self.version,self.vol,self.tracks,self.sectors)
    }
}

/// One catalog entry
pub struct DirectoryEntry {
    /// decoded ASCII filename, trailing blanks removed
    pub name: String,
    /// 3 character type tag
    pub file_type: String,
    /// declared file length in sectors, T/S list sectors included
    pub sectors: u16,
    /// track of the first T/S list sector
    pub tsl_track: u8,
    /// sector of the first T/S list sector
    pub tsl_sector: u8
}

/// One element of a file's allocation list
#[derive(Clone,PartialEq,Debug)]
pub enum TsEntry {
    /// a (track,sector) reference
    Pair(u8,u8),
    /// the list structure failed its zero checks or left the image
    Invalid,
    /// the chain ended while the declared length still had sectors to account for
    InvalidContinuation
}

impl fmt::Display for TsEntry {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair(t,s) => write!(f,"[{}, {}]",t,s),
            Self::Invalid => write!(f,"INVALID"),
            Self::InvalidContinuation => write!(f,"INVALID CONT.")
        }
    }
}
