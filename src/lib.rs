//! # `a2recover` main library
//!
//! This library recovers the contents of 5.25 inch DOS 3.3 disks that are read
//! through an external microcontroller disk controller.  The controller delivers a
//! raw nibble capture of one track at a time over a serial link; everything above
//! that is done here on the host.
//!
//! ## Architecture
//!
//! Recovery is built around three layers:
//! * `drive` owns the serial session and speaks the controller's command protocol.
//!   Everything that needs the drive takes a `drive::DrivePort` trait object, so the
//!   decoding layers never see a serial port.
//! * `gcr` turns one raw 7168 byte capture into decoded 256 byte sectors, and
//!   `track` coordinates repeated captures of the same track until all sixteen
//!   sectors are recovered or the attempt budget runs out.
//! * `dos33` interprets an assembled disk image as a DOS 3.3 volume: VTOC, catalog
//!   chain, and per-file track/sector lists.
//!
//! ## Images
//!
//! Two flat file formats are handled:
//! * `.raw` — 40 tracks of 7168 raw capture bytes each, written by the `raw`
//!   subcommand and decoded offline by `decode`.
//! * `.bin` — 35 or 40 tracks of 4096 bytes each, sixteen 256 byte sectors in
//!   logical order.  This is what `capture` and `decode` produce and what the
//!   catalog walker consumes.
//!
//! ## Error recovery
//!
//! Format level errors (bad checksums, missing fields) never surface; the scanner
//! skips the sector and the retry controller tries again with a different round
//! value.  Only host I/O problems and unrecoverable session errors reach the
//! caller.

pub mod drive;
pub mod gcr;
pub mod skew;
pub mod track;
pub mod image;
pub mod dos33;
pub mod commands;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Sectors per track in 16-sector DOS 3.3 format
pub const MAX_SECTORS: usize = 16;
/// Net storage capacity of one sector
pub const SECTOR_SIZE: usize = 256;
/// Net storage capacity of one track, sixteen 256 byte sectors
pub const TRACK_SIZE: usize = MAX_SECTORS * SECTOR_SIZE;
/// Maximum track count in DOS 3.3 format (160K disks)
pub const MAX_TRACKS: usize = 40;
/// Default track count in DOS 3.3 format (140K disks)
pub const DEF_TRACKS: usize = 35;
/// Bytes in one raw track capture as delivered by the controller
pub const RAW_TRACK_SIZE: usize = 7 * 1024;
