//! ## Drive Port Module
//!
//! The controller firmware is an opaque collaborator on the far side of a serial
//! link.  It understands four commands: enter single-track mode, return to its
//! main loop, capture a track, and a self test.  This module owns the session and
//! speaks that protocol; everything above it works against the `DrivePort` trait,
//! which the tests implement with scripted captures.
//!
//! The firmware is the slow party.  A capture request blocks until the one byte
//! acknowledgement arrives and then streams exactly 7168 payload bytes; the only
//! way to detect a stalled controller is the read timeout on the port.

use std::io::{Read,Write};
use std::time::Duration;
use crate::{DYNERR,STDRESULT,RAW_TRACK_SIZE};

pub const BAUD_RATE: u32 = 500000;
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// capture command: `READ <track> <round>`
const CMD_READ: u8 = 0x80;
/// round value that turns a capture command into a motor reposition
const ROUND_REPOSITION: u8 = 0xff;
/// acknowledgement for a capture that will deliver payload
const ACK_READ: u8 = 0x40;
/// puts the firmware in single-track read mode
const CMD_SINGLE_TRACK: u8 = b'r';
/// returns the firmware to its main loop, firmware acks with one byte
const CMD_MAIN_LOOP: [u8;2] = [b'.',0xf0];
/// self test entry, loopback buffer request, and exit
const CMD_SELF_TEST: u8 = b't';
const CMD_TEST_BUFFER: u8 = 0xa0;
const CMD_TEST_END: u8 = 0xf0;
/// final self test acknowledgement when everything passed
const ACK_TEST_OK: u8 = 0x60;

/// Enumerates transport errors.  The retry controller treats any of these as an
/// attempt that produced no sectors; they are fatal only during session setup.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("controller acknowledged with unexpected code {0:#04x}")]
    BadAck(u8),
    #[error("payload truncated at {0} of {1} bytes")]
    Truncated(usize,usize),
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error)
}

/// The four firmware operations.  Library code takes `&mut dyn DrivePort` so the
/// drive can be replaced by a scripted double in tests.
pub trait DrivePort {
    /// put the firmware in single-track read mode; captures only work in this mode
    fn enter_single_track_mode(&mut self) -> STDRESULT;
    /// leave single-track read mode and return the firmware to its main loop
    fn enter_main_loop(&mut self) -> STDRESULT;
    /// capture one track with the given round value, returns 7168 raw bytes
    fn capture_track(&mut self,track: u8,round: u8) -> Result<Vec<u8>,DYNERR>;
    /// force the track motor to recalibrate and return to the given track
    fn reposition(&mut self,track: u8) -> STDRESULT;
    /// run the firmware self test, true means the link and buffer both passed
    fn self_test(&mut self) -> Result<bool,DYNERR>;
}

/// Serial session with the controller board.  One session owns the port for its
/// whole lifetime; there is no concurrency to arbitrate.
pub struct SerialSession {
    port: Box<dyn serialport::SerialPort>
}

impl SerialSession {
    /// Open the named serial device at the controller's fixed rate (8N1) and give
    /// the board a moment to settle after the port toggles its reset line.
    pub fn open(device: &str) -> Result<Self,DYNERR> {
        log::info!("setting up serial port {}",device);
        let port = serialport::new(device,BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()?;
        std::thread::sleep(Duration::from_secs(1));
        Ok(Self { port })
    }
    /// read one acknowledgement byte
    fn read_ack(&mut self) -> Result<u8,Error> {
        let mut ack: [u8;1] = [0;1];
        self.port.read_exact(&mut ack)?;
        Ok(ack[0])
    }
    /// Read an exact payload, tolerating chunked arrival.  A timeout mid-payload
    /// reports how far the transfer got.
    fn read_payload(&mut self,count: usize) -> Result<Vec<u8>,Error> {
        let mut buf = vec![0;count];
        let mut filled = 0;
        while filled < count {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => return Err(Error::Truncated(filled,count)),
                Ok(n) => filled += n,
                Err(e) if e.kind()==std::io::ErrorKind::TimedOut => {
                    return Err(Error::Truncated(filled,count));
                },
                Err(e) => return Err(Error::Io(e))
            }
        }
        Ok(buf)
    }
}

impl DrivePort for SerialSession {
    fn enter_single_track_mode(&mut self) -> STDRESULT {
        self.port.write_all(&[CMD_SINGLE_TRACK])?;
        Ok(())
    }
    fn enter_main_loop(&mut self) -> STDRESULT {
        self.port.write_all(&CMD_MAIN_LOOP)?;
        self.read_ack()?;
        Ok(())
    }
    fn capture_track(&mut self,track: u8,round: u8) -> Result<Vec<u8>,DYNERR> {
        self.port.write_all(&[CMD_READ,track,round])?;
        let ack = self.read_ack()?;
        if ack != ACK_READ {
            log::debug!("capture of track {} refused with code {:#04x}",track,ack);
            return Err(Box::new(Error::BadAck(ack)));
        }
        let raw = self.read_payload(RAW_TRACK_SIZE)?;
        Ok(raw)
    }
    fn reposition(&mut self,track: u8) -> STDRESULT {
        log::debug!("repositioning motor at track {}",track);
        self.port.write_all(&[CMD_READ,track,ROUND_REPOSITION])?;
        // the firmware always acks a reposition, the code does not matter
        self.read_ack()?;
        Ok(())
    }
    fn self_test(&mut self) -> Result<bool,DYNERR> {
        self.port.write_all(&[CMD_SELF_TEST])?;
        self.port.write_all(&[CMD_TEST_BUFFER])?;
        self.read_ack()?;
        let buf = self.read_payload(RAW_TRACK_SIZE)?;
        log::trace!("self test buffer starts {}",hex::encode(&buf[0..16]));
        self.port.write_all(&[CMD_TEST_END])?;
        let ack = self.read_ack()?;
        Ok(ack==ACK_TEST_OK)
    }
}
