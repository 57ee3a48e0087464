// test of whole-disk assembly: offline raw decode and the VTOC probe
use std::collections::HashMap;
use a2recover::{gcr,image};
use a2recover::drive::DrivePort;
use a2recover::{MAX_TRACKS,RAW_TRACK_SIZE,TRACK_SIZE};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;
type DYNERR = Box<dyn std::error::Error>;

/// physical payloads for the directory track: VTOC in sector 0, one catalog
/// sector in sector 15 (both are fixed points of the interleave)
fn dir_track_payloads(version: u8,tracks: u8) -> [[u8;256];16] {
    let mut p: [[u8;256];16] = [[0;256];16];
    p[0][1] = 17;       // first catalog track
    p[0][2] = 15;       // first catalog sector
    p[0][3] = version;  // DOS version
    p[0][6] = 254;      // volume
    p[0][0x34] = tracks;
    p[0][0x35] = 16;
    // one catalog entry: binary file HELLO, 3 sectors, T/S list at (18,0)
    p[15][11] = 18;
    p[15][12] = 0;
    p[15][13] = 0x04;
    for (i,b) in "HELLO".bytes().enumerate() {
        p[15][14+i] = b | 0x80;
    }
    for i in 19..44 {
        p[15][i] = 0xa0;
    }
    p[15][44] = 3;
    p
}

/// A drive whose disk is defined per track; anything not listed is unformatted.
struct DiskPort {
    tracks: HashMap<u8,Vec<u8>>
}

impl DrivePort for DiskPort {
    fn enter_single_track_mode(&mut self) -> STDRESULT {
        Ok(())
    }
    fn enter_main_loop(&mut self) -> STDRESULT {
        Ok(())
    }
    fn capture_track(&mut self,track: u8,_round: u8) -> Result<Vec<u8>,DYNERR> {
        match self.tracks.get(&track) {
            Some(raw) => Ok(raw.clone()),
            None => Ok(vec![0;RAW_TRACK_SIZE])
        }
    }
    fn reposition(&mut self,_track: u8) -> STDRESULT {
        Ok(())
    }
    fn self_test(&mut self) -> Result<bool,DYNERR> {
        Ok(true)
    }
}

fn disk_port(version: u8,tracks: u8) -> DiskPort {
    let mut map: HashMap<u8,Vec<u8>> = HashMap::new();
    for trk in 0..MAX_TRACKS as u8 {
        let payloads = match trk {
            17 => dir_track_payloads(version,tracks),
            _ => [[trk;256];16]
        };
        map.insert(trk,gcr::encode_track(254,trk,&payloads));
    }
    DiskPort { tracks: map }
}

#[test]
fn probe_honors_a_sane_vtoc() {
    let mut port = disk_port(3,40);
    let (vtoc,tracks) = image::probe_vtoc(&mut port).expect("probe failed");
    assert_eq!(vtoc.version,3);
    assert_eq!(vtoc.vol,254);
    assert_eq!(tracks,40);
}

#[test]
fn probe_falls_back_on_wrong_version() {
    let mut port = disk_port(2,40);
    let (_vtoc,tracks) = image::probe_vtoc(&mut port).expect("probe failed");
    assert_eq!(tracks,35);
}

#[test]
fn probe_falls_back_on_bad_track_count() {
    let mut port = disk_port(3,200);
    let (_vtoc,tracks) = image::probe_vtoc(&mut port).expect("probe failed");
    assert_eq!(tracks,35);
}

#[test]
fn capture_assembles_the_whole_disk() {
    let mut port = disk_port(3,35);
    let disk = image::capture_disk(&mut port,35,3).expect("capture failed");
    assert_eq!(disk.data.len(),35*TRACK_SIZE);
    assert_eq!(disk.log.len(),35);
    assert_eq!(disk.log[0],"Track: 0: ok.");
    assert!(disk.missing.iter().all(|m| m.is_empty()));
    // track 3 data sectors all carry the track number
    assert_eq!(disk.track(3)[0],3);
    // directory track carries the VTOC at logical sector 0
    assert_eq!(disk.track(17)[6],254);
}

#[test]
fn offline_decode_covers_forty_tracks() {
    let mut raw: Vec<u8> = Vec::new();
    for trk in 0..MAX_TRACKS as u8 {
        raw.extend_from_slice(&gcr::encode_track(254,trk,&[[trk;256];16]));
    }
    let disk = image::decode_raw_image(&raw).expect("decode failed");
    assert_eq!(disk.data.len(),MAX_TRACKS*TRACK_SIZE);
    assert_eq!(disk.log.len(),MAX_TRACKS);
    assert!(disk.log.iter().all(|l| l.ends_with("ok.")));
    for trk in 0..MAX_TRACKS {
        assert_eq!(disk.track(trk)[0],trk as u8);
    }
}

#[test]
fn offline_decode_reports_unformatted_tracks() {
    let mut raw = vec![0;MAX_TRACKS*RAW_TRACK_SIZE];
    for trk in 0..MAX_TRACKS {
        let capture = gcr::encode_track(254,trk as u8,&[[0x55;256];16]);
        raw[trk*RAW_TRACK_SIZE..(trk+1)*RAW_TRACK_SIZE].copy_from_slice(&capture);
    }
    // wipe track 20 entirely
    raw[20*RAW_TRACK_SIZE..21*RAW_TRACK_SIZE].fill(0);
    let disk = image::decode_raw_image(&raw).expect("decode failed");
    assert_eq!(disk.missing[20],(0..16).collect::<Vec<u8>>());
    assert!(disk.log[20].starts_with("Track: 20: corrupt sectors:"));
    assert_eq!(&disk.data[20*TRACK_SIZE..21*TRACK_SIZE],&vec![0;TRACK_SIZE][..]);
}

#[test]
fn offline_decode_refuses_odd_sizes() {
    let raw = vec![0;MAX_TRACKS*RAW_TRACK_SIZE-1];
    assert!(image::decode_raw_image(&raw).is_err());
}
