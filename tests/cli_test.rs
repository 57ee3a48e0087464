// end to end runs of the offline subcommands in a scratch working directory
use assert_cmd::cargo; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use a2recover::gcr;
use a2recover::MAX_TRACKS;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// physical payloads for the directory track: VTOC in sector 0, one catalog
/// sector in sector 15
fn dir_track_payloads() -> [[u8;256];16] {
    let mut p: [[u8;256];16] = [[0;256];16];
    p[0][1] = 17;
    p[0][2] = 15;
    p[0][3] = 3;
    p[0][6] = 254;
    p[0][0x34] = 35;
    p[0][0x35] = 16;
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

/// a full raw disk capture of a healthy DOS 3.3 disk
fn raw_disk() -> Vec<u8> {
    let mut raw: Vec<u8> = Vec::new();
    for trk in 0..MAX_TRACKS as u8 {
        let payloads = match trk {
            17 => dir_track_payloads(),
            _ => [[trk;256];16]
        };
        raw.extend_from_slice(&gcr::encode_track(254,trk,&payloads));
    }
    raw
}

#[test]
fn decode_then_catalog() -> STDRESULT {
    let scratch = tempfile::tempdir()?;
    let dir = scratch.path().join("disks");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join("mydisk.raw"),raw_disk())?;

    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("decode")
        .arg("-d").arg(&dir)
        .arg("-f").arg("mydisk")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track: 0: ok."))
        .stdout(predicate::str::contains("Track: 39: ok."))
        .stdout(predicate::str::contains("Volume: 254"))
        .stdout(predicate::str::contains("  B 003 HELLO"));
    let bin = std::fs::read(dir.join("mydisk.bin"))?;
    assert_eq!(bin.len(),MAX_TRACKS*4096);

    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("catalog")
        .arg("-d").arg(&dir)
        .arg("-o").arg("report")
        .assert()
        .success();
    let short = std::fs::read_to_string(dir.join("report.info"))?;
    assert!(short.contains("FILE: mydisk.bin"));
    assert!(short.contains("  B 003 HELLO"));
    let long = std::fs::read_to_string(dir.join("report_with_sector_list.info"))?;
    assert!(long.contains("Detailed Track/Sector lists:"));
    assert!(long.contains("[18, 0]"));
    Ok(())
}

#[test]
fn decode_refuses_to_overwrite() -> STDRESULT {
    let scratch = tempfile::tempdir()?;
    let dir = scratch.path().join("disks");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join("mydisk.raw"),raw_disk())?;

    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("decode").arg("-d").arg(&dir).arg("-f").arg("mydisk").assert().success();
    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("decode")
        .arg("-d").arg(&dir)
        .arg("-f").arg("mydisk")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn catalog_as_json() -> STDRESULT {
    let scratch = tempfile::tempdir()?;
    let dir = scratch.path().join("disks");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join("mydisk.raw"),raw_disk())?;
    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("decode").arg("-d").arg(&dir).arg("-f").arg("mydisk").assert().success();

    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    let output = cmd.arg("catalog")
        .arg("-d").arg(&dir)
        .arg("--json")
        .output()?;
    assert!(output.status.success());
    let parsed = json::parse(std::str::from_utf8(&output.stdout)?)?;
    assert_eq!(parsed[0]["image"],"mydisk.bin");
    assert_eq!(parsed[0]["files"][0]["name"],"HELLO");
    assert_eq!(parsed[0]["files"][0]["sectors"],3);
    assert_eq!(parsed[0]["files"][0]["tslist"][0][0],18);
    Ok(())
}

#[test]
fn decode_rejects_short_raw_files() -> STDRESULT {
    let scratch = tempfile::tempdir()?;
    let dir = scratch.path().join("disks");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join("short.raw"),vec![0;1234])?;
    let mut cmd = cargo::cargo_bin_cmd!("a2recover");
    cmd.arg("decode")
        .arg("-d").arg(&dir)
        .arg("-f").arg("short")
        .assert()
        .failure();
    Ok(())
}
