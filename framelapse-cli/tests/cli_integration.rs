use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn framelapse_cmd() -> Command {
    let mut cmd = Command::cargo_bin("framelapse").expect("Failed to find framelapse binary");
    cmd.env_remove("FRAMELAPSE_OUTPUT_DIR")
        .env_remove("FRAMELAPSE_TEMP_DIR")
        .env_remove("FRAMELAPSE_WORKERS")
        .env_remove("RUST_LOG");
    cmd
}

fn convert_cmd(archive: &Path, dir: &Path) -> Command {
    let mut cmd = framelapse_cmd();
    cmd.arg("convert")
        .arg(archive)
        .arg("--output-dir")
        .arg(dir.join("outputs"))
        .arg("--temp-dir")
        .arg(dir.join("temp"));
    cmd
}

#[test]
fn test_convert_rejects_out_of_range_fps() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("shots.zip");
    fs::write(&archive, b"PK")?;

    convert_cmd(&archive, dir.path())
        .args(["--fps", "0"])
        .assert()
        .failure()
        .stderr(contains("FPS must be between 1 and 120"));

    convert_cmd(&archive, dir.path())
        .args(["--fps", "121"])
        .assert()
        .failure()
        .stderr(contains("FPS must be between 1 and 120"));

    // Validation happens before any directory is created.
    assert!(!dir.path().join("temp").exists());
    assert!(!dir.path().join("outputs").exists());
    Ok(())
}

#[test]
fn test_convert_rejects_out_of_range_interval() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("shots.zip");
    fs::write(&archive, b"PK")?;

    convert_cmd(&archive, dir.path())
        .args(["--interval", "0.05"])
        .assert()
        .failure()
        .stderr(contains("Interval must be between 0.1 seconds and 24 hours"));

    convert_cmd(&archive, dir.path())
        .args(["--interval", "86401"])
        .assert()
        .failure()
        .stderr(contains("Interval must be between"));
    Ok(())
}

#[test]
fn test_convert_missing_archive() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    convert_cmd(&dir.path().join("absent.zip"), dir.path())
        .assert()
        .failure()
        .stderr(contains("No input file"));
    Ok(())
}

#[test]
fn test_convert_rejects_non_zip() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("shots.tar");
    fs::write(&archive, b"not a zip")?;

    convert_cmd(&archive, dir.path())
        .assert()
        .failure()
        .stderr(contains("Only ZIP archives are accepted"));
    Ok(())
}

#[test]
fn test_convert_unknown_preset() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let archive = dir.path().join("shots.zip");
    fs::write(&archive, b"PK")?;

    convert_cmd(&archive, dir.path())
        .args(["--preset", "fireworks"])
        .assert()
        .failure()
        .stderr(contains("Unknown preset 'fireworks'"));
    Ok(())
}

#[test]
fn test_presets_listing() {
    framelapse_cmd()
        .arg("presets")
        .assert()
        .success()
        .stdout(contains("construction").and(contains("Construction Site")))
        .stdout(contains("traffic"));
}

#[test]
fn test_presets_json() -> Result<(), Box<dyn Error>> {
    let output = framelapse_cmd().args(["presets", "--json"]).output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["sunset"]["fps"], 30);
    assert_eq!(value["flowers"]["intervalSeconds"], 1800.0);
    Ok(())
}

#[test]
fn test_list_empty_directory() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    framelapse_cmd()
        .arg("list")
        .arg("--output-dir")
        .arg(dir.path().join("missing"))
        .assert()
        .success()
        .stdout(contains("No videos in"));
    Ok(())
}

#[test]
fn test_list_json() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("video_a.mp4"), b"12345")?;
    fs::write(dir.path().join("notes.txt"), b"x")?;

    let output = framelapse_cmd()
        .arg("list")
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--json")
        .output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["filename"], "video_a.mp4");
    assert_eq!(entries[0]["size"], 5);
    Ok(())
}

#[test]
fn test_delete_video() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let video = dir.path().join("video_a.mp4");
    fs::write(&video, b"x")?;

    framelapse_cmd()
        .args(["delete", "video_a.mp4", "--output-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Deleted video_a.mp4"));
    assert!(!video.exists());

    framelapse_cmd()
        .args(["delete", "video_a.mp4", "--output-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("Video not found"));
    Ok(())
}

#[test]
fn test_delete_rejects_path_traversal() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let outputs = dir.path().join("outputs");
    fs::create_dir(&outputs)?;
    let outside = dir.path().join("keep.mp4");
    fs::write(&outside, b"x")?;

    framelapse_cmd()
        .args(["delete", "../keep.mp4", "--output-dir"])
        .arg(&outputs)
        .assert()
        .failure()
        .stderr(contains("not a plain file name"));
    assert!(outside.exists());
    Ok(())
}
