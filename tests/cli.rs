#![cfg(feature = "cli")]

mod common;

use std::process::Command;

use anyhow::Result;
use tempfile::tempdir;

use common::{write_partition, THERMOSTAT_DAY};

fn replay() -> Command {
    Command::new(env!("CARGO_BIN_EXE_replay"))
}

#[test]
fn prints_only_the_result_on_stdout() -> Result<()> {
    let dir = tempdir()?;
    write_partition(dir.path(), "2016/01/01", THERMOSTAT_DAY);

    let output = replay()
        .args(["--field", "ambientTemp", "--field", "schedule", "--debug"])
        .arg(dir.path())
        .arg("2016-01-01T03:00")
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "{\"state\":{\"ambientTemp\":77.0,\"schedule\":false},\"ts\":\"2016-01-01T03:00:00\"}\n"
    );
    assert!(!output.stderr.is_empty(), "debug logs go to stderr");
    Ok(())
}

#[test]
fn failure_exits_non_zero_with_empty_stdout() -> Result<()> {
    let dir = tempdir()?;

    let output = replay()
        .args(["--field", "ambientTemp"])
        .arg(dir.path())
        .arg("2016-01-01T03:00")
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("2016/01/01.jsonl.gz"), "{stderr}");
    Ok(())
}

#[test]
fn field_is_required() -> Result<()> {
    let dir = tempdir()?;

    let output = replay().arg(dir.path()).arg("2016-01-01T03:00").output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn bad_timestamp_fails() -> Result<()> {
    let dir = tempdir()?;

    let output = replay()
        .args(["--field", "ambientTemp"])
        .arg(dir.path())
        .arg("yesterday")
        .output()?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr)?.contains("yesterday"));
    Ok(())
}
