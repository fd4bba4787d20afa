use std::io::Write;

use clap::CommandFactory;

use super::*;

fn description() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "row-pins = 0 1\ncol-pins = 2 3\nwake-keys = 0:1\nkey 0 0 = a\nkey 1 1 = fn"
    )
    .unwrap();
    file
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(["kbc-config"].iter().chain(args)).unwrap()
}

#[test]
fn cli_is_well_formed() {
    Cli::command().debug_assert();
}

#[test]
fn validate_file() {
    let file = description();
    let path = file.path().to_str().unwrap();

    assert!(run(&cli(&["validate", path])).is_ok());
    assert!(run(&cli(&["validate", "-v", path])).is_ok());
}

#[test]
fn validate_reports_bad_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "row-pins = 0\ncol-pins = 1\nkey 0 0 = nosuchkey").unwrap();
    let path = file.path().to_str().unwrap();

    let err = run(&cli(&["validate", path])).unwrap_err();

    assert!(err.to_string().starts_with("Invalid description"), "{err}");
}

#[test]
fn validate_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.kbc");

    let err = run(&cli(&["validate", path.to_str().unwrap()])).unwrap_err();

    assert!(err.to_string().starts_with("Failed to load"), "{err}");
}

#[test]
fn timing_file() {
    let file = description();
    let path = file.path().to_str().unwrap();

    assert!(run(&cli(&["timing", "--wake", path])).is_ok());
}

#[test]
fn keycodes_list() {
    assert!(run(&cli(&["keycodes-list", "-v", "ctrl"])).is_ok());
    assert!(run(&cli(&["keycodes-list", "-s", "0x1d0"])).is_ok());
    assert!(run(&cli(&["keycodes-list", "0x300"])).is_err());
    assert!(run(&cli(&["keycodes-list", "0xzz"])).is_err());
}
