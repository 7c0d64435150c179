// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn start_type_reset_and_exit() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("pacer");
    let dir = tempfile::tempdir()?;
    let cmd = format!(
        "{} -d easy --config {}",
        bin.display(),
        dir.path().join("config.json").display()
    );

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Enter starts the test, then type a few characters
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("The")?;
    std::thread::sleep(Duration::from_millis(100));

    // Ctrl+R resets, ESC quits
    p.send("\x12")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
