use std::fs;
use std::path::{Path, PathBuf};

/// Build cache directory the fixture transcripts are rendered with
pub const CACHE: &str = "/tmp/arduino/sketches/5E1A07C2";

/// Probe sketch name the fixture transcripts are rendered with
pub const SKETCH: &str = "harvest_t3st01";

/// Toolchain directory used verbatim in the fixture transcripts
pub const FIXTURE_TOOLS: &str = "/opt/arduino/tools/avr-gcc/bin";

pub const TOOL_NAMES: [&str; 4] = ["avr-g++", "avr-gcc", "avr-gcc-ar", "avr-objcopy"];

#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The AVR transcript with its cache and sketch placeholders filled in
#[allow(dead_code)]
pub fn avr_transcript(cache: &str, sketch: &str) -> String {
    fs::read_to_string(fixture_path("avr_uno_compile.txt"))
        .expect("Failed to read fixture")
        .replace("@CACHE@", cache)
        .replace("@SKETCH@", sketch)
}

#[allow(dead_code)]
pub fn fixture_programs() -> Vec<String> {
    TOOL_NAMES
        .iter()
        .map(|tool| format!("{}/{}", FIXTURE_TOOLS, tool))
        .collect()
}

#[allow(dead_code)]
pub fn harvest_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_arduino-harvest"))
}

/// Writes an executable shell script
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    let mut permissions = fs::metadata(path).expect("Failed to stat script").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).expect("Failed to chmod script");
}

/// Creates do-nothing stand-ins for the AVR toolchain under `dir/bin`
#[cfg(unix)]
#[allow(dead_code)]
pub fn fake_toolchain(dir: &Path) -> PathBuf {
    let bin = dir.join("bin");
    fs::create_dir_all(&bin).expect("Failed to create toolchain dir");
    for tool in TOOL_NAMES {
        write_script(&bin.join(tool), "exit 0");
    }
    bin
}

/// Creates a build cache containing a core archive and one sketch object
#[allow(dead_code)]
pub fn fake_cache(dir: &Path) -> PathBuf {
    let cache = dir.join("sketches").join("5E1A07C2");
    fs::create_dir_all(cache.join("core")).expect("Failed to create cache");
    fs::create_dir_all(cache.join("sketch")).expect("Failed to create cache");
    fs::write(cache.join("core/core.a"), b"!<arch>\n").expect("Failed to write archive");
    fs::write(cache.join("sketch/probe.ino.cpp.o"), b"obj").expect("Failed to write object");
    cache
}
