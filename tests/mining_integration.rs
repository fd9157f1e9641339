//! Transcript parsing and mining against a captured AVR build

mod support;

use arduino_harvest::mining::{archive_tokens, build_tokens, link_tokens, post_link_lines, sketch_cache};
use arduino_harvest::output::{assemble_document, remap_document, DocumentSections};
use arduino_harvest::transcript::{source_map_for, KnownPrograms};
use arduino_harvest::{mine, parse_transcript, MiningError, SourceKind, SourceMap, Stage, StageMap};
use serde_json::json;
use std::path::{Path, PathBuf};
use support::{avr_transcript, fixture_programs, CACHE, FIXTURE_TOOLS, SKETCH};

fn sources() -> SourceMap {
    source_map_for(&Path::new("/tmp").join(SKETCH), SKETCH)
}

fn stages() -> StageMap {
    let resolver = KnownPrograms::new(fixture_programs());
    parse_transcript(&avr_transcript(CACHE, SKETCH), &resolver)
}

fn tool(name: &str) -> String {
    format!("{}/{}", FIXTURE_TOOLS, name)
}

#[test]
fn test_transcript_stages() {
    let stages = stages();

    assert_eq!(
        stages.stages().collect::<Vec<_>>(),
        vec![
            Stage::LibraryDetection,
            Stage::Prototypes,
            Stage::Compilation,
            Stage::Libraries,
            Stage::Core,
            Stage::Link
        ]
    );
    assert_eq!(stages.lines(Stage::LibraryDetection).len(), 2);
    // ctags is not a known program here
    assert_eq!(stages.lines(Stage::Prototypes).len(), 1);
    assert_eq!(stages.lines(Stage::Compilation).len(), 4);
    assert!(stages.lines(Stage::Libraries).is_empty());
    assert_eq!(stages.lines(Stage::Core).len(), 4);
    assert_eq!(stages.lines(Stage::Link).len(), 3);
    assert!(!stages.contains(Stage::Unknown));
}

#[test]
fn test_compilers_per_source_kind() {
    let tools = build_tokens(&stages(), &sources()).unwrap();

    assert_eq!(tools[&SourceKind::C].tool, tool("avr-gcc"));
    assert_eq!(tools[&SourceKind::Cpp].tool, tool("avr-g++"));
    assert_eq!(tools[&SourceKind::Asm].tool, tool("avr-gcc"));
    assert_eq!(tools[&SourceKind::Sketch].tool, tool("avr-g++"));

    let asm = &tools[&SourceKind::Asm];
    assert_eq!(
        asm.flags,
        vec![
            "-g",
            "-x",
            "assembler-with-cpp",
            "-flto",
            "-MMD",
            "-mmcu=atmega328p",
            "-DF_CPU=16000000L",
            "-DARDUINO=10607",
            "-DARDUINO_AVR_UNO",
            "-DARDUINO_ARCH_AVR"
        ]
    );
    assert_eq!(
        asm.include_paths,
        vec![
            "/opt/arduino/hardware/avr/1.8.6/cores/arduino",
            "/opt/arduino/hardware/avr/1.8.6/variants/standard"
        ]
    );

    for record in tools.values() {
        assert!(!record.flags.iter().any(|flag| flag == "-c" || flag == "-o"));
        assert!(!record.flags.iter().any(|flag| flag.contains(SKETCH)));
    }
}

#[test]
fn test_linker_archiver_and_cache() {
    let stages = stages();
    let sources = sources();

    let link = link_tokens(&stages, &sources).unwrap();
    assert_eq!(link.linker, tool("avr-gcc"));
    assert_eq!(
        link.flags,
        vec![
            "-w".to_string(),
            "-Os".to_string(),
            "-g".to_string(),
            "-flto".to_string(),
            "-fuse-linker-plugin".to_string(),
            "-Wl,--gc-sections".to_string(),
            "-mmcu=atmega328p".to_string(),
            format!("-L{}", CACHE)
        ]
    );
    assert!(link.objects.is_empty());
    assert_eq!(link.libraries, vec![format!("{}/core/core.a", CACHE), "-lm".to_string()]);

    let archive = archive_tokens(&stages).unwrap();
    assert_eq!(archive.archiver, tool("avr-gcc-ar"));
    assert_eq!(archive.flags, vec!["rcs"]);

    assert_eq!(sketch_cache(&stages).unwrap(), PathBuf::from(CACHE));

    let post = post_link_lines(&stages, &sources).unwrap();
    assert_eq!(post.len(), 2);
    assert!(post.iter().all(|line| line.starts_with(&tool("avr-objcopy"))));
}

#[test]
fn test_full_document() {
    let sources = sources();
    let mined = mine(&stages(), &sources).unwrap();
    let document = assemble_document(&mined, DocumentSections::all());
    let remapped = remap_document(&document, &mined.cache, Path::new("/work/out"), &sources);

    assert_eq!(remapped["tools"]["CXX"], tool("avr-g++"));
    assert_eq!(remapped["flags"]["LINKER_EXE"][7], "-L/work/out");
    assert_eq!(remapped["libraries"], json!(["/work/out/core/core.a", "-lm"]));
    assert_eq!(
        remapped["post"][0],
        format!(
            "{} -O ihex -j .eeprom --set-section-flags=.eeprom=alloc,load --no-change-warnings \
             --change-section-lma .eeprom=0 <TARGET_PATH> <TARGET_PATH>.eep",
            tool("avr-objcopy")
        )
    );
    let keys: Vec<&String> = remapped["includes"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["ASM", "C", "CXX", "INO"]);
}

#[test]
fn test_transcript_for_other_sketch_name_fails() {
    let other = source_map_for(Path::new("/tmp/harvest_other"), "harvest_other");
    let err = mine(&stages(), &other).unwrap_err();
    assert!(matches!(
        err,
        MiningError::MissingStage {
            stage: Stage::Compilation,
            ..
        }
    ));
}

#[test]
fn test_duplicated_compile_line_is_ambiguous() {
    let resolver = KnownPrograms::new(fixture_programs());
    let transcript = avr_transcript(CACHE, SKETCH);
    let duplicate = transcript
        .lines()
        .find(|line| line.ends_with(&format!("{}.c.o", SKETCH)))
        .unwrap()
        .to_string();
    let transcript = transcript.replace(
        "Compiling libraries...",
        &format!("{}\nCompiling libraries...", duplicate),
    );

    let stages = parse_transcript(&transcript, &resolver);
    let err = build_tokens(&stages, &sources()).unwrap_err();
    assert_eq!(err.classification(), "MultipleInvocation");
}
