//! Probe sketch generation

use std::fs;
use std::io;
use std::path::Path;

use crate::transcript::{source_map_for, SourceKind, SourceMap};

/// Contents of the sketch entry file: library includes plus empty lifecycle functions
pub fn sketch_source(libraries: &[String]) -> String {
    let mut source = String::new();
    for library in libraries {
        if library.ends_with(".h") {
            source.push_str(&format!("#include <{}>\n", library));
        } else {
            source.push_str(&format!("#include <{}.h>\n", library));
        }
    }
    source.push_str("void setup() {}\nvoid loop() {}\n");
    source
}

/// Creates one probe file per source kind inside `directory`
///
/// arduino-cli requires the entry file to share the directory's name, so all
/// probe files are named after `directory`. Only the entry file has content.
pub fn make_sketch(directory: &Path, libraries: &[String]) -> io::Result<SourceMap> {
    let name = directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no directory name", directory.display()),
            )
        })?;

    let sources = source_map_for(directory, &name);
    for (kind, path) in &sources {
        let contents = match kind {
            SourceKind::Sketch => sketch_source(libraries),
            _ => String::new(),
        };
        fs::write(path, contents)?;
    }
    Ok(sources)
}
