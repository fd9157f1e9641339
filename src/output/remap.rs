//! Ordered literal substitutions over the harvested document

use serde_json::{Map, Value};
use std::path::Path;

use crate::transcript::{SourceKind, SourceMap};

pub const TARGET_PATH: &str = "<TARGET_PATH>";
pub const TARGET_NAME: &str = "<TARGET_NAME>";
pub const TARGET_DIRECTORY: &str = "<TARGET_DIRECTORY>";

/// An ordered list of `(from, to)` replacements
///
/// Replacements are applied one after another to every string, so an entry
/// whose `from` is a substring of a later entry's `from` must come after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: Vec<(String, String)>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a replacement; an empty `from` is ignored
    pub fn push(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        let from = from.into();
        if !from.is_empty() {
            self.entries.push((from, to.into()));
        }
        self
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels first, then the cache directory, then probe sketch paths and names
    pub fn standard(cache: &Path, output: &Path, sources: &SourceMap) -> Self {
        let mut table = Self::new();
        // source:C is a prefix of source:CPP
        for kind in [SourceKind::Cpp, SourceKind::C, SourceKind::Asm, SourceKind::Sketch] {
            table.push(kind.label(), kind.external_tag());
        }
        table.push(path_text(cache), path_text(output));

        if let Some(sketch) = sources
            .get(&SourceKind::Sketch)
            .and_then(|path| path.file_name())
        {
            let sketch = sketch.to_string_lossy();
            table.push(path_text(&output.join(format!("{}.elf", sketch))), TARGET_PATH);
            table.push(path_text(&output.join(&*sketch)), TARGET_PATH);
            table.push(&*sketch, TARGET_NAME);
        }
        table
    }

    pub fn apply_str(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }

    /// Rewrites strings, array elements and both keys and values of objects
    pub fn apply(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.apply_str(text)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.apply(item)).collect()),
            Value::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(key, member)| (self.apply_str(key), self.apply(member)))
                    .collect::<Map<String, Value>>(),
            ),
            other => other.clone(),
        }
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Applies the standard table, then hides the output directory inside `post`
pub fn remap_document(document: &Value, cache: &Path, output: &Path, sources: &SourceMap) -> Value {
    let mut remapped = RemapTable::standard(cache, output, sources).apply(document);

    if let Some(post) = remapped.get_mut("post") {
        let mut table = RemapTable::new();
        table.push(path_text(output), TARGET_DIRECTORY);
        *post = table.apply(post);
    }
    remapped
}
