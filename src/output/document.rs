//! Assembly of the harvested document from mined build data

use serde_json::{json, Map, Value};

use crate::mining::MinedBuild;

/// Which optional members the document carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSections {
    /// `tools`, `flags`, `objects` and `libraries`
    pub detect: bool,
    /// `includes`
    pub includes: bool,
    /// `post`
    pub post_link: bool,
}

impl DocumentSections {
    pub fn all() -> Self {
        Self {
            detect: true,
            includes: true,
            post_link: true,
        }
    }
}

/// Builds the document using internal `source:*` labels; nothing is remapped yet
pub fn assemble_document(mined: &MinedBuild, sections: DocumentSections) -> Value {
    let mut document = Map::new();

    if sections.detect {
        let mut tools = Map::new();
        let mut flags = Map::new();
        for (kind, record) in &mined.tools {
            tools.insert(kind.label().to_string(), json!(record.tool));
            flags.insert(kind.label().to_string(), json!(record.flags));
        }
        tools.insert("LINKER".to_string(), json!(mined.link.linker));
        tools.insert("AR".to_string(), json!(mined.archive.archiver));
        flags.insert("LINKER_EXE".to_string(), json!(mined.link.flags));
        flags.insert("AR".to_string(), json!(mined.archive.flags));

        document.insert("tools".to_string(), Value::Object(tools));
        document.insert("flags".to_string(), Value::Object(flags));
        document.insert("objects".to_string(), json!(mined.link.objects));
        document.insert("libraries".to_string(), json!(mined.link.libraries));
    }

    if sections.includes {
        let includes: Map<String, Value> = mined
            .tools
            .iter()
            .map(|(kind, record)| (kind.label().to_string(), json!(record.include_paths)))
            .collect();
        document.insert("includes".to_string(), Value::Object(includes));
    }

    if sections.post_link {
        document.insert("post".to_string(), json!(mined.post_link));
    }

    Value::Object(document)
}
