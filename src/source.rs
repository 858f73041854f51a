//! Source document reader for Timesheet XML exports.
//!
//! The export is a root element holding one element per group (`projects`,
//! `tasks`, `breaks`, `tags`, `taskTags`). Each child of a group element is a
//! record, and each child of a record is a named field whose text is the value:
//!
//! ```xml
//! <timesheet>
//!   <projects>
//!     <project><projectId>1</projectId><name>Maratona</name>...</project>
//!   </projects>
//!   ...
//! </timesheet>
//! ```
//!
//! The parsed document is fully owned so it can outlive the input buffer.

use crate::error::{ConvertError, ConvertResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Group names in the order the resolver consumes them.
pub const GROUP_PROJECTS: &str = "projects";
pub const GROUP_TASKS: &str = "tasks";
pub const GROUP_BREAKS: &str = "breaks";
pub const GROUP_TAGS: &str = "tags";
pub const GROUP_TASK_TAGS: &str = "taskTags";

pub const GROUPS: &[&str] = &[
    GROUP_PROJECTS,
    GROUP_TASKS,
    GROUP_BREAKS,
    GROUP_TAGS,
    GROUP_TASK_TAGS,
];

/// One record of a group: an ordered list of `(field, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Builder-style, mostly for tests.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parsed source document: records grouped by group name, in document order.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    groups: BTreeMap<String, Vec<Record>>,
}

impl SourceDocument {
    /// Parse a document from XML text.
    pub fn parse(xml: &str) -> ConvertResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| ConvertError::MalformedInput(e.to_string()))?;

        let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        for group in doc.root_element().children().filter(|n| n.is_element()) {
            // Repeated group elements concatenate.
            let records = groups
                .entry(group.tag_name().name().to_string())
                .or_default();
            for record in group.children().filter(|n| n.is_element()) {
                let fields = record
                    .children()
                    .filter(|n| n.is_element())
                    .map(|field| {
                        (
                            field.tag_name().name().to_string(),
                            field.text().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                records.push(Record { fields });
            }
        }

        Ok(Self { groups })
    }

    /// Load a document from a file (supports both plain XML and gzip).
    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        use std::io::Read;

        let bytes = std::fs::read(path)?;

        let text = if bytes.starts_with(&[0x1f, 0x8b]) {
            // Gzip compressed
            let mut decoder = flate2::read::GzDecoder::new(bytes.as_slice());
            let mut text = String::new();
            decoder
                .read_to_string(&mut text)
                .map_err(|e| ConvertError::MalformedInput(e.to_string()))?;
            text
        } else {
            String::from_utf8(bytes).map_err(|e| ConvertError::MalformedInput(e.to_string()))?
        };

        Self::parse(&text)
    }

    /// Records of a group. A group absent from the document is empty.
    pub fn group(&self, name: &str) -> &[Record] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record counts for the known groups, for reporting.
    pub fn group_sizes(&self) -> BTreeMap<&'static str, usize> {
        GROUPS
            .iter()
            .map(|name| (*name, self.group(name).len()))
            .collect()
    }

    /// Insert a group directly, bypassing XML. Used by tests.
    pub fn with_group(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.groups.entry(name.into()).or_default().extend(records);
        self
    }
}
