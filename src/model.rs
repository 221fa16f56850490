//! Data model for extracted documentation — format-agnostic.

use chrono::Local;

/// Complete parsed document from a single source file.
#[derive(Debug)]
pub struct SourceDocument {
    pub filepath: String,
    /// File name without directory or extension.
    pub module_name: String,
    /// File-level docstring, taken from the first block comment.
    pub synopsis: Option<String>,
    /// Generation timestamp, `%Y-%m-%d %H:%M:%S` local time.
    pub timestamp: String,
    /// Extracted entities, in source order.
    pub nodes: Vec<Node>,
    /// Set once when the node capacity is reached; the caller reports it.
    pub truncated: bool,
}

impl SourceDocument {
    pub fn new(filepath: &str) -> Self {
        SourceDocument {
            filepath: filepath.to_string(),
            module_name: module_name_of(filepath),
            synopsis: None,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            nodes: Vec::new(),
            truncated: false,
        }
    }
}

/// Kind of a documented entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Function,
    Struct,
    Union,
    Enum,
    Typedef,
    Macro,
    Variable,
    Include,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Function => "function",
            NodeKind::Struct => "struct",
            NodeKind::Union => "union",
            NodeKind::Enum => "enum",
            NodeKind::Typedef => "typedef",
            NodeKind::Macro => "macro",
            NodeKind::Variable => "variable",
            NodeKind::Include => "include",
        }
    }

    /// Typedefs and aggregates share the "Types" section in renderers.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::Struct | NodeKind::Union | NodeKind::Enum | NodeKind::Typedef
        )
    }
}

/// A single extracted entity. Immutable once appended to the document.
#[derive(Debug)]
pub struct Node {
    /// Identifier text; empty when none could be derived (includes without
    /// delimiters), synthesized placeholder for anonymous aggregates.
    pub name: String,
    pub kind: NodeKind,
    /// 1-based line of the declaration's first raw line.
    pub line: usize,
    /// Declarator text with any body or initializer stripped.
    pub signature: String,
    /// Functions only.
    pub return_type: Option<String>,
    pub docstring: Option<String>,
    pub is_static: bool,
    pub is_inline: bool,
    pub is_extern: bool,
}

impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Node {
            name: String::new(),
            kind,
            line,
            signature: String::new(),
            return_type: None,
            docstring: None,
            is_static: false,
            is_inline: false,
            is_extern: false,
        }
    }
}

/// Derive the module name from a file path.
/// "src/util.c" → "util", "lib\\parse.c" → "parse"
fn module_name_of(path: &str) -> String {
    let base = match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => match path.rfind('\\') {
            Some(i) => &path[i + 1..],
            None => path,
        },
    };
    match base.rfind('.') {
        Some(i) => base[..i].to_string(),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_strips_dir_and_extension() {
        assert_eq!(module_name_of("src/util.c"), "util");
        assert_eq!(module_name_of("util.c"), "util");
        assert_eq!(module_name_of("Makefile"), "Makefile");
    }

    #[test]
    fn module_name_backslash_paths() {
        assert_eq!(module_name_of("lib\\parse.c"), "parse");
    }

    #[test]
    fn kind_sections() {
        assert!(NodeKind::Struct.is_type());
        assert!(NodeKind::Typedef.is_type());
        assert!(!NodeKind::Function.is_type());
        assert_eq!(NodeKind::Macro.label(), "macro");
    }
}
