//! JSON renderer — structured output for tooling integration.
//!
//! Hand-built like the other renderers; all strings pass through
//! `json_escape` so the output is always well-formed.

use crate::model::{Node, NodeKind, SourceDocument};
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &SourceDocument) -> String {
        let mut out = String::new();
        out.push_str("{\n");
        out.push_str(&format!(
            "  \"filepath\": \"{}\",\n",
            json_escape(&doc.filepath)
        ));
        out.push_str(&format!(
            "  \"module_name\": \"{}\",\n",
            json_escape(&doc.module_name)
        ));
        out.push_str(&format!(
            "  \"timestamp\": \"{}\",\n",
            json_escape(&doc.timestamp)
        ));
        match doc.synopsis {
            Some(ref synopsis) => out.push_str(&format!(
                "  \"docstring\": \"{}\",\n",
                json_escape(synopsis)
            )),
            None => out.push_str("  \"docstring\": null,\n"),
        }

        out.push_str("  \"nodes\": [\n");
        for (i, node) in doc.nodes.iter().enumerate() {
            out.push_str(&render_node(node));
            if i < doc.nodes.len() - 1 {
                out.push_str(",\n");
            } else {
                out.push('\n');
            }
        }
        out.push_str("  ]\n");
        out.push_str("}\n");
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_node(node: &Node) -> String {
    let mut fields: Vec<String> = Vec::new();
    fields.push(format!("\"name\": \"{}\"", json_escape(&node.name)));
    fields.push(format!("\"type\": \"{}\"", node.kind.label()));
    fields.push(format!("\"line\": {}", node.line));
    fields.push(format!(
        "\"signature\": \"{}\"",
        json_escape(&node.signature)
    ));
    if let Some(ref ret) = node.return_type {
        fields.push(format!("\"return_type\": \"{}\"", json_escape(ret)));
    }
    if matches!(node.kind, NodeKind::Function | NodeKind::Variable) {
        fields.push(format!("\"is_static\": {}", node.is_static));
        fields.push(format!("\"is_inline\": {}", node.is_inline));
        fields.push(format!("\"is_extern\": {}", node.is_extern));
    }
    if let Some(ref docstring) = node.docstring {
        fields.push(format!("\"docstring\": \"{}\"", json_escape(docstring)));
    }

    let mut out = String::from("    {\n");
    for (i, field) in fields.iter().enumerate() {
        out.push_str("      ");
        out.push_str(field);
        if i < fields.len() - 1 {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("    }");
    out
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, Limits};

    #[test]
    fn escape_specials() {
        assert_eq!(json_escape("a\"b"), "a\\\"b");
        assert_eq!(json_escape("a\\b"), "a\\\\b");
        assert_eq!(json_escape("a\nb"), "a\\nb");
    }

    #[test]
    fn renders_nodes_with_fields() {
        let doc = parse_source(
            "/** Doc. */\nint add(int a, int b) {\n}\n",
            "sample.c",
            &Limits::default(),
        );
        let out = JsonRenderer.render(&doc);
        assert!(out.contains("\"module_name\": \"sample\""));
        assert!(out.contains("\"name\": \"add\""));
        assert!(out.contains("\"type\": \"function\""));
        assert!(out.contains("\"line\": 2"));
        assert!(out.contains("\"return_type\": \"int\""));
        assert!(out.contains("\"docstring\": \"Doc.\""));
    }

    #[test]
    fn quotes_in_signatures_escaped() {
        let doc = parse_source(
            "static char greeting[] = \"hi\";\nconst char sep[] = \"--\";\n",
            "sample.c",
            &Limits::default(),
        );
        let out = JsonRenderer.render(&doc);
        // Signatures are cut before the initializer, so no raw quotes leak;
        // the structural quotes must still balance.
        assert_eq!(out.matches('{').count(), out.matches('}').count());
        assert!(out.contains("\"is_static\": true"));
    }

    #[test]
    fn null_docstring_without_synopsis() {
        let doc = parse_source("int f(void);\n", "sample.c", &Limits::default());
        let out = JsonRenderer.render(&doc);
        assert!(out.contains("\"docstring\": null"));
    }
}
