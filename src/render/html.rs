//! HTML renderer — standalone page in the classic pydoc table style.

use crate::model::{Node, NodeKind, SourceDocument};
use crate::render::Renderer;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, doc: &SourceDocument) -> String {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str(&format!(
            "<meta charset=\"UTF-8\">\n<title>{}</title>\n",
            html_escape(&doc.module_name)
        ));
        out.push_str("</head>\n<body bgcolor=\"#f0f0f0\">\n");

        out.push_str("<table width=\"100%\" cellspacing=0 cellpadding=2 border=0>\n");
        out.push_str("<tr bgcolor=\"#7799ee\"><td>&nbsp;</td>\n");
        out.push_str(&format!(
            "<td><font face=\"helvetica, arial\" size=\"+1\"><strong>{}</strong></font></td></tr></table>\n",
            html_escape(&doc.module_name)
        ));
        out.push_str(&format!("<p><tt>{}</tt></p>\n", html_escape(&doc.filepath)));

        if let Some(ref synopsis) = doc.synopsis {
            out.push_str(&section_banner("#eeaa77", "Description"));
            out.push_str(&format!("<pre>{}</pre>\n", html_escape(synopsis)));
        }

        self.render_kind_list(&mut out, doc, "Includes", |n| n.kind == NodeKind::Include);
        self.render_kind_list(&mut out, doc, "Macros", |n| n.kind == NodeKind::Macro);
        self.render_kind_list(&mut out, doc, "Data", |n| n.kind == NodeKind::Variable);
        self.render_kind_list(&mut out, doc, "Types", |n| n.kind.is_type());
        self.render_kind_list(&mut out, doc, "Functions", |n| n.kind == NodeKind::Function);

        out.push_str("<hr>\n<p><small>Generated by cdoc</small></p>\n");
        out.push_str("</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

impl HtmlRenderer {
    fn render_kind_list(
        &self,
        out: &mut String,
        doc: &SourceDocument,
        title: &str,
        select: impl Fn(&Node) -> bool,
    ) {
        let mut open = false;
        for node in doc.nodes.iter().filter(|n| select(n)) {
            if !open {
                out.push_str(&section_banner("#aa55cc", title));
                out.push_str("<dl>\n");
                open = true;
            }
            out.push_str(&render_entry(node));
        }
        if open {
            out.push_str("</dl>\n");
        }
    }
}

fn section_banner(bgcolor: &str, title: &str) -> String {
    format!(
        "<p><table width=\"100%\" cellspacing=0 cellpadding=2 border=0>\n\
         <tr bgcolor=\"{}\"><td>&nbsp;</td>\n\
         <td><strong>{}</strong></td></tr></table>\n",
        bgcolor, title
    )
}

fn render_entry(node: &Node) -> String {
    let mut out = String::new();
    let name = html_escape(&node.name);
    match node.kind {
        NodeKind::Include => {
            out.push_str(&format!("<dt><tt>{}</tt></dt>\n", html_escape(&node.signature)));
        }
        NodeKind::Function => {
            out.push_str(&format!(
                "<dt><a name=\"{}\"><strong>{}</strong></a>({})</dt>\n",
                name,
                name,
                html_escape(param_list(&node.signature))
            ));
            out.push_str(&format!(
                "<dd><tt>{}</tt></dd>\n",
                html_escape(&node.signature)
            ));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!("<dd>{}</dd>\n", html_escape(docstring)));
            }
        }
        kind if kind.is_type() => {
            out.push_str(&format!(
                "<dt><a name=\"{}\"><strong>{}</strong></a> ({})</dt>\n",
                name,
                name,
                kind.label()
            ));
            out.push_str(&format!(
                "<dd><tt>{}</tt></dd>\n",
                html_escape(&node.signature)
            ));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!("<dd>{}</dd>\n", html_escape(docstring)));
            }
        }
        _ => {
            out.push_str(&format!(
                "<dt><a name=\"{}\"><strong>{}</strong></a></dt>\n",
                name, name
            ));
            out.push_str(&format!(
                "<dd><tt>{}</tt></dd>\n",
                html_escape(&node.signature)
            ));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!("<dd>{}</dd>\n", html_escape(docstring)));
            }
        }
    }
    out
}

/// Parameter text between the signature's first '(' and last ')'.
fn param_list(signature: &str) -> &str {
    if let (Some(open), Some(close)) = (signature.find('('), signature.rfind(')')) {
        if close > open {
            return &signature[open + 1..close];
        }
    }
    ""
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_source, Limits};

    #[test]
    fn escape_entities() {
        assert_eq!(html_escape("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn param_list_extraction() {
        assert_eq!(param_list("int add(int a, int b)"), "int a, int b");
        assert_eq!(param_list("void reset(void)"), "void");
        assert_eq!(param_list("no parens"), "");
    }

    #[test]
    fn page_structure() {
        let doc = parse_source(
            "/** Doc. */\n#include <stdio.h>\nint add(int a, int b) {\n}\n",
            "sample.c",
            &Limits::default(),
        );
        let out = HtmlRenderer.render(&doc);
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>sample</title>"));
        assert!(out.contains("<strong>Description</strong>"));
        assert!(out.contains("<strong>Includes</strong>"));
        assert!(out.contains("<strong>Functions</strong>"));
        assert!(out.contains("<strong>add</strong></a>(int a, int b)"));
        assert!(!out.contains("<strong>Macros</strong>"));
    }

    #[test]
    fn source_text_is_escaped() {
        let doc = parse_source("#include <stdio.h>\n", "sample.c", &Limits::default());
        let out = HtmlRenderer.render(&doc);
        assert!(out.contains("#include &lt;stdio.h&gt;"));
        assert!(!out.contains("<stdio.h>"));
    }
}
