//! Plain-text renderer — the terminal report layout.

use crate::model::{NodeKind, SourceDocument};
use crate::render::Renderer;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const MAGENTA: &str = "\x1b[95m";
const CYAN: &str = "\x1b[96m";

/// ANSI color is an explicit per-renderer setting; bulk mode always writes
/// colorless files while a terminal run may keep color on.
pub struct TextRenderer {
    pub color: bool,
}

impl TextRenderer {
    fn c(&self, code: &'static str) -> &'static str {
        if self.color {
            code
        } else {
            ""
        }
    }

    fn rule(&self, out: &mut String) {
        out.push_str(&"=".repeat(70));
    }
}

impl Renderer for TextRenderer {
    fn render(&self, doc: &SourceDocument) -> String {
        let mut out = String::new();

        out.push_str(self.c(BOLD));
        out.push_str(self.c(MAGENTA));
        self.rule(&mut out);
        out.push_str(self.c(RESET));
        out.push('\n');
        out.push_str(&format!(
            "{}Module: {}{}\n",
            self.c(BOLD),
            doc.module_name,
            self.c(RESET)
        ));
        out.push_str(&format!("File: {}\n", doc.filepath));
        out.push_str(&format!("Generated: {}\n", doc.timestamp));
        out.push_str(self.c(MAGENTA));
        out.push_str(self.c(BOLD));
        self.rule(&mut out);
        out.push_str(self.c(RESET));
        out.push('\n');

        if let Some(ref synopsis) = doc.synopsis {
            out.push_str(&format!("\n{}DESCRIPTION{}\n", self.c(CYAN), self.c(RESET)));
            out.push_str(&format!("    {}\n", synopsis));
        }

        out.push_str(&format!("\n{}INCLUDES{}\n", self.c(BLUE), self.c(RESET)));
        for node in doc.nodes.iter().filter(|n| n.kind == NodeKind::Include) {
            out.push_str(&format!(
                "    {}{}{}\n",
                self.c(GREEN),
                node.name,
                self.c(RESET)
            ));
        }

        let mut has_macros = false;
        for node in doc.nodes.iter().filter(|n| n.kind == NodeKind::Macro) {
            if !has_macros {
                out.push_str(&format!("\n{}MACROS{}\n", self.c(BLUE), self.c(RESET)));
                has_macros = true;
            }
            out.push_str(&format!(
                "    {}{}{}\n",
                self.c(GREEN),
                node.name,
                self.c(RESET)
            ));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!(
                    "        {}{}{}\n",
                    self.c(CYAN),
                    docstring,
                    self.c(RESET)
                ));
            }
        }

        let mut has_vars = false;
        for node in doc.nodes.iter().filter(|n| n.kind == NodeKind::Variable) {
            if !has_vars {
                out.push_str(&format!("\n{}DATA{}\n", self.c(BLUE), self.c(RESET)));
                has_vars = true;
            }
            out.push_str(&format!(
                "    {}{}{}",
                self.c(GREEN),
                node.name,
                self.c(RESET)
            ));
            if node.is_static {
                out.push_str(" [static]");
            }
            out.push('\n');
            out.push_str(&format!("        {}\n", node.signature));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!(
                    "        {}{}{}\n",
                    self.c(CYAN),
                    docstring,
                    self.c(RESET)
                ));
            }
        }

        let mut has_types = false;
        for node in doc.nodes.iter().filter(|n| n.kind.is_type()) {
            if !has_types {
                out.push_str(&format!("\n{}TYPES{}\n", self.c(BLUE), self.c(RESET)));
                has_types = true;
            }
            out.push_str(&format!(
                "    {}{}{} ({})\n",
                self.c(GREEN),
                node.name,
                self.c(RESET),
                node.kind.label()
            ));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!(
                    "        {}{}{}\n",
                    self.c(CYAN),
                    docstring,
                    self.c(RESET)
                ));
            }
        }

        let mut has_funcs = false;
        for node in doc.nodes.iter().filter(|n| n.kind == NodeKind::Function) {
            if !has_funcs {
                out.push_str(&format!("\n{}FUNCTIONS{}\n", self.c(BLUE), self.c(RESET)));
                has_funcs = true;
            }
            out.push_str(&format!(
                "    {}{}{}",
                self.c(GREEN),
                node.name,
                self.c(RESET)
            ));
            if node.is_static {
                out.push_str(" [static]");
            }
            if node.is_inline {
                out.push_str(" [inline]");
            }
            if node.is_extern {
                out.push_str(" [extern]");
            }
            out.push('\n');
            out.push_str(&format!("        {}\n", node.signature));
            if let Some(ref docstring) = node.docstring {
                out.push_str(&format!(
                    "        {}{}{}\n",
                    self.c(CYAN),
                    docstring,
                    self.c(RESET)
                ));
            }
        }

        out.push('\n');
        out.push_str(self.c(MAGENTA));
        out.push_str(self.c(BOLD));
        self.rule(&mut out);
        out.push_str(self.c(RESET));
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}
