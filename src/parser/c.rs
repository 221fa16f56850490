//! C entity extractor — single-pass, line-oriented heuristic state machine.
//!
//! One forward sweep over the source: each significant line is classified by
//! an ordered rule chain (comments, preprocessor, aggregates, typedefs,
//! functions, variables) and routed to an extractor that may pull further raw
//! lines to reconstruct a multi-line declaration. Rule order is load-bearing:
//! later rules' trigger substrings can occur inside earlier ones (a typedef
//! line usually contains "struct "), so reordering changes classification.
//!
//! This is not a grammar parser. It never rejects input — malformed or
//! partial text degrades to fewer or partial nodes.

use crate::model::{Node, NodeKind, SourceDocument};
use crate::parser::Limits;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// Control-flow openers that disqualify a line as a function declaration.
// Plain prefixes, no word boundary: "ifdef_helper(" is rejected too.
static RE_CONTROL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:if|while|for|switch|return)").unwrap());

// Recognized base-type openers for the function heuristic.
static RE_TYPE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:void|int|char|long|short|unsigned|signed|float|double|size_t|const)")
        .unwrap()
});

// Macro name: identifier run right after #define, stopping at '(' for
// function-like macros.
static RE_MACRO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#define\s*([A-Za-z0-9_]*)").unwrap());

// -- Public API ---------------------------------------------------------------

/// Parse C-family source text into a SourceDocument.
pub fn parse(content: &str, filepath: &str, limits: &Limits) -> SourceDocument {
    let mut parser = Parser {
        cursor: LineCursor::new(content),
        pending_comment: String::new(),
        pending_comment_line: 0,
        doc: SourceDocument::new(filepath),
        limits,
    };
    parser.run();
    parser.doc
}

// -- Line cursor --------------------------------------------------------------

/// Buffered forward-only reader. Never rewinds; once a raw line is consumed
/// by any path it is never re-examined.
struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    line_num: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        LineCursor {
            lines: input.lines(),
            line_num: 0,
        }
    }

    /// Next raw line, untrimmed. Used for lookahead continuation reads.
    fn next_raw(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_num += 1;
        Some(line)
    }

    /// Next non-blank line, trailing whitespace removed, leading kept
    /// (the variable heuristic needs the raw first column).
    fn next_significant(&mut self) -> Option<&'a str> {
        loop {
            let line = self.next_raw()?.trim_end();
            if !line.trim_start().is_empty() {
                return Some(line);
            }
        }
    }
}

// -- Parser state -------------------------------------------------------------

struct Parser<'a> {
    cursor: LineCursor<'a>,
    /// Most recently parsed, not-yet-consumed comment (normalized).
    pending_comment: String,
    /// Line on which the pending comment's closing delimiter appeared.
    pending_comment_line: usize,
    doc: SourceDocument,
    limits: &'a Limits,
}

impl<'a> Parser<'a> {
    /// Main sweep: classify each significant line, first match wins.
    fn run(&mut self) {
        while let Some(raw) = self.cursor.next_significant() {
            let line = raw.trim_start();

            // 1. Block comment
            if line.starts_with("/*") {
                self.scan_block_comment(line);
                // First block comment doubles as the file synopsis. It stays
                // pending, so it may also attach to the entity that follows.
                if self.doc.nodes.is_empty()
                    && self.doc.synopsis.is_none()
                    && !self.pending_comment.is_empty()
                {
                    self.doc.synopsis =
                        Some(cap_text(&self.pending_comment, self.limits.max_text));
                }
                continue;
            }

            // 2. Line comment
            if line.starts_with("//") {
                self.pending_comment = clean_comment(line);
                self.pending_comment_line = self.cursor.line_num;
                continue;
            }

            // 3. Preprocessor: include and define; other directives produce
            //    no node and leave the pending comment untouched.
            if line.starts_with('#') {
                if line.starts_with("#include") {
                    self.extract_include(line);
                } else if line.starts_with("#define") {
                    self.extract_macro(line);
                }
                continue;
            }

            let is_static = line.contains("static ");
            let is_inline = line.contains("inline ");
            let is_extern = line.contains("extern ");

            // 4. Aggregates. "typedef struct ..." is excluded here so rule 5
            //    can claim it.
            if line.contains("struct ") && !line.contains("typedef") {
                self.extract_aggregate(line, NodeKind::Struct);
                continue;
            }
            if line.contains("union ") && !line.contains("typedef") {
                self.extract_aggregate(line, NodeKind::Union);
                continue;
            }
            if line.contains("enum ") && !line.contains("typedef") {
                self.extract_aggregate(line, NodeKind::Enum);
                continue;
            }

            // 5. Typedef
            if line.starts_with("typedef") {
                self.extract_typedef(line);
                continue;
            }

            // 6. Function
            if is_function_decl(line, is_static, is_inline, is_extern) {
                self.extract_function(line, is_static, is_inline, is_extern);
                continue;
            }

            // 7. File-scope variable: first column is code, or an explicit
            //    storage keyword vouches for file scope.
            let at_file_scope = raw
                .chars()
                .next()
                .map_or(false, |c| !c.is_whitespace())
                || is_static
                || is_extern;
            if at_file_scope
                && (is_static || line.starts_with("const "))
                && !line.contains('(')
                && !line.contains("->")
                && (line.contains('=') || line.contains('['))
            {
                self.extract_variable(line, is_static);
                continue;
            }

            // 8. No match: drop the pending comment once its window elapsed.
            if self.pending_comment_line + 1 < self.cursor.line_num {
                self.pending_comment.clear();
            }
        }
    }

    // -- Comment tracking -----------------------------------------------------

    /// Consume a block comment, possibly spanning raw lines, and store the
    /// normalized text as the pending comment. End of input is an implicit
    /// terminator.
    fn scan_block_comment(&mut self, first: &str) {
        let mut buf = String::from(first);
        if !first.contains("*/") {
            while let Some(raw) = self.cursor.next_raw() {
                if buf.len() + raw.len() < self.limits.max_text {
                    buf.push('\n');
                    buf.push_str(raw);
                }
                if raw.contains("*/") {
                    break;
                }
            }
        }
        self.pending_comment = clean_comment(&buf);
        self.pending_comment_line = self.cursor.line_num;
    }

    /// Take the pending comment if it ends within the entity's attachment
    /// window: declaration line - 1, or (functions only) the line itself.
    fn take_pending(&mut self, decl_line: usize, allow_same_line: bool) -> Option<String> {
        let in_window = self.pending_comment_line + 1 == decl_line
            || (allow_same_line && self.pending_comment_line == decl_line);
        if in_window && !self.pending_comment.is_empty() {
            let text = std::mem::take(&mut self.pending_comment);
            Some(cap_text(&text, self.limits.max_text))
        } else {
            None
        }
    }

    // -- Entity extractors ----------------------------------------------------

    fn extract_include(&mut self, line: &str) {
        let decl_line = self.cursor.line_num;
        let mut node = Node::new(NodeKind::Include, decl_line);
        if let Some(target) = include_target(line) {
            node.name = cap_text(target, self.limits.max_name);
        }
        node.signature = cap_text(line.trim(), self.limits.max_text);
        node.docstring = self.take_pending(decl_line, false);
        self.add_node(node);
    }

    fn extract_macro(&mut self, line: &str) {
        let decl_line = self.cursor.line_num;
        let mut sig = line.to_string();
        // Continuation only while a trailing backslash remains; the backslash
        // itself becomes the joining space.
        loop {
            let bytes = sig.as_bytes();
            let len = bytes.len();
            let trailing = len > 0 && bytes[len - 1] == b'\\';
            let penultimate = len > 1 && bytes[len - 2] == b'\\';
            if !trailing && !penultimate {
                break;
            }
            if trailing {
                sig.pop();
                sig.push(' ');
            }
            let Some(raw) = self.cursor.next_raw() else { break };
            let trimmed = raw.trim();
            if sig.len() + trimmed.len() < self.limits.max_text {
                sig.push_str(trimmed);
            }
        }

        let mut node = Node::new(NodeKind::Macro, decl_line);
        if let Some(caps) = RE_MACRO_NAME.captures(&sig) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if !name.is_empty() {
                node.name = cap_text(name, self.limits.max_name);
            }
        }
        node.signature = cap_text(sig.trim(), self.limits.max_text);
        node.docstring = self.take_pending(decl_line, false);
        self.add_node(node);
    }

    fn extract_aggregate(&mut self, line: &str, kind: NodeKind) {
        let decl_line = self.cursor.line_num;
        let keyword = match kind {
            NodeKind::Struct => "struct",
            NodeKind::Union => "union",
            _ => "enum",
        };

        let mut node = Node::new(kind, decl_line);
        if let Some(pos) = line.find(keyword) {
            let rest = line[pos + keyword.len()..].trim_start();
            let name = leading_ident_run(rest);
            if !name.is_empty() {
                node.name = cap_text(name, self.limits.max_name);
            }
        }
        if node.name.is_empty() {
            node.name = format!("(anonymous {})", keyword);
        }

        node.signature = cap_text(line.trim(), self.limits.max_text);
        node.docstring = self.take_pending(decl_line, false);
        self.add_node(node);
    }

    fn extract_typedef(&mut self, line: &str) {
        let decl_line = self.cursor.line_num;
        let mut sig = line.to_string();
        while !sig.contains(';') {
            let Some(raw) = self.cursor.next_raw() else { break };
            let trimmed = raw.trim();
            if sig.len() + trimmed.len() < self.limits.max_text {
                sig.push(' ');
                sig.push_str(trimmed);
            }
        }
        if let Some(i) = sig.find(';') {
            sig.truncate(i);
        }

        let mut node = Node::new(NodeKind::Typedef, decl_line);
        if let Some((_, run)) = trailing_ident_run(&sig) {
            node.name = cap_text(run, self.limits.max_name);
        }
        node.signature = cap_text(sig.trim(), self.limits.max_text);
        node.docstring = self.take_pending(decl_line, false);
        self.add_node(node);
    }

    fn extract_function(&mut self, line: &str, is_static: bool, is_inline: bool, is_extern: bool) {
        let decl_line = self.cursor.line_num;
        let mut sig = line.to_string();
        while !sig.contains('{') && !sig.contains(';') {
            let Some(raw) = self.cursor.next_raw() else { break };
            sig.push(' ');
            sig.push_str(raw.trim());
        }
        // Keep only the declarator.
        if let Some(i) = sig.find('{') {
            sig.truncate(i);
        }
        if let Some(i) = sig.find(';') {
            sig.truncate(i);
        }
        let sig = sig.trim();

        let mut node = Node::new(NodeKind::Function, decl_line);
        node.is_static = is_static;
        node.is_inline = is_inline;
        node.is_extern = is_extern;
        node.signature = cap_text(sig, self.limits.max_text);

        if let Some(paren) = sig.find('(') {
            let before = &sig[..paren];
            if let Some((start, run)) = trailing_ident_run(before) {
                node.name = cap_text(run, self.limits.max_name);
                let ret = before[..start].trim();
                if !ret.is_empty() {
                    node.return_type = Some(cap_text(ret, self.limits.max_name));
                }
            }
        }

        node.docstring = self.take_pending(decl_line, true);
        self.add_node(node);
    }

    fn extract_variable(&mut self, line: &str, is_static: bool) {
        let decl_line = self.cursor.line_num;
        let mut sig = line.to_string();
        // Brace initializer spilling onto further lines: consume it. The
        // signature is cut before the initializer either way.
        if sig.contains('{') && !sig.contains('}') {
            while let Some(raw) = self.cursor.next_raw() {
                if raw.contains('}') || raw.contains(';') {
                    break;
                }
            }
        }

        let mut node = Node::new(NodeKind::Variable, decl_line);
        node.is_static = is_static;
        let name = variable_name(line);
        if !name.is_empty() {
            node.name = cap_text(&name, self.limits.max_name);
        }

        if let Some(i) = sig.find(" = ") {
            sig.truncate(i);
        } else if let Some(i) = sig.find('{') {
            sig.truncate(i);
        }
        node.signature = cap_text(sig.trim(), self.limits.max_text);
        node.docstring = self.take_pending(decl_line, false);
        self.add_node(node);
    }

    // -- Node registry --------------------------------------------------------

    /// Append-only, capacity-bounded. Past the bound, nodes are dropped and
    /// the condition is recorded once; scanning continues to end of input.
    fn add_node(&mut self, node: Node) {
        if self.doc.nodes.len() >= self.limits.max_nodes {
            self.doc.truncated = true;
            return;
        }
        self.doc.nodes.push(node);
    }
}

// -- Heuristics ---------------------------------------------------------------

/// Declaration-shaped line with parentheses. Recall-biased: declaration-shaped
/// non-functions pass, unrecognized custom return types fail.
fn is_function_decl(line: &str, is_static: bool, is_inline: bool, is_extern: bool) -> bool {
    line.contains('(')
        && !RE_CONTROL_PREFIX.is_match(line)
        && !line.contains("sizeof")
        && !line.contains("= ")
        && !line.contains("->")
        && !line.contains('.')
        && (is_static
            || is_inline
            || is_extern
            || RE_TYPE_PREFIX.is_match(line)
            || line.contains("* ")
            || line.contains("*\t"))
}

// -- Text helpers -------------------------------------------------------------

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Normalize a comment: strip the opening delimiter, drop every "*/", and on
/// each line strip leading whitespace plus one marker star and one following
/// space. Trims the result.
fn clean_comment(raw: &str) -> String {
    let text = raw
        .strip_prefix("/**")
        .or_else(|| raw.strip_prefix("/*"))
        .or_else(|| raw.strip_prefix("//"))
        .unwrap_or(raw);

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut at_line_start = true;
    while i < chars.len() {
        if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
            i += 2;
            continue;
        }
        if chars[i] == '\n' {
            out.push('\n');
            i += 1;
            at_line_start = true;
            continue;
        }
        if at_line_start {
            while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
                i += 1;
            }
            if i < chars.len() && chars[i] == '*' && chars.get(i + 1) != Some(&'/') {
                i += 1;
                if chars.get(i) == Some(&' ') {
                    i += 1;
                }
            }
            at_line_start = false;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out.trim().to_string()
}

/// Include target between <...> or "..." delimiters. Angle brackets win when
/// present, even unmatched (no fallback to quotes then).
fn include_target(line: &str) -> Option<&str> {
    if let Some(lt) = line.find('<') {
        let rest = &line[lt + 1..];
        return rest.find('>').map(|gt| &rest[..gt]).filter(|t| !t.is_empty());
    }
    if let Some(q) = line.find('"') {
        let rest = &line[q + 1..];
        return rest.find('"').map(|q2| &rest[..q2]).filter(|t| !t.is_empty());
    }
    None
}

/// Leading identifier run of `s`.
fn leading_ident_run(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// Maximal trailing identifier run, skipping trailing whitespace first.
/// Returns the run's start byte offset and text. The final non-whitespace
/// character is always part of the run, identifier or not.
fn trailing_ident_run(s: &str) -> Option<(usize, &str)> {
    let (end_i, end_c) = s.char_indices().rev().find(|&(_, c)| !c.is_whitespace())?;
    let end = end_i + end_c.len_utf8();
    let mut start = end_i;
    for (i, c) in s[..end_i].char_indices().rev() {
        if is_ident_char(c) {
            start = i;
        } else {
            break;
        }
    }
    Some((start, &s[start..end]))
}

/// Declared variable name: past any `static `/`const ` qualifiers, the first
/// identifier run preceded by a space and followed (after optional
/// whitespace) by '[', '=' or ';'. Multi-word types are skipped because their
/// words fail the lookahead; a name glued to a '*' is never found.
fn variable_name(line: &str) -> String {
    let mut s = line;
    if let Some(rest) = s.strip_prefix("static ") {
        s = rest;
    }
    s = s.trim_start();
    if let Some(rest) = s.strip_prefix("const ") {
        s = rest;
    }
    s = s.trim_start();

    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == ' ' || chars[i] == '*') {
        if chars[i] == ' ' && i + 1 < chars.len() && is_ident_char(chars[i + 1]) {
            i += 1;
            let start = i;
            let mut j = i;
            while j < chars.len() && is_ident_char(chars[j]) {
                j += 1;
            }
            let mut k = j;
            while k < chars.len() && chars[k].is_whitespace() {
                k += 1;
            }
            if k < chars.len() && matches!(chars[k], '[' | '=' | ';') {
                return chars[start..j].iter().collect();
            }
        }
        i += 1;
    }
    String::new()
}

/// Truncate to at most `max` bytes on a char boundary. Lossy by policy.
fn cap_text(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
