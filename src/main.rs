//! cdoc — generate documentation from C source files.
//!
//! Extracts functions, aggregate types, typedefs, macros, file-scope
//! variables and includes, pairing each with its preceding comment.
//! Three modes:
//!
//! - **stdin mode**: `cdoc < file.c`
//! - **file mode**: `cdoc -f json file.c src/*.c` — render to stdout
//! - **bulk mode**: `cdoc -R src -O docs` — recursively document a tree,
//!   writing text/JSON/HTML artifacts plus an index page

mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use parser::Limits;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "cdoc",
    version,
    about = "Generate documentation from C source files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output format: text, json, html
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Disable ANSI color in text output
    #[arg(short = 'n', long)]
    no_color: bool,

    /// Recursively document .c files under this directory
    #[arg(short = 'R', long, value_name = "DIR")]
    recursive: Option<PathBuf>,

    /// Output directory for bulk mode
    #[arg(short = 'O', long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Per-file node capacity; extraction stops with a warning beyond it
    #[arg(long, default_value_t = parser::DEFAULT_MAX_NODES)]
    max_nodes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let limits = Limits {
        max_nodes: cli.max_nodes,
        ..Limits::default()
    };

    if let Some(ref root) = cli.recursive {
        return bulk_mode(&cli, root, &limits);
    }
    if cli.files.is_empty() {
        return stdin_mode(&cli, &limits);
    }
    file_mode(&cli, &limits)
}

/// stdin mode: read one stream, render to stdout.
fn stdin_mode(cli: &Cli, limits: &Limits) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = parser::parse_source(&input, "(stdin)", limits);
    report_truncation(&doc);
    let renderer = render::create_renderer(&cli.format, !cli.no_color)?;
    print!("{}", renderer.render(&doc));
    Ok(())
}

/// file mode: parse each named file, render to stdout in sequence.
fn file_mode(cli: &Cli, limits: &Limits) -> Result<()> {
    let renderer = render::create_renderer(&cli.format, !cli.no_color)?;
    let files = expand_globs(&cli.files)?;
    anyhow::ensure!(!files.is_empty(), "no input files");

    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot open '{}'", path.display()))?;
        let doc = parser::parse_source(&content, &path.to_string_lossy(), limits);
        report_truncation(&doc);
        print!("{}", renderer.render(&doc));
    }
    Ok(())
}

/// bulk mode: document every .c file under root, writing all three formats
/// under the output directory plus an index page linking them.
fn bulk_mode(cli: &Cli, root: &Path, limits: &Limits) -> Result<()> {
    let out_dir = cli
        .out_dir
        .as_deref()
        .context("--out-dir is required with --recursive")?;
    anyhow::ensure!(root.is_dir(), "'{}' is not a directory", root.display());

    for sub in ["txt", "json", "html"] {
        let dir = out_dir.join(sub);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    }

    let pattern = format!("{}/**/*.c", root.display());
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files.dedup();

    let text = render::create_renderer("text", false)?;
    let json = render::create_renderer("json", false)?;
    let html = render::create_renderer("html", false)?;

    let mut rows = String::new();
    let mut file_count = 0usize;

    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("warning: skipping {}: {}", path.display(), err);
                continue;
            }
        };
        let doc = parser::parse_source(&content, &path.to_string_lossy(), limits);
        report_truncation(&doc);

        let rel = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        let base = artifact_base(&rel);

        for (renderer, sub) in [(&text, "txt"), (&json, "json"), (&html, "html")] {
            let out_path = out_dir
                .join(sub)
                .join(format!("{}.{}", base, renderer.file_extension()));
            fs::write(&out_path, renderer.render(&doc))
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }

        rows.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"html/{}.html\">HTML</a></td><td><a href=\"txt/{}.txt\">Text</a></td><td><a href=\"json/{}.json\">JSON</a></td></tr>\n",
            render::html::html_escape(&rel),
            base, base, base
        ));
        file_count += 1;
    }

    let mut index = String::new();
    index.push_str(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>cdoc index</title></head><body>\n",
    );
    index.push_str(&format!(
        "<h1>cdoc output</h1><p>Root: {}</p>\n",
        render::html::html_escape(&root.to_string_lossy())
    ));
    index.push_str("<table border=1 cellspacing=0 cellpadding=4>\n");
    index.push_str("<tr><th>Source</th><th>HTML</th><th>Text</th><th>JSON</th></tr>\n");
    index.push_str(&rows);
    index.push_str(&format!(
        "</table>\n<p>Total files: {}</p>\n</body></html>\n",
        file_count
    ));

    let index_path = out_dir.join("index.html");
    fs::write(&index_path, index)
        .with_context(|| format!("failed to write {}", index_path.display()))?;
    Ok(())
}

/// The node-capacity condition is reported exactly once per file.
fn report_truncation(doc: &model::SourceDocument) {
    if doc.truncated {
        eprintln!(
            "warning: node limit reached in {}, output truncated",
            doc.filepath
        );
    }
}

/// File extensions recognized when scanning a bare directory argument.
const SUPPORTED_EXTENSIONS: &[&str] = &["c", "h"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive a flat artifact name from a root-relative source path:
/// separators become "__", spaces become "_", the extension is dropped.
/// "net/io util.c" → "net__io_util"
fn artifact_base(rel: &str) -> String {
    let mut safe = String::with_capacity(rel.len());
    for ch in rel.chars() {
        match ch {
            '/' | '\\' => safe.push_str("__"),
            ' ' => safe.push('_'),
            _ => safe.push(ch),
        }
    }
    if safe.is_empty() {
        safe.push_str("file");
    }
    match safe.rfind('.') {
        Some(i) => safe[..i].to_string(),
        None => safe,
    }
}
