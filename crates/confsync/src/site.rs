//! Document discovery.
//!
//! Walks a source directory for markdown files and turns the eligible ones
//! into [`Document`]s. A file opts in to publishing with `confluence: true`
//! in its YAML front matter; everything else is left alone. Title
//! precedence: front-matter `title`, then the first H1 heading, then the
//! file stem.

use std::path::{Path, PathBuf};

use confsync_confluence::Document;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CliError;

/// Recognized front-matter fields; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    confluence: bool,
    title: Option<String>,
}

/// Discover eligible documents under `source_dir`.
///
/// Files are visited in sorted order within each directory so sync order is
/// deterministic across builds. Returns an empty list when the directory
/// does not exist.
pub(crate) fn discover(source_dir: &Path) -> Result<Vec<Document>, CliError> {
    let mut documents = Vec::new();
    if source_dir.exists() {
        scan_directory(source_dir, &mut documents)?;
    }
    Ok(documents)
}

fn scan_directory(dir: &Path, documents: &mut Vec<Document>) -> Result<(), CliError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            scan_directory(&path, documents)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            if let Some(document) = load_document(&path)? {
                documents.push(document);
            }
        }
    }
    Ok(())
}

/// Read one markdown file, returning `None` when it is not eligible.
fn load_document(path: &Path) -> Result<Option<Document>, CliError> {
    let content = std::fs::read_to_string(path)?;
    let (front_matter, body) = split_front_matter(&content);

    let Some(yaml) = front_matter else {
        debug!("ignoring {} (no front matter)", path.display());
        return Ok(None);
    };
    let meta: FrontMatter = match serde_yaml::from_str(yaml) {
        Ok(meta) => meta,
        Err(err) => {
            warn!("ignoring {} (invalid front matter: {err})", path.display());
            return Ok(None);
        }
    };
    if !meta.confluence {
        debug!("ignoring {} because confluence: false", path.display());
        return Ok(None);
    }

    let title = meta
        .title
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| file_stem(path));
    let source_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    Ok(Some(Document {
        title,
        markdown: body.to_owned(),
        source_path,
    }))
}

/// Split YAML front matter from the markdown body.
///
/// Returns `(None, content)` when the file has no leading `---` fence.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---\n") else {
        return (None, content);
    };
    match rest.split_once("\n---\n") {
        Some((yaml, body)) => (Some(yaml), body),
        None => match rest.strip_suffix("\n---") {
            Some(yaml) => (Some(yaml), ""),
            None => (None, content),
        },
    }
}

/// First ATX H1 heading in the body, if any.
fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_owned())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
