//! File discovery and per-file processing for the CLI.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use snipmd_lib::error::TransformError;
use snipmd_lib::transform::{SnippetTransform, TransformSummary};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where transformed documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    InPlace,
    /// Mirror each file's path relative to the project root under this directory.
    Directory(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{}: {source}", .path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub summary: TransformSummary,
    pub changed: bool,
}

/// Expands directory-style patterns to also match files within them.
/// Pattern "dir/path" becomes ["dir/path", "dir/path/**"].
///
/// Patterns containing glob characters (*, ?, [) are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }

    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().flat_map(|p| expand_directory_pattern(p)) {
        builder.add(Glob::new(&pattern)?);
    }
    builder.build()
}

/// Collect Markdown/MDX files under `paths`.
///
/// Directories are walked respecting `.gitignore`; explicitly named files are
/// taken as-is. Files matching an exclude pattern (relative to `root`) are
/// dropped in both cases.
pub fn find_markdown_files(paths: &[PathBuf], exclude: &[String], root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let excludes = build_exclude_set(exclude)?;
    let is_excluded = |path: &Path| {
        let relative = path.strip_prefix(root).unwrap_or(path);
        excludes.is_match(relative)
    };

    let mut file_paths = Vec::new();
    for path in paths {
        if path.is_file() {
            if !is_excluded(path) {
                file_paths.push(path.clone());
            }
            continue;
        }

        let mut types_builder = ignore::types::TypesBuilder::new();
        types_builder.add("markdown", "*.md")?;
        types_builder.add("markdown", "*.markdown")?;
        types_builder.add("markdown", "*.mdx")?;
        types_builder.select("markdown");

        let walker = WalkBuilder::new(path).types(types_builder.build()?).build();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_some_and(|t| t.is_file()) && !is_excluded(entry.path()) {
                file_paths.push(entry.path().to_path_buf());
            }
        }
    }

    file_paths.sort();
    file_paths.dedup();
    Ok(file_paths)
}

/// Transform one file and emit the result according to `mode`.
pub async fn process_file(
    transform: &SnippetTransform,
    path: &Path,
    mode: &OutputMode,
    root: &Path,
) -> Result<FileOutcome, ProcessError> {
    let source = fs::read_to_string(path).map_err(|source| ProcessError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let absolute = root.join(path);
    let (rendered, summary) =
        transform
            .transform_source(&source, &absolute)
            .await
            .map_err(|source| ProcessError::Transform {
                path: path.to_path_buf(),
                source,
            })?;
    let changed = rendered != source;

    match mode {
        OutputMode::Stdout => print!("{rendered}"),
        OutputMode::InPlace => {
            if changed {
                write_file(path, &rendered)?;
            }
        }
        OutputMode::Directory(out_dir) => {
            let relative = absolute.strip_prefix(root).unwrap_or_else(|_| {
                Path::new(path.file_name().unwrap_or(path.as_os_str()))
            });
            write_file(&out_dir.join(relative), &rendered)?;
        }
    }

    log::info!(
        "{}: {} snippet(s) substituted, {} formatted, {} unformatted",
        path.display(),
        summary.substituted,
        summary.formatted,
        summary.fallbacks
    );

    Ok(FileOutcome {
        path: path.to_path_buf(),
        summary,
        changed,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), ProcessError> {
    let to_error = |source: io::Error| ProcessError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, content).map_err(to_error)
}
