//! Error types for the snippet transform.
//!
//! Every failure except formatting aborts the transform of the whole document:
//! a broken snippet reference is an authoring error that should block the build.
//! Formatter failures are recovered inside the transform and only logged.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// An ESM block of the document is not valid module syntax.
    #[error("Failed to parse import block: {message}")]
    MalformedImport { message: String },

    /// A code block references an identifier that no import declares.
    #[error(
        "Code block references `{identifier}`, but it is not imported in this document. \
         Add `import {{ {identifier} }} from \"...\"` to the document."
    )]
    UnresolvedReference { identifier: String },

    /// A marked fence sits where the document parser does not see a code
    /// block, e.g. inside raw HTML.
    #[error(
        "Line {line}: `code={{{identifier}}}` is not on a fenced code block the transform can rewrite. \
         Move the fence out of raw HTML, or separate it from surrounding tags with blank lines."
    )]
    UnreachableMarker { identifier: String, line: usize },

    /// No file exists for any of the probed candidate paths.
    #[error("Cannot resolve module '{specifier}'. Tried:\n{}", format_probed(.probed))]
    Resolution { specifier: String, probed: Vec<PathBuf> },

    /// The module parsed but does not declare a template literal with that name.
    #[error("No template literal named `{identifier}` found in {}", .path.display())]
    Extraction { path: PathBuf, identifier: String },

    /// The resolved module is not valid module syntax.
    #[error("Failed to parse {}: {message}", .path.display())]
    ModuleSyntax { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn format_probed(probed: &[PathBuf]) -> String {
    probed
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error from a formatter. Recovered by falling back to the unformatted snippet.
#[derive(Debug, Clone, Error)]
pub enum FormatterError {
    #[error("Formatter '{tool}' not found in PATH")]
    ToolNotFound { tool: String },
    #[error("Formatter '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
    #[error("I/O error: {message}")]
    Io { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_lists_every_probe() {
        let err = TransformError::Resolution {
            specifier: "@code/demo".to_string(),
            probed: vec![PathBuf::from("/p/demo.ts"), PathBuf::from("/p/demo/index.ts")],
        };
        let message = err.to_string();
        assert!(message.contains("'@code/demo'"));
        assert!(message.contains("  - /p/demo.ts\n  - /p/demo/index.ts"));
    }

    #[test]
    fn test_unresolved_reference_has_hint() {
        let err = TransformError::UnresolvedReference {
            identifier: "snippetA".to_string(),
        };
        assert!(err.to_string().contains("import { snippetA } from"));
    }

    #[test]
    fn test_unreachable_marker_names_line_and_marker() {
        let err = TransformError::UnreachableMarker {
            identifier: "snippetA".to_string(),
            line: 7,
        };
        assert!(err.to_string().starts_with("Line 7: `code={snippetA}`"));
    }
}
