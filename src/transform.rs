//! Substitution of exported snippets into annotated code blocks.
//!
//! A code block opts in with a `code={identifier}` marker in its info string:
//!
//! ````mdx
//! import { snippetA } from "@code/demo";
//!
//! ```ts code={snippetA}
//! ```
//! ````
//!
//! The identifier is looked up in the document's imports, its module is
//! resolved and read, and the template literal bound to that name replaces
//! the block's content. Blocks with a language tag are formatted; all
//! formatting runs after every block has been visited.

use crate::config::TransformOptions;
use crate::document::{CodeBlock, Document, DocumentFlavor, FileContext, Node, NodeId, NodeKind};
use crate::error::{FormatterError, TransformError};
use crate::extractor::ExportExtractor;
use crate::formatter::{CommandFormatter, FormatRequest, Formatter, formatter_profile};
use crate::fs::{FileSystem, OsFileSystem};
use crate::imports::ImportIndex;
use crate::resolver::ModuleResolver;
use crate::syntax::{ModuleParser, OxcModuleParser};
use futures::future::{BoxFuture, join_all};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};

static CODE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"code=\{([A-Za-z0-9_]+)\}").unwrap());
static CODE_MARKER_WITH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*code=\{[A-Za-z0-9_]+\}\s*").unwrap());

/// The `code={identifier}` annotation of a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockAnnotation {
    /// Info string the marker was found in.
    pub raw_meta: String,
    pub identifier: String,
    /// Language tag, unless the first word of the info string is the marker.
    pub language: Option<String>,
}

impl CodeBlockAnnotation {
    /// `None` when the block carries no marker.
    pub fn parse(block: &CodeBlock) -> Option<Self> {
        let raw_meta = block.info_string();
        let identifier = CODE_MARKER.captures(&raw_meta)?[1].to_string();
        let language = block.lang.clone().filter(|lang| !CODE_MARKER.is_match(lang));
        Some(Self {
            raw_meta,
            identifier,
            language,
        })
    }

    /// The info string with the marker and its surrounding whitespace removed.
    pub fn stripped_info(&self) -> String {
        CODE_MARKER_WITH_SPACE
            .replace(&self.raw_meta, " ")
            .trim()
            .to_string()
    }
}

/// Counts of what a transform run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Blocks whose content was replaced by a snippet.
    pub substituted: usize,
    /// Blocks whose snippet was formatted successfully.
    pub formatted: usize,
    /// Blocks that kept the unformatted snippet because formatting failed.
    pub fallbacks: usize,
}

struct PendingFormat {
    id: NodeId,
    raw: String,
    future: BoxFuture<'static, Result<String, FormatterError>>,
}

pub struct SnippetTransform {
    options: TransformOptions,
    parser: Arc<dyn ModuleParser>,
    fs: Arc<dyn FileSystem>,
    formatter: Arc<dyn Formatter>,
}

impl SnippetTransform {
    /// Transform backed by OXC, the real filesystem, and prettier.
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            parser: Arc::new(OxcModuleParser),
            fs: Arc::new(OsFileSystem),
            formatter: Arc::new(CommandFormatter::prettier()),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ModuleParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Substitute snippets into every annotated code block of `document`.
    ///
    /// A marker the document parser could not attach to a code block fails
    /// the run before anything is resolved.
    /// Imports, resolution, and extraction run synchronously while blocks are
    /// visited; any failure there aborts the whole document. Formatting
    /// futures are awaited together afterwards, and a block whose formatting
    /// fails keeps the trimmed, unformatted snippet.
    pub async fn run(&self, document: &mut Document, file: &FileContext) -> Result<TransformSummary, TransformError> {
        if let Some(marker) = document.hidden_markers().first() {
            return Err(TransformError::UnreachableMarker {
                identifier: marker.identifier.clone(),
                line: marker.line,
            });
        }

        let index = ImportIndex::build(document, file, self.parser.as_ref())?;
        let resolver = ModuleResolver::new(&self.options.aliases, &self.options.extensions, self.fs.as_ref());
        let extractor = ExportExtractor::new(self.parser.as_ref(), self.fs.as_ref());

        let mut summary = TransformSummary::default();
        let mut pending = Vec::new();

        document.visit_mut(NodeKind::Code, |id, node| -> Result<(), TransformError> {
            let Node::Code(block) = node else {
                return Ok(());
            };
            let Some(annotation) = CodeBlockAnnotation::parse(block) else {
                return Ok(());
            };

            let specifier =
                index
                    .get(&annotation.identifier)
                    .ok_or_else(|| TransformError::UnresolvedReference {
                        identifier: annotation.identifier.clone(),
                    })?;
            let path = resolver.resolve(specifier, file.directory())?;
            let snippet = extractor.extract(&path, &annotation.identifier)?;
            let snippet = snippet.trim().to_string();

            log::debug!(
                "Substituting `{}` from {} into {}",
                annotation.identifier,
                path.display(),
                file.path.display()
            );

            match annotation.language.as_deref() {
                None => block.value = snippet,
                Some(language) => {
                    let request = FormatRequest {
                        profile: formatter_profile(Some(language)),
                        options: self.options.formatter_options.clone(),
                    };
                    let future = self.formatter.format(snippet.clone(), request);
                    pending.push(PendingFormat {
                        id,
                        raw: snippet,
                        future,
                    });
                }
            }
            block.set_info_string(&annotation.stripped_info());
            summary.substituted += 1;
            Ok(())
        })?;

        let results = join_all(pending.into_iter().map(|p| async move { (p.id, p.raw, p.future.await) })).await;

        for (id, raw, result) in results {
            let value = match result {
                Ok(formatted) => {
                    summary.formatted += 1;
                    formatted.trim_end().to_string()
                }
                Err(e) => {
                    log::warn!("Formatting a snippet in {} failed, keeping it unformatted: {e}", file.path.display());
                    summary.fallbacks += 1;
                    raw
                }
            };
            if let Some(block) = document.code_block_mut(id) {
                block.value = value;
            }
        }

        Ok(summary)
    }

    /// Parse `source` as the document at `path`, transform it, and render it.
    pub async fn transform_source(&self, source: &str, path: &Path) -> Result<(String, TransformSummary), TransformError> {
        let flavor = DocumentFlavor::from_path(path, &self.options.mdx_extensions);
        let mut document = Document::parse_with_flavor(source, flavor);
        let summary = self.run(&mut document, &FileContext::new(path)).await?;
        Ok((document.render(), summary))
    }
}
