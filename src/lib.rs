//! snipmd: substitute source-file snippets into Markdown and MDX code blocks.
//!
//! The pipeline for one document is: parse the document into ESM and code
//! nodes, index the named imports of its ESM blocks, and for every code block
//! carrying a `code={identifier}` marker resolve the imported module, extract
//! the template literal bound to `identifier`, and splice it (formatted when
//! the block has a language) back into the block.

pub mod config;
pub mod document;
pub mod error;
pub mod exit_codes;
pub mod extractor;
pub mod formatter;
pub mod fs;
pub mod imports;
pub mod resolver;
pub mod syntax;
pub mod transform;

pub use crate::config::{LoadedConfig, SnippetConfig, TransformOptions, load_config};
pub use crate::document::{Document, DocumentFlavor, FileContext};
pub use crate::error::{FormatterError, TransformError};
pub use crate::transform::{SnippetTransform, TransformSummary};
