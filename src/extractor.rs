//! Extraction of template-literal snippets from source modules.

use crate::error::TransformError;
use crate::fs::FileSystem;
use crate::syntax::{Initializer, ModuleParser};
use std::path::Path;

pub struct ExportExtractor<'a> {
    parser: &'a dyn ModuleParser,
    fs: &'a dyn FileSystem,
}

impl<'a> ExportExtractor<'a> {
    pub fn new(parser: &'a dyn ModuleParser, fs: &'a dyn FileSystem) -> Self {
        Self { parser, fs }
    }

    /// Read and parse `path`, and return the text of the top-level template
    /// literal bound to `identifier`.
    ///
    /// The literal segments are concatenated in order. Interpolated `${...}`
    /// expressions contribute nothing. When several declarations match, the
    /// last one wins.
    pub fn extract(&self, path: &Path, identifier: &str) -> Result<String, TransformError> {
        let source = self.fs.read_to_string(path).map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let module = self
            .parser
            .parse_module(&source, path)
            .map_err(|e| TransformError::ModuleSyntax {
                path: path.to_path_buf(),
                message: e.message,
            })?;

        let mut snippet = None;
        for declaration in module.variable_declarations() {
            for declarator in &declaration.declarators {
                if declarator.name.as_deref() != Some(identifier) {
                    continue;
                }
                if let Initializer::Template { quasis, expressions } = &declarator.init {
                    if *expressions > 0 {
                        log::debug!(
                            "`{identifier}` in {} has {expressions} interpolation(s); only literal text is kept",
                            path.display()
                        );
                    }
                    snippet = Some(quasis.concat());
                }
            }
        }

        snippet.ok_or_else(|| TransformError::Extraction {
            path: path.to_path_buf(),
            identifier: identifier.to_string(),
        })
    }
}
