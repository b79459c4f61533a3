//! Index of named imports declared in a document's ESM blocks.

use crate::document::{Document, FileContext, Node, NodeKind};
use crate::error::TransformError;
use crate::syntax::{ImportSpecifier, ModuleParser};
use std::collections::HashMap;

/// Maps a locally bound identifier to the module specifier it is imported from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportIndex {
    bindings: HashMap<String, String>,
}

impl ImportIndex {
    /// Build the index from every ESM block of `document`.
    ///
    /// Only named specifiers are recorded; default and namespace imports are
    /// ignored. A later import of the same local name replaces an earlier one.
    pub fn build(
        document: &Document,
        file: &FileContext,
        parser: &dyn ModuleParser,
    ) -> Result<Self, TransformError> {
        let mut esm_sources = Vec::new();
        document.visit(NodeKind::Esm, |_, node| {
            if let Node::Esm(esm) = node {
                esm_sources.push(esm.value.clone());
            }
        });

        let mut index = Self::default();
        for source in esm_sources {
            let module = parser
                .parse_module(&source, &file.path)
                .map_err(|e| TransformError::MalformedImport { message: e.message })?;

            for import in module.imports() {
                for specifier in &import.specifiers {
                    if let ImportSpecifier::Named { local } = specifier {
                        log::debug!("Import binding {local} -> {}", import.source);
                        index.bindings.insert(local.clone(), import.source.clone());
                    }
                }
            }
        }

        Ok(index)
    }

    pub fn get(&self, local_name: &str) -> Option<&str> {
        self.bindings.get(local_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::OxcModuleParser;

    fn build(content: &str) -> Result<ImportIndex, TransformError> {
        let doc = Document::parse(content);
        ImportIndex::build(&doc, &FileContext::new("/project/docs/page.mdx"), &OxcModuleParser)
    }

    #[test]
    fn test_records_named_imports_only() {
        let index = build(
            "import Demo, { snippetA, snippetB as renamed } from '@code/demo';\n\
             import * as all from './all';\n\n# Page\n",
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("snippetA"), Some("@code/demo"));
        assert_eq!(index.get("renamed"), Some("@code/demo"));
        assert_eq!(index.get("snippetB"), None);
        assert_eq!(index.get("Demo"), None);
        assert_eq!(index.get("all"), None);
    }

    #[test]
    fn test_last_import_wins() {
        let index = build("import { a } from './one';\n\ntext\n\nimport { a } from './two';\n").unwrap();
        assert_eq!(index.get("a"), Some("./two"));
    }

    #[test]
    fn test_malformed_import_aborts() {
        let err = build("import { a from './one';\n").unwrap_err();
        assert!(matches!(err, TransformError::MalformedImport { .. }));
    }

    #[test]
    fn test_document_without_esm_is_empty() {
        let index = build("# Title\n\n```ts\nconst a = 1;\n```\n").unwrap();
        assert!(index.is_empty());
    }
}
