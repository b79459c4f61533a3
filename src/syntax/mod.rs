//! Module syntax as seen by the snippet transform.
//!
//! Only the statements the transform inspects are represented: import
//! declarations and top-level variable declarations. Everything else a parser
//! produces is lowered to [`ModuleItem::Other`].

pub mod oxc;

pub use self::oxc::OxcModuleParser;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
}

/// Parses module source text into a [`ModuleSyntax`].
pub trait ModuleParser: Send + Sync {
    /// Parse `source` as an ES module. `origin` selects the dialect
    /// (TypeScript, JSX) from its extension.
    fn parse_module(&self, source: &str, origin: &Path) -> Result<ModuleSyntax, SyntaxError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleSyntax {
    pub items: Vec<ModuleItem>,
}

impl ModuleSyntax {
    pub fn imports(&self) -> impl Iterator<Item = &ImportDeclaration> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Import(decl) => Some(decl),
            _ => None,
        })
    }

    /// Top-level variable declarations, exported or not.
    pub fn variable_declarations(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Variables(decl) => Some(decl),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
    Import(ImportDeclaration),
    Variables(VariableDeclaration),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import { a }` or `import { a as b }`; holds the local binding.
    Named { local: String },
    /// `import a from`
    Default { local: String },
    /// `import * as a from`
    Namespace { local: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub declarators: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// `None` for destructuring patterns.
    pub name: Option<String>,
    pub init: Initializer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// A template literal: its literal segments in order and the number of
    /// `${...}` expressions between them.
    Template { quasis: Vec<String>, expressions: usize },
    /// A plain string literal, which is not a snippet.
    StringLiteral,
    Other,
    None,
}
