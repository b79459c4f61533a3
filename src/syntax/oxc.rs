//! [`ModuleParser`] backed by the OXC JavaScript/TypeScript parser.

use super::{
    ImportDeclaration, ImportSpecifier, Initializer, ModuleItem, ModuleParser, ModuleSyntax, SyntaxError,
    VariableDeclaration, VariableDeclarator,
};
use oxc_allocator::Allocator;
use oxc_ast::ast::{self, BindingPatternKind, Declaration, Expression, ImportDeclarationSpecifier, Statement};
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct OxcModuleParser;

impl OxcModuleParser {
    pub fn new() -> Self {
        Self
    }

    /// Dialect for a source path. Unknown extensions (`.mdx`, `.md`, none)
    /// parse as an ES module with JSX enabled, which is what MDX ESM allows.
    fn source_type(origin: &Path) -> SourceType {
        SourceType::from_path(origin).unwrap_or_else(|_| SourceType::mjs().with_jsx(true))
    }
}

impl ModuleParser for OxcModuleParser {
    fn parse_module(&self, source: &str, origin: &Path) -> Result<ModuleSyntax, SyntaxError> {
        let allocator = Allocator::default();
        let source_type = Self::source_type(origin);
        let ret = Parser::new(&allocator, source, source_type).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SyntaxError {
                message: if message.is_empty() {
                    "unrecoverable syntax error".to_string()
                } else {
                    message
                },
            });
        }

        let items = ret.program.body.iter().map(lower_statement).collect();
        Ok(ModuleSyntax { items })
    }
}

fn lower_statement(statement: &Statement<'_>) -> ModuleItem {
    match statement {
        Statement::ImportDeclaration(decl) => ModuleItem::Import(lower_import(decl)),
        Statement::VariableDeclaration(decl) => ModuleItem::Variables(lower_variables(decl)),
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => ModuleItem::Variables(lower_variables(decl)),
            _ => ModuleItem::Other,
        },
        _ => ModuleItem::Other,
    }
}

fn lower_import(decl: &ast::ImportDeclaration<'_>) -> ImportDeclaration {
    let specifiers = match &decl.specifiers {
        Some(specifiers) => specifiers.iter().map(lower_import_specifier).collect(),
        None => Vec::new(),
    };

    ImportDeclaration {
        source: decl.source.value.to_string(),
        specifiers,
    }
}

fn lower_import_specifier(specifier: &ImportDeclarationSpecifier<'_>) -> ImportSpecifier {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => ImportSpecifier::Named {
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportSpecifier::Default {
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportSpecifier::Namespace {
            local: s.local.name.to_string(),
        },
    }
}

fn lower_variables(decl: &ast::VariableDeclaration<'_>) -> VariableDeclaration {
    let declarators = decl
        .declarations
        .iter()
        .map(|declarator| {
            let name = match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(ident) => Some(ident.name.to_string()),
                _ => None,
            };
            let init = match &declarator.init {
                Some(Expression::TemplateLiteral(template)) => Initializer::Template {
                    // Invalid escapes have no cooked value; keep the source text then.
                    quasis: template
                        .quasis
                        .iter()
                        .map(|quasi| quasi.value.cooked.as_ref().unwrap_or(&quasi.value.raw).to_string())
                        .collect(),
                    expressions: template.expressions.len(),
                },
                Some(Expression::StringLiteral(_)) => Initializer::StringLiteral,
                Some(_) => Initializer::Other,
                None => Initializer::None,
            };
            VariableDeclarator { name, init }
        })
        .collect();

    VariableDeclaration { declarators }
}
