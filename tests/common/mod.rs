//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use futures::FutureExt;
use futures::future::BoxFuture;
use snipmd_lib::config::TransformOptions;
use snipmd_lib::error::FormatterError;
use snipmd_lib::formatter::{FormatRequest, Formatter};
use snipmd_lib::fs::MemoryFileSystem;
use snipmd_lib::syntax::{ModuleParser, ModuleSyntax, OxcModuleParser, SyntaxError};
use snipmd_lib::transform::SnippetTransform;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

pub const PROJECT_ROOT: &str = "/project";
pub const DOC_PATH: &str = "/project/docs/page.mdx";

/// Prefixes the snippet with a comment naming the profile it was formatted
/// under, and records every request.
#[derive(Debug, Default)]
pub struct RecordingFormatter {
    requests: Mutex<Vec<(String, &'static str)>>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(source, profile)` pairs in the order `format` was called.
    pub fn requests(&self) -> Vec<(String, &'static str)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Formatter for RecordingFormatter {
    fn format(&self, source: String, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>> {
        self.requests.lock().unwrap().push((source.clone(), request.profile));
        let profile = request.profile;
        async move { Ok(format!("// {profile}\n{source}\n\n")) }.boxed()
    }
}

/// Always fails, as a missing prettier would.
#[derive(Debug, Default)]
pub struct FailingFormatter;

impl Formatter for FailingFormatter {
    fn format(&self, _source: String, _request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>> {
        async {
            Err(FormatterError::ToolNotFound {
                tool: "prettier".to_string(),
            })
        }
        .boxed()
    }
}

/// Fails unless `expected_reads` files have been read by the time its future
/// is first polled.
pub struct ReadsFirstFormatter {
    pub fs: Arc<MemoryFileSystem>,
    pub expected_reads: usize,
}

impl Formatter for ReadsFirstFormatter {
    fn format(&self, source: String, _request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>> {
        let fs = Arc::clone(&self.fs);
        let expected = self.expected_reads;
        async move {
            let reads = fs.reads().len();
            if reads == expected {
                Ok(source)
            } else {
                Err(FormatterError::Io {
                    message: format!("polled after {reads} of {expected} reads"),
                })
            }
        }
        .boxed()
    }
}

/// Every future waits at a shared barrier, so none of them completes until
/// all `n` have been polled.
pub struct BarrierFormatter {
    barrier: Arc<Barrier>,
}

impl BarrierFormatter {
    pub fn new(n: usize) -> Self {
        Self {
            barrier: Arc::new(Barrier::new(n)),
        }
    }
}

impl Formatter for BarrierFormatter {
    fn format(&self, source: String, _request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>> {
        let barrier = Arc::clone(&self.barrier);
        async move {
            barrier.wait().await;
            Ok(format!("// formatted\n{source}"))
        }
        .boxed()
    }
}

/// OXC parser that records the origin of every parse.
#[derive(Debug, Default)]
pub struct CountingParser {
    parses: Mutex<Vec<PathBuf>>,
    calls: AtomicUsize,
}

impl CountingParser {
    /// Origins of parsed modules, ESM blocks included.
    pub fn origins(&self) -> Vec<PathBuf> {
        self.parses.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModuleParser for CountingParser {
    fn parse_module(&self, source: &str, origin: &Path) -> Result<ModuleSyntax, SyntaxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.parses.lock().unwrap().push(origin.to_path_buf());
        OxcModuleParser::new().parse_module(source, origin)
    }
}

pub fn default_options() -> TransformOptions {
    TransformOptions::defaults(Path::new(PROJECT_ROOT))
}

pub fn transform(fs: MemoryFileSystem, formatter: Arc<dyn Formatter>) -> SnippetTransform {
    SnippetTransform::new(default_options())
        .with_file_system(Arc::new(fs))
        .with_formatter(formatter)
}

/// A module exporting `name` as a template literal with `body` as its text.
pub fn snippet_module(name: &str, body: &str) -> String {
    format!("export const {name} = `{body}`;\n")
}
