//! Markdown/MDX document tree for the snippet transform.
//!
//! A [`Document`] keeps its source text and the nodes the transform cares
//! about: top-level ESM blocks and fenced code blocks, each with the byte
//! span it came from. Rendering copies untouched source verbatim and only
//! re-emits code blocks whose info string or content changed.

mod parse;
#[cfg(test)]
mod tests;
mod view;

use std::ops::Range;
use std::path::{Path, PathBuf};

/// Markdown dialect of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFlavor {
    /// CommonMark/GFM: no ESM blocks.
    Markdown,
    /// MDX: top-level `import`/`export` paragraphs are ESM blocks.
    #[default]
    Mdx,
}

impl DocumentFlavor {
    /// MDX when the extension of `path` is one of `mdx_extensions` (compared
    /// case-insensitively, leading dot optional), Markdown otherwise.
    pub fn from_path(path: &Path, mdx_extensions: &[String]) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Markdown;
        };
        if mdx_extensions
            .iter()
            .any(|mdx| mdx.trim_start_matches('.').eq_ignore_ascii_case(ext))
        {
            Self::Mdx
        } else {
            Self::Markdown
        }
    }
}

/// The file a document was read from.
#[derive(Debug, Clone)]
pub struct FileContext {
    pub path: PathBuf,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory that relative import specifiers resolve against.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Esm,
    Code,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Esm(EsmNode),
    Code(CodeBlock),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Esm(_) => NodeKind::Esm,
            Node::Code(_) => NodeKind::Code,
        }
    }
}

/// A top-level MDX `import`/`export` block.
#[derive(Debug, Clone, PartialEq)]
pub struct EsmNode {
    pub value: String,
}

/// A fenced code block. `lang` and `meta` follow the usual split of the info
/// string: the first word, then the trimmed rest.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub lang: Option<String>,
    pub meta: Option<String>,
    /// Content without the trailing newline before the closing fence.
    pub value: String,
    fence: Fence,
    span: Range<usize>,
    original_info: String,
    original_value: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Fence {
    ch: char,
    len: usize,
    /// Text before the fence on the opening line (indentation, `> `, `- `).
    prefix: String,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl CodeBlock {
    /// The info string as it would be written after the opening fence.
    pub fn info_string(&self) -> String {
        match (&self.lang, &self.meta) {
            (Some(lang), Some(meta)) => format!("{lang} {meta}"),
            (Some(lang), None) => lang.clone(),
            (None, Some(meta)) => meta.clone(),
            (None, None) => String::new(),
        }
    }

    /// Replace the info string, splitting it into `lang` and `meta`.
    pub fn set_info_string(&mut self, info: &str) {
        let (lang, meta) = split_info_string(info);
        self.lang = lang;
        self.meta = meta;
    }

    pub fn is_modified(&self) -> bool {
        self.value != self.original_value || self.info_string() != self.original_info
    }

    fn render_into(&self, out: &mut String) {
        let fence = self.fence_for_content();
        let continuation = continuation_prefix(&self.fence.prefix);
        let blank_continuation = continuation.trim_end();

        out.push_str(&self.fence.prefix);
        out.push_str(&fence);
        out.push_str(&self.info_string());
        let newline = self.fence.line_ending;
        if !self.value.is_empty() {
            for line in self.value.split('\n') {
                out.push_str(newline);
                if line.is_empty() {
                    out.push_str(blank_continuation);
                } else {
                    out.push_str(&continuation);
                    out.push_str(line);
                }
            }
        }
        out.push_str(newline);
        out.push_str(&continuation);
        out.push_str(&fence);
        if self.fence.trailing_newline {
            out.push_str(newline);
        }
    }

    /// The original fence, lengthened if the content contains a run of the
    /// same fence character at least as long.
    fn fence_for_content(&self) -> String {
        let longest = self
            .value
            .lines()
            .map(|line| line.trim_start().chars().take_while(|&c| c == self.fence.ch).count())
            .max()
            .unwrap_or(0);
        let len = if longest >= self.fence.len {
            longest + 1
        } else {
            self.fence.len
        };
        self.fence.ch.to_string().repeat(len)
    }
}

/// Prefix for lines after the opening fence: blockquote markers stay, list
/// markers and other characters become indentation.
fn continuation_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| if c == '>' || c == '\t' { c } else { ' ' })
        .collect()
}

pub(crate) fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, rest)) => {
            let rest = rest.trim();
            let meta = (!rest.is_empty()).then(|| rest.to_string());
            (Some(lang.to_string()), meta)
        }
        None => (Some(info.to_string()), None),
    }
}

/// A `code={identifier}` fence the parser did not turn into a code block,
/// such as one inside raw HTML or an indented code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenMarker {
    pub identifier: String,
    /// 1-based source line of the fence.
    pub line: usize,
}

/// A parsed Markdown/MDX document.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    nodes: Vec<Node>,
    hidden_markers: Vec<HiddenMarker>,
}

impl Document {
    /// Parse `source` as MDX.
    pub fn parse(source: impl Into<String>) -> Self {
        Self::parse_with_flavor(source, DocumentFlavor::Mdx)
    }

    pub fn parse_with_flavor(source: impl Into<String>, flavor: DocumentFlavor) -> Self {
        let source = source.into();
        let (nodes, hidden_markers) = parse::collect_nodes(&source, flavor);
        Self {
            source,
            nodes,
            hidden_markers,
        }
    }

    /// Marked fences that no code node covers. A transform cannot reach them.
    pub fn hidden_markers(&self) -> &[HiddenMarker] {
        &self.hidden_markers
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Call `handler` for every node of `kind`, in document order.
    pub fn visit<F>(&self, kind: NodeKind, mut handler: F)
    where
        F: FnMut(NodeId, &Node),
    {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.kind() == kind {
                handler(NodeId(index), node);
            }
        }
    }

    /// Call `handler` with a mutable handle to every node of `kind`, in
    /// document order. Stops at the first error.
    pub fn visit_mut<F, E>(&mut self, kind: NodeKind, mut handler: F) -> Result<(), E>
    where
        F: FnMut(NodeId, &mut Node) -> Result<(), E>,
    {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if node.kind() == kind {
                handler(NodeId(index), node)?;
            }
        }
        Ok(())
    }

    pub fn code_block_mut(&mut self, id: NodeId) -> Option<&mut CodeBlock> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Code(block)) => Some(block),
            _ => None,
        }
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Code(block) => Some(block),
            _ => None,
        })
    }

    pub fn is_modified(&self) -> bool {
        self.code_blocks().any(CodeBlock::is_modified)
    }

    /// Render the document, re-emitting only modified code blocks.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for block in self.code_blocks().filter(|block| block.is_modified()) {
            out.push_str(&self.source[cursor..block.span.start]);
            block.render_into(&mut out);
            cursor = block.span.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
