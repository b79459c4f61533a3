//! Builds document nodes from pulldown-cmark events.

use super::view::FlowView;
use super::{CodeBlock, DocumentFlavor, EsmNode, Fence, HiddenMarker, Node, split_info_string};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static ESM_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:import|export)(?:\s|\{|\*)").unwrap());

/// An opening fence, possibly behind blockquote or list markers, whose info
/// string carries a `code={identifier}` marker.
static MARKED_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t>]*(?:(?:[-*+]|\d{1,9}[.)])[ \t]+)?(?:`{3,}|~{3,})[^`\r\n]*code=\{([A-Za-z0-9_]+)\}").unwrap()
});

struct CodeBlockBuilder {
    line_start: usize,
    fence: Fence,
    info: String,
    value: String,
}

pub(super) fn collect_nodes(source: &str, flavor: DocumentFlavor) -> (Vec<Node>, Vec<HiddenMarker>) {
    let view = match flavor {
        DocumentFlavor::Mdx => FlowView::mdx(source),
        DocumentFlavor::Markdown => FlowView::identity(source),
    };

    let mut nodes = Vec::new();
    let mut current_block: Option<CodeBlockBuilder> = None;
    let mut depth = 0usize;

    let parser = Parser::new_ext(&view.text, Options::all()).into_offset_iter();

    for (event, range) in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                depth += 1;
                current_block = Some(start_code_block(source, view.to_source(range.start), &info));
            }
            Event::Text(text) => {
                if let Some(builder) = current_block.as_mut() {
                    builder.value.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                depth = depth.saturating_sub(1);
                if let Some(builder) = current_block.take() {
                    let end = view.end_to_source(range.end);
                    nodes.push(Node::Code(finish_code_block(source, builder, end)));
                }
            }
            Event::Start(Tag::Paragraph) => {
                let text = &view.text[range.clone()];
                if depth == 0
                    && flavor == DocumentFlavor::Mdx
                    && view.jsx_depth(range.start) == 0
                    && ESM_START.is_match(text)
                {
                    nodes.push(Node::Esm(EsmNode {
                        value: text.trim_end().to_string(),
                    }));
                }
                depth += 1;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    let hidden = hidden_markers(source, &nodes);
    (nodes, hidden)
}

fn start_code_block(source: &str, start: usize, info: &str) -> CodeBlockBuilder {
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let fence_pos = source[start..]
        .find(['`', '~'])
        .map(|i| start + i)
        .unwrap_or(start);
    let ch = if source[fence_pos..].starts_with('~') { '~' } else { '`' };
    let len = source[fence_pos..].chars().take_while(|&c| c == ch).count();
    let line_ending = match source[fence_pos..].find('\n') {
        Some(i) if source[..fence_pos + i].ends_with('\r') => "\r\n",
        _ => "\n",
    };

    CodeBlockBuilder {
        line_start,
        fence: Fence {
            ch,
            len,
            prefix: source[line_start..fence_pos].to_string(),
            line_ending,
            trailing_newline: false,
        },
        info: info.to_string(),
        value: String::new(),
    }
}

fn finish_code_block(source: &str, builder: CodeBlockBuilder, range_end: usize) -> CodeBlock {
    // Extend to the end of the last line so the whole closing fence is replaced.
    let end = if range_end > builder.line_start && source[..range_end].ends_with('\n') {
        range_end
    } else {
        source[range_end..]
            .find('\n')
            .map(|i| range_end + i)
            .unwrap_or(source.len())
    };
    // Keep a CRLF pair together.
    let end = if source[..end].ends_with('\r') { end - 1 } else { end };

    let mut fence = builder.fence;
    fence.trailing_newline = source[builder.line_start..end].ends_with('\n');

    let value = builder.value.replace("\r\n", "\n");
    let value = value.strip_suffix('\n').map(str::to_string).unwrap_or(value);

    let (lang, meta) = split_info_string(&builder.info);
    let mut block = CodeBlock {
        lang,
        meta,
        value: value.clone(),
        fence,
        span: builder.line_start..end,
        original_info: String::new(),
        original_value: value,
    };
    block.original_info = block.info_string();
    block
}

/// Marked fences that did not become code nodes, e.g. inside raw HTML.
fn hidden_markers(source: &str, nodes: &[Node]) -> Vec<HiddenMarker> {
    let spans: Vec<Range<usize>> = nodes
        .iter()
        .filter_map(|node| match node {
            Node::Code(block) => Some(block.span.clone()),
            Node::Esm(_) => None,
        })
        .collect();

    let mut hidden = Vec::new();
    let mut offset = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if let Some(captures) = MARKED_FENCE.captures(line)
            && !spans.iter().any(|span| span.contains(&offset))
        {
            hidden.push(HiddenMarker {
                identifier: captures[1].to_string(),
                line: index + 1,
            });
        }
        offset += line.len();
    }
    hidden
}
