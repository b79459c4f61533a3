//! Source text as the Markdown parser sees it.
//!
//! MDX lets JSX flow elements wrap Markdown, often indented:
//!
//! ````mdx
//! <Tabs>
//!   <TabItem value="ts">
//!
//!     ```ts code={snippetA}
//!     ```
//!
//!   </TabItem>
//! </Tabs>
//! ````
//!
//! CommonMark would read the tag lines as HTML blocks and the indented fence
//! as an indented code block. For MDX the view blanks single-line JSX tags and
//! removes the shared indentation of the lines between them, so the children
//! parse as ordinary Markdown. Every view offset maps back to a source offset.

use regex::Regex;
use std::sync::LazyLock;

/// A whole line holding one capitalised JSX tag or a fragment tag.
static JSX_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:<>|</>|</?[A-Z][A-Za-z0-9_.:-]*(?:\s[^<>]*)?/?>)[ \t]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    OpenTag,
    CloseTag,
    SelfClosingTag,
    Content,
}

#[derive(Debug, Clone, Copy)]
struct ViewLine {
    view_start: usize,
    source_start: usize,
    /// Bytes of the source line dropped from the front of the view line.
    removed: usize,
    /// Number of JSX elements enclosing the line.
    jsx_depth: usize,
}

#[derive(Debug)]
pub(super) struct FlowView {
    pub text: String,
    lines: Vec<ViewLine>,
}

impl FlowView {
    /// The source unchanged.
    pub fn identity(source: &str) -> Self {
        Self {
            text: source.to_string(),
            lines: vec![ViewLine {
                view_start: 0,
                source_start: 0,
                removed: 0,
                jsx_depth: 0,
            }],
        }
    }

    pub fn mdx(source: &str) -> Self {
        let raw_lines: Vec<&str> = source.split_inclusive('\n').collect();
        let (kinds, depths) = classify(&raw_lines);
        let removals = indentation_removals(&raw_lines, &kinds, &depths);

        let mut text = String::with_capacity(source.len());
        let mut lines = Vec::with_capacity(raw_lines.len().max(1));
        let mut source_start = 0;
        for (i, line) in raw_lines.iter().enumerate() {
            let removed = match kinds[i] {
                LineKind::Content => removals[i],
                _ => line.len() - line_ending(line).len(),
            };
            lines.push(ViewLine {
                view_start: text.len(),
                source_start,
                removed,
                jsx_depth: depths[i],
            });
            text.push_str(&line[removed..]);
            source_start += line.len();
        }
        if lines.is_empty() {
            return Self::identity(source);
        }

        Self { text, lines }
    }

    fn line_at(&self, view_offset: usize) -> &ViewLine {
        let index = self.lines.partition_point(|line| line.view_start <= view_offset);
        &self.lines[index.saturating_sub(1)]
    }

    /// Source offset of the byte at `view_offset`.
    pub fn to_source(&self, view_offset: usize) -> usize {
        let line = self.line_at(view_offset);
        line.source_start + line.removed + (view_offset - line.view_start)
    }

    /// Source offset for an exclusive range end.
    pub fn end_to_source(&self, view_end: usize) -> usize {
        match view_end.checked_sub(1) {
            Some(last) => self.to_source(last) + 1,
            None => self.to_source(0),
        }
    }

    pub fn jsx_depth(&self, view_offset: usize) -> usize {
        self.line_at(view_offset).jsx_depth
    }
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Kind of every line and the JSX depth it sits at. Lines inside fenced code
/// are always content.
fn classify(lines: &[&str]) -> (Vec<LineKind>, Vec<usize>) {
    let mut kinds = Vec::with_capacity(lines.len());
    let mut depths = Vec::with_capacity(lines.len());
    let mut depth = 0usize;
    let mut open_fence: Option<(char, usize)> = None;

    for line in lines {
        let content = line.trim_end_matches(['\r', '\n']);
        let trimmed = content.trim_start();

        if let Some((ch, len)) = open_fence {
            let run = trimmed.chars().take_while(|&c| c == ch).count();
            if run >= len && trimmed[run..].trim().is_empty() {
                open_fence = None;
            }
            kinds.push(LineKind::Content);
            depths.push(depth);
            continue;
        }

        if let Some(fence) = fence_opening(trimmed) {
            open_fence = Some(fence);
            kinds.push(LineKind::Content);
            depths.push(depth);
            continue;
        }

        let kind = if !JSX_TAG_LINE.is_match(content) {
            LineKind::Content
        } else if trimmed.starts_with("</") {
            LineKind::CloseTag
        } else if trimmed.ends_with("/>") {
            LineKind::SelfClosingTag
        } else {
            LineKind::OpenTag
        };

        match kind {
            LineKind::OpenTag => {
                depths.push(depth);
                depth += 1;
            }
            LineKind::CloseTag => {
                depth = depth.saturating_sub(1);
                depths.push(depth);
            }
            _ => depths.push(depth),
        }
        kinds.push(kind);
    }

    (kinds, depths)
}

fn fence_opening(trimmed: &str) -> Option<(char, usize)> {
    let ch = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    // Backtick info strings cannot contain backticks.
    let info_ok = ch == '~' || !trimmed[len..].contains('`');
    (len >= 3 && info_ok).then_some((ch, len))
}

/// Bytes to strip from each content line: runs of content lines inside a JSX
/// element lose the indentation they all share.
fn indentation_removals(lines: &[&str], kinds: &[LineKind], depths: &[usize]) -> Vec<usize> {
    let mut removals = vec![0; lines.len()];
    let mut start = 0;
    while start < lines.len() {
        if kinds[start] != LineKind::Content || depths[start] == 0 {
            start += 1;
            continue;
        }
        let end = (start..lines.len())
            .find(|&i| kinds[i] != LineKind::Content)
            .unwrap_or(lines.len());

        let shared = lines[start..end]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
            .min()
            .unwrap_or(0);

        for i in start..end {
            let indent = lines[i].len() - lines[i].trim_start_matches([' ', '\t']).len();
            let blank_width = lines[i].len() - line_ending(lines[i]).len();
            removals[i] = shared.min(indent).min(blank_width);
        }
        start = end;
    }
    removals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_offsets_unchanged() {
        let view = FlowView::identity("a\nb\n");
        assert_eq!(view.text, "a\nb\n");
        assert_eq!(view.to_source(2), 2);
        assert_eq!(view.end_to_source(4), 4);
    }

    #[test]
    fn test_blanks_tags_and_dedents_children() {
        let source = "<Tabs>\n  <TabItem value=\"ts\">\n\n    ```ts\n    x\n    ```\n\n  </TabItem>\n</Tabs>\n";
        let view = FlowView::mdx(source);
        assert_eq!(view.text, "\n\n\n```ts\nx\n```\n\n\n\n");

        let fence = view.text.find("```ts").unwrap();
        assert_eq!(&source[view.to_source(fence)..view.to_source(fence) + 5], "```ts");
        assert_eq!(view.jsx_depth(fence), 2);
    }

    #[test]
    fn test_lowercase_html_and_inline_jsx_are_kept() {
        let source = "<div>\n<Badge>new</Badge>\n</div>\n";
        assert_eq!(FlowView::mdx(source).text, source);
    }

    #[test]
    fn test_tags_inside_code_fences_are_content() {
        let source = "```jsx\n<App>\n```\n    indented\n";
        let view = FlowView::mdx(source);
        assert_eq!(view.text, source);
        assert_eq!(view.jsx_depth(view.text.len() - 1), 0);
    }

    #[test]
    fn test_self_closing_tag_does_not_nest() {
        let view = FlowView::mdx("<Admonition />\n  text\n");
        assert_eq!(view.text, "\n  text\n");
        assert_eq!(view.jsx_depth(3), 0);
    }

    #[test]
    fn test_crlf_lines_keep_their_endings() {
        let view = FlowView::mdx("<Note>\r\n  hi\r\n</Note>\r\n");
        assert_eq!(view.text, "\r\nhi\r\n\r\n");
        assert_eq!(view.to_source(2), 10);
    }
}
