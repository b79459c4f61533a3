use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_collects_esm_and_code_blocks() {
    let content = r#"import { snippetA } from "@code/demo";
export const meta = { title: "Demo" };

# Heading

```ts code={snippetA}
placeholder
```

Some text

~~~bash
echo hello
~~~
"#;
    let doc = Document::parse(content);
    let kinds: Vec<_> = doc.nodes().iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Esm, NodeKind::Code, NodeKind::Code]);

    let Node::Esm(esm) = &doc.nodes()[0] else {
        panic!("expected ESM node");
    };
    assert_eq!(
        esm.value,
        "import { snippetA } from \"@code/demo\";\nexport const meta = { title: \"Demo\" };"
    );

    let blocks: Vec<_> = doc.code_blocks().collect();
    assert_eq!(blocks[0].lang.as_deref(), Some("ts"));
    assert_eq!(blocks[0].meta.as_deref(), Some("code={snippetA}"));
    assert_eq!(blocks[0].value, "placeholder");
    assert_eq!(blocks[1].lang.as_deref(), Some("bash"));
    assert_eq!(blocks[1].meta, None);
}

#[test]
fn test_markdown_flavor_has_no_esm() {
    let doc = Document::parse_with_flavor("import { a } from './a';\n\ntext\n", DocumentFlavor::Markdown);
    assert!(doc.nodes().is_empty());
}

#[test]
fn test_prose_starting_with_import_word_is_not_esm() {
    let doc = Document::parse("Important things first.\n\nimports are listed below\n");
    assert!(doc.nodes().is_empty());
}

#[test]
fn test_nested_import_paragraph_is_not_esm() {
    let doc = Document::parse("> import { a } from './a';\n");
    assert!(doc.nodes().is_empty());
}

#[test]
fn test_flavor_from_path() {
    let mdx_only = vec!["mdx".to_string()];
    assert_eq!(DocumentFlavor::from_path(Path::new("docs/a.mdx"), &mdx_only), DocumentFlavor::Mdx);
    assert_eq!(DocumentFlavor::from_path(Path::new("docs/a.MDX"), &mdx_only), DocumentFlavor::Mdx);
    assert_eq!(DocumentFlavor::from_path(Path::new("docs/a.md"), &mdx_only), DocumentFlavor::Markdown);
    assert_eq!(DocumentFlavor::from_path(Path::new("docs/README"), &mdx_only), DocumentFlavor::Markdown);

    let both = vec![".mdx".to_string(), "md".to_string()];
    assert_eq!(DocumentFlavor::from_path(Path::new("docs/a.md"), &both), DocumentFlavor::Mdx);
}

#[test]
fn test_code_block_directly_inside_jsx_element() {
    let content = "import { snippetA } from \"@code/demo\";\n\n<TabItem value=\"ts\">\n```ts code={snippetA}\n```\n</TabItem>\n";
    let mut doc = Document::parse(content);
    let kinds: Vec<_> = doc.nodes().iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Esm, NodeKind::Code]);
    assert!(doc.hidden_markers().is_empty());

    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    assert_eq!(block.info_string(), "ts code={snippetA}");
    assert_eq!(block.value, "");
    block.value = "const a = 1;".to_string();
    block.set_info_string("ts");

    assert_eq!(
        doc.render(),
        "import { snippetA } from \"@code/demo\";\n\n<TabItem value=\"ts\">\n```ts\nconst a = 1;\n```\n</TabItem>\n"
    );
}

#[test]
fn test_code_block_indented_inside_nested_jsx() {
    let content = "<Tabs>\n  <TabItem value=\"ts\">\n\n    ```ts code={snippetA}\n    ```\n\n  </TabItem>\n</Tabs>\n";
    let mut doc = Document::parse(content);
    assert!(doc.hidden_markers().is_empty());

    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    assert_eq!(block.meta.as_deref(), Some("code={snippetA}"));
    block.value = "const a = 1;\n\nconst b = 2;".to_string();
    block.set_info_string("ts");

    assert_eq!(
        doc.render(),
        "<Tabs>\n  <TabItem value=\"ts\">\n\n    ```ts\n    const a = 1;\n\n    const b = 2;\n    ```\n\n  </TabItem>\n</Tabs>\n"
    );
}

#[test]
fn test_import_inside_jsx_element_is_not_esm() {
    let doc = Document::parse("<Note>\nimport { a } from './a';\n</Note>\n");
    assert!(doc.nodes().is_empty());
}

#[test]
fn test_marker_inside_html_block_is_hidden() {
    let content = "<details>\n```ts code={a}\n```\n</details>\n";
    let doc = Document::parse_with_flavor(content, DocumentFlavor::Markdown);
    assert_eq!(doc.code_blocks().count(), 0);
    assert_eq!(
        doc.hidden_markers(),
        &[HiddenMarker {
            identifier: "a".to_string(),
            line: 2
        }]
    );
}

#[test]
fn test_marker_in_indented_code_is_hidden() {
    let doc = Document::parse_with_flavor("Text\n\n    ```ts code={b}\n    ```\n", DocumentFlavor::Markdown);
    assert_eq!(doc.hidden_markers().len(), 1);
    assert_eq!(doc.hidden_markers()[0].identifier, "b");
    assert_eq!(doc.hidden_markers()[0].line, 3);
}

#[test]
fn test_marker_quoted_inside_code_block_is_not_hidden() {
    let doc = Document::parse("````md\n```ts code={a}\n```\n````\n");
    assert_eq!(doc.code_blocks().count(), 1);
    assert!(doc.hidden_markers().is_empty());
}

#[test]
fn test_render_keeps_crlf_line_endings() {
    let content = "Intro\r\n\r\n```ts code={a}\r\nold\r\n```\r\n\r\nAfter\r\n";
    let mut doc = Document::parse(content);
    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    assert_eq!(block.value, "old");
    block.value = "one\ntwo".to_string();
    block.set_info_string("ts");

    assert_eq!(doc.render(), "Intro\r\n\r\n```ts\r\none\r\ntwo\r\n```\r\n\r\nAfter\r\n");
}

#[test]
fn test_unmodified_document_renders_verbatim() {
    let content = "# Title\n\n```ts   title=\"a.ts\"\nconst a = 1;\n```\n\ntrailing  \n";
    let doc = Document::parse(content);
    assert!(!doc.is_modified());
    assert_eq!(doc.render(), content);
}

#[test]
fn test_render_replaces_only_modified_block() {
    let content = "Intro\n\n```ts code={a}\nold\n```\n\n```js\nkeep();\n```\n";
    let mut doc = Document::parse(content);
    doc.visit_mut(NodeKind::Code, |_, node| {
        if let Node::Code(block) = node
            && block.meta.is_some()
        {
            block.value = "const a = 1;\nconst b = 2;".to_string();
            block.meta = None;
        }
        Ok::<(), ()>(())
    })
    .unwrap();

    assert_eq!(
        doc.render(),
        "Intro\n\n```ts\nconst a = 1;\nconst b = 2;\n```\n\n```js\nkeep();\n```\n"
    );
}

#[test]
fn test_render_preserves_blockquote_prefix() {
    let content = "> ```ts code={a}\n> old\n> ```\n";
    let mut doc = Document::parse(content);
    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    block.value = "one\n\ntwo".to_string();
    block.set_info_string("ts");

    assert_eq!(doc.render(), "> ```ts\n> one\n>\n> two\n> ```\n");
}

#[test]
fn test_render_indents_list_item_block() {
    let content = "- item\n\n  ```ts code={a}\n  old\n  ```\n";
    let mut doc = Document::parse(content);
    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    assert_eq!(block.value, "old");
    block.value = "new()".to_string();
    block.set_info_string("ts");

    assert_eq!(doc.render(), "- item\n\n  ```ts\n  new()\n  ```\n");
}

#[test]
fn test_render_lengthens_fence_for_nested_fences() {
    let content = "```md code={a}\n```\n";
    let mut doc = Document::parse(content);
    let id = first_code_id(&doc);
    let block = doc.code_block_mut(id).unwrap();
    block.value = "```js\nx\n```".to_string();
    block.set_info_string("md");

    assert_eq!(doc.render(), "````md\n```js\nx\n```\n````\n");
}

#[test]
fn test_render_block_at_eof_without_newline() {
    let content = "```ts code={a}\nold\n```";
    let mut doc = Document::parse(content);
    let id = first_code_id(&doc);
    doc.code_block_mut(id).unwrap().value = "new".to_string();

    assert_eq!(doc.render(), "```ts code={a}\nnew\n```");
}

#[test]
fn test_split_info_string() {
    assert_eq!(split_info_string(""), (None, None));
    assert_eq!(split_info_string("ts"), (Some("ts".into()), None));
    assert_eq!(
        split_info_string("ts  code={a}  title=x "),
        (Some("ts".into()), Some("code={a}  title=x".into()))
    );
}

fn first_code_id(doc: &Document) -> NodeId {
    let mut found = None;
    doc.visit(NodeKind::Code, |id, _| {
        found.get_or_insert(id);
    });
    found.expect("document has a code block")
}
