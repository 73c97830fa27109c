use markdown_overlay_engine::output::{NodeId, OutputTree};
use markdown_overlay_engine::snapshot::{self, normalize};
use markdown_overlay_engine::{ParseOptions, SourceText, parse_markdown, render_overlay};
use pretty_assertions::assert_eq;

fn load_fixture(name: &str) -> (String, OutputTree) {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let source = SourceText::new(&md);
    let root = parse_markdown(&md, &ParseOptions::default());
    let tree = render_overlay(&root, &source);

    snapshot::invariants(&source, &tree);
    let lines: Vec<String> = tree
        .all_lines()
        .into_iter()
        .map(|line| tree.line_text(line))
        .collect();
    assert_eq!(lines, md.split('\n').collect::<Vec<_>>());

    (md, tree)
}

fn line_with(tree: &OutputTree, text: &str) -> NodeId {
    tree.all_lines()
        .into_iter()
        .find(|&line| tree.line_text(line) == text)
        .unwrap_or_else(|| panic!("no line {text:?}"))
}

fn classes(tree: &OutputTree, text: &str) -> Vec<String> {
    tree.classes(line_with(tree, text)).to_vec()
}

#[test]
fn fixture_headings_and_paragraphs() {
    let (_, tree) = load_fixture("headings_and_paragraphs");

    assert_eq!(classes(&tree, "# Overlay"), vec!["md-heading", "md-heading1"]);
    assert_eq!(
        classes(&tree, "## Second section"),
        vec!["md-heading", "md-heading2"]
    );
    assert_eq!(
        classes(&tree, "onto a second line with *emphasis"),
        vec!["md-paragraph"]
    );

    let indexed: Vec<usize> = normalize(&tree)
        .blocks
        .iter()
        .filter_map(|b| b.index)
        .collect();
    assert_eq!(indexed, vec![0, 1, 2, 3]);
}

#[test]
fn fixture_code_html_math() {
    let (_, tree) = load_fixture("code_html_math");

    assert_eq!(
        classes(&tree, "```rust"),
        vec!["md-code", "md-first"]
    );
    assert_eq!(classes(&tree, "    println!(\"hi\");"), vec!["md-code"]);
    assert_eq!(
        classes(&tree, "<details>"),
        vec!["md-html", "md-first"]
    );
    assert_eq!(classes(&tree, "</details>"), vec!["md-html", "md-last"]);
    assert_eq!(
        classes(&tree, "```math plot"),
        vec!["md-math", "md-first"]
    );
}

#[test]
fn fixture_nested_quotes_and_lists() {
    let (_, tree) = load_fixture("nested_quotes_and_lists");

    assert!(classes(&tree, "> > Nested quote").contains(&"md-blockquote".to_string()));
    assert!(classes(&tree, "    - deeper").contains(&"md-list".to_string()));
    assert!(classes(&tree, "2. second").contains(&"md-list".to_string()));
}

#[test]
fn fixture_gfm_extensions() {
    let (_, tree) = load_fixture("gfm_extensions");

    assert!(classes(&tree, "| a      | b     |").contains(&"md-table".to_string()));
    assert!(classes(&tree, "- [x] done task").contains(&"md-list".to_string()));
    assert!(classes(&tree, "title: Fixture").contains(&"md-yaml".to_string()));
}

#[test]
fn fixture_blank_runs() {
    let (_, tree) = load_fixture("blank_runs");

    let indices: Vec<Option<usize>> = normalize(&tree).blocks.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![Some(0), None, None, None, Some(1)]);
}

#[test]
fn html_rendering_keeps_markers() {
    let md = "a\n\nb";
    let source = SourceText::new(md);
    let tree = render_overlay(&parse_markdown(md, &ParseOptions::default()), &source);

    let html = markdown_overlay_engine::to_html(&tree);
    assert_eq!(html.matches('\u{200B}').count(), 3);
    assert!(html.contains("<div class=\"md-block\" index=\"1\">"));
}

#[test]
fn json_view_serializes_blocks() {
    let md = "# T";
    let source = SourceText::new(md);
    let tree = render_overlay(&parse_markdown(md, &ParseOptions::default()), &source);

    let view = markdown_overlay_engine::to_view(&tree).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["children"][0]["kind"], "element");
    assert_eq!(json["children"][0]["classes"][0], "md-block");
    assert_eq!(json["children"][0]["attributes"]["index"], "0");
}
