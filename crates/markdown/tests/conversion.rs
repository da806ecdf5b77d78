use markdown::{ErrorKind, Markdown, Options, tokenize};

fn html(input: &str) -> String {
    Markdown::new(input, None)
        .and_then(|markdown| markdown.to_html())
        .unwrap_or_else(|err| panic!("conversion of {input:?} failed: {err}"))
}

#[test]
fn body_text_escapes_ampersand_before_angle_bracket() {
    assert_eq!(html("<&"), "<p>&lt;&amp;</p>");
    assert_eq!(html("a > \"b\""), "<p>a > \"b\"</p>");
}

#[test]
fn single_newlines_join_and_blank_runs_split() {
    assert_eq!(
        html("foo\nbar\n\nhello\n\n\nworld"),
        "<p>foo bar</p><p>hello</p><p>world</p>"
    );
}

#[test]
fn two_trailing_spaces_make_a_hard_break() {
    assert_eq!(
        html("foo\n bar \n hello  \n world"),
        "<p>foo bar hello<br>world</p>"
    );
}

#[test]
fn header_level_caps_at_six() {
    assert_eq!(html(&format!("{}bar", "# ".repeat(7))), "<h6># bar</h6>");
    assert_eq!(html("## Title\nbody"), "<h2>Title</h2><p>body</p>");
}

#[test]
fn emphasis_nests_through_reopening() {
    assert_eq!(
        html("**foo *bar***"),
        "<p><strong>foo <em>bar</em></strong></p>"
    );
    assert_eq!(
        html("*foo **bar* hello**"),
        "<p><em>foo <strong>bar</strong></em><strong> hello</strong></p>"
    );
    assert_eq!(html("***x***"), "<p><strong><em>x</em></strong></p>");
}

#[test]
fn unclosed_emphasis_closes_with_the_paragraph() {
    assert_eq!(html("*foo bar"), "<p><em>foo bar</em></p>");
    assert_eq!(html("*foo *bar*"), "<p><em>foo *bar</em></p>");
}

#[test]
fn spaced_markers_are_literal() {
    assert_eq!(html("a * b _ c"), "<p>a * b _ c</p>");
    assert_eq!(html("\\*a\\*"), "<p>*a*</p>");
}

#[test]
fn lists_drop_their_markers() {
    assert_eq!(html("* foo\n* bar"), "<ul><li>foo</li><li>bar</li></ul>");
    assert_eq!(html("1. foo\n2. bar"), "<ol><li>foo</li><li>bar</li></ol>");
}

#[test]
fn indented_items_nest() {
    assert_eq!(
        html("* a\n    * b\n* c"),
        "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"
    );
}

#[test]
fn blank_lines_inside_lists_make_loose_items_and_continuations() {
    assert_eq!(html("* a\n\n* b"), "<ul><li>a</li><li><p>b</p></li></ul>");
    assert_eq!(html("* a\n\n    b"), "<ul><li>a<p>b</p></li></ul>");
    assert_eq!(html("* a\n\nb"), "<ul><li>a</li></ul><p>b</p>");
}

#[test]
fn links_escape_attributes_more_strictly_than_text() {
    assert_eq!(
        html(r#"foo [bar](/hello/ "world<\">")"#),
        r#"<p>foo <a href="/hello/" title="world&lt;&quot;&gt;">bar</a></p>"#
    );
}

#[test]
fn link_text_markers_never_touch_formatting_outside_the_link() {
    assert_eq!(html("*a [b*](u)"), r#"<p><em>a <a href="u">b*</a></em></p>"#);
    assert_eq!(html("[*](u)"), r#"<p><a href="u">*</a></p>"#);
    assert_eq!(
        html("**x [y**](/z \"t\") w**"),
        r#"<p><strong>x <a href="/z" title="t">y**</a> w</strong></p>"#
    );
}

#[test]
fn malformed_links_stay_literal() {
    assert_eq!(
        html(r#"foo [bar](/hello/ "world" baz)"#),
        r#"<p>foo [bar](/hello/ "world" baz)</p>"#
    );
    assert_eq!(html("[a]"), "<p>[a]</p>");
}

#[test]
fn images_render_as_void_elements() {
    assert_eq!(
        html(r#"![alt](/i.png "T")"#),
        r#"<p><img alt="alt" src="/i.png" title="T"></p>"#
    );
    assert_eq!(html("![](/i.png)"), r#"<p><img src="/i.png"></p>"#);
}

#[test]
fn code_spans_keep_their_spacing() {
    assert_eq!(
        html("use `a  *b*` here"),
        "<p>use <code>a  *b*</code> here</p>"
    );
    assert_eq!(html("a `b"), "<p>a `b</p>");
    assert_eq!(html("``a`b``"), "<p><code>a`b</code></p>");
}

#[test]
fn blockquotes_nest_and_continue_lazily() {
    assert_eq!(
        html("> a\n> b\n\nc"),
        "<blockquote><p>a b</p></blockquote><p>c</p>"
    );
    assert_eq!(html("> a\nb"), "<blockquote><p>a b</p></blockquote>");
    assert_eq!(
        html("> > a"),
        "<blockquote><blockquote><p>a</p></blockquote></blockquote>"
    );
}

#[test]
fn rules_separate_paragraphs() {
    assert_eq!(html("a\n---\nb"), "<p>a</p><hr><p>b</p>");
    assert_eq!(html("* * *"), "<hr>");
}

#[test]
fn empty_leaves_open_at_end_of_input_are_kept() {
    assert_eq!(html("# "), "<h1></h1>");
    assert_eq!(html("* "), "<ul><li></li></ul>");
}

#[test]
fn empty_and_blank_input_produce_nothing() {
    assert_eq!(html(""), "");
    assert_eq!(html("\n  \n\n"), "");
}

#[test]
fn options_are_rejected() {
    let options: Options = [("anything".to_string(), "1".to_string())]
        .into_iter()
        .collect();
    let err = Markdown::new("a", Some(&options)).expect_err("options are unsupported");
    assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
}

#[test]
fn conversion_is_deterministic() {
    let input = "# t\n\n* a *b*\n* [c](/d)\n\n> e";
    let first = Markdown::new(input, None).unwrap();
    assert_eq!(first.to_html().unwrap(), first.to_html().unwrap());
    assert_eq!(first.tokens().unwrap(), tokenize(input).unwrap());
}
