use crate::features::pages::model::{PageView, EMPTY_PAGE_MARKDOWN};
use crate::parser::markdown::{compile_markdown_to_html, escape_html, resolve_wiki_link, wiki_path};
use crate::services::protocol::PageLookup;

// test the actual markdown -> html compilation
#[test]
fn test_compile_markdown_basic() {
    let input = "# Title\nThis is a [link](https://example.com)";

    // the resolver just returns the link as-is for this simple test
    let result = compile_markdown_to_html(input, |link| link.to_string());

    // assert that markdown headers became html h1 tags
    assert!(result.contains("<h1>Title</h1>"));
    // assert that markdown links became html anchor tags
    assert!(result.contains(r#"<a href="https://example.com">link</a>"#));
}

// bare page names in links point at other wiki pages
#[test]
fn test_compile_markdown_with_wiki_links() {
    let result = compile_markdown_to_html("See [the home page](Home#intro)", resolve_wiki_link);

    assert!(result.contains(r#"<a href="/wiki/Home#intro">the home page</a>"#));
}

#[test]
fn test_resolve_wiki_link_passthrough() {
    assert_eq!(resolve_wiki_link("https://rust-lang.org"), "https://rust-lang.org");
    assert_eq!(resolve_wiki_link("mailto:someone@example.com"), "mailto:someone@example.com");
    assert_eq!(resolve_wiki_link("#section"), "#section");
    assert_eq!(resolve_wiki_link("/wiki/Already"), "/wiki/Already");
}

#[test]
fn test_wiki_path_encodes_segment() {
    assert_eq!(wiki_path("Home"), "/wiki/Home");
    assert_eq!(wiki_path("My Page"), "/wiki/My%20Page");
    // a slash in a name must not create a new path segment
    assert_eq!(wiki_path("a/b"), "/wiki/a%2Fb");
}

#[test]
fn test_raw_html_in_source_is_shown_as_text() {
    let result = compile_markdown_to_html("hello <b>world</b>", resolve_wiki_link);

    assert!(!result.contains("<b>"));
    assert!(result.contains("&lt;b&gt;"));
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
}

// a missing page turns into the starter template with the sentinel id
#[test]
fn test_page_view_for_missing_page() {
    let view = PageView::from_lookup(
        "Fresh",
        PageLookup::missing(),
        |raw| format!("rendered:{}", raw.len()),
        "now".into(),
    );

    assert!(view.new_page);
    assert_eq!(view.id, -1);
    assert_eq!(view.raw_content, EMPTY_PAGE_MARKDOWN);
    assert_eq!(view.html_content, format!("rendered:{}", EMPTY_PAGE_MARKDOWN.len()));
}

#[test]
fn test_page_view_for_existing_page() {
    let view = PageView::from_lookup(
        "Known",
        PageLookup::found(9, "body".into()),
        |raw| raw.to_uppercase(),
        "now".into(),
    );

    assert!(!view.new_page);
    assert_eq!(view.id, 9);
    assert_eq!(view.raw_content, "body");
    assert_eq!(view.html_content, "BODY");
}

// links with a script-capable scheme must never reach the page as a live href
#[test]
fn test_script_links_are_neutralised() {
    let sources = [
        "[click](javascript://%0aalert(document.cookie))",
        "[click](javascript:alert(1))",
        "[click](JavaScript:alert(1))",
        "[click](vbscript:msgbox(1))",
        "[click](data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==)",
    ];

    for source in sources {
        let html = compile_markdown_to_html(source, resolve_wiki_link).to_lowercase();
        assert!(!html.contains("href=\"javascript:"), "{}", html);
        assert!(!html.contains("href=\"vbscript:"), "{}", html);
        assert!(!html.contains("href=\"data:"), "{}", html);
        // they end up pointing at a (harmless) wiki page instead
        assert!(html.contains("href=\"/wiki/"), "{}", html);
    }
}

#[test]
fn test_resolve_wiki_link_rewrites_unknown_schemes() {
    assert_eq!(resolve_wiki_link("javascript:alert(1)"), "/wiki/javascript:alert(1)");
    assert!(resolve_wiki_link("javascript://%0aalert(1)").starts_with("/wiki/"));
    // a page name with a colon is still just a page name
    assert_eq!(resolve_wiki_link("Help:Topic"), "/wiki/Help:Topic");
    assert_eq!(resolve_wiki_link("HTTPS://rust-lang.org"), "HTTPS://rust-lang.org");
}
