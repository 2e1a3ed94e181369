use pulldown_cmark::{Event, Options as CmarkOptions, Parser, Tag, html};

// compiles markdown content into HTML, and resolves links on-the-fly using the provided resolver
pub fn compile_markdown_to_html<F>(markdown_content: &str, mut resolver: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown_content, options);

    let mut html_content = String::new();

    // parse AST -> rewrite links, and show raw HTML from page source as text
    let event_iterator = parser.map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let new_url = resolver(&dest_url);
            Event::Start(Tag::Link {
                link_type,
                dest_url: new_url.into(),
                title,
                id,
            })
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    html::push_html(&mut html_content, event_iterator);

    html_content
}

// schemes a page link may point at; anything else could run script in the browser
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Maps a link written in page source to a browser URL. Fragments, absolute
/// paths and `http`/`https`/`mailto` URLs are left alone. Everything else,
/// including names that merely look like a scheme (`Help:Topic`,
/// `javascript:...`), is treated as the name of another wiki page.
pub fn resolve_wiki_link(link: &str) -> String {
    if link.is_empty() || link.starts_with('#') || link.starts_with('/') {
        return link.to_string();
    }

    // the url parser applies the same scheme rules as browsers, including stripping tabs and
    // newlines, so `java\tscript:` is caught too
    if let Ok(parsed) = url::Url::parse(link) {
        if ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return link.to_string();
        }
    }

    // keep a fragment, if any, on the rewritten link
    let (name, fragment) = match link.split_once('#') {
        Some((name, fragment)) => (name, Some(fragment)),
        None => (link, None),
    };

    let mut url = wiki_path(name);
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// `/wiki/<name>` with the name percent-encoded as a single path segment.
pub fn wiki_path(name: &str) -> String {
    let Ok(mut url) = url::Url::parse("http://wiki.invalid/wiki/") else {
        return format!("/wiki/{}", name);
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(name);
    }
    url.path().to_string()
}

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
