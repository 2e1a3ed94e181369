use crate::features::pages::model::PageView;
use crate::parser::markdown::{escape_html, wiki_path};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <nav><a href="/">Home</a></nav>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

pub fn render_index(title: &str, pages: &[String]) -> String {
    let mut items = String::new();
    for name in pages {
        items.push_str(&format!(
            "    <li><a href=\"{}\">{}</a></li>\n",
            escape_html(&wiki_path(name)),
            escape_html(name)
        ));
    }

    let listing = if pages.is_empty() {
        "  <p>The wiki is currently empty!</p>\n".to_string()
    } else {
        format!("  <ul>\n{}  </ul>\n", items)
    };

    let body = format!(
        r#"  <h1>{title}</h1>
  <form action="/create" method="post">
    <input type="text" name="name" placeholder="New page name">
    <button type="submit">Create</button>
  </form>
{listing}"#,
        title = escape_html(title),
        listing = listing
    );

    layout(title, &body)
}

pub fn render_page(view: &PageView) -> String {
    let delete_form = if view.new_page {
        String::new()
    } else {
        format!(
            r#"  <form action="/delete" method="post">
    <input type="hidden" name="id" value="{id}">
    <button type="submit">Delete</button>
  </form>
"#,
            id = view.id
        )
    };

    let body = format!(
        r#"  <h1>{title}</h1>
  <article>
{html}
  </article>
  <form action="/save" method="post">
    <input type="hidden" name="id" value="{id}">
    <input type="hidden" name="title" value="{title}">
    <input type="hidden" name="newPage" value="{new_page}">
    <textarea name="markdown" rows="15" cols="80">{raw}</textarea>
    <button type="submit">Save</button>
  </form>
{delete_form}  <p><small>Rendered: {timestamp}</small></p>"#,
        title = escape_html(&view.title),
        html = view.html_content,
        id = view.id,
        new_page = if view.new_page { "yes" } else { "no" },
        raw = escape_html(&view.raw_content),
        delete_form = delete_form,
        timestamp = escape_html(&view.timestamp),
    );

    layout(&view.title, &body)
}

pub fn render_error(message: &str) -> String {
    let body = format!("  <h1>Error</h1>\n  <p>{}</p>", escape_html(message));
    layout("Error", &body)
}
