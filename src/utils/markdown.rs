use ammonia::Builder;
use comrak::{markdown_to_html, Options};
use std::collections::HashSet;

/// Render solution Markdown to sanitized HTML.
///
/// Solutions are mostly prose plus fenced code blocks, so the renderer enables
/// the GFM extensions writers actually use (tables, strikethrough, autolink,
/// task lists) and runs the output through ammonia so stored content can never
/// smuggle scripts into the page.
pub fn render_markdown(raw: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = true; // comrak emits raw HTML; ammonia sanitizes

    let html = markdown_to_html(raw, &options);
    sanitize_html(&html)
}

fn sanitize_html(html: &str) -> String {
    let extra_tags: HashSet<&str> = [
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "pre",
        "code",
        "blockquote",
        "hr",
        "table",
        "thead",
        "tbody",
        "tr",
        "th",
        "td",
        "input",
        "del",
        "s",
        "details",
        "summary",
    ]
    .iter()
    .copied()
    .collect();

    let url_schemes: HashSet<&str> = ["http", "https", "mailto"].iter().copied().collect();

    let mut builder = Builder::default();
    builder.add_tags(&extra_tags);

    builder.add_tag_attributes("a", &["href", "title"]);
    builder.add_tag_attributes("code", &["class"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.add_tag_attributes("td", &["align"]);
    builder.add_tag_attributes("th", &["align"]);

    builder.url_schemes(url_schemes);
    builder.link_rel(Some("noopener noreferrer"));

    builder.clean(html).to_string()
}
