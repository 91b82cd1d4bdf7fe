use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use pulldown_cmark::{Event, Parser, html};

use crate::data_models::SearchResult;
use crate::interest_search::Category;

pub const TITLE: &str = "Notion-Prompted Interest Search";
pub const MISSING_PAGE_ID_WARNING: &str = "Please enter a Notion page ID in the sidebar";
pub const EMPTY_QUERY_WARNING: &str = "Please enter a search query";

/// Everything the page needs to draw one request's outcome.
#[derive(Debug, Default, Clone)]
pub struct PageView {
    pub page_id: String,
    pub query: String,
    pub category: Option<String>,
    pub graph_enabled: bool,
    pub content: Option<String>,
    pub results: Option<Vec<SearchResult>>,
    pub graph_html: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Markdown to HTML. Raw HTML in the source is shown as text, not rendered.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

pub fn render_result_card(result: &SearchResult) -> String {
    format!(
        "<div class=\"card\"><p><strong>{}</strong></p><p>URL: <a href=\"{}\">{}</a></p><p>Highlight: {}</p><hr></div>\n",
        text(&result.title),
        attr(&result.url),
        text(&result.url),
        text(&result.highlight),
    )
}

/// Embeds a standalone HTML document inline, without touching the filesystem.
pub fn embed_graph(graph_html: &str) -> String {
    format!(
        "<iframe class=\"graph\" sandbox=\"allow-scripts\" srcdoc=\"{}\"></iframe>\n",
        attr(graph_html)
    )
}

fn category_options(selected: Option<&str>) -> String {
    let mut out = String::from("<option value=\"\">None</option>");
    for c in Category::ALL {
        let is_selected = selected.is_some_and(|s| s == c.as_str());
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            attr(c.as_str()),
            if is_selected { " selected" } else { "" },
            text(c.as_str()),
        ));
    }
    out
}

pub fn render_page(view: &PageView) -> String {
    let mut main = String::new();
    for error in &view.errors {
        main.push_str(&format!("<div class=\"error\">{}</div>\n", text(error)));
    }

    if view.content.is_none() && view.page_id.trim().is_empty() {
        main.push_str(&format!(
            "<div class=\"warning\">{}</div>\n",
            text(MISSING_PAGE_ID_WARNING)
        ));
    }

    let mut left = String::new();
    if let Some(content) = &view.content {
        left.push_str("<h2>Notion Page Content</h2>\n");
        left.push_str(&markdown_to_html(content));
    }

    let mut right = String::new();
    if view.content.is_some() {
        right.push_str("<h2>Search Results</h2>\n");
        for warning in &view.warnings {
            right.push_str(&format!("<div class=\"warning\">{}</div>\n", text(warning)));
        }
        if let Some(results) = &view.results {
            for r in results {
                right.push_str(&render_result_card(r));
            }
        }
        if let Some(graph) = &view.graph_html {
            right.push_str("<h3>Result Relatedness</h3>\n");
            right.push_str(&embed_graph(graph));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
aside {{ width: 18rem; padding: 1rem; background: #f0f2f6; min-height: 100vh; }}
main {{ flex: 1; padding: 1rem 2rem; }}
.columns {{ display: flex; gap: 2rem; }}
.columns > section {{ flex: 1; min-width: 0; }}
.warning {{ background: #fffce7; padding: .75rem; border-radius: .25rem; margin: .5rem 0; }}
.error {{ background: #ffe7e7; padding: .75rem; border-radius: .25rem; margin: .5rem 0; }}
iframe.graph {{ width: 100%; height: 520px; border: 0; }}
</style>
</head>
<body>
<form method="get" action="/" style="display: contents">
<aside>
<label>Enter your Notion page ID<br><input type="text" name="page_id" value="{page_id}"></label>
</aside>
<main>
<h1>{title}</h1>
{main}<div class="columns">
<section>
{left}</section>
<section>
<label>Enter your search query<br><input type="text" name="query" value="{query}"></label><br>
<label>Select a category (optional)<br><select name="category">{categories}</select></label><br>
<label><input type="checkbox" name="graph" value="true"{graph_checked}> Show relatedness graph</label><br>
<button type="submit" name="search" value="true">Search</button>
{right}</section>
</div>
</main>
</form>
</body>
</html>
"#,
        title = text(TITLE),
        page_id = attr(&view.page_id),
        query = attr(&view.query),
        categories = category_options(view.category.as_deref()),
        graph_checked = if view.graph_enabled { " checked" } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headings_and_lists() {
        let out = markdown_to_html("# Title\n\n- item\n\nBody\n\n");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<li>item</li>"));
        assert!(out.contains("<p>Body</p>"));
    }

    #[test]
    fn test_markdown_raw_html_is_escaped() {
        let out = markdown_to_html("<script>alert(1)</script>\n\n");
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_result_card_escapes_fields() {
        let card = render_result_card(&SearchResult {
            title: "<b>Title</b>".into(),
            url: "https://example.com/?a=1&b=2".into(),
            highlight: "N/A".into(),
        });
        assert!(card.contains("&lt;b&gt;Title&lt;/b&gt;"));
        assert!(card.contains("Highlight: N/A"));
        assert!(card.contains("<hr>"));
    }

    #[test]
    fn test_missing_page_id_warns() {
        let page = render_page(&PageView::default());
        assert!(page.contains(MISSING_PAGE_ID_WARNING));
        assert!(!page.contains("Notion Page Content"));
    }

    #[test]
    fn test_selected_category_is_marked() {
        let page = render_page(&PageView {
            category: Some("videos".into()),
            ..Default::default()
        });
        assert!(page.contains("<option value=\"videos\" selected>"));
    }
}
