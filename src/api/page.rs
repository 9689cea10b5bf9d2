//! The HTML form and its result panel.

use pulldown_cmark::{escape::escape_html, html, Event, Parser};

use crate::controller::Outcome;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
label { display: block; margin-top: 1rem; font-weight: 600; }
input { width: 100%; padding: 0.75rem; font-size: 1rem; box-sizing: border-box; }
button { margin-top: 1rem; background-color: #4CAF50; color: white; font-weight: bold; padding: 10px 24px; border: none; border-radius: 8px; }
.notice { margin-top: 1.5rem; padding: 0.75rem 1rem; border-radius: 8px; }
.success { background: #e6f4ea; } .warning { background: #fff4e5; } .error { background: #fdecea; }
pre { white-space: pre-wrap; font-size: 0.85rem; }
"#;

/// Renders the form, keeping the submitted URL but never the API key.
pub fn render(url: &str, outcome: Option<&Outcome>) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Summarize YouTube or Website Content</title>\n<style>");
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str("<h1>Summarize YouTube or Website Content</h1>\n");
    page.push_str("<p>Paste a YouTube or Website URL below to get a summary.</p>\n");
    page.push_str("<form method=\"post\" action=\"/summarize\">\n");
    page.push_str("<label for=\"api_key\">Groq API Key</label>\n");
    page.push_str("<input id=\"api_key\" name=\"api_key\" type=\"password\" autocomplete=\"off\">\n");
    page.push_str("<label for=\"url\">YouTube or Website URL</label>\n");
    page.push_str("<input id=\"url\" name=\"url\" type=\"text\" value=\"");
    page.push_str(&escape(url));
    page.push_str("\">\n<button type=\"submit\">Summarize</button>\n</form>\n");

    if let Some(outcome) = outcome {
        page.push_str(&render_outcome(outcome));
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_outcome(outcome: &Outcome) -> String {
    let message = escape(&outcome.message());
    match outcome {
        Outcome::Success(report) => format!(
            "<div class=\"notice success\">{}</div>\n<section class=\"summary\">\n{}</section>\n",
            message,
            render_markdown(&format!("### Summary\n\n{}", report.summary))
        ),
        Outcome::Warning(_) => format!("<div class=\"notice warning\">{}</div>\n", message),
        Outcome::Error(err) => {
            let detail = err
                .detail()
                .map(|detail| format!("<pre>{}</pre>", escape(&detail)))
                .unwrap_or_default();
            format!("<div class=\"notice error\">{}{}</div>\n", message, detail)
        }
    }
}

/// Markdown to HTML, with any raw HTML in the source shown as text.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_html_is_neutralised() {
        let rendered = render_markdown("### Summary\n\nHello <script>alert(1)</script> **there**");
        assert!(rendered.contains("<h3>Summary</h3>"));
        assert!(rendered.contains("<strong>there</strong>"));
        assert!(!rendered.contains("<script>"));
    }

    #[test]
    fn escapes_submitted_url() {
        let page = render("https://example.com/?q=\"><b>", None);
        assert!(page.contains("value=\"https://example.com/?q=&quot;&gt;&lt;b&gt;\""));
        assert!(page.contains("type=\"password\""));
    }
}
