//! Placeholder templates bundled into the binary.
//!
//! Templates use `{{.Key}}` placeholders; values are HTML escaped on insertion.

/// Replaces every `{{.Key}}` placeholder with its escaped value
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |html, (key, value)| {
            html.replace(&format!("{{{{.{}}}}}", key), &escape_html(value))
        })
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Plain text alternative of an HTML body.
///
/// Tags are dropped, block elements become line breaks and link targets are kept in brackets
/// after the link text.
pub fn html_to_text(html: &str) -> String {
    let body = match (html.find("<body"), html.rfind("</body>")) {
        (Some(start), Some(end)) if start < end => &html[start..end],
        _ => html,
    };

    let mut text = String::new();
    let mut pending_href: Option<String> = None;
    let mut rest = body;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match name.as_str() {
            "br" | "p" | "div" | "hr" | "h1" | "h2" | "h3" => text.push('\n'),
            "a" if tag.starts_with('/') => {
                if let Some(href) = pending_href.take() {
                    text.push_str(&format!(" [{}]", href));
                }
            }
            "a" => pending_href = attribute(tag, "href"),
            _ => {}
        }
    }
    text.push_str(rest);

    let text = unescape_html(&text);
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let start = tag.find(&format!("{}=\"", name))? + name.len() + 2;
    let end = tag[start..].find('"')? + start;

    Some(unescape_html(&tag[start..end]))
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
