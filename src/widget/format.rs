use std::sync::OnceLock;

use regex::Regex;

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"))
}

fn paragraph_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{2,}").expect("paragraph pattern is valid"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders model output as answer-area markup.
///
/// Only two constructs are recognised: `**span**` on a single line becomes
/// `<strong>`, and newlines become `<br>` (a blank-line run becomes a double
/// break). Everything else is escaped, so markup in the reply is shown as
/// text.
pub fn format_answer(text: &str) -> String {
    let escaped = escape_html(&text.replace("\r\n", "\n"));
    let bolded = bold_pattern().replace_all(&escaped, "<strong>$1</strong>");
    let paragraphs = paragraph_pattern().replace_all(&bolded, "<br><br>");
    paragraphs.replace('\n', "<br>")
}
