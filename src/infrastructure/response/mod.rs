use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Escapes text so it renders as text content inside HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Collapses runs of whitespace into single spaces and trims the ends,
/// the way a browser lays out visible page text.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN_PATTERN
        .replace_all(text, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script> & \"y\""),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;y&quot;"
        );
    }

    #[test]
    fn test_escape_keeps_accents() {
        assert_eq!(escape_html("Nenhuma ação necessária."), "Nenhuma ação necessária.");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("\n  Categoria:\n\t Produtivo   \n"),
            "Categoria: Produtivo"
        );
    }
}
