//! Shared argument checks and text rendering helpers

use crate::error::ToolError;
use boe_domain::{ApiDate, LawId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::ops::RangeInclusive;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"</p>\s*<p[^>]*>").unwrap());
static PARAGRAPH_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?p[^>]*>").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"<li[^>]*>").unwrap());
static LIST_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</li>|</?[uo]l[^>]*>").unwrap());
static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<strong[^>]*>(.*?)</strong>").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<em[^>]*>(.*?)</em>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n(\s*\n)+").unwrap());
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Reduce a block's HTML to readable markdown-ish text
pub(crate) fn clean_html(html: &str) -> String {
    let text = PARAGRAPH_BREAK.replace_all(html, "\n\n");
    let text = PARAGRAPH_TAG.replace_all(&text, "");
    let text = LIST_ITEM.replace_all(&text, "\n• ");
    let text = LIST_TAG.replace_all(&text, "");
    let text = STRONG.replace_all(&text, "**$1**");
    let text = EMPHASIS.replace_all(&text, "*$1*");
    let text = ANY_TAG.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    decode_entities(text.trim())
}

/// Decode numeric references and the named entities found in BOE markup
///
/// Unknown or invalid references are kept verbatim.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name.strip_prefix('#') {
                Some(num) => {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
                None => named_entity(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "nbsp" => ' ',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "amp" => '&',
        "aacute" => 'á',
        "eacute" => 'é',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "Aacute" => 'Á',
        "Eacute" => 'É',
        "Iacute" => 'Í',
        "Oacute" => 'Ó',
        "Uacute" => 'Ú',
        "ntilde" => 'ñ',
        "Ntilde" => 'Ñ',
        "uuml" => 'ü',
        "Uuml" => 'Ü',
        "ordf" => 'ª',
        "ordm" => 'º',
        "iexcl" => '¡',
        "iquest" => '¿',
        "laquo" => '«',
        "raquo" => '»',
        "euro" => '€',
        "sect" => '§',
        "middot" => '·',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(c)
}

/// Render an upstream `YYYYMMDD` field as `29 de mayo de 2024`
pub(crate) fn long_date(value: &str) -> String {
    ApiDate::parse(value)
        .map(|d| d.long_es())
        .unwrap_or_else(|_| value.to_string())
}

/// Structured payload for a result
pub(crate) fn structured<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Parse(e.to_string()))
}

/// Cut at `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

pub(crate) fn parse_law_id(value: &str) -> Result<LawId, ToolError> {
    LawId::new(value.trim()).map_err(ToolError::Validation)
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<ApiDate, ToolError> {
    ApiDate::parse(value.trim()).map_err(|e| ToolError::Validation(format!("{}: {}", field, e)))
}

pub(crate) fn check_range<T>(field: &str, value: T, range: RangeInclusive<T>) -> Result<T, ToolError>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ToolError::Validation(format!(
            "{} must be between {} and {}, got {}",
            field,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Trimmed, non-empty text argument
pub(crate) fn required_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ToolError::Validation(format!("{} must not be empty", field)))
    } else {
        Ok(value)
    }
}

/// Optional text argument, blank treated as absent
pub(crate) fn optional_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html() {
        let html = "<p class=\"parrafo\">Artículo 1.</p>\n<p>España se constituye en un <strong>Estado social</strong> y <em>democrático</em>.</p><ul><li>uno</li><li>dos</li></ul>";
        let text = clean_html(html);
        assert!(text.starts_with("Artículo 1.\n\nEspaña"));
        assert!(text.contains("**Estado social**"));
        assert!(text.contains("*democrático*"));
        assert!(text.contains("• uno"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(clean_html("<p>a&nbsp;&amp;&nbsp;b</p>"), "a & b");
        assert_eq!(
            decode_entities("Disposici&oacute;n adicional &uacute;nica, a&ntilde;o 1.&ordm;"),
            "Disposición adicional única, año 1.º"
        );
        assert_eq!(decode_entities("Jurisdicci&#243;n &#xF1; &#XD1;"), "Jurisdicción ñ Ñ");
        assert_eq!(decode_entities("&amp;lt;p&amp;gt;"), "&lt;p&gt;");
        assert_eq!(decode_entities("&desconocida; &#xD800; R&D"), "&desconocida; &#xD800; R&D");
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("19781229"), "29 de diciembre de 1978");
        assert_eq!(long_date("sin fecha"), "sin fecha");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("corto", 10), "corto");
        assert_eq!(truncate_chars("Ministerio de Hacienda", 10), "Ministe...");
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("limit", 0u32, 1..=100).is_err());
        assert_eq!(check_range("limit", 100u32, 1..=100).unwrap(), 100);
    }

    #[test]
    fn test_argument_parsers() {
        assert!(parse_law_id(" BOE-A-1978-31229 ").is_ok());
        assert!(matches!(parse_law_id("constitucion"), Err(ToolError::Validation(_))));
        assert!(matches!(parse_date("date", "2024-05-29"), Err(ToolError::Validation(_))));
        assert!(required_text("keyword", "   ").is_err());
        assert_eq!(optional_text(&Some("  ".into())), None);
    }
}
