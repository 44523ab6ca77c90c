//! Display-text normalization for titles, type tags, and answers.
//!
//! Everything that ends up in an output cell or header passes through one of
//! these helpers so incidental formatting in the export (runs of whitespace,
//! HTML entities, inline markup) never produces spurious distinct values.

use std::borrow::Cow;
use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::{Captures, Regex};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex must compile"));
static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[A-Za-z][A-Za-z0-9]*;?)")
        .expect("static regex must compile")
});

/// HTML5 entity names that also decode without a trailing `;`.
const LEGACY_ENTITIES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 characters that numeric references in `0x80..=0x9F` stand for.
const CP1252_REFS: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

/// Collapses every whitespace run to a single space and trims both ends.
///
/// Used for question titles and type tags.
///
/// # Examples
///
/// ```
/// use form_flatten_core::normalize_title;
///
/// assert_eq!(normalize_title("  Date \n of\tbirth "), "Date of birth");
/// assert_eq!(normalize_title(""), "");
/// ```
pub fn normalize_title(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").into_owned()
}

/// Produces a displayable answer string.
///
/// HTML entities are decoded first, then anything shaped like a tag is
/// replaced by a space, then whitespace is collapsed and trimmed. Total over
/// all inputs.
///
/// # Examples
///
/// ```
/// use form_flatten_core::clean_text;
///
/// assert_eq!(clean_text("<p>Sore&nbsp;knee</p>\n<p>left side</p>"), "Sore knee left side");
/// assert_eq!(clean_text("&lt;b&gt;bold&lt;/b&gt;"), "bold");
/// assert_eq!(clean_text("   "), "");
/// ```
pub fn clean_text(s: &str) -> String {
    let unescaped = unescape_html(s);
    let untagged = TAG_RE.replace_all(&unescaped, " ");
    WS_RE.replace_all(&untagged, " ").trim().to_string()
}

/// Decodes HTML character references the way browsers do.
///
/// Named references cover the full HTML5 set; legacy names such as `amp`
/// or `eacute` also decode without a trailing `;`, including as a prefix of
/// a longer word. Numeric references in the C1 range map to their
/// Windows-1252 characters, unrepresentable ones decode to U+FFFD and
/// noncharacters or control codes are dropped. Unknown names and bare
/// ampersands are left unchanged.
///
/// # Examples
///
/// ```
/// use form_flatten_core::unescape_html;
///
/// assert_eq!(unescape_html("Caf&Eacute; &hearts;"), "Caf\u{e9} \u{2665}");
/// assert_eq!(unescape_html("Tom &amp Jerry"), "Tom & Jerry");
/// assert_eq!(unescape_html("&#x27;quoted&#39;"), "'quoted'");
/// ```
pub fn unescape_html(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    ENTITY_RE.replace_all(s, |caps: &Captures<'_>| {
        let body = &caps[1];
        match body.strip_prefix('#') {
            Some(num) => decode_numeric(num.trim_end_matches(';')),
            None => decode_named(body),
        }
    })
}

fn decode_numeric(num: &str) -> String {
    let code = match num.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => num.parse::<u32>().ok(),
    };
    let Some(code) = code else {
        return '\u{fffd}'.to_string();
    };
    match code {
        0 => '\u{fffd}'.to_string(),
        0x0d => "\r".to_string(),
        0x80..=0x9f => CP1252_REFS[(code - 0x80) as usize].to_string(),
        0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f | 0xfdd0..=0xfdef => String::new(),
        c if c & 0xfffe == 0xfffe && c <= 0x10ffff => String::new(),
        c => char::from_u32(c).unwrap_or('\u{fffd}').to_string(),
    }
}

/// `body` is the reference text after `&`, with or without its `;`.
fn decode_named(body: &str) -> String {
    let name = body.trim_end_matches(';');
    if body.ends_with(';') {
        let reference = format!("&{body}");
        let decoded = decode_html_entities(&reference);
        if decoded != reference {
            return decoded.into_owned();
        }
    }

    // Longest legacy name that prefixes the reference, as in `&copy2024`.
    (2..=name.len())
        .rev()
        .map(|len| &name[..len])
        .find(|prefix| LEGACY_ENTITIES.contains(prefix))
        .map_or_else(
            || format!("&{body}"),
            |prefix| {
                let decoded = decode_html_entities(&format!("&{prefix};")).into_owned();
                format!("{decoded}{}", &body[prefix.len()..])
            },
        )
}
