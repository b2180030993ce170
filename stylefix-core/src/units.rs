//! Pixel to relative unit conversion
//!
//! Pixel literals (`16px`) are replaced by the design-system equivalent:
//! tabulated sizes come from [`CONVERSION_TABLE`], anything else is computed
//! as `px / 16` in `rem`.
//!
//! Token detection is pattern-based rather than a CSS lexer. A token is
//! skipped when it sits inside a custom property name (`--space-123px`) or
//! inside a markup comment that closes later on the same line
//! (`<!-- 16px -->`). A hyphen directly before the digits is a minus sign
//! only when nothing identifier-like precedes it, so `-8px` converts while
//! `.icon-24px` and `arrow-16px.svg` do not. Any non-ASCII byte counts as an
//! identifier character. These checks are heuristics and can misfire on
//! pathological input.

use std::{
    ops::Range,
    path::Path,
};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::{
        FixConfig,
        Pass,
    },
    error::FixResult,
    rewrite::{
        self,
        Rewrite,
        Rewritten,
    },
};

/// Root font size the rem fallback divides by
pub const ROOT_FONT_SIZE_PX: u64 = 16;

/// Precomputed literals for design-system spacing increments, sorted by key
pub const CONVERSION_TABLE: &[(u64, &str)] = &[
    (0, "0rem"),
    (1, "var(--space-px)"),
    (2, "0.125rem"),
    (4, "0.25rem"),
    (6, "0.375rem"),
    (8, "0.5rem"),
    (10, "0.625rem"),
    (12, "0.75rem"),
    (14, "0.875rem"),
    (16, "1rem"),
    (20, "1.25rem"),
    (24, "1.5rem"),
    (28, "1.75rem"),
    (32, "2rem"),
    (36, "2.25rem"),
    (40, "2.5rem"),
    (44, "2.75rem"),
    (48, "3rem"),
    (56, "3.5rem"),
    (64, "4rem"),
    (80, "5rem"),
    (96, "6rem"),
    (112, "7rem"),
    (128, "8rem"),
    (144, "9rem"),
    (160, "10rem"),
    (192, "12rem"),
    (224, "14rem"),
    (256, "16rem"),
    (288, "18rem"),
    (320, "20rem"),
    (384, "24rem"),
];

static PX_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)px").expect("px token pattern is valid"));

/// Tabulated literal for `px`, if any
pub fn lookup(px: u64) -> Option<&'static str> {
    CONVERSION_TABLE
        .binary_search_by_key(&px, |&(key, _)| key)
        .ok()
        .map(|idx| CONVERSION_TABLE[idx].1)
}

/// Convert a pixel value to its design-system literal
pub fn convert(px: u64) -> String {
    match lookup(px) {
        Some(literal) => literal.to_string(),
        None => px_to_rem(px),
    }
}

/// `px / 16` rendered exactly in rem, trailing zeros trimmed
///
/// Sixteenths have at most four decimal digits, so the division is done in
/// integers and never rounds.
pub fn px_to_rem(px: u64) -> String {
    let whole = px / ROOT_FONT_SIZE_PX;
    let ten_thousandths = (px % ROOT_FONT_SIZE_PX) * (10_000 / ROOT_FONT_SIZE_PX);
    if ten_thousandths == 0 {
        format!("{}rem", whole)
    } else {
        let digits = format!("{:04}", ten_thousandths);
        format!("{}.{}rem", whole, digits.trim_end_matches('0'))
    }
}

/// One convertible pixel literal located in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PxToken {
    /// Numeric value in pixels
    pub value: u64,
    /// Byte span of the digits and `px` suffix
    pub span:  Range<usize>,
}

impl PxToken {
    /// Replacement literal for this token
    pub fn replacement(&self) -> String {
        convert(self.value)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}

/// Token boundaries: nothing identifier-like (or a decimal point) before, no
/// identifier character or hyphen after. A leading hyphen that joins an
/// identifier is part of a name, not a sign.
fn is_whole_token(text: &str, span: &Range<usize>) -> bool {
    let bytes = text.as_bytes();
    let before_ok = span.start == 0 || {
        let b = bytes[span.start - 1];
        let joins_name = b == b'-' && span.start >= 2 && is_ident_byte(bytes[span.start - 2]);
        !is_ident_byte(b) && b != b'.' && !joins_name
    };
    let after_ok = span.end >= bytes.len() || {
        let b = bytes[span.end];
        !is_ident_byte(b) && b != b'-'
    };
    before_ok && after_ok
}

/// The token continues a `--custom-property` name
fn inside_variable_name(text: &str, start: usize) -> bool {
    let bytes = text.as_bytes();
    let mut run_start = start;
    while run_start > 0 {
        let b = bytes[run_start - 1];
        if is_ident_byte(b) || b == b'-' {
            run_start -= 1;
        } else {
            break;
        }
    }
    text[run_start..start].starts_with("--")
}

/// A `-->` closes later on the same line with no `<!--` in between
fn inside_trailing_comment(text: &str, end: usize) -> bool {
    let rest = &text[end..];
    let line = rest.split('\n').next().unwrap_or("");
    match line.find("-->") {
        Some(close) => !line[..close].contains("<!--"),
        None => false,
    }
}

/// Locate every convertible pixel literal in `text`
pub fn find_tokens(text: &str) -> Vec<PxToken> {
    let mut tokens = Vec::new();
    for caps in PX_TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let span = whole.start()..whole.end();

        if !is_whole_token(text, &span)
            || inside_variable_name(text, span.start)
            || inside_trailing_comment(text, span.end)
        {
            continue;
        }

        // Digit runs beyond u64 are left untouched
        let Ok(value) = caps[1].parse::<u64>() else {
            tracing::debug!(token = whole.as_str(), "pixel value out of range, skipped");
            continue;
        };

        tokens.push(PxToken { value, span });
    }
    tokens
}

/// Number of convertible pixel literals remaining in `text`
pub fn count_violations(text: &str) -> usize {
    find_tokens(text).len()
}

/// Replace every convertible pixel literal in `text`
pub fn convert_text(text: &str) -> Rewritten {
    let tokens = find_tokens(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for token in &tokens {
        out.push_str(&text[last..token.span.start]);
        out.push_str(&token.replacement());
        last = token.span.end;
    }
    out.push_str(&text[last..]);

    Rewritten {
        text:    out,
        changes: tokens.len(),
    }
}

/// The px-to-rem pass
#[derive(Debug, Clone, Copy, Default)]
pub struct PxRewrite;

impl Rewrite for PxRewrite {
    fn name(&self) -> &'static str {
        "units"
    }

    fn apply(&self, text: &str) -> Rewritten {
        convert_text(text)
    }
}

/// Convert the pixel literals of a single file in place
///
/// Returns whether the file changed. No backup is taken.
pub fn rewrite_file(path: &Path) -> FixResult<bool> {
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let config = FixConfig::for_pass(Pass::Units, root);
    rewrite::rewrite_file(path, &PxRewrite, &config).map(|outcome| outcome.changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(CONVERSION_TABLE.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_tabulated_values() {
        for &(px, literal) in CONVERSION_TABLE {
            assert_eq!(convert(px), literal, "value {}", px);
        }
        assert_eq!(convert(1), "var(--space-px)");
        assert_eq!(convert(16), "1rem");
        assert_eq!(convert(24), "1.5rem");
    }

    #[test]
    fn test_tabulated_rem_values_match_arithmetic() {
        for &(px, literal) in CONVERSION_TABLE.iter().filter(|(px, _)| *px != 1) {
            assert_eq!(px_to_rem(px), literal, "value {}", px);
        }
    }

    #[test]
    fn test_fallback_is_px_over_16() {
        assert_eq!(convert(17), "1.0625rem");
        assert_eq!(convert(3), "0.1875rem");
        assert_eq!(convert(18), "1.125rem");
        assert_eq!(convert(400), "25rem");
        assert_eq!(convert(1000), "62.5rem");

        for px in (0..2000u64).filter(|px| lookup(*px).is_none()) {
            let literal = convert(px);
            let number: f64 = literal.trim_end_matches("rem").parse().unwrap();
            assert_eq!(number, px as f64 / 16.0, "value {}", px);
        }
    }

    #[test]
    fn test_fallback_handles_u64_max() {
        assert_eq!(convert(u64::MAX), "1152921504606846975.9375rem");
    }

    #[test]
    fn test_convert_text_example() {
        let out = convert_text("margin: 16px; padding: 24px;");
        assert_eq!(out.text, "margin: 1rem; padding: 1.5rem;");
        assert_eq!(out.changes, 2);

        assert_eq!(convert_text("width: 17px;").text, "width: 1.0625rem;");
    }

    #[test]
    fn test_variable_names_untouched() {
        let text = "gap: var(--space-123px);\n--radius-8px: 4px;";
        let out = convert_text(text);
        assert_eq!(out.text, "gap: var(--space-123px);\n--radius-8px: 0.25rem;");
        assert_eq!(out.changes, 1);
    }

    #[test]
    fn test_whole_token_only() {
        let text = "a16px 16pxs 16px_x w-16px-wide 0.5px";
        assert_eq!(convert_text(text).text, text);
    }

    #[test]
    fn test_negative_values_keep_sign() {
        assert_eq!(convert_text("margin: -8px;").text, "margin: -0.5rem;");
        assert_eq!(convert_text("top:-8px").text, "top:-0.5rem");
        assert_eq!(convert_text("calc(-8px)").text, "calc(-0.5rem)");
    }

    #[test]
    fn test_hyphenated_names_untouched() {
        for text in [
            ".icon-24px {}",
            "background: url(img/arrow-16px.svg);",
            "<img class=\"size-16px\">",
        ] {
            assert_eq!(convert_text(text).text, text);
        }

        let out = convert_text(".icon-24px { width: 24px; margin: -8px; }");
        assert_eq!(out.text, ".icon-24px { width: 1.5rem; margin: -0.5rem; }");
        assert_eq!(out.changes, 2);
    }

    #[test]
    fn test_non_ascii_neighbours_block_match() {
        assert_eq!(convert_text("é16px").text, "é16px");
        assert_eq!(convert_text("16pxé").text, "16pxé");
        assert_eq!(convert_text("largeur: 16px; /* é */").text, "largeur: 1rem; /* é */");
    }

    #[test]
    fn test_trailing_markup_comment_skipped() {
        let text = "<!-- spacing 16px -->\n<div>16px</div>";
        assert_eq!(convert_text(text).text, "<!-- spacing 16px -->\n<div>1rem</div>");

        // A comment opening after the token does not protect it
        let text = "16px <!-- note -->";
        assert_eq!(convert_text(text).text, "1rem <!-- note -->");
    }

    #[test]
    fn test_idempotent() {
        let text = ".card { margin: 16px 17px; border: 1px solid; inset: -3px; }";
        let first = convert_text(text);
        let second = convert_text(&first.text);
        assert_eq!(second.changes, 0);
        assert_eq!(second.text, first.text);
        assert_eq!(count_violations(&first.text), 0);
    }

    #[test]
    fn test_no_tokens_returns_input() {
        let text = "color: red;\n";
        let out = convert_text(text);
        assert_eq!(out.text, text);
        assert_eq!(out.changes, 0);
    }

    #[test]
    fn test_huge_digit_run_is_skipped() {
        let text = "width: 99999999999999999999999px;";
        assert_eq!(convert_text(text).text, text);
    }

    #[test]
    fn test_token_spans() {
        let tokens = find_tokens("top: 4px");
        assert_eq!(
            tokens,
            vec![PxToken {
                value: 4,
                span:  5..8,
            }]
        );
        assert_eq!(tokens[0].replacement(), "0.25rem");
    }
}
