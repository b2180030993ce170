//! Dark theme selector normalization
//!
//! Older stylesheets list a `.dark` class selector directly above the
//! equivalent `[data-theme="dark"]` attribute selector:
//!
//! ```css
//! .dark .button,
//! [data-theme="dark"] .button {
//! ```
//!
//! The legacy line is dropped and the attribute selector kept. Files changed
//! by this pass always get a `.backup` copy of the original first.

use crate::rewrite::{
    Rewrite,
    Rewritten,
};

/// Legacy theme class prefix
pub const LEGACY_PREFIX: &str = ".dark ";

/// Canonical attribute selector prefix
pub const CANONICAL_PREFIX: &str = "[data-theme=\"dark\"]";

/// The selector cleanup pass
#[derive(Debug, Clone)]
pub struct ThemeSelectorRewrite {
    legacy_prefix:    String,
    canonical_prefix: String,
}

impl Default for ThemeSelectorRewrite {
    fn default() -> Self {
        Self::new(LEGACY_PREFIX, CANONICAL_PREFIX)
    }
}

impl ThemeSelectorRewrite {
    /// Create a pass for a custom pair of prefixes
    pub fn new(legacy_prefix: impl Into<String>, canonical_prefix: impl Into<String>) -> Self {
        Self {
            legacy_prefix:    legacy_prefix.into(),
            canonical_prefix: canonical_prefix.into(),
        }
    }

    fn is_legacy(&self, line: &str) -> bool {
        let line = line.trim();
        line.starts_with(&self.legacy_prefix) && line.ends_with(',')
    }

    fn is_canonical(&self, line: &str) -> bool {
        line.trim_start().starts_with(&self.canonical_prefix)
    }

    /// Remove every legacy line immediately followed by a canonical one
    pub fn normalize(&self, text: &str) -> Rewritten {
        // Keeps each line's terminator so CRLF input survives untouched
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let mut out = String::with_capacity(text.len());
        let mut removed = 0;

        for (idx, line) in lines.iter().enumerate() {
            let next_is_canonical = lines.get(idx + 1).is_some_and(|next| self.is_canonical(next));
            if self.is_legacy(line) && next_is_canonical {
                removed += 1;
                continue;
            }
            out.push_str(line);
        }

        Rewritten {
            text:    out,
            changes: removed,
        }
    }
}

impl Rewrite for ThemeSelectorRewrite {
    fn name(&self) -> &'static str {
        "selectors"
    }

    fn apply(&self, text: &str) -> Rewritten {
        self.normalize(text)
    }

    fn takes_backup(&self) -> bool {
        true
    }
}
