//! Utility class migration to CSS-module references
//!
//! Rules are applied strictly in the order they are configured, each one to
//! the full output of the previous one. Patterns overlap (a generic
//! `flex items-center ...` rule also matches `flex items-center gap-4`), so
//! the list is a `Vec` and specific rules must come before generic ones.

use regex::Regex;

use crate::{
    error::FixResult,
    rewrite::{
        Rewrite,
        Rewritten,
    },
};

/// Built-in rules as (pattern, replacement template) pairs
///
/// Templates use the regex crate's expansion syntax: `${1}` for a capture
/// group, `$$` for a literal dollar sign.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        r#"className="flex items-center justify-between""#,
        "className={styles.rowBetween}",
    ),
    (
        r#"className="flex items-center gap-([0-9]+)""#,
        "className={styles.rowCenterGap${1}}",
    ),
    (r#"className="flex items-center""#, "className={styles.rowCenter}"),
    (
        r#"className="flex items-center ([^"]+)""#,
        "className={`$${styles.rowCenter} ${1}`}",
    ),
    (
        r#"className="flex flex-col gap-([0-9]+)""#,
        "className={styles.stackGap${1}}",
    ),
    (r#"className="flex flex-col""#, "className={styles.stack}"),
    (
        r#"className="flex flex-col ([^"]+)""#,
        "className={`$${styles.stack} ${1}`}",
    ),
    (
        r#"className="grid grid-cols-([0-9]+) gap-([0-9]+)""#,
        "className={styles.gridCols${1}Gap${2}}",
    ),
    (r#"className="w-full""#, "className={styles.fullWidth}"),
    (r#"className="text-center""#, "className={styles.textCenter}"),
    (r#"className="sr-only""#, "className={styles.srOnly}"),
];

/// One compiled substitution
#[derive(Debug, Clone)]
pub struct ClassRule {
    pattern:  Regex,
    template: String,
}

impl ClassRule {
    /// Compile a rule
    pub fn new(pattern: &str, template: impl Into<String>) -> FixResult<Self> {
        Ok(Self {
            pattern:  Regex::new(pattern)?,
            template: template.into(),
        })
    }

    /// Source pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement template
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// The className migration pass
#[derive(Debug, Clone)]
pub struct ClassMigration {
    rules: Vec<ClassRule>,
}

impl ClassMigration {
    /// Build a pass from rules in application order
    pub fn new(rules: Vec<ClassRule>) -> Self {
        Self { rules }
    }

    /// Compile (pattern, template) pairs, keeping their order
    pub fn from_pairs(pairs: &[(&str, &str)]) -> FixResult<Self> {
        let rules = pairs
            .iter()
            .map(|(pattern, template)| ClassRule::new(pattern, *template))
            .collect::<FixResult<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// The built-in rule set
    pub fn builtin() -> FixResult<Self> {
        Self::from_pairs(DEFAULT_RULES)
    }

    /// Rules in application order
    pub fn rules(&self) -> &[ClassRule] {
        &self.rules
    }

    /// Apply every rule in sequence to the whole text
    pub fn migrate(&self, text: &str) -> Rewritten {
        let mut current = text.to_string();
        let mut changes = 0;

        for rule in &self.rules {
            let hits = rule.pattern.find_iter(&current).count();
            if hits == 0 {
                continue;
            }
            current = rule.pattern.replace_all(&current, rule.template.as_str()).into_owned();
            changes += hits;
        }

        Rewritten {
            text: current,
            changes,
        }
    }
}

impl Rewrite for ClassMigration {
    fn name(&self) -> &'static str {
        "classes"
    }

    fn apply(&self, text: &str) -> Rewritten {
        self.migrate(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_compile_in_order() {
        let pass = ClassMigration::builtin().unwrap();
        assert_eq!(pass.rules().len(), DEFAULT_RULES.len());
        for (rule, (pattern, template)) in pass.rules().iter().zip(DEFAULT_RULES) {
            assert_eq!(rule.pattern(), *pattern);
            assert_eq!(rule.template(), *template);
        }
    }

    #[test]
    fn test_exact_and_captured_rules() {
        let pass = ClassMigration::builtin().unwrap();
        let text = r#"<div className="flex flex-col gap-6"><p className="text-center">hi</p></div>"#;
        let out = pass.migrate(text);
        assert_eq!(
            out.text,
            r#"<div className={styles.stackGap6}><p className={styles.textCenter}>hi</p></div>"#
        );
        assert_eq!(out.changes, 2);

        let out = pass.migrate(r#"<ul className="grid grid-cols-3 gap-4">"#);
        assert_eq!(out.text, "<ul className={styles.gridCols3Gap4}>");
    }

    #[test]
    fn test_generic_rule_keeps_remaining_classes() {
        let pass = ClassMigration::builtin().unwrap();
        let out = pass.migrate(r#"<nav className="flex items-center p-4 bg-white">"#);
        assert_eq!(out.text, "<nav className={`${styles.rowCenter} p-4 bg-white`}>");
    }

    #[test]
    fn test_order_is_significant() {
        let specific = (
            r#"className="flex items-center gap-([0-9]+)""#,
            "className={styles.rowCenterGap${1}}",
        );
        let generic = (
            r#"className="flex items-center ([^"]+)""#,
            "className={`$${styles.rowCenter} ${1}`}",
        );
        let text = r#"<div className="flex items-center gap-4">"#;

        let specific_first = ClassMigration::from_pairs(&[specific, generic]).unwrap();
        assert_eq!(specific_first.migrate(text).text, "<div className={styles.rowCenterGap4}>");

        let generic_first = ClassMigration::from_pairs(&[generic, specific]).unwrap();
        assert_eq!(
            generic_first.migrate(text).text,
            "<div className={`${styles.rowCenter} gap-4`}>"
        );
    }

    #[test]
    fn test_later_rules_see_earlier_output() {
        let pass = ClassMigration::from_pairs(&[("alpha", "beta"), ("beta", "gamma")]).unwrap();
        let out = pass.migrate("alpha beta");
        assert_eq!(out.text, "gamma gamma");
        assert_eq!(out.changes, 3);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let pass = ClassMigration::builtin().unwrap();
        let text = r#"<a className="flex items-center"/><b className="w-full"/>"#;
        let first = pass.migrate(text);
        let second = pass.migrate(&first.text);
        assert_eq!(second.changes, 0);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(ClassMigration::from_pairs(&[("(unclosed", "x")]).is_err());
    }
}
