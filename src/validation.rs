//! Validation Engine - Field-Attributed Failures
//!
//! Rules produce structured violations carrying a field path, so the
//! editing surface can pin each failure to the exact input that caused it,
//! down to a single row of a dynamic list. Validation never mutates its
//! input and never touches storage.

use std::fmt;

use serde::Serialize;

use crate::content::{ContentValueSet, FieldValue};
use crate::page::{PageDraft, PageStatus};
use crate::templates::{FieldKind, TemplateRegistry};

pub const TITLE_MIN_CHARS: usize = 3;

/// Path to the input that failed: a scalar field, or a list field plus row
/// index plus sub-field so failures attribute to a specific row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Field(String),
    Item { field: String, index: usize, sub: String },
}

impl FieldPath {
    pub fn field(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    pub fn item(field: impl Into<String>, index: usize, sub: impl Into<String>) -> Self {
        FieldPath::Item { field: field.into(), index, sub: sub.into() }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Field(name) => f.write_str(name),
            FieldPath::Item { field, index, sub } => write!(f, "{}[{}].{}", field, index, sub),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub path: FieldPath,
    pub rule: String,
    pub message: String,
}

impl Violation {
    fn new(path: FieldPath, rule: &'static str, message: impl Into<String>) -> Self {
        Self { path, rule: rule.to_string(), message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self { valid: true, violations: vec![] }
    }

    pub fn failure(violations: Vec<Violation>) -> Self {
        Self { valid: false, violations }
    }

    /// One-line digest for error messages and logs.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Everything a rule may inspect. `content` is the decoded value set for
/// the draft's template, absent when the template is unknown.
pub struct ValidationContext<'a> {
    pub draft: &'a PageDraft,
    pub content: Option<&'a ContentValueSet>,
    pub registry: &'a TemplateRegistry,
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation>;
}

// --- Concrete Rules ---

pub struct TitleRule;

impl ValidationRule for TitleRule {
    fn name(&self) -> &'static str {
        "title"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let title = ctx.draft.title.trim();
        if title.is_empty() {
            return vec![Violation::new(
                FieldPath::field("title"),
                self.name(),
                "Title is required",
            )];
        }
        if title.chars().count() < TITLE_MIN_CHARS {
            return vec![Violation::new(
                FieldPath::field("title"),
                self.name(),
                format!("Title must be at least {} characters", TITLE_MIN_CHARS),
            )];
        }
        vec![]
    }
}

pub struct SlugRule;

impl SlugRule {
    fn is_well_formed(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl ValidationRule for SlugRule {
    fn name(&self) -> &'static str {
        "slug"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        if Self::is_well_formed(&ctx.draft.slug) {
            return vec![];
        }
        vec![Violation::new(
            FieldPath::field("slug"),
            self.name(),
            "Slug may only contain lowercase letters, digits, and hyphens, \
             with no leading or trailing hyphen",
        )]
    }
}

pub struct TemplateRule;

impl ValidationRule for TemplateRule {
    fn name(&self) -> &'static str {
        "template"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        if ctx.registry.schema(&ctx.draft.template_name).is_some() {
            return vec![];
        }
        vec![Violation::new(
            FieldPath::field("template_name"),
            self.name(),
            format!("Unknown template: {}", ctx.draft.template_name),
        )]
    }
}

pub struct StatusRule;

impl ValidationRule for StatusRule {
    fn name(&self) -> &'static str {
        "status"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        if PageStatus::parse(&ctx.draft.status).is_some() {
            return vec![];
        }
        vec![Violation::new(
            FieldPath::field("status"),
            self.name(),
            format!("Status must be draft or published, got {}", ctx.draft.status),
        )]
    }
}

/// Every row of every dynamic list must have all of its declared sub-fields
/// non-blank. An incomplete row is a violation attributed to that row, not
/// a row to drop.
pub struct ListItemsRule;

impl ValidationRule for ListItemsRule {
    fn name(&self) -> &'static str {
        "list_items"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let content = match ctx.content {
            Some(content) => content,
            None => return vec![],
        };
        let schema = ctx.registry.schema_for(content.template());

        let mut violations = vec![];
        for def in &schema.fields {
            let record_schema = match &def.kind {
                FieldKind::List(record) => record,
                _ => continue,
            };
            let list = match content.get(def.name) {
                Some(FieldValue::List(list)) => list,
                _ => continue,
            };
            for (index, (_, record)) in list.iter().enumerate() {
                for sub in &record_schema.fields {
                    let blank = record.get(sub.name).map_or(true, |v| v.is_blank());
                    if blank {
                        violations.push(Violation::new(
                            FieldPath::item(def.name, index, sub.name),
                            self.name(),
                            format!("{} is required", sub.name),
                        ));
                    }
                }
            }
        }
        violations
    }
}

/// Validator orchestrates the rule set.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(TitleRule),
                Box::new(SlugRule),
                Box::new(TemplateRule),
                Box::new(StatusRule),
                Box::new(ListItemsRule),
            ],
        }
    }

    pub fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut violations = vec![];
        for rule in &self.rules {
            violations.extend(rule.validate(ctx));
        }

        if violations.is_empty() {
            ValidationResult::success()
        } else {
            ValidationResult::failure(violations)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
