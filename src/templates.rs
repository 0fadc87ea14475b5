//! Template System - Closed Schema Contracts
//!
//! Every page carries a template identifier; the registry maps it to an
//! immutable field schema built once at startup. Adding a template is a
//! compile-time-visible change: extend [`TemplateId`], add its schema in
//! [`TemplateRegistry::new`], and register a render strategy if one exists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set of template identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Home,
    About,
    Contact,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Home, TemplateId::About, TemplateId::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Home => "home",
            TemplateId::About => "about",
            TemplateId::Contact => "contact",
        }
    }

    /// Parse a stored template name. `None` is the explicit unknown case;
    /// callers decide their own fallback.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "home" => Some(TemplateId::Home),
            "about" => Some(TemplateId::About),
            "contact" => Some(TemplateId::Contact),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed icon set for record fields that carry an icon column.
///
/// Serialized with capitalized variant names (`"Heart"`, `"Scale"`, ...)
/// to match the stored blob format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconKind {
    Heart,
    Scale,
    Leaf,
    Compass,
    Star,
    Shield,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Heart => "Heart",
            IconKind::Scale => "Scale",
            IconKind::Leaf => "Leaf",
            IconKind::Compass => "Compass",
            IconKind::Star => "Star",
            IconKind::Shield => "Shield",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Heart" => Some(IconKind::Heart),
            "Scale" => Some(IconKind::Scale),
            "Leaf" => Some(IconKind::Leaf),
            "Compass" => Some(IconKind::Compass),
            "Star" => Some(IconKind::Star),
            "Shield" => Some(IconKind::Shield),
            _ => None,
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a scalar field. Icon fields declare the default tag substituted
/// when the stored value is missing or not a member of the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    RichMarkup,
    Icon { default: IconKind },
}

impl ScalarKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::RichMarkup => "rich-markup",
            ScalarKind::Icon { .. } => "enum",
        }
    }
}

/// Kind of a top-level template field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Scalar(ScalarKind),
    List(RecordSchema),
}

impl FieldKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar(kind) => kind.kind_name(),
            FieldKind::List(_) => "list",
        }
    }
}

/// One declared field of a template. Names are unique within a template.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Scalar(ScalarKind::Text) }
    }

    fn markup(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Scalar(ScalarKind::RichMarkup) }
    }

    fn list(name: &'static str, record: RecordSchema) -> Self {
        Self { name, kind: FieldKind::List(record) }
    }
}

/// One scalar column of a list-of-record field.
#[derive(Debug, Clone)]
pub struct SubFieldDef {
    pub name: &'static str,
    pub kind: ScalarKind,
}

impl SubFieldDef {
    fn text(name: &'static str) -> Self {
        Self { name, kind: ScalarKind::Text }
    }

    fn icon(name: &'static str, default: IconKind) -> Self {
        Self { name, kind: ScalarKind::Icon { default } }
    }
}

/// Nested record shape of a `list` field: an ordered set of scalar columns.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub fields: Vec<SubFieldDef>,
}

/// Ordered field schema of one template.
#[derive(Debug, Clone)]
pub struct TemplateSchema {
    pub id: TemplateId,
    pub fields: Vec<FieldDef>,
}

impl TemplateSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn value_record() -> RecordSchema {
    RecordSchema {
        fields: vec![
            SubFieldDef::text("title"),
            SubFieldDef::icon("icon", IconKind::Heart),
            SubFieldDef::text("description"),
        ],
    }
}

fn timeline_record() -> RecordSchema {
    RecordSchema {
        fields: vec![
            SubFieldDef::text("year"),
            SubFieldDef::text("title"),
            SubFieldDef::text("description"),
        ],
    }
}

fn home_schema() -> TemplateSchema {
    TemplateSchema {
        id: TemplateId::Home,
        fields: vec![
            FieldDef::text("hero_title"),
            FieldDef::text("hero_subtitle"),
            FieldDef::markup("manifesto_quote"),
            FieldDef::list("values", value_record()),
        ],
    }
}

fn about_schema() -> TemplateSchema {
    TemplateSchema {
        id: TemplateId::About,
        fields: vec![
            FieldDef::text("hero_title"),
            FieldDef::markup("who_we_are"),
            FieldDef::markup("why_us"),
            FieldDef::markup("manifesto_intro"),
            FieldDef::text("vision"),
            FieldDef::markup("mission"),
            FieldDef::text("timeline_summary"),
            FieldDef::list("timeline_details", timeline_record()),
            FieldDef::list("values", value_record()),
        ],
    }
}

/// Template registry - the fixed schema table, populated once at startup
/// and read-only afterwards.
pub struct TemplateRegistry {
    schemas: HashMap<TemplateId, TemplateSchema>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let mut schemas = HashMap::new();
        schemas.insert(TemplateId::Home, home_schema());
        schemas.insert(TemplateId::About, about_schema());
        // Reserved: no fields yet, render falls back until a strategy lands.
        schemas.insert(
            TemplateId::Contact,
            TemplateSchema { id: TemplateId::Contact, fields: vec![] },
        );
        Self { schemas }
    }

    /// Look up by stored template name. Pure and side-effect-free; `None`
    /// for any identifier outside the closed set.
    pub fn schema(&self, name: &str) -> Option<&TemplateSchema> {
        TemplateId::parse(name).and_then(|id| self.schemas.get(&id))
    }

    /// Look up a member of the closed set. Every member is registered in
    /// `new`, so this cannot miss.
    pub fn schema_for(&self, id: TemplateId) -> &TemplateSchema {
        &self.schemas[&id]
    }

    /// All schemas in declaration order.
    pub fn list(&self) -> Vec<&TemplateSchema> {
        TemplateId::ALL.iter().map(|id| self.schema_for(*id)).collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
