//! Content Codec - Blob to Value Set and Back
//!
//! `decode` and `encode` are mutual inverses restricted to the schema's
//! field set. Decode never fails: missing keys, mismatched types, and
//! non-object blobs all fall back to typed defaults so a page can always
//! be opened for editing. Encode writes exactly the declared field set,
//! no more, no less.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::list::{RecordList, RecordValue};
use crate::templates::{
    FieldKind, IconKind, RecordSchema, ScalarKind, TemplateId, TemplateSchema,
};

/// The schema-free persisted form of a page's content.
pub type Blob = Map<String, Value>;

/// A typed scalar: free text, opaque rich markup, or an icon tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Text(String),
    Markup(String),
    Icon(IconKind),
}

impl ScalarValue {
    pub fn default_for(kind: &ScalarKind) -> Self {
        match kind {
            ScalarKind::Text => ScalarValue::Text(String::new()),
            ScalarKind::RichMarkup => ScalarValue::Markup(String::new()),
            ScalarKind::Icon { default } => ScalarValue::Icon(*default),
        }
    }

    /// Blank means failing a required-field check. Icon tags always carry
    /// a member of the closed set, so they are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            ScalarValue::Text(s) | ScalarValue::Markup(s) => s.trim().is_empty(),
            ScalarValue::Icon(_) => false,
        }
    }
}

/// A decoded top-level field value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Scalar(ScalarValue),
    List(RecordList),
}

/// The decoded, structured content of one page for one template.
///
/// Owned exclusively by the edit session or render pass holding it;
/// abandoning an edit is simply dropping the value.
#[derive(Debug, Clone)]
pub struct ContentValueSet {
    template: TemplateId,
    fields: HashMap<String, FieldValue>,
}

impl ContentValueSet {
    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    /// Text content of a scalar field, empty for absent or non-text fields.
    pub fn text(&self, name: &str) -> &str {
        match self.fields.get(name) {
            Some(FieldValue::Scalar(ScalarValue::Text(s)))
            | Some(FieldValue::Scalar(ScalarValue::Markup(s))) => s,
            _ => "",
        }
    }

    /// Replaces the text of a declared text or markup field. Returns false
    /// when the field is not a declared scalar of either kind.
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.get_mut(name) {
            Some(FieldValue::Scalar(ScalarValue::Text(s)))
            | Some(FieldValue::Scalar(ScalarValue::Markup(s))) => {
                *s = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn list(&self, name: &str) -> Option<&RecordList> {
        match self.fields.get(name) {
            Some(FieldValue::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, name: &str) -> Option<&mut RecordList> {
        match self.fields.get_mut(name) {
            Some(FieldValue::List(list)) => Some(list),
            _ => None,
        }
    }
}

/// Decodes a stored blob into the structured value set for `schema`.
///
/// Every declared field is present in the result. Keys in the blob that the
/// schema does not declare are dropped. A value whose type does not match
/// its field kind decodes to that field's default; malformed persisted data
/// must never block the editor from opening the page.
pub fn decode(schema: &TemplateSchema, blob: &Value) -> ContentValueSet {
    let empty = Map::new();
    let map = blob.as_object().unwrap_or(&empty);

    let mut fields = HashMap::new();
    for def in &schema.fields {
        let raw = map.get(def.name);
        let value = match &def.kind {
            FieldKind::Scalar(kind) => FieldValue::Scalar(decode_scalar(kind, raw)),
            FieldKind::List(record) => FieldValue::List(decode_list(record, raw)),
        };
        fields.insert(def.name.to_string(), value);
    }

    ContentValueSet { template: schema.id, fields }
}

fn decode_scalar(kind: &ScalarKind, raw: Option<&Value>) -> ScalarValue {
    let text = raw.and_then(Value::as_str);
    match kind {
        ScalarKind::Text => ScalarValue::Text(text.unwrap_or_default().to_string()),
        ScalarKind::RichMarkup => ScalarValue::Markup(text.unwrap_or_default().to_string()),
        ScalarKind::Icon { default } => {
            ScalarValue::Icon(text.and_then(IconKind::parse).unwrap_or(*default))
        }
    }
}

fn decode_list(schema: &RecordSchema, raw: Option<&Value>) -> RecordList {
    let mut list = RecordList::new();
    if let Some(Value::Array(rows)) = raw {
        for row in rows {
            list.push(decode_record(schema, row));
        }
    }
    list
}

fn decode_record(schema: &RecordSchema, row: &Value) -> RecordValue {
    let empty = Map::new();
    let map = row.as_object().unwrap_or(&empty);

    let mut record = RecordValue::new();
    for sub in &schema.fields {
        record.set(sub.name, decode_scalar(&sub.kind, map.get(sub.name)));
    }
    record
}

/// Encodes a value set into a fresh blob holding exactly the schema's field
/// set. List fields serialize in display order; transient identities are
/// discarded. A value set missing a declared field (or holding a mismatched
/// kind) contributes that field's default.
pub fn encode(schema: &TemplateSchema, values: &ContentValueSet) -> Blob {
    let mut blob = Blob::new();
    for def in &schema.fields {
        let json = match (&def.kind, values.get(def.name)) {
            (FieldKind::Scalar(_), Some(FieldValue::Scalar(v))) => encode_scalar(v),
            (FieldKind::List(record), Some(FieldValue::List(list))) => Value::Array(
                list.iter().map(|(_, rec)| encode_record(record, rec)).collect(),
            ),
            (FieldKind::Scalar(kind), _) => encode_scalar(&ScalarValue::default_for(kind)),
            (FieldKind::List(_), _) => Value::Array(Vec::new()),
        };
        blob.insert(def.name.to_string(), json);
    }
    blob
}

fn encode_record(schema: &RecordSchema, record: &RecordValue) -> Value {
    let mut map = Map::new();
    for sub in &schema.fields {
        let value = match record.get(sub.name) {
            Some(v) => encode_scalar(v),
            None => encode_scalar(&ScalarValue::default_for(&sub.kind)),
        };
        map.insert(sub.name.to_string(), value);
    }
    Value::Object(map)
}

fn encode_scalar(value: &ScalarValue) -> Value {
    match value {
        ScalarValue::Text(s) | ScalarValue::Markup(s) => Value::String(s.clone()),
        ScalarValue::Icon(icon) => Value::String(icon.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateRegistry;
    use serde_json::json;

    #[test]
    fn non_object_blob_decodes_to_all_defaults() {
        let registry = TemplateRegistry::new();
        let schema = registry.schema_for(TemplateId::Home);

        let values = decode(schema, &Value::Null);
        assert_eq!(values.text("hero_title"), "");
        assert_eq!(values.text("manifesto_quote"), "");
        assert!(values.list("values").unwrap().is_empty());
    }

    #[test]
    fn mismatched_types_decode_to_defaults() {
        let registry = TemplateRegistry::new();
        let schema = registry.schema_for(TemplateId::Home);

        let blob = json!({
            "hero_title": 42,
            "values": "not an array",
        });
        let values = decode(schema, &blob);
        assert_eq!(values.text("hero_title"), "");
        assert!(values.list("values").unwrap().is_empty());
    }

    #[test]
    fn unknown_icon_tag_decodes_to_declared_default() {
        let registry = TemplateRegistry::new();
        let schema = registry.schema_for(TemplateId::Home);

        let blob = json!({
            "values": [{"title": "Adil", "icon": "Sparkles", "description": "D"}],
        });
        let values = decode(schema, &blob);
        let list = values.list("values").unwrap();
        let (_, record) = list.iter().next().unwrap();
        assert_eq!(record.icon("icon"), Some(IconKind::Heart));
    }

    #[test]
    fn encode_drops_undeclared_keys() {
        let registry = TemplateRegistry::new();
        let schema = registry.schema_for(TemplateId::Home);

        let blob = json!({
            "hero_title": "A",
            "stray_key": "should disappear",
        });
        let encoded = encode(schema, &decode(schema, &blob));
        assert!(encoded.get("stray_key").is_none());
        assert_eq!(encoded.get("hero_title"), Some(&json!("A")));
    }
}
