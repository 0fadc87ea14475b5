//! Engine Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use serde_json::{json, Value};

use titian_core::{
    decode, derive_slug, encode, ContentPipeline, EmptyListPolicy, IconKind, InMemoryPageStore,
    NewPage, PageDraft, PageStatus, PageStore, PipelineError, ScalarValue, Section, StoreError,
    TemplateId, TemplateRegistry,
};

fn home_blob() -> Value {
    json!({
        "hero_title": "A",
        "hero_subtitle": "B",
        "manifesto_quote": "C",
        "values": [
            {"title": "Adil", "icon": "Scale", "description": "D"}
        ]
    })
}

fn home_draft() -> PageDraft {
    PageDraft {
        title: "Beranda Utama".to_string(),
        slug: "beranda-utama".to_string(),
        template_name: "home".to_string(),
        status: "draft".to_string(),
        content_json: home_blob(),
    }
}

#[test]
fn invariant_round_trip_restricted_to_schema_fields() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::Home);

    let mut blob = home_blob();
    blob["legacy_field"] = json!("from an older schema");

    let encoded = encode(schema, &decode(schema, &blob));

    assert_eq!(encoded.get("hero_title"), Some(&json!("A")));
    assert_eq!(encoded.get("hero_subtitle"), Some(&json!("B")));
    assert_eq!(encoded.get("manifesto_quote"), Some(&json!("C")));
    assert_eq!(
        encoded.get("values"),
        Some(&json!([{"title": "Adil", "icon": "Scale", "description": "D"}]))
    );
    // Unknown keys are dropped, not reproduced
    assert!(encoded.get("legacy_field").is_none());
    assert_eq!(encoded.len(), 4);
}

#[test]
fn invariant_end_to_end_home_round_trip_is_byte_identical() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::Home);

    let blob = home_blob();
    let encoded = Value::Object(encode(schema, &decode(schema, &blob)));

    assert_eq!(
        serde_json::to_string(&encoded).unwrap(),
        serde_json::to_string(&blob).unwrap()
    );
}

#[test]
fn invariant_about_round_trip_preserves_both_lists() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::About);

    let blob = json!({
        "hero_title": "Tentang Kami",
        "who_we_are": "<p>Kami</p>",
        "why_us": "<p>Karena</p>",
        "manifesto_intro": "Intro",
        "vision": "Visi",
        "mission": "Misi",
        "timeline_summary": "Ringkasan",
        "timeline_details": [
            {"year": "2019", "title": "Awal", "description": "Berdiri"},
            {"year": "2023", "title": "Tumbuh", "description": "Meluas"}
        ],
        "values": [
            {"title": "Membumi", "icon": "Leaf", "description": "Rendah hati"}
        ]
    });

    let encoded = Value::Object(encode(schema, &decode(schema, &blob)));
    assert_eq!(
        serde_json::to_string(&encoded).unwrap(),
        serde_json::to_string(&blob).unwrap()
    );
}

#[test]
fn invariant_default_substitution_for_missing_fields() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::Home);

    let values = decode(schema, &json!({"hero_title": "Only one"}));

    assert_eq!(values.text("hero_title"), "Only one");
    assert_eq!(values.text("hero_subtitle"), "");
    assert_eq!(values.text("manifesto_quote"), "");
    assert_eq!(values.list("values").map(|l| l.len()), Some(0));
}

#[test]
fn invariant_missing_subfields_decode_to_defaults() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::Home);

    let values = decode(schema, &json!({"values": [{"title": "Adil"}]}));
    let list = values.list("values").unwrap();
    let (_, record) = list.iter().next().unwrap();

    assert_eq!(record.text("title"), "Adil");
    assert_eq!(record.text("description"), "");
    assert_eq!(record.icon("icon"), Some(IconKind::Heart));
}

#[test]
fn invariant_list_append_and_remove() {
    let registry = TemplateRegistry::new();
    let schema = registry.schema_for(TemplateId::Home);
    let values_schema = match &schema.field("values").unwrap().kind {
        titian_core::templates::FieldKind::List(record) => record.clone(),
        _ => unreachable!("values is a list field"),
    };

    let mut content = decode(schema, &home_blob());
    let list = content.list_mut("values").unwrap();
    assert_eq!(list.len(), 1);

    let fresh = list.append_default(&values_schema);
    assert_eq!(list.len(), 2);
    assert!(list.ids().all(|id| list.get(id).is_some()));

    list.remove(fresh, EmptyListPolicy::AllowEmpty).unwrap();
    assert_eq!(list.len(), 1);

    // A removed identity is stale; using it again must be reported
    assert!(list
        .update_field(fresh, "title", ScalarValue::Text("late".into()))
        .is_err());
}

#[test]
fn invariant_slug_derivation() {
    assert_eq!(derive_slug("Beranda Utama!"), "beranda-utama");
    assert_eq!(derive_slug("  Multi   Space "), "multi-space");
}

#[test]
fn invariant_validation_rejects_malformed_slug() {
    let pipeline = ContentPipeline::new();
    let mut draft = home_draft();
    draft.slug = "Has Spaces".to_string();

    let result = pipeline.check(&draft).unwrap();
    assert!(!result.valid);
    assert!(result
        .violations
        .iter()
        .any(|v| v.rule == "slug" && v.path.to_string() == "slug"));
}

#[test]
fn invariant_validation_attributes_blank_subfield_to_its_row() {
    let pipeline = ContentPipeline::new();
    let mut draft = home_draft();
    draft.content_json["values"][0]["description"] = json!("");

    let result = pipeline.check(&draft).unwrap();
    assert!(!result.valid);
    assert!(result
        .violations
        .iter()
        .any(|v| v.path.to_string() == "values[0].description"));
}

#[test]
fn invariant_validation_rejects_unknown_status() {
    let pipeline = ContentPipeline::new();
    let mut draft = home_draft();
    draft.status = "archived".to_string();

    let result = pipeline.check(&draft).unwrap();
    assert!(!result.valid);
    assert!(result.violations.iter().any(|v| v.rule == "status"));
}

#[test]
fn invariant_unknown_template_is_fatal_to_check_and_save() {
    let pipeline = ContentPipeline::new();
    let mut draft = home_draft();
    draft.template_name = "services".to_string();

    assert!(matches!(
        pipeline.check(&draft),
        Err(PipelineError::UnknownTemplate(_))
    ));
    assert!(matches!(
        pipeline.save(&draft),
        Err(PipelineError::UnknownTemplate(_))
    ));
}

#[test]
fn invariant_save_rejects_invalid_draft() {
    // save must validate internally; an invalid draft never encodes
    let pipeline = ContentPipeline::new();
    let mut draft = home_draft();
    draft.slug = "Has Spaces".to_string();

    let err = pipeline.save(&draft).unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_save_calls_validate() {
    let pipeline = ContentPipeline::new();
    let before = titian_core::pipeline::get_validation_call_count();
    pipeline.save(&home_draft()).unwrap();
    assert!(titian_core::pipeline::get_validation_call_count() > before);
}

#[test]
fn invariant_valid_draft_saves_to_canonical_blob() {
    let pipeline = ContentPipeline::new();
    let blob = pipeline.save(&home_draft()).unwrap();

    assert_eq!(blob.len(), 4);
    assert_eq!(blob.get("hero_title"), Some(&json!("A")));
}

#[test]
fn invariant_fallback_rendering_for_contact() {
    let pipeline = ContentPipeline::new();
    let presentation = pipeline.render_blob("contact", "Hubungi Kami", &json!({}));

    assert_eq!(presentation.title, "Hubungi Kami");
    assert_eq!(presentation.sections.len(), 1);
    assert!(matches!(presentation.sections[0], Section::Notice { .. }));
}

#[test]
fn invariant_fallback_rendering_for_unknown_template() {
    let pipeline = ContentPipeline::new();
    let presentation = pipeline.render_blob("services", "Layanan", &json!({"x": 1}));

    assert_eq!(presentation.title, "Layanan");
    assert!(matches!(presentation.sections[0], Section::Notice { .. }));
}

#[test]
fn invariant_home_renders_value_grid() {
    let pipeline = ContentPipeline::new();
    let presentation = pipeline.render_blob("home", "Beranda", &home_blob());

    let grid = presentation
        .sections
        .iter()
        .find_map(|s| match s {
            Section::ValueGrid { items } => Some(items),
            _ => None,
        })
        .unwrap();
    assert_eq!(grid.len(), 1);
    assert_eq!(grid[0].title, "Adil");
    assert_eq!(grid[0].icon, IconKind::Scale);
}

#[test]
fn invariant_store_enforces_slug_uniqueness() {
    let mut store = InMemoryPageStore::new();
    let page = NewPage {
        title: "Beranda Utama".to_string(),
        slug: "beranda-utama".to_string(),
        template_name: "home".to_string(),
        status: PageStatus::Draft,
        content_json: home_blob(),
    };

    store.create(page.clone()).unwrap();
    let err = store.create(page).unwrap_err();
    assert_eq!(err, StoreError::SlugTaken("beranda-utama".to_string()));
}

#[test]
fn invariant_edit_session_end_to_end() {
    let pipeline = ContentPipeline::new();
    let mut store = InMemoryPageStore::new();

    let created = store
        .create(NewPage {
            title: "Beranda Utama".to_string(),
            slug: "beranda-utama".to_string(),
            template_name: "home".to_string(),
            status: PageStatus::Draft,
            content_json: home_blob(),
        })
        .unwrap();

    // load -> decode
    let page = store.get(created.id).unwrap();
    let mut draft = PageDraft::from_page(&page);
    let mut content = pipeline.open(&draft.template_name, &draft.content_json).unwrap();

    // edit loop: scalar update plus one appended, fully filled list row
    let registry = pipeline.registry();
    let schema = registry.schema_for(TemplateId::Home);
    let values_schema = match &schema.field("values").unwrap().kind {
        titian_core::templates::FieldKind::List(record) => record.clone(),
        _ => unreachable!("values is a list field"),
    };

    assert!(content.set_text("hero_subtitle", "Diperbarui"));
    let list = content.list_mut("values").unwrap();
    let added = list.append_default(&values_schema);
    list.update_field(added, "title", ScalarValue::Text("Berkelanjutan".into())).unwrap();
    list.update_field(added, "icon", ScalarValue::Icon(IconKind::Compass)).unwrap();
    list.update_field(added, "description", ScalarValue::Text("Terus berputar".into()))
        .unwrap();

    // validate -> encode -> save
    draft.status = "published".to_string();
    let blob = pipeline.save_content(&draft, &content).unwrap();
    let updated = store
        .update(
            created.id,
            NewPage {
                title: draft.title.clone(),
                slug: draft.slug.clone(),
                template_name: draft.template_name.clone(),
                status: PageStatus::Published,
                content_json: Value::Object(blob),
            },
        )
        .unwrap();

    assert_eq!(updated.status, PageStatus::Published);
    assert_eq!(updated.content_json["hero_subtitle"], json!("Diperbarui"));
    assert_eq!(updated.content_json["values"].as_array().unwrap().len(), 2);
    assert_eq!(updated.content_json["values"][1]["icon"], json!("Compass"));

    // read path renders the saved page
    let presentation = pipeline.render_page(&store.get(created.id).unwrap());
    assert_eq!(presentation.template, "home");

    // delete-by-id belongs to the store
    store.delete(created.id).unwrap();
    assert_eq!(store.get(created.id), Err(StoreError::NotFound(created.id)));
}
