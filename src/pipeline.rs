//! Editing Pipeline - Single Entry Point
//!
//! CRITICAL: save MUST validate internally. No bypass.
//!
//! The write path is load -> decode -> edit -> validate -> encode -> save;
//! this module owns the middle of that chain. The read path is decode ->
//! render, and it is infallible: unknown templates and malformed blobs
//! degrade to the fallback presentation instead of failing the page load.

use serde_json::Value;
use thiserror::Error;

use crate::content::{decode, encode, Blob, ContentValueSet};
use crate::page::{Page, PageDraft};
use crate::render::{Presentation, Renderer};
use crate::templates::TemplateRegistry;
use crate::validation::{ValidationContext, ValidationResult, Validator};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A page cannot be checked or saved against a template the registry
    /// does not recognize. Distinct from a validation failure: there is no
    /// field the editor could correct.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The content pipeline - single entry point for every edit and render.
pub struct ContentPipeline {
    registry: TemplateRegistry,
    validator: Validator,
    renderer: Renderer,
}

impl ContentPipeline {
    pub fn new() -> Self {
        Self {
            registry: TemplateRegistry::new(),
            validator: Validator::new(),
            renderer: Renderer::new(),
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Decodes a stored blob for editing. The returned value set is owned
    /// by the calling edit session; dropping it abandons the edit.
    pub fn open(&self, template_name: &str, blob: &Value) -> Result<ContentValueSet, PipelineError> {
        let schema = self
            .registry
            .schema(template_name)
            .ok_or_else(|| PipelineError::UnknownTemplate(template_name.to_string()))?;
        Ok(decode(schema, blob))
    }

    /// Validates a draft as submitted, decoding its blob first.
    ///
    /// This is the ONLY validation entry point.
    pub fn check(&self, draft: &PageDraft) -> Result<ValidationResult, PipelineError> {
        let content = self.open(&draft.template_name, &draft.content_json)?;
        Ok(self.check_content(draft, &content))
    }

    /// Validates a draft against an already-decoded (possibly edited)
    /// value set.
    pub fn check_content(&self, draft: &PageDraft, content: &ContentValueSet) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(&ValidationContext {
            draft,
            content: Some(content),
            registry: &self.registry,
        })
    }

    /// Encodes a draft's blob back to canonical form after validating it.
    pub fn save(&self, draft: &PageDraft) -> Result<Blob, PipelineError> {
        let content = self.open(&draft.template_name, &draft.content_json)?;
        self.save_content(draft, &content)
    }

    /// Produces the blob to persist for an edited value set.
    ///
    /// CRITICAL: This ALWAYS validates first. No bypass possible.
    pub fn save_content(
        &self,
        draft: &PageDraft,
        content: &ContentValueSet,
    ) -> Result<Blob, PipelineError> {
        let schema = self
            .registry
            .schema(&draft.template_name)
            .ok_or_else(|| PipelineError::UnknownTemplate(draft.template_name.clone()))?;

        let result = self.check_content(draft, content);
        if !result.valid {
            return Err(PipelineError::ValidationFailed(result.summary()));
        }

        Ok(encode(schema, content))
    }

    /// Renders a stored page. Never fails: a template outside the closed
    /// set falls back before decoding is even attempted.
    pub fn render_page(&self, page: &Page) -> Presentation {
        self.render_blob(&page.template_name, &page.title, &page.content_json)
    }

    pub fn render_blob(&self, template_name: &str, title: &str, blob: &Value) -> Presentation {
        match self.registry.schema(template_name) {
            Some(schema) => {
                let content = decode(schema, blob);
                self.renderer.render(template_name, title, &content)
            }
            None => Renderer::fallback(template_name, title),
        }
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new()
    }
}
