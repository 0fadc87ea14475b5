//! Titian Core - Template-Driven Content Engine
//!
//! # Engine Guarantees (Non-Negotiable)
//! 1. Templates Are Contracts
//! 2. Decode Never Fails
//! 3. Save Always Validates
//! 4. Encode Writes Exactly The Schema
//! 5. Render Always Shows Something
//! 6. List Identity Is Transient

pub mod content;
pub mod list;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod templates;
pub mod validation;

pub use content::{decode, encode, Blob, ContentValueSet, FieldValue, ScalarValue};
pub use list::{EmptyListPolicy, ItemId, ListError, RecordList, RecordValue};
pub use page::{derive_slug, Page, PageDraft, PageStatus};
pub use pipeline::{ContentPipeline, PipelineError};
pub use render::{Presentation, Renderer, RenderStrategy, Section};
pub use store::{InMemoryPageStore, NewPage, PageStore, StoreError};
pub use templates::{IconKind, TemplateId, TemplateRegistry, TemplateSchema};
pub use validation::{FieldPath, ValidationResult, ValidationRule, Validator, Violation};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
