//! Page Store Seam
//!
//! Persistence is an external collaborator. This module fixes its contract
//! and ships an in-memory implementation used by tests and embedders; real
//! deployments put a database-backed implementation behind the same trait.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::page::{Page, PageStatus};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Page not found: {0}")]
    NotFound(Uuid),

    #[error("No page for slug: {0}")]
    SlugNotFound(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),
}

/// Fields of a page the caller controls on create and update. Identity and
/// timestamps belong to the store.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub template_name: String,
    pub status: PageStatus,
    pub content_json: Value,
}

/// The external page store contract: plain CRUD by id, plus the slug
/// lookup the public read path uses. Slug uniqueness among stored pages is
/// the store's invariant.
pub trait PageStore {
    fn get(&self, id: Uuid) -> Result<Page, StoreError>;
    fn get_by_slug(&self, slug: &str) -> Result<Page, StoreError>;
    fn list(&self) -> Vec<Page>;
    fn create(&mut self, page: NewPage) -> Result<Page, StoreError>;
    fn update(&mut self, id: Uuid, page: NewPage) -> Result<Page, StoreError>;
    fn delete(&mut self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory page store.
#[derive(Debug, Default)]
pub struct InMemoryPageStore {
    pages: HashMap<Uuid, Page>,
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> bool {
        self.pages
            .values()
            .any(|p| p.slug == slug && Some(p.id) != exclude)
    }
}

impl PageStore for InMemoryPageStore {
    fn get(&self, id: Uuid) -> Result<Page, StoreError> {
        self.pages.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Page, StoreError> {
        self.pages
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::SlugNotFound(slug.to_string()))
    }

    fn list(&self) -> Vec<Page> {
        let mut pages: Vec<_> = self.pages.values().cloned().collect();
        pages.sort_by_key(|p| p.created_at);
        pages
    }

    fn create(&mut self, page: NewPage) -> Result<Page, StoreError> {
        if self.slug_taken(&page.slug, None) {
            return Err(StoreError::SlugTaken(page.slug));
        }

        let now = Utc::now();
        let record = Page {
            id: Uuid::new_v4(),
            title: page.title,
            slug: page.slug,
            template_name: page.template_name,
            status: page.status,
            content_json: page.content_json,
            created_at: now,
            updated_at: now,
        };
        self.pages.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&mut self, id: Uuid, page: NewPage) -> Result<Page, StoreError> {
        if !self.pages.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if self.slug_taken(&page.slug, Some(id)) {
            return Err(StoreError::SlugTaken(page.slug));
        }

        let record = self.pages.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.title = page.title;
        record.slug = page.slug;
        record.template_name = page.template_name;
        record.status = page.status;
        record.content_json = page.content_json;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.pages.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}
