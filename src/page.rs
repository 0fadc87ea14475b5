//! Page Records and Slug Derivation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Publication status of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(PageStatus::Draft),
            "published" => Some(PageStatus::Published),
            _ => None,
        }
    }
}

/// Page record as exchanged with the external page store.
///
/// `template_name` stays a plain string on this surface so rows persisted
/// under template names outside the current closed set can still be loaded
/// and degrade at render time instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub template_name: String,
    pub status: PageStatus,
    pub content_json: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editor-submitted draft of a page, before validation. All identification
/// fields arrive as raw strings from the editing surface; the validation
/// engine decides whether they are acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDraft {
    pub title: String,
    pub slug: String,
    pub template_name: String,
    pub status: String,
    #[serde(default)]
    pub content_json: Value,
}

impl PageDraft {
    /// Seeds an edit session from a stored page.
    pub fn from_page(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            template_name: page.template_name.clone(),
            status: page.status.as_str().to_string(),
            content_json: page.content_json.clone(),
        }
    }
}

/// Derives a URL slug from a title: lowercase, every run of characters
/// outside `[a-z0-9]` collapses to one hyphen, leading and trailing
/// hyphens stripped.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_title_with_punctuation() {
        assert_eq!(derive_slug("Beranda Utama!"), "beranda-utama");
    }

    #[test]
    fn slug_collapses_runs_and_strips_edges() {
        assert_eq!(derive_slug("  Multi   Space "), "multi-space");
        assert_eq!(derive_slug("--Already-Hyphenated--"), "already-hyphenated");
    }

    #[test]
    fn slug_keeps_digits() {
        assert_eq!(derive_slug("Laporan 2024 (Final)"), "laporan-2024-final");
    }

    #[test]
    fn slug_of_only_punctuation_is_empty() {
        assert_eq!(derive_slug("!!!"), "");
    }
}
