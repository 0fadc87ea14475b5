//! Render Dispatch - Strategy Table With Graceful Fallback
//!
//! Each implemented template has a pure strategy from value set to
//! presentation tree. Templates without a strategy (or names outside the
//! closed set entirely) degrade to a generic fallback that still surfaces
//! the page title: an editor must always see something for a draft page,
//! even before its presentation is built.

use serde::Serialize;

use crate::content::ContentValueSet;
use crate::list::RecordList;
use crate::templates::{IconKind, TemplateId};

/// Presentation tree handed to the styling layer.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub template: String,
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Hero { title: String, subtitle: String },
    Prose { heading: String, body: String },
    Quote { text: String },
    ValueGrid { items: Vec<ValueCard> },
    Timeline { summary: String, entries: Vec<TimelineEntry> },
    Notice { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueCard {
    pub title: String,
    pub icon: IconKind,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub year: String,
    pub title: String,
    pub description: String,
}

/// A pure mapping from decoded content to a presentation tree.
pub trait RenderStrategy {
    fn template(&self) -> TemplateId;
    fn render(&self, page_title: &str, content: &ContentValueSet) -> Presentation;
}

fn value_cards(list: Option<&RecordList>) -> Vec<ValueCard> {
    list.map(|list| {
        list.iter()
            .map(|(_, record)| ValueCard {
                title: record.text("title").to_string(),
                icon: record.icon("icon").unwrap_or(IconKind::Heart),
                description: record.text("description").to_string(),
            })
            .collect()
    })
    .unwrap_or_default()
}

fn timeline_entries(list: Option<&RecordList>) -> Vec<TimelineEntry> {
    list.map(|list| {
        list.iter()
            .map(|(_, record)| TimelineEntry {
                year: record.text("year").to_string(),
                title: record.text("title").to_string(),
                description: record.text("description").to_string(),
            })
            .collect()
    })
    .unwrap_or_default()
}

struct HomeStrategy;

impl RenderStrategy for HomeStrategy {
    fn template(&self) -> TemplateId {
        TemplateId::Home
    }

    fn render(&self, page_title: &str, content: &ContentValueSet) -> Presentation {
        Presentation {
            template: TemplateId::Home.as_str().to_string(),
            title: page_title.to_string(),
            sections: vec![
                Section::Hero {
                    title: content.text("hero_title").to_string(),
                    subtitle: content.text("hero_subtitle").to_string(),
                },
                Section::ValueGrid { items: value_cards(content.list("values")) },
                Section::Quote { text: content.text("manifesto_quote").to_string() },
            ],
        }
    }
}

struct AboutStrategy;

impl RenderStrategy for AboutStrategy {
    fn template(&self) -> TemplateId {
        TemplateId::About
    }

    fn render(&self, page_title: &str, content: &ContentValueSet) -> Presentation {
        Presentation {
            template: TemplateId::About.as_str().to_string(),
            title: page_title.to_string(),
            sections: vec![
                Section::Hero {
                    title: content.text("hero_title").to_string(),
                    subtitle: String::new(),
                },
                Section::Prose {
                    heading: "Who We Are".to_string(),
                    body: content.text("who_we_are").to_string(),
                },
                Section::Prose {
                    heading: "Why Us".to_string(),
                    body: content.text("why_us").to_string(),
                },
                Section::Quote { text: content.text("manifesto_intro").to_string() },
                Section::Prose {
                    heading: "Mission".to_string(),
                    body: content.text("mission").to_string(),
                },
                Section::Prose {
                    heading: "Vision".to_string(),
                    body: content.text("vision").to_string(),
                },
                Section::ValueGrid { items: value_cards(content.list("values")) },
                Section::Timeline {
                    summary: content.text("timeline_summary").to_string(),
                    entries: timeline_entries(content.list("timeline_details")),
                },
            ],
        }
    }
}

/// Renderer dispatches to the registered strategy for a template, or to the
/// generic fallback when none exists.
pub struct Renderer {
    strategies: Vec<Box<dyn RenderStrategy>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { strategies: vec![Box::new(HomeStrategy), Box::new(AboutStrategy)] }
    }

    pub fn has_strategy(&self, id: TemplateId) -> bool {
        self.strategies.iter().any(|s| s.template() == id)
    }

    /// Dispatches on the stored template name. Deliberate degradation, not
    /// an error: unknown names and strategy-less templates both fall back.
    pub fn render(
        &self,
        template_name: &str,
        page_title: &str,
        content: &ContentValueSet,
    ) -> Presentation {
        if let Some(id) = TemplateId::parse(template_name) {
            if let Some(strategy) = self.strategies.iter().find(|s| s.template() == id) {
                return strategy.render(page_title, content);
            }
        }
        Self::fallback(template_name, page_title)
    }

    /// The generic not-implemented presentation: page title plus a plain
    /// notice.
    pub fn fallback(template_name: &str, page_title: &str) -> Presentation {
        Presentation {
            template: template_name.to_string(),
            title: page_title.to_string(),
            sections: vec![Section::Notice {
                message: format!(
                    "Template \"{}\" is not implemented on the presentation side yet.",
                    template_name
                ),
            }],
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
