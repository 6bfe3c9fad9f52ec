use crate::dispatch::record::normalize_slug;
use crate::dispatch::reshape::{self, Reshaper};
use crate::domain::ActivityType;
use std::fmt;

/// Renderer selected for a question
pub type RendererKind = ActivityType;

/// One `(format, skill) -> renderer` rule
#[derive(Clone)]
pub struct DispatchEntry {
    pub format_slug: String,
    /// `None` matches every skill
    pub skill_slug: Option<String>,
    pub renderer: RendererKind,
    pub reshape: Reshaper,
}

impl DispatchEntry {
    pub fn new(format_slug: &str, renderer: RendererKind, reshape: Reshaper) -> Self {
        Self {
            format_slug: normalize_slug(format_slug),
            skill_slug: None,
            renderer,
            reshape,
        }
    }

    pub fn for_skill(mut self, skill_slug: &str) -> Self {
        self.skill_slug = Some(normalize_slug(skill_slug));
        self
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("format_slug", &self.format_slug)
            .field("skill_slug", &self.skill_slug)
            .field("renderer", &self.renderer)
            .finish()
    }
}

/// Finite lookup table from question format (and skill) to renderer
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Table covering every known format slug and alias
    pub fn standard() -> Self {
        use RendererKind as K;

        Self::empty()
            .with_entry(DispatchEntry::new("multiple_choice", K::MultipleChoice, reshape::multiple_choice))
            .with_entry(DispatchEntry::new("fill_blank", K::FillBlank, reshape::fill_blank))
            .with_entry(
                DispatchEntry::new("fill_blank", K::FillBlank, reshape::fill_blank_listening)
                    .for_skill("listening"),
            )
            .with_entry(
                DispatchEntry::new("fill_blank", K::WordBank, reshape::word_bank).for_skill("grammar"),
            )
            .with_entry(DispatchEntry::new("word_bank", K::WordBank, reshape::word_bank))
            .with_entry(DispatchEntry::new("sentence_builder", K::SentenceBuilder, reshape::sentence_builder))
            .with_entry(DispatchEntry::new("word_order", K::SentenceBuilder, reshape::sentence_builder))
            .with_entry(DispatchEntry::new("spelling", K::Spelling, reshape::spelling))
            .with_entry(DispatchEntry::new("matching", K::Matching, reshape::matching))
            .with_entry(DispatchEntry::new("speaking", K::SpokenResponse, reshape::spoken_response))
            .with_entry(DispatchEntry::new("spoken_response", K::SpokenResponse, reshape::spoken_response))
            .with_entry(DispatchEntry::new("writing", K::WrittenResponse, reshape::written_response))
            .with_entry(DispatchEntry::new("written_response", K::WrittenResponse, reshape::written_response))
            .with_entry(DispatchEntry::new("free_response", K::WrittenResponse, reshape::written_response))
    }

    /// Add a rule; a rule for the same `(format, skill)` is replaced
    pub fn with_entry(mut self, entry: DispatchEntry) -> Self {
        self.entries
            .retain(|e| !(e.format_slug == entry.format_slug && e.skill_slug == entry.skill_slug));
        self.entries.push(entry);
        self
    }

    /// Exact `(format, skill)` rule first, then the format's skill-agnostic rule
    pub fn lookup(&self, format_slug: &str, skill_slug: &str) -> Option<&DispatchEntry> {
        let format = normalize_slug(format_slug);
        let skill = normalize_slug(skill_slug);

        self.entries
            .iter()
            .find(|e| e.format_slug == format && e.skill_slug.as_deref() == Some(skill.as_str()))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.format_slug == format && e.skill_slug.is_none())
            })
    }

    pub fn supports(&self, format_slug: &str) -> bool {
        let format = normalize_slug(format_slug);
        self.entries.iter().any(|e| e.format_slug == format)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}
