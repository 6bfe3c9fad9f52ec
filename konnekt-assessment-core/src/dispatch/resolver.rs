use crate::config::AssessmentConfig;
use crate::dispatch::record::QuestionRecord;
use crate::dispatch::table::{DispatchTable, RendererKind};
use crate::domain::{Activity, AnswerValue, ItemId};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Single-item activity built for one generic question
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticActivity {
    /// Originating question id; also the id of the activity's only item
    pub key: ItemId,
    pub skill_slug: String,
    pub format_slug: String,
    pub renderer: RendererKind,
    pub activity: Activity,
}

/// Outcome of dispatching one question
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Supported(SyntheticActivity),
    /// Rendered as an inert notice; never complete
    Unsupported {
        question_id: ItemId,
        format_slug: String,
    },
}

impl Resolution {
    pub fn question_id(&self) -> &ItemId {
        match self {
            Resolution::Supported(synthetic) => &synthetic.key,
            Resolution::Unsupported { question_id, .. } => question_id,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Resolution::Supported(_))
    }

    pub fn renderer(&self) -> Option<RendererKind> {
        match self {
            Resolution::Supported(synthetic) => Some(synthetic.renderer),
            Resolution::Unsupported { .. } => None,
        }
    }

    pub fn activity(&self) -> Option<&Activity> {
        match self {
            Resolution::Supported(synthetic) => Some(&synthetic.activity),
            Resolution::Unsupported { .. } => None,
        }
    }

    /// Whether a stored answer completes this question
    pub fn is_complete(&self, answer: &AnswerValue) -> bool {
        self.activity()
            .map(|activity| activity.is_item_complete(self.question_id(), answer))
            .unwrap_or(false)
    }
}

/// Dispatch one record (pure)
pub fn resolve(
    record: &QuestionRecord,
    table: &DispatchTable,
    config: &AssessmentConfig,
) -> Resolution {
    match table.lookup(&record.format_slug, &record.skill_slug) {
        Some(entry) => Resolution::Supported(SyntheticActivity {
            key: record.question_id.clone(),
            skill_slug: record.skill_slug.clone(),
            format_slug: record.format_slug.clone(),
            renderer: entry.renderer,
            activity: (entry.reshape)(record, config),
        }),
        None => {
            tracing::warn!(
                "No renderer for format {:?} (question {})",
                record.format_slug,
                record.question_id
            );
            Resolution::Unsupported {
                question_id: record.question_id.clone(),
                format_slug: record.format_slug.clone(),
            }
        }
    }
}

/// Memoizing resolver
///
/// A question is resolved once per configuration; asking again for the same
/// question id returns the identical `Rc`.
#[derive(Debug)]
pub struct DispatchResolver {
    table: DispatchTable,
    config: AssessmentConfig,
    cache: BTreeMap<ItemId, Rc<Resolution>>,
}

impl DispatchResolver {
    pub fn new(config: AssessmentConfig) -> Self {
        Self {
            table: DispatchTable::standard(),
            config,
            cache: BTreeMap::new(),
        }
    }

    pub fn with_table(mut self, table: DispatchTable) -> Self {
        self.table = table;
        self.cache.clear();
        self
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Replace the configuration; returns true (and drops memoized results)
    /// when it differs
    pub fn set_config(&mut self, config: AssessmentConfig) -> bool {
        if config == self.config {
            return false;
        }
        tracing::debug!(
            "Resolver configuration changed (revision {} -> {}), clearing {} cached results",
            self.config.revision,
            config.revision,
            self.cache.len()
        );
        self.config = config;
        self.cache.clear();
        true
    }

    pub fn resolve(&mut self, record: &QuestionRecord) -> Rc<Resolution> {
        if let Some(cached) = self.cache.get(&record.question_id) {
            return Rc::clone(cached);
        }

        let resolution = Rc::new(resolve(record, &self.table, &self.config));
        if let Some(kind) = resolution.renderer() {
            tracing::info!(
                "Question {} ({}/{}) -> {} renderer",
                record.question_id,
                record.skill_slug,
                record.format_slug,
                kind
            );
        }
        self.cache
            .insert(record.question_id.clone(), Rc::clone(&resolution));
        resolution
    }

    /// Completeness of an answer without touching the cache
    pub fn is_complete(&self, record: &QuestionRecord, answer: &AnswerValue) -> bool {
        match self.cache.get(&record.question_id) {
            Some(resolution) => resolution.is_complete(answer),
            None => resolve(record, &self.table, &self.config).is_complete(answer),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for DispatchResolver {
    fn default() -> Self {
        Self::new(AssessmentConfig::default())
    }
}
