use crate::dispatch::record::{normalize_slug, QuestionRecord};
use std::cmp::Ordering;

/// Skill groups in presentation order
pub const SKILL_PRIORITY: &[&str] = &[
    "vocabulary",
    "grammar",
    "reading",
    "comprehension",
    "listening",
    "spelling",
    "writing",
    "speaking",
];

/// Position of a skill in [`SKILL_PRIORITY`]; unknown skills rank last
pub fn skill_rank(skill_slug: &str) -> usize {
    let skill = normalize_slug(skill_slug);
    SKILL_PRIORITY
        .iter()
        .position(|s| *s == skill)
        .unwrap_or(SKILL_PRIORITY.len())
}

fn compare(a: &QuestionRecord, b: &QuestionRecord) -> Ordering {
    skill_rank(&a.skill_slug)
        .cmp(&skill_rank(&b.skill_slug))
        .then_with(|| normalize_slug(&a.format_slug).cmp(&normalize_slug(&b.format_slug)))
}

/// Stable order: by skill priority, then format slug
///
/// Questions that compare equal keep their input order.
pub fn order_questions(questions: &[QuestionRecord]) -> Vec<QuestionRecord> {
    let mut ordered = questions.to_vec();
    ordered.sort_by(compare);
    ordered
}
