//! Mixed-skill dispatch
//!
//! Generic question records are mapped to a renderer through a finite
//! `(format, skill)` table and reshaped into single-item activities.

mod ordering;
mod record;
pub mod reshape;
mod resolver;
mod table;

pub use ordering::{order_questions, skill_rank, SKILL_PRIORITY};
pub use record::{normalize_slug, QuestionRecord};
pub use reshape::Reshaper;
pub use resolver::{resolve, DispatchResolver, Resolution, SyntheticActivity};
pub use table::{DispatchEntry, DispatchTable, RendererKind};
