//! Host-facing adapters built on the renderers and the dispatch resolver

mod mixed;

pub use mixed::{MixedAssessment, MixedAssessmentProps};
