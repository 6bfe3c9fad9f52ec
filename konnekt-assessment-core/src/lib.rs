pub mod application;
pub mod audio;
pub mod capture;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod renderer;

pub use application::{MixedAssessment, MixedAssessmentProps};
pub use audio::{AudioPlayback, AudioSource};
pub use capture::{CaptureDevice, CapturePhase, CaptureStream, GuardOutcome, WarningChoice};
pub use config::AssessmentConfig;
pub use dispatch::{DispatchResolver, QuestionRecord, RendererKind, Resolution, SyntheticActivity};
pub use domain::{Activity, ActivityType, AnswerMap, AnswerValue, ItemId, NavigationState, Timestamp};
pub use error::{AudioError, CaptureError, ConfigError};
pub use renderer::{AnyRenderer, NavigationRequest, RendererProps};
