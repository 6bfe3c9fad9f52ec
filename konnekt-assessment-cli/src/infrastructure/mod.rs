pub mod error;
pub mod file_capture;
pub mod files;
pub mod observability;

pub use error::{CliError, Result};
pub use file_capture::FileCaptureDevice;
pub use files::{load_answers, load_config, load_questions};
pub use observability::LogConfig;
