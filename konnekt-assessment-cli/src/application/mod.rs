pub mod progress;
pub mod record;
pub mod resolve;
pub mod schema;

pub use progress::{progress_report, ProgressReport};
pub use record::record_take;
pub use resolve::{resolve_report, ResolvedQuestion};
pub use schema::write_schemas;
