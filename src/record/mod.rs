pub mod data;
pub mod error;
pub mod loader;

pub use data::{Price, PropertyRecord, RecordId};
pub use error::LoadError;
pub use loader::{DataSource, fetch_document, parse_document};
