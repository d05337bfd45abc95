pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod verse_store;

pub use metrics::{get_metrics, init_metrics, record_tafsir_request};
pub use prompt::build_prompt;
pub use verse_store::{VerseStore, VerseStoreError};
