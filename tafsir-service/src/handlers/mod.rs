//! HTTP handlers for the tafsir service.

pub mod health;
pub mod metrics;
pub mod tafsir;
pub mod verses;

pub use health::health_check;
pub use metrics::metrics;
pub use tafsir::get_tafsir;
pub use verses::get_verse;
