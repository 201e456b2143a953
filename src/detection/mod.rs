//! Repository analysis: manifest-driven inference of the application stack.

pub mod analyzer;
pub mod types;

pub use analyzer::{analyze, detect_static_site, AnalysisError};
pub use types::{AppInfo, Framework, Language, StaticSite};
