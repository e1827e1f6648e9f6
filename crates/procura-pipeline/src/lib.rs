//! Sourcing workflows on top of the REST client and the status cache.

mod error;
pub use error::PipelineError;

pub mod articles;
pub mod email;
pub mod import;
pub mod validate;

pub use articles::remove_article;
pub use email::{EmailUpdate, EmailValidationReport, discover_email, save_manual_email, validate_emails};
pub use import::{ImportReport, import_articles, import_articles_from_reader};
pub use validate::{PipelineConfig, SearchOutcome, ValidationReport, search_and_validate, validate_suppliers};
