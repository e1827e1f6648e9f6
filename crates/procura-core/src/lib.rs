pub mod dedup;
pub mod email;
pub mod model;
pub mod website;

pub use dedup::{DedupResult, deduplicate};
pub use email::is_valid_email;
pub use model::{Article, Request, Supplier, WhoisStatus};
pub use website::website_key;
