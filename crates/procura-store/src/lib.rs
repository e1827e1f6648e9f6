//! Durable client-side cache: storage port plus the WHOIS status repository.

mod error;
pub use error::StoreError;

mod port;
pub use port::CachePort;

mod file;
pub use file::JsonFileStore;

mod memory;
pub use memory::MemoryStore;

mod whois;
pub use whois::WhoisCache;
