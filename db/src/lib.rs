pub mod config;
pub mod error;
pub mod factory;
pub mod profile;
pub mod sqlite;
pub mod traits;

pub use config::{DocumentStoreConfig, SQLiteConfig};
pub use error::{DatabaseError, Result};
pub use factory::{create_store, DocumentStoreFactory};
pub use profile::{find_profiles, ConnectionProfile, ProfileAccess, PROFILE_KIND};
pub use sqlite::SQLiteDocumentStore;
pub use traits::DocumentStore;
