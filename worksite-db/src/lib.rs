//! SQLite persistence for local mode.
//!
//! Provides schema creation, project and media CRUD, read queries, and demo
//! seeding, backed by SQLite (via rusqlite with the bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;
pub mod seed;

pub use operations::{
    delete_all_media, delete_media, delete_project, insert_media, insert_project, set_archived,
    update_project, OperationError,
};
pub use queries::{all_projects, get_project, list_media, media_bytes, store_stats, StoreStats};
pub use schema::{open_database, open_memory, SchemaError};
pub use seed::seed_demo_projects;
