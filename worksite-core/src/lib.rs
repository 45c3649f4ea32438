//! Domain types shared by every worksite crate: projects, statuses and
//! stages, list queries, media references, and the wire-shape helpers that
//! let one client talk to both backend generations.

pub mod error;
pub mod export;
pub mod media;
pub mod project;
pub mod query;
pub mod status;
pub mod util;
pub mod wire;

pub use error::{ParseError, ValidationError};
pub use export::{ExportFile, ExportFormat, ExportRange};
pub use media::{MediaKind, MediaRef};
pub use project::{Project, ProjectDraft, ProjectPatch};
pub use query::{ListQuery, Page};
pub use status::{ProjectStatus, Stage, Stages};
pub use wire::{FieldStyle, ListResponse};
