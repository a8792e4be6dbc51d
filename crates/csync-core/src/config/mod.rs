//! Configuration layer: project configs, private id mappings, the
//! active-project marker, runtime settings, and workspace discovery.

mod project;
mod settings;
mod workspace;

pub use project::{ActiveProject, ProjectConfig, ProjectIdConfig, default_max_file_size};
pub use settings::{Compression, Settings};
pub use workspace::Workspace;
