//! Configuration: per-entity rendering descriptors and editor settings

mod editor_config;
mod network_config;

pub use editor_config::{ConfigError, EditorConfig, OverlayStyle};
pub use network_config::{EdgeConfig, NetworkConfig, VertexConfig};
