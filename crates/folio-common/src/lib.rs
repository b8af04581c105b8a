//! folio-common: configuration, errors, tracing setup and workspace
//! persistence shared by the folio crates.

pub mod config;
pub mod error;
pub mod store;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::config::{Config, EditorSettings, Loader, ProviderSettings, Saver};
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub use crate::config::FileStore;
pub use crate::error::{FolioError, ParseError, SerDeError};
pub use crate::store::WorkspaceSnapshot;
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub use crate::store::SnapshotStore;
