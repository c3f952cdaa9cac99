mod builder;
mod handle;
mod naming;
mod store;
mod yaml;

pub use builder::{review, DefinitionBuilder, DefinitionError};
pub use handle::DefinitionHandle;
pub use naming::{definition_path, DEFINITION_EXTENSION};
pub use store::{FrameRepeat, MeasurementDefinition, ScanDefinitionStore, StoreError};
pub use yaml::YamlDefinitionStore;
