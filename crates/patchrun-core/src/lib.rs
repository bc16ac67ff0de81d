mod manifest;
mod operation;
mod progress;
mod roots;

pub use manifest::{UpdateManifest, MANIFEST_FILE_NAME};
pub use operation::{
    Operation, OperationArea, OperationKind, OperationMethod, RegistryValueEntry,
    RegistryValueKind,
};
pub use progress::ProgressState;
pub use roots::{split_rooted_path, RootError, RootToken, Roots};
