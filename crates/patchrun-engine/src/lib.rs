mod archive;
mod executor;
mod kvstore;
mod merge;
mod process;
mod reporter;
mod runner;
mod service;
mod stage;

pub use archive::{PackageArchive, ZipPackage};
pub use kvstore::{JsonFileStore, KeyValueStore};
pub use process::{ProcessController, SystemProcessController};
pub use reporter::ProgressReporter;
pub use runner::{run_update, EngineBackends, RunPhase, UpdateOptions, UpdateOutcome};
pub use service::{ServiceController, SystemServiceController};
