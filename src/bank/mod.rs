//! Bank packaging: binary format and the build operation.

pub mod builder;
pub mod format;

pub use builder::{build_bank, BankManifest, BuildArtifacts, BuildParams, ManifestEntry};
pub use format::{read_bank, BankIndex, BankRecord};
