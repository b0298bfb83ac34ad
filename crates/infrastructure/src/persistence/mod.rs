//! Local persistence adapters.

mod credential_file;

pub use credential_file::FileCredentialStorage;
