//! InMemory 実装

mod profile;

pub use profile::InMemoryProfileStore;
