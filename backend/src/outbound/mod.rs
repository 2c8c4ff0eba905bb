//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document store and in-process user repositories.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod persistence;
