//! Request extractors.

pub mod caller;
