//! API request handlers.

/// Agent listing.
pub mod agents;
/// Question answering.
pub mod ask;
/// Welcome message and health probe.
pub mod root;
