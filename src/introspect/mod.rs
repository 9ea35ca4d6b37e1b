//! Request introspection subsystem.
//!
//! # Data Flow
//! ```text
//! RequestView + [Facet]
//!     → facet.rs (extract one value per facet)
//!     → aggregate.rs (ordered assembly)
//!     → document.rs (Document → JSON)
//! ```
//!
//! # Design Decisions
//! - Facet lists are fixed per endpoint, never taken from the request
//! - Key order equals the requested facet order
//! - Single/multiple values are an explicit enum, not dynamic JSON

pub mod aggregate;
pub mod document;
pub mod facet;

pub use aggregate::Aggregator;
pub use document::{Document, MultiValue, Value};
pub use facet::Facet;
