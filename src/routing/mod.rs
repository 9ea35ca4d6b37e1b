//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (exact lookup, then longest prefix)
//!     → matcher.rs (evaluate path patterns)
//!     → Return: matched handler or NoMatch
//!
//! Table construction (at startup):
//!     handlers::route_table()
//!     → RouteTableBuilder (exact + prefix registrations)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No global registry; the table is passed into the server
//! - Deterministic: same path always matches same route

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{RouteMatch, RouteTable, RouteTableBuilder};
