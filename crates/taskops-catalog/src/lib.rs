//! Operator catalog, categorized search, and per-element operator selection.
//!
//! Provides `OperatorCatalog` (the single owned catalog instance), the
//! `CategoryTable` that groups operators for display, `RetainedParameters`
//! for restoring values across operator switches, the `DiscoveryChannel`
//! exchange with the host, and projection of selections onto the host document.

pub mod catalog;
pub mod category;
pub mod discovery;
pub mod projection;
pub mod retained;

pub use catalog::OperatorCatalog;
pub use category::{categorize, CategoryRule, CategoryTable, OperatorGroup};
pub use discovery::{CatalogRequested, CatalogResponder, CatalogReturned, DiscoveryChannel};
pub use projection::{project_selection, read_projection};
pub use retained::RetainedParameters;
