//! Metadata catalog domain
//!
//! The known authors and source titles of the corpus, and the fuzzy
//! resolution of loosely specified filters against them.

pub mod filter_resolver;
pub mod snapshot;

pub use filter_resolver::{FilterResolver, FilterTerm, ResolvedFilter};
pub use snapshot::{CatalogSnapshot, MetadataField};
