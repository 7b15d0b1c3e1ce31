/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  candidate paths
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  resolve → CSV → RawTable → schema check → ParsedRow
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop missing / out-of-bounds coordinates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<IncidentRecord>, input order
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  daily counts, trend, top categories, seeded sample
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::{LoadError, ParseError};
pub use loader::load;
pub use model::{Dataset, IncidentRecord};
