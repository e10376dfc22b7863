/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → GalaxyTable (+ redshift groups)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ DataSession │  load once, share Arc<GalaxyTable>
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply range predicates → FilteredView
///   └──────────┘
/// ```

pub mod filter;
pub mod groups;
pub mod loader;
pub mod model;
pub mod session;
pub mod transform;
