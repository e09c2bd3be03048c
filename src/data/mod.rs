/// Data layer: core types, loading, aggregation, filtering and export.
///
/// Architecture:
/// ```text
///  sales API (JSON) / local .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, unique-value index
///   └──────────┘
///     │       │
///     ▼       ▼
///  ┌─────────┐ ┌────────┐
///  │aggregate│ │ filter │  group/sort/top-N     typed predicates
///  └─────────┘ └────────┘
///     │            │
///     ▼            ▼
///   summary      export   dashboard views    CSV of the filtered view
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
