/// Data layer: core types, loading, and summarizing.
///
/// Architecture:
/// ```text
///       .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Row>, column names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  describe → Summary, rank_by_cost → Table
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod summary;
