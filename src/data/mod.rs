/// Data layer: core types, loading, and the filter/sort pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate schema → ShootingDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ShootingDataset  │  Vec<PlayerRecord>, metric columns, bounds
///   └─────────────────┘
///        │   + FilterCriteria
///        ▼
///   ┌──────────┐
///   │ pipeline  │  guard → filter → stable sort → project → DisplayTable
///   └──────────┘
/// ```

pub mod catalog;
pub mod loader;
pub mod model;
pub mod pipeline;
