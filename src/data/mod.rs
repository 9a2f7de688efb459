/// Data layer: core types, normalization, filtering and aggregation.
///
/// Architecture:
/// ```text
///  backend JSON / saved response file
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  ResultPayload → Vec<StartupRecord>
///   └───────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ StartupRecord │  fixed shape, raw source kept alongside
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───► │  stats    │  counts, total value, sector histogram
///   └──────────┘      └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod number;
pub mod stats;
