//! Series normalization pipeline.
//!
//! - `reduce`: sub-annual -> annual aggregation (FRED)
//! - `normalize`: raw fetch result -> `CanonicalSeries`
//! - `combine`: named series -> `CombinedTable`

pub mod combine;
pub mod normalize;
pub mod reduce;

pub use combine::combine;
pub use normalize::{normalize, parse_year};
pub use reduce::annualize;
