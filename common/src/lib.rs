//! Sekisan Common Library
//!
//! 単価セット・見積の型と、I/Oを持たない計算エンジン

pub mod types;
pub mod error;
pub mod catalog;
pub mod calc;
pub mod refresh;
pub mod estimate;
pub mod rate_set;
pub mod migrate;
pub mod picker;

pub use types::{
    BaseRateSet, CustomRateSet, Estimate, EstimateLine, OverheadItem, OverheadKind, OverheadMode,
    OverheadUnit, RateCategory, RateItem, RateSetData, RateSetRef, RateUnit, Totals, WorkType,
};
pub use error::{Error, Result};
pub use catalog::{CatalogEntry, RateCatalog, DEFAULT_BASE_SET_ID};
pub use calc::{compute_totals, format_yen, line_subtotal_yen, work_type_subtotal};
pub use refresh::{refresh_line_prices, refresh_with_report, RefreshReport};
pub use rate_set::create_custom_from_base;
pub use migrate::upgrade_estimate_record;
