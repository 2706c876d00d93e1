//! Sekisan
//!
//! 単価セット（公表/カスタム）と見積を保存し、単価セット切替時の単価更新と
//! 集計を行う積算ツール。計算エンジンは `sekisan-common`、保存とCLIはこのクレート。

pub mod cli;
pub mod config;
pub mod error;
pub mod estimates;
pub mod rate_sets;
pub mod report;
pub mod stamp;
pub mod store;

pub use error::{Result, SekisanError};
pub use estimates::{EstimateRepository, SwitchOutcome};
pub use rate_sets::RateSetRepository;
pub use store::Storage;
