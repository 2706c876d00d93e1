//! 単価セットの切替
//!
//! 参照先の解決 → 明細単価の更新 → 保存 を順に行う。解決に失敗した場合は
//! 何も保存しないので、参照先と明細単価が食い違った状態は残らない。

use super::EstimateRepository;
use crate::error::Result;
use crate::rate_sets::RateSetRepository;
use log::info;
use sekisan_common::{Estimate, RateSetData, RateSetRef, RefreshReport};

/// 切替結果
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    pub estimate: Estimate,
    pub rates: RateSetData,
    pub report: RefreshReport,
}

impl EstimateRepository {
    pub async fn switch_rate_set(
        &self,
        rate_sets: &RateSetRepository<'_>,
        estimate_id: &str,
        new_ref: RateSetRef,
    ) -> Result<SwitchOutcome> {
        let current = self.get(estimate_id).await?;
        let rates = rate_sets.resolve(&new_ref).await?;

        let (mut estimate, report) = current.switch_rate_set(new_ref, &rates);
        self.save(&mut estimate).await?;

        info!(
            "見積 {} の単価セットを {} に切替（更新 {} / 上書き {} / 該当なし {}）",
            estimate.id, estimate.rate_set_ref, report.updated, report.pinned, report.unmatched
        );

        Ok(SwitchOutcome {
            estimate,
            rates,
            report,
        })
    }
}
