//! 単価セット参照の解決
//!
//! キャッシュは持たない。毎回ストアを読み直すので、カスタム単価の編集は
//! 次の解決からすぐ反映される。

use super::RateSetRepository;
use crate::error::{Result, SekisanError};
use log::warn;
use sekisan_common::{Error, Estimate, RateSetData, RateSetRef};

impl RateSetRepository<'_> {
    /// 参照先の単価データを取得
    pub async fn resolve(&self, rate_set_ref: &RateSetRef) -> Result<RateSetData> {
        match rate_set_ref {
            RateSetRef::Base { id } => Ok(self.catalog.get(id)?.data),
            RateSetRef::Custom { id } => Ok(self.get(id).await?.data),
        }
    }

    /// 見積が参照中の単価データを取得
    ///
    /// カスタム単価セットが削除済みなら `StaleReference` を返す。見積自体は変更しない。
    pub async fn resolve_for_estimate(&self, estimate: &Estimate) -> Result<RateSetData> {
        match self.resolve(&estimate.rate_set_ref).await {
            Err(e) if e.is_not_found() => match &estimate.rate_set_ref {
                RateSetRef::Custom { id } => {
                    warn!("見積 {} の参照先カスタム単価セット {} は削除済み", estimate.id, id);
                    Err(SekisanError::Common(Error::StaleReference(id.clone())))
                }
                RateSetRef::Base { .. } => Err(e),
            },
            other => other,
        }
    }
}
