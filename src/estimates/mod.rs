//! 見積のリポジトリ

mod switch;

pub use switch::SwitchOutcome;

use crate::error::Result;
use crate::rate_sets::RateSetRepository;
use crate::stamp::{new_id, now_iso};
use crate::store::{RecordTable, Storage};
use log::debug;
use sekisan_common::{Error, Estimate, EstimateLine, RateCategory, RateSetRef};
use std::sync::Arc;

pub struct EstimateRepository {
    table: Arc<dyn RecordTable<Estimate>>,
}

impl EstimateRepository {
    pub fn new(storage: &Storage) -> Self {
        Self {
            table: storage.estimates.clone(),
        }
    }

    /// 新規見積を作成して保存
    pub async fn create(&self, initial_rate_set: RateSetRef) -> Result<Estimate> {
        let est = Estimate::new(new_id(), &now_iso(), initial_rate_set, new_id());
        self.table.put(&est).await?;
        debug!("estimate created: {} ({})", est.id, est.rate_set_ref);
        Ok(est)
    }

    /// updatedAtを更新して保存
    pub async fn save(&self, est: &mut Estimate) -> Result<()> {
        est.updated_at = now_iso();
        self.table.put(est).await?;
        debug!("estimate saved: {}", est.id);
        Ok(())
    }

    pub async fn find(&self, id: &str) -> Result<Option<Estimate>> {
        self.table.get(id).await
    }

    pub async fn get(&self, id: &str) -> Result<Estimate> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::not_found("見積", id).into())
    }

    /// 更新日時の新しい順
    pub async fn list(&self) -> Result<Vec<Estimate>> {
        self.table.list_recent().await
    }

    /// 読み込み→編集→保存。編集が失敗した場合は保存しない
    pub async fn update<F, T>(&self, id: &str, edit: F) -> Result<(Estimate, T)>
    where
        F: FnOnce(&mut Estimate) -> sekisan_common::Result<T>,
    {
        let mut est = self.get(id).await?;
        let out = edit(&mut est)?;
        self.save(&mut est).await?;
        Ok((est, out))
    }

    /// 参照中の単価セットから項目を選んで明細を追加（数量の既定は0）
    pub async fn add_line(
        &self,
        rate_sets: &RateSetRepository<'_>,
        estimate_id: &str,
        work_type_id: &str,
        category: RateCategory,
        key: &str,
        qty: f64,
    ) -> Result<EstimateLine> {
        let current = self.get(estimate_id).await?;
        let rates = rate_sets.resolve_for_estimate(&current).await?;

        let (_, line) = self
            .update(estimate_id, |est| {
                est.add_line(new_id(), work_type_id, category, key, qty, &rates)
                    .cloned()
            })
            .await?;
        Ok(line)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.table.delete(id).await?;
        debug!("estimate delete {}: {}", id, deleted);
        Ok(deleted)
    }
}
