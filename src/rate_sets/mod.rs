//! カスタム単価セットのリポジトリ

mod resolve;

use crate::error::Result;
use crate::stamp::{new_id, now_iso};
use crate::store::{RecordTable, Storage};
use log::debug;
use sekisan_common::{create_custom_from_base, CatalogEntry, CustomRateSet, Error, RateCatalog};
use std::sync::Arc;

pub struct RateSetRepository<'a> {
    catalog: &'a RateCatalog,
    table: Arc<dyn RecordTable<CustomRateSet>>,
}

impl<'a> RateSetRepository<'a> {
    pub fn new(catalog: &'a RateCatalog, storage: &Storage) -> Self {
        Self {
            catalog,
            table: storage.rate_sets.clone(),
        }
    }

    pub fn catalog(&self) -> &'a RateCatalog {
        self.catalog
    }

    /// 公表単価セットの選択肢
    pub fn base_options(&self) -> Vec<CatalogEntry> {
        self.catalog.list()
    }

    /// 公表単価セットをコピーして保存
    pub async fn create_from_base(&self, base_set_id: &str, name: &str) -> Result<CustomRateSet> {
        let rs = create_custom_from_base(self.catalog, base_set_id, name, new_id(), &now_iso())?;
        self.table.put(&rs).await?;
        debug!("custom rate set created: {} (from {})", rs.id, base_set_id);
        Ok(rs)
    }

    /// updatedAtを更新して保存
    pub async fn save(&self, rs: &mut CustomRateSet) -> Result<()> {
        rs.updated_at = now_iso();
        self.table.put(rs).await?;
        debug!("custom rate set saved: {}", rs.id);
        Ok(())
    }

    pub async fn find(&self, id: &str) -> Result<Option<CustomRateSet>> {
        self.table.get(id).await
    }

    pub async fn get(&self, id: &str) -> Result<CustomRateSet> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::not_found("カスタム単価セット", id).into())
    }

    /// 更新日時の新しい順
    pub async fn list(&self) -> Result<Vec<CustomRateSet>> {
        self.table.list_recent().await
    }

    /// 読み込み→編集→保存
    pub async fn update<F>(&self, id: &str, edit: F) -> Result<CustomRateSet>
    where
        F: FnOnce(&mut CustomRateSet) -> sekisan_common::Result<()>,
    {
        let mut rs = self.get(id).await?;
        edit(&mut rs)?;
        self.save(&mut rs).await?;
        Ok(rs)
    }

    /// 削除。参照している見積はそのまま残る
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.table.delete(id).await?;
        debug!("custom rate set delete {}: {}", id, deleted);
        Ok(deleted)
    }
}
