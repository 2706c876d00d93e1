//! JSONファイルのストア
//!
//! データフォルダの `sekisan-db.json` 1ファイルに両テーブルを保存する。
//! 書き込みのたびにファイル全体を一時ファイル経由で置き換える。

use super::{sort_by_recency, Record, RecordTable};
use crate::error::{Result, SekisanError};
use async_trait::async_trait;
use log::{debug, info};
use sekisan_common::{upgrade_estimate_record, CustomRateSet, Estimate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DB_FILE_NAME: &str = "sekisan-db.json";

/// 保存形式のバージョン
///
/// - 1: 見積は単価セット参照のみ
/// - 2: 見積に工種/明細/諸経費を追加
pub const STORE_VERSION: u32 = 2;

/// ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    custom_rate_sets: BTreeMap<String, CustomRateSet>,
    #[serde(default)]
    estimates: BTreeMap<String, Estimate>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            custom_rate_sets: BTreeMap::new(),
            estimates: BTreeMap::new(),
        }
    }
}

type Pick<R> = fn(&StoreDocument) -> &BTreeMap<String, R>;
type PickMut<R> = fn(&mut StoreDocument) -> &mut BTreeMap<String, R>;

pub struct JsonFileStore {
    path: PathBuf,
    doc: RwLock<StoreDocument>,
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> SekisanError {
    SekisanError::Storage(format!("{}: {}", path.display(), e))
}

/// 旧形式のドキュメントを現行形式に更新。変更があればtrue
fn upgrade_document(value: &mut Value) -> Result<bool> {
    let version = value.get("version").and_then(Value::as_u64).unwrap_or(1);
    if version > STORE_VERSION as u64 {
        return Err(SekisanError::Storage(format!(
            "未対応の保存形式です（version {}）",
            version
        )));
    }
    if version == STORE_VERSION as u64 {
        return Ok(false);
    }

    if let Some(obj) = value.as_object_mut() {
        if let Some(Value::Object(estimates)) = obj.get_mut("estimates") {
            for record in estimates.values_mut() {
                upgrade_estimate_record(record, || Uuid::new_v4().to_string());
            }
        }
        obj.insert("version".into(), Value::from(STORE_VERSION));
    }
    Ok(true)
}

impl JsonFileStore {
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE_NAME)
    }

    /// ストアを開く。ファイルが無ければ空で始める
    pub async fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .await
            .map_err(|e| storage_error(data_dir, e))?;

        let path = Self::db_path(data_dir);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| storage_error(&path, e))?;

        if !exists {
            debug!("new store: {}", path.display());
            return Ok(Self {
                path,
                doc: RwLock::new(StoreDocument::default()),
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| storage_error(&path, e))?;
        let mut value: Value = serde_json::from_str(&content).map_err(|e| storage_error(&path, e))?;

        let upgraded = upgrade_document(&mut value)?;
        let doc: StoreDocument = serde_json::from_value(value).map_err(|e| storage_error(&path, e))?;

        let store = Self {
            path,
            doc: RwLock::new(doc),
        };

        if upgraded {
            info!(
                "保存形式を version {} に更新: {}",
                STORE_VERSION,
                store.path.display()
            );
            let doc = store.doc.read().await.clone();
            store.write_file(&doc).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self, doc: &StoreDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).map_err(|e| storage_error(&self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }

    async fn get_in<R: Record>(&self, id: &str, pick: Pick<R>) -> Option<R> {
        pick(&*self.doc.read().await).get(id).cloned()
    }

    /// 変更をファイルに書けた場合だけメモリ上の状態を差し替える
    async fn modify<R, F, T>(&self, pick_mut: PickMut<R>, f: F) -> Result<T>
    where
        R: Record,
        F: FnOnce(&mut BTreeMap<String, R>) -> T,
    {
        let mut guard = self.doc.write().await;
        let mut next = guard.clone();
        let out = f(pick_mut(&mut next));
        self.write_file(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn list_in<R: Record>(&self, pick: Pick<R>) -> Vec<R> {
        let mut records: Vec<R> = pick(&*self.doc.read().await).values().cloned().collect();
        sort_by_recency(&mut records);
        records
    }
}

fn rate_sets(doc: &StoreDocument) -> &BTreeMap<String, CustomRateSet> {
    &doc.custom_rate_sets
}

fn rate_sets_mut(doc: &mut StoreDocument) -> &mut BTreeMap<String, CustomRateSet> {
    &mut doc.custom_rate_sets
}

fn estimates(doc: &StoreDocument) -> &BTreeMap<String, Estimate> {
    &doc.estimates
}

fn estimates_mut(doc: &mut StoreDocument) -> &mut BTreeMap<String, Estimate> {
    &mut doc.estimates
}

#[async_trait]
impl RecordTable<CustomRateSet> for JsonFileStore {
    async fn get(&self, id: &str) -> Result<Option<CustomRateSet>> {
        Ok(self.get_in(id, rate_sets).await)
    }

    async fn put(&self, record: &CustomRateSet) -> Result<()> {
        let record = record.clone();
        self.modify(rate_sets_mut, move |t| {
            t.insert(record.id.clone(), record);
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.modify(rate_sets_mut, |t| t.remove(id).is_some()).await
    }

    async fn list_recent(&self) -> Result<Vec<CustomRateSet>> {
        Ok(self.list_in(rate_sets).await)
    }
}

#[async_trait]
impl RecordTable<Estimate> for JsonFileStore {
    async fn get(&self, id: &str) -> Result<Option<Estimate>> {
        Ok(self.get_in(id, estimates).await)
    }

    async fn put(&self, record: &Estimate) -> Result<()> {
        let record = record.clone();
        self.modify(estimates_mut, move |t| {
            t.insert(record.id.clone(), record);
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.modify(estimates_mut, |t| t.remove(id).is_some()).await
    }

    async fn list_recent(&self) -> Result<Vec<Estimate>> {
        Ok(self.list_in(estimates).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upgrade_document_v1() {
        let mut value = json!({
            "estimates": {
                "e1": {
                    "id": "e1",
                    "name": "古い見積",
                    "createdAt": "2025-12-01T00:00:00.000Z",
                    "updatedAt": "2025-12-01T00:00:00.000Z",
                    "rateSetRef": { "type": "base", "id": "MLIT-2026" }
                }
            }
        });

        assert!(upgrade_document(&mut value).unwrap());
        assert_eq!(value["version"], 2);
        assert_eq!(value["estimates"]["e1"]["workTypes"][0]["name"], "共通");

        // 2回目は何もしない
        let once = value.clone();
        assert!(!upgrade_document(&mut value).unwrap());
        assert_eq!(value, once);
    }

    #[test]
    fn test_upgrade_document_rejects_newer_version() {
        let mut value = json!({ "version": 99 });
        assert!(matches!(upgrade_document(&mut value), Err(SekisanError::Storage(_))));
    }
}
