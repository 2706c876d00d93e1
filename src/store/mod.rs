//! 永続化ストア
//!
//! カスタム単価セットと見積の2種類のレコードを、IDをキーに保存する。
//! 実装はメモリ上のマップ（テスト用）とJSONファイルの2つ。

mod json_file;
mod memory;

pub use json_file::{JsonFileStore, DB_FILE_NAME, STORE_VERSION};
pub use memory::MemoryTable;

use crate::error::Result;
use async_trait::async_trait;
use sekisan_common::{CustomRateSet, Estimate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// 保存対象のレコード
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// ログ・エラー表示用の種別名
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn updated_at(&self) -> &str;
}

impl Record for CustomRateSet {
    const KIND: &'static str = "カスタム単価セット";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> &str {
        &self.updated_at
    }
}

impl Record for Estimate {
    const KIND: &'static str = "見積";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> &str {
        &self.updated_at
    }
}

/// レコード1種類分のテーブル
#[async_trait]
pub trait RecordTable<R: Record>: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<R>>;

    /// 追加または置き換え（updatedAtは呼び出し側で設定済み）
    async fn put(&self, record: &R) -> Result<()>;

    /// 削除。存在しなければfalse
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 更新日時の新しい順
    async fn list_recent(&self) -> Result<Vec<R>>;
}

/// updatedAt降順、同値はID順
pub fn sort_by_recency<R: Record>(records: &mut [R]) {
    records.sort_by(|a, b| {
        b.updated_at()
            .cmp(a.updated_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// リポジトリに渡すストアのハンドル
#[derive(Clone)]
pub struct Storage {
    pub rate_sets: Arc<dyn RecordTable<CustomRateSet>>,
    pub estimates: Arc<dyn RecordTable<Estimate>>,
}

impl Storage {
    /// メモリ上のストア
    pub fn in_memory() -> Self {
        Self {
            rate_sets: Arc::new(MemoryTable::<CustomRateSet>::new()),
            estimates: Arc::new(MemoryTable::<Estimate>::new()),
        }
    }

    /// データフォルダのJSONファイルを開く（旧形式は更新してから使う）
    pub async fn open_json(data_dir: &Path) -> Result<Self> {
        let store = Arc::new(JsonFileStore::open(data_dir).await?);
        Ok(Self {
            rate_sets: store.clone(),
            estimates: store,
        })
    }
}
