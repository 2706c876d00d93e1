//! メモリ上のテーブル

use super::{sort_by_recency, Record, RecordTable};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub struct MemoryTable<R> {
    records: RwLock<HashMap<String, R>>,
}

impl<R: Record> MemoryTable<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl<R: Record> Default for MemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordTable<R> for MemoryTable<R> {
    async fn get(&self, id: &str) -> Result<Option<R>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, record: &R) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn list_recent(&self) -> Result<Vec<R>> {
        let mut records: Vec<R> = self.records.read().await.values().cloned().collect();
        sort_by_recency(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sekisan_common::{Estimate, RateSetRef};

    fn estimate(id: &str, updated_at: &str) -> Estimate {
        let mut est = Estimate::new(id, updated_at, RateSetRef::base("MLIT-2026"), "w0");
        est.updated_at = updated_at.into();
        est
    }

    #[tokio::test]
    async fn test_put_replaces_and_lists_recent() {
        let table = MemoryTable::<Estimate>::new();
        table.put(&estimate("a", "2026-04-01T00:00:00.000Z")).await.unwrap();
        table.put(&estimate("b", "2026-04-02T00:00:00.000Z")).await.unwrap();
        table.put(&estimate("c", "2026-04-02T00:00:00.000Z")).await.unwrap();
        assert_eq!(table.len().await, 3);

        let ids: Vec<_> = table.list_recent().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        table.put(&estimate("a", "2026-04-03T00:00:00.000Z")).await.unwrap();
        assert_eq!(table.len().await, 3);
        assert_eq!(table.list_recent().await.unwrap()[0].id, "a");

        assert!(table.delete("a").await.unwrap());
        assert!(table.get("a").await.unwrap().is_none());
    }
}
