//! 保存データの形式更新
//!
//! 工種/明細/諸経費が追加される前に保存された見積へ既定値を補う。
//! 既に揃っているレコードには何もしないので、何度実行しても結果は同じ。

use crate::estimate::DEFAULT_WORK_TYPE_NAME;
use serde_json::{json, Value};

/// 見積レコード1件を更新。変更があればtrue
///
/// `new_id` は既定工種のID生成に使う（工種を補うときだけ呼ばれる）。
pub fn upgrade_estimate_record<F>(record: &mut Value, new_id: F) -> bool
where
    F: FnOnce() -> String,
{
    let Some(obj) = record.as_object_mut() else {
        return false;
    };

    let mut changed = false;

    if is_missing(obj.get("workTypes")) {
        obj.insert(
            "workTypes".into(),
            json!([{ "id": new_id(), "name": DEFAULT_WORK_TYPE_NAME, "order": 0 }]),
        );
        changed = true;
    }

    if is_missing(obj.get("lines")) {
        obj.insert("lines".into(), json!([]));
        changed = true;
    }

    if is_missing(obj.get("overhead")) {
        obj.insert("overhead".into(), json!({ "mode": "rate", "rate": 0 }));
        changed = true;
    }

    changed
}

fn is_missing(v: Option<&Value>) -> bool {
    matches!(v, None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Estimate, OverheadMode};

    fn v1_record() -> Value {
        json!({
            "id": "e1",
            "name": "見積 2025-12-01",
            "createdAt": "2025-12-01T00:00:00.000Z",
            "updatedAt": "2025-12-01T00:00:00.000Z",
            "rateSetRef": { "type": "base", "id": "MLIT-2026" }
        })
    }

    #[test]
    fn test_upgrade_injects_defaults() {
        let mut record = v1_record();
        assert!(upgrade_estimate_record(&mut record, || "w-new".to_string()));

        let est: Estimate = serde_json::from_value(record).expect("デシリアライズ失敗");
        assert_eq!(est.work_types.len(), 1);
        assert_eq!(est.work_types[0].id, "w-new");
        assert_eq!(est.work_types[0].name, "共通");
        assert_eq!(est.work_types[0].order, 0.0);
        assert!(est.lines.is_empty());
        assert_eq!(est.overhead, OverheadMode::Rate { rate: 0.0 });
    }

    #[test]
    fn test_upgrade_is_idempotent() {
        let mut record = v1_record();
        upgrade_estimate_record(&mut record, || "w1".to_string());
        let once = record.clone();

        let changed = upgrade_estimate_record(&mut record, || panic!("工種は補わない"));
        assert!(!changed);
        assert_eq!(record, once);
    }

    #[test]
    fn test_upgrade_keeps_existing_fields() {
        let mut record = v1_record();
        record["overhead"] = json!({ "mode": "yen", "yen": 3000 });
        record["lines"] = Value::Null;

        assert!(upgrade_estimate_record(&mut record, || "w1".to_string()));
        assert_eq!(record["overhead"]["mode"], "yen");
        assert_eq!(record["lines"], json!([]));
    }

    #[test]
    fn test_upgrade_ignores_non_object() {
        let mut record = json!("broken");
        assert!(!upgrade_estimate_record(&mut record, || "w1".to_string()));
    }
}
