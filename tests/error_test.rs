//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sekisan::{EstimateRepository, RateSetRepository, SekisanError, Storage};
use sekisan_common::{Error, RateCatalog, RateCategory, RateSetRef};

/// 存在しない見積
#[tokio::test]
async fn test_get_missing_estimate() {
    let storage = Storage::in_memory();
    let estimates = EstimateRepository::new(&storage);

    let err = estimates.get("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, SekisanError::Common(Error::NotFound { kind: "見積", .. })));
    assert!(err.to_string().contains("nope"));
}

/// 単価セットに無い項目は明細に追加できない
#[tokio::test]
async fn test_add_line_unknown_key() {
    let storage = Storage::in_memory();
    let rate_sets = RateSetRepository::new(RateCatalog::builtin(), &storage);
    let estimates = EstimateRepository::new(&storage);

    let est = estimates.create(RateSetRef::base("MLIT-2026")).await.unwrap();
    let wt = est.work_types[0].id.clone();

    let err = estimates
        .add_line(&rate_sets, &est.id, &wt, RateCategory::Labor, "TS", 1.0)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = estimates
        .add_line(&rate_sets, &est.id, "no-such-wt", RateCategory::Labor, "SURVEYOR", 1.0)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert!(estimates.get(&est.id).await.unwrap().lines.is_empty());
}

/// 空の工種名・項目コードは入力エラー
#[tokio::test]
async fn test_invalid_input() {
    let storage = Storage::in_memory();
    let rate_sets = RateSetRepository::new(RateCatalog::builtin(), &storage);
    let estimates = EstimateRepository::new(&storage);

    let est = estimates.create(RateSetRef::base("MLIT-2026")).await.unwrap();
    let err = estimates
        .update(&est.id, |est| est.add_work_type("w1", "   ").map(|_| ()))
        .await
        .unwrap_err();
    assert!(matches!(err, SekisanError::Common(Error::InvalidInput(_))));

    let rs = rate_sets.create_from_base("MLIT-2026", "c").await.unwrap();
    let err = rate_sets
        .update(&rs.id, |rs| {
            rs.data
                .add_item(RateCategory::Labor, " ", "名称", sekisan_common::RateUnit::PersonDay, 1.0)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SekisanError::Common(Error::InvalidInput(_))));
}

/// エラーメッセージ
#[test]
fn test_error_display() {
    let err: SekisanError = Error::StaleReference("c1".into()).into();
    assert!(err.is_stale_reference());
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("c1"));

    let err = SekisanError::Storage("disk full".into());
    assert_eq!(err.to_string(), "保存データの読み書きに失敗: disk full");

    let err = SekisanError::Config("ホームディレクトリが見つかりません".into());
    assert!(err.to_string().starts_with("設定エラー"));
}
