//! 単価セット切替時の明細単価更新
//!
//! 上書きしていない明細の名称・単位・単価を新しい単価セットに寄せる。
//! 上書き行と、新しいセットにキーが無い行はそのまま残す。

use crate::types::{Estimate, EstimateLine, RateSetData};

/// 明細1行の更新結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRefresh {
    /// 単価セットの値で更新
    Updated,
    /// 単価上書き中のため対象外
    Pinned,
    /// 新しい単価セットにキーが無い
    Unmatched,
}

/// 更新件数のまとめ（表示用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: usize,
    pub pinned: usize,
    pub unmatched: usize,
}

fn refresh_line(line: &EstimateLine, rates: &RateSetData) -> (EstimateLine, LineRefresh) {
    if line.is_unit_price_overridden {
        return (line.clone(), LineRefresh::Pinned);
    }

    match rates.get(line.category, &line.key) {
        Some(src) => (
            EstimateLine {
                name: src.name.clone(),
                unit: src.unit,
                unit_price_yen: src.unit_price_yen,
                ..line.clone()
            },
            LineRefresh::Updated,
        ),
        None => (line.clone(), LineRefresh::Unmatched),
    }
}

/// 明細単価を単価セットに寄せた新しい見積を返す（入力は変更しない）
pub fn refresh_line_prices(estimate: &Estimate, rates: &RateSetData) -> Estimate {
    refresh_with_report(estimate, rates).0
}

/// 更新後の見積と件数をまとめて返す
pub fn refresh_with_report(estimate: &Estimate, rates: &RateSetData) -> (Estimate, RefreshReport) {
    let mut report = RefreshReport::default();
    let lines = estimate
        .lines
        .iter()
        .map(|line| {
            let (next, outcome) = refresh_line(line, rates);
            match outcome {
                LineRefresh::Updated => report.updated += 1,
                LineRefresh::Pinned => report.pinned += 1,
                LineRefresh::Unmatched => report.unmatched += 1,
            }
            next
        })
        .collect();

    (
        Estimate {
            lines,
            ..estimate.clone()
        },
        report,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::compute_totals;
    use crate::catalog::RateCatalog;
    use crate::types::{OverheadMode, RateCategory, RateItem, RateSetRef, RateUnit, WorkType};

    fn surveyor_line(price: f64, overridden: bool) -> EstimateLine {
        EstimateLine {
            id: "l1".to_string(),
            work_type_id: "w1".to_string(),
            category: RateCategory::Labor,
            key: "SURVEYOR".to_string(),
            name: "測量士".to_string(),
            unit: RateUnit::PersonDay,
            qty: 2.0,
            unit_price_yen: price,
            is_unit_price_overridden: overridden,
        }
    }

    fn estimate(lines: Vec<EstimateLine>) -> Estimate {
        Estimate {
            id: "e1".to_string(),
            name: "見積".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            rate_set_ref: RateSetRef::base("MLIT-2026"),
            work_types: vec![WorkType {
                id: "w1".to_string(),
                name: "共通".to_string(),
                order: 0.0,
            }],
            lines,
            overhead: OverheadMode::Rate { rate: 0.25 },
        }
    }

    fn rates_with_surveyor(price: f64) -> RateSetData {
        let mut data = RateCatalog::builtin().get("MLIT-2026").unwrap().data;
        data.labor.insert(
            "SURVEYOR".to_string(),
            RateItem {
                name: "測量士（改定）".to_string(),
                unit: RateUnit::PersonDay,
                unit_price_yen: price,
            },
        );
        data
    }

    #[test]
    fn test_refresh_updates_snapshot_and_keeps_qty() {
        let est = estimate(vec![surveyor_line(28000.0, false)]);
        let (next, report) = refresh_with_report(&est, &rates_with_surveyor(30000.0));

        let line = &next.lines[0];
        assert_eq!(line.unit_price_yen, 30000.0);
        assert_eq!(line.name, "測量士（改定）");
        assert_eq!(line.qty, 2.0);
        assert!(!line.is_unit_price_overridden);
        assert_eq!(report, RefreshReport { updated: 1, pinned: 0, unmatched: 0 });

        assert_eq!(compute_totals(&next).grand_total, 75000);
        // 入力は変更されない
        assert_eq!(est.lines[0].unit_price_yen, 28000.0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let est = estimate(vec![
            surveyor_line(28000.0, false),
            EstimateLine {
                id: "l2".to_string(),
                category: RateCategory::Equipment,
                key: "TS".to_string(),
                name: "古い名前".to_string(),
                unit: RateUnit::Set,
                unit_price_yen: 1.0,
                ..surveyor_line(0.0, false)
            },
        ]);
        let rates = rates_with_surveyor(31000.0);

        let once = refresh_line_prices(&est, &rates);
        let twice = refresh_line_prices(&once, &rates);
        assert_eq!(once, twice);
        assert_eq!(once.lines[1].unit, RateUnit::Day);
        assert_eq!(once.lines[1].unit_price_yen, 4500.0);
    }

    #[test]
    fn test_overridden_line_is_untouched() {
        let pinned = surveyor_line(99999.0, true);
        let est = estimate(vec![pinned.clone()]);
        let (next, report) = refresh_with_report(&est, &rates_with_surveyor(30000.0));

        assert_eq!(next.lines[0], pinned);
        assert_eq!(report.pinned, 1);

        // キーが無いセットでも同じ
        let next = refresh_line_prices(&est, &RateSetData::default());
        assert_eq!(next.lines[0], pinned);
    }

    #[test]
    fn test_missing_key_keeps_stale_line() {
        let mut rates = rates_with_surveyor(30000.0);
        rates.labor.remove("SURVEYOR");

        let est = estimate(vec![surveyor_line(28000.0, false)]);
        let (next, report) = refresh_with_report(&est, &rates);

        assert_eq!(next.lines.len(), 1);
        assert_eq!(next.lines[0], est.lines[0]);
        assert_eq!(report.unmatched, 1);
    }

    #[test]
    fn test_key_is_looked_up_in_own_category() {
        let mut rates = RateSetData::default();
        rates.equipment.insert(
            "SURVEYOR".to_string(),
            RateItem {
                name: "別区分".to_string(),
                unit: RateUnit::Day,
                unit_price_yen: 1.0,
            },
        );

        let est = estimate(vec![surveyor_line(28000.0, false)]);
        let next = refresh_line_prices(&est, &rates);
        assert_eq!(next.lines[0].unit_price_yen, 28000.0);
    }

    #[test]
    fn test_line_order_preserved() {
        let mut lines = Vec::new();
        for i in 0..5 {
            lines.push(EstimateLine {
                id: format!("l{}", i),
                ..surveyor_line(28000.0, i % 2 == 0)
            });
        }
        let est = estimate(lines);
        let next = refresh_line_prices(&est, &rates_with_surveyor(1.0));

        let ids: Vec<_> = next.lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l0", "l1", "l2", "l3", "l4"]);
    }
}
