//! 見積集計エンジン
//!
//! 明細の小計・区分別小計・諸経費・見積総額を計算する。
//! 丸めは全て `f64::round`（0.5は0から遠い方へ）。非有限の入力は0として扱う。

use crate::types::{Estimate, EstimateLine, OverheadMode, RateCategory, Totals};

/// 非有限値を0に寄せる
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 円単位に丸める（範囲外はi64に飽和）
pub fn round_yen(v: f64) -> i64 {
    finite_or_zero(v).round() as i64
}

/// 明細の小計（円）
pub fn line_subtotal_yen(qty: f64, unit_price_yen: f64) -> i64 {
    round_yen(finite_or_zero(qty) * finite_or_zero(unit_price_yen))
}

pub fn line_subtotal(line: &EstimateLine) -> i64 {
    line_subtotal_yen(line.qty, line.unit_price_yen)
}

/// 諸経費（円）
pub fn overhead_yen(base_subtotal: i64, overhead: &OverheadMode) -> i64 {
    match *overhead {
        OverheadMode::Rate { rate } => round_yen(base_subtotal as f64 * finite_or_zero(rate)),
        OverheadMode::Yen { yen } => round_yen(yen),
    }
}

/// 明細群の区分別小計 (労務, 損料, 消耗品)
fn category_subtotals<'a>(lines: impl Iterator<Item = &'a EstimateLine>) -> (i64, i64, i64) {
    let mut labor = 0i64;
    let mut equipment = 0i64;
    let mut consumables = 0i64;

    for line in lines {
        let sub = line_subtotal(line);
        match line.category {
            RateCategory::Labor => labor = labor.saturating_add(sub),
            RateCategory::Equipment => equipment = equipment.saturating_add(sub),
            RateCategory::Consumables => consumables = consumables.saturating_add(sub),
        }
    }

    (labor, equipment, consumables)
}

/// 見積全体の集計（工種をまたいで区分ごとに合算）
pub fn compute_totals(estimate: &Estimate) -> Totals {
    let (labor, equipment, consumables) = category_subtotals(estimate.lines.iter());
    let base_subtotal = labor.saturating_add(equipment).saturating_add(consumables);
    let overhead = overhead_yen(base_subtotal, &estimate.overhead);

    Totals {
        labor,
        equipment,
        consumables,
        base_subtotal,
        overhead,
        grand_total: base_subtotal.saturating_add(overhead),
    }
}

/// 工種内の直接費小計（諸経費なし）
pub fn work_type_subtotal(estimate: &Estimate, work_type_id: &str) -> i64 {
    let (labor, equipment, consumables) = category_subtotals(
        estimate
            .lines
            .iter()
            .filter(|l| l.work_type_id == work_type_id),
    );
    labor.saturating_add(equipment).saturating_add(consumables)
}

/// 円表記（3桁区切り）
pub fn format_yen(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
