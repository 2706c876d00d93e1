//! 内訳・集計のテキスト表示

use sekisan_common::calc::line_subtotal;
use sekisan_common::{
    compute_totals, format_yen, work_type_subtotal, Estimate, OverheadMode, RateCategory,
    RefreshReport, Totals,
};
use std::fmt::Write;

/// 集計欄
pub fn render_totals(totals: &Totals) -> String {
    let rows = [
        ("労務小計", totals.labor),
        ("損料小計", totals.equipment),
        ("消耗品小計", totals.consumables),
        ("小計", totals.base_subtotal),
        ("諸経費", totals.overhead),
        ("見積総額", totals.grand_total),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<10} {:>14} 円", label, format_yen(value));
    }
    out
}

/// 率をパーセント表記に（小数点以下4桁で丸め、末尾の0は省く）
fn format_percent(rate: f64) -> String {
    let text = format!("{:.4}", rate * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}

pub fn describe_overhead(overhead: &OverheadMode) -> String {
    match *overhead {
        OverheadMode::Rate { rate } => format!("率 {}（{}%）", rate, format_percent(rate)),
        OverheadMode::Yen { yen } => format!("定額 {} 円", yen),
    }
}

/// 工種ごとの内訳と集計
pub fn render_estimate(est: &Estimate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "見積: {}", est.name);
    let _ = writeln!(out, "  ID: {}", est.id);
    let _ = writeln!(out, "  単価セット: {}", est.rate_set_ref);
    let _ = writeln!(out, "  更新: {}", est.updated_at);

    for wt in est.sorted_work_types() {
        let _ = writeln!(
            out,
            "\n■ {} [{}]  小計 {} 円",
            wt.name,
            wt.id,
            format_yen(work_type_subtotal(est, &wt.id))
        );

        for category in RateCategory::ALL {
            let lines: Vec<_> = est.lines_in(&wt.id, category).collect();
            if lines.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {}", category.label());
            for line in lines {
                let _ = writeln!(
                    out,
                    "    {} ({}) {} {} × {} 円 = {} 円{}",
                    line.name,
                    line.key,
                    line.qty,
                    line.unit.label(),
                    line.unit_price_yen,
                    format_yen(line_subtotal(line)),
                    if line.is_unit_price_overridden { " [上書き中]" } else { "" }
                );
                let _ = writeln!(out, "      明細ID: {}", line.id);
            }
        }
    }

    let _ = writeln!(out, "\n諸経費: {}", describe_overhead(&est.overhead));
    out.push_str(&render_totals(&compute_totals(est)));
    out
}

/// 単価セット切替のステータス
pub fn describe_refresh(report: &RefreshReport) -> String {
    let mut msg = format!("単価を更新: {}行", report.updated);
    if report.pinned > 0 {
        msg.push_str(&format!(" / 上書き行は保持: {}行", report.pinned));
    }
    if report.unmatched > 0 {
        msg.push_str(&format!(
            " / 新しい単価セットに無い項目: {}行（単価は以前のまま）",
            report.unmatched
        ));
    }
    msg
}
