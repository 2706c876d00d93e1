//! 見積の編集操作
//!
//! 工種・明細・諸経費の追加/変更/削除。IDと時刻は呼び出し側が渡す。

use crate::error::{Error, Result};
use crate::refresh::{refresh_with_report, RefreshReport};
use crate::types::{
    Estimate, EstimateLine, OverheadKind, OverheadMode, RateCategory, RateSetData, RateSetRef,
    WorkType,
};

/// 既定の工種名
pub const DEFAULT_WORK_TYPE_NAME: &str = "共通";

/// ISO時刻の日付部分（YYYY-MM-DD）
pub(crate) fn date_part(now: &str) -> &str {
    now.get(..10).unwrap_or(now)
}

impl Estimate {
    /// 新規見積（既定工種1件、明細なし、諸経費は率0）
    pub fn new(
        id: impl Into<String>,
        now: &str,
        rate_set_ref: RateSetRef,
        default_work_type_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: Self::default_name(now),
            created_at: now.to_string(),
            updated_at: now.to_string(),
            rate_set_ref,
            work_types: vec![WorkType {
                id: default_work_type_id.into(),
                name: DEFAULT_WORK_TYPE_NAME.to_string(),
                order: 0.0,
            }],
            lines: Vec::new(),
            overhead: OverheadMode::default(),
        }
    }

    pub fn default_name(now: &str) -> String {
        format!("見積 {}", date_part(now))
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn work_type(&self, id: &str) -> Option<&WorkType> {
        self.work_types.iter().find(|w| w.id == id)
    }

    /// order昇順（同値は登録順）
    pub fn sorted_work_types(&self) -> Vec<&WorkType> {
        let mut sorted: Vec<&WorkType> = self.work_types.iter().collect();
        sorted.sort_by(|a, b| a.order.total_cmp(&b.order));
        sorted
    }

    /// 次に追加する工種のorder（既存最大+1、空なら0）
    pub fn next_work_type_order(&self) -> f64 {
        self.work_types
            .iter()
            .map(|w| w.order)
            .filter(|o| o.is_finite())
            .fold(-1.0, f64::max)
            + 1.0
    }

    pub fn add_work_type(&mut self, id: impl Into<String>, name: &str) -> Result<&WorkType> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("工種名が空です".into()));
        }

        let order = self.next_work_type_order();
        self.work_types.push(WorkType {
            id: id.into(),
            name: name.to_string(),
            order,
        });
        Ok(&self.work_types[self.work_types.len() - 1])
    }

    /// 工種を削除し、その工種の明細も削除する。削除した明細数を返す
    pub fn delete_work_type(&mut self, work_type_id: &str) -> Result<usize> {
        if self.work_type(work_type_id).is_none() {
            return Err(Error::not_found("工種", work_type_id));
        }

        self.work_types.retain(|w| w.id != work_type_id);
        let before = self.lines.len();
        self.lines.retain(|l| l.work_type_id != work_type_id);
        Ok(before - self.lines.len())
    }

    /// 単価セットの項目をスナップショットして明細を追加
    pub fn add_line(
        &mut self,
        id: impl Into<String>,
        work_type_id: &str,
        category: RateCategory,
        key: &str,
        qty: f64,
        rates: &RateSetData,
    ) -> Result<&EstimateLine> {
        if self.work_type(work_type_id).is_none() {
            return Err(Error::not_found("工種", work_type_id));
        }
        let item = rates
            .get(category, key)
            .ok_or_else(|| Error::not_found("単価項目", format!("{}/{}", category.code(), key)))?;

        self.lines.push(EstimateLine {
            id: id.into(),
            work_type_id: work_type_id.to_string(),
            category,
            key: key.to_string(),
            name: item.name.clone(),
            unit: item.unit,
            qty,
            unit_price_yen: item.unit_price_yen,
            is_unit_price_overridden: false,
        });
        Ok(&self.lines[self.lines.len() - 1])
    }

    pub fn line(&self, line_id: &str) -> Option<&EstimateLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    fn line_mut(&mut self, line_id: &str) -> Result<&mut EstimateLine> {
        self.lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| Error::not_found("明細", line_id))
    }

    pub fn set_line_qty(&mut self, line_id: &str, qty: f64) -> Result<()> {
        self.line_mut(line_id)?.qty = qty;
        Ok(())
    }

    /// 単価を直接編集する。以後この行は単価セット切替で更新されない
    pub fn override_line_price(&mut self, line_id: &str, unit_price_yen: f64) -> Result<()> {
        let line = self.line_mut(line_id)?;
        line.unit_price_yen = unit_price_yen;
        line.is_unit_price_overridden = true;
        Ok(())
    }

    pub fn delete_line(&mut self, line_id: &str) -> Result<EstimateLine> {
        let pos = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| Error::not_found("明細", line_id))?;
        Ok(self.lines.remove(pos))
    }

    /// 工種・区分で絞った明細
    pub fn lines_in<'a>(
        &'a self,
        work_type_id: &'a str,
        category: RateCategory,
    ) -> impl Iterator<Item = &'a EstimateLine> + 'a {
        self.lines
            .iter()
            .filter(move |l| l.work_type_id == work_type_id && l.category == category)
    }

    /// 計上方法の切替。別モードに切り替えた場合は値を0に戻す
    pub fn set_overhead_mode(&mut self, kind: OverheadKind) {
        if self.overhead.kind() != kind {
            self.overhead = OverheadMode::reset(kind);
        }
    }

    pub fn set_overhead_rate(&mut self, rate: f64) {
        self.overhead = OverheadMode::Rate { rate };
    }

    pub fn set_overhead_yen(&mut self, yen: f64) {
        self.overhead = OverheadMode::Yen { yen };
    }

    /// 参照先の切替と明細単価の更新を同時に行った見積を返す
    ///
    /// `rates` は `rate_set_ref` を解決したデータであること。
    pub fn switch_rate_set(
        &self,
        rate_set_ref: RateSetRef,
        rates: &RateSetData,
    ) -> (Estimate, RefreshReport) {
        let switched = Estimate {
            rate_set_ref,
            ..self.clone()
        };
        refresh_with_report(&switched, rates)
    }
}
