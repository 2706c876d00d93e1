//! 単価セット・見積の型定義
//!
//! 永続化されるJSONのフィールド名はcamelCase:
//! - RateSetData: 労務/損料/消耗品/諸経費の4つのマップ
//! - CustomRateSet: 公表単価をコピーしたユーザー編集用の単価セット
//! - Estimate: 単価セット参照・工種・明細・諸経費を持つ見積

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 数値フィールドの読み込み（null は 0 として扱う）
///
/// serde_json は非有限数を null で書き出すため、読み戻し時に 0 へ寄せる。
fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// 単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    PersonDay,
    Day,
    Can,
    Piece,
    Set,
    Time,
}

impl RateUnit {
    pub const ALL: [RateUnit; 6] = [
        RateUnit::PersonDay,
        RateUnit::Day,
        RateUnit::Can,
        RateUnit::Piece,
        RateUnit::Set,
        RateUnit::Time,
    ];

    /// 保存形式のコード
    pub fn code(&self) -> &'static str {
        match self {
            RateUnit::PersonDay => "person_day",
            RateUnit::Day => "day",
            RateUnit::Can => "can",
            RateUnit::Piece => "piece",
            RateUnit::Set => "set",
            RateUnit::Time => "time",
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            RateUnit::PersonDay => "人日",
            RateUnit::Day => "日",
            RateUnit::Can => "本",
            RateUnit::Piece => "個",
            RateUnit::Set => "式",
            RateUnit::Time => "回",
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RateUnit::ALL
            .iter()
            .copied()
            .find(|u| u.code() == s.to_lowercase() || u.label() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown unit: {}. Use person_day, day, can, piece, set, or time",
                    s
                )
            })
    }
}

/// 明細の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateCategory {
    Labor,
    Equipment,
    Consumables,
}

impl RateCategory {
    pub const ALL: [RateCategory; 3] = [
        RateCategory::Labor,
        RateCategory::Equipment,
        RateCategory::Consumables,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RateCategory::Labor => "labor",
            RateCategory::Equipment => "equipment",
            RateCategory::Consumables => "consumables",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateCategory::Labor => "労務",
            RateCategory::Equipment => "損料",
            RateCategory::Consumables => "消耗品",
        }
    }
}

impl fmt::Display for RateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "labor" | "労務" => Ok(RateCategory::Labor),
            "equipment" | "損料" => Ok(RateCategory::Equipment),
            "consumables" | "消耗品" => Ok(RateCategory::Consumables),
            _ => Err(format!(
                "Unknown category: {}. Use labor, equipment, or consumables",
                s
            )),
        }
    }
}

/// 単価項目（労務・損料・消耗品）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateItem {
    pub name: String,
    pub unit: RateUnit,
    #[serde(deserialize_with = "number_or_zero")]
    pub unit_price_yen: f64,
}

/// 諸経費項目の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverheadUnit {
    Rate,
    Yen,
}

/// 諸経費項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverheadItem {
    pub name: String,
    pub unit: OverheadUnit,
    #[serde(deserialize_with = "number_or_zero")]
    pub value: f64,
}

/// 単価セットの中身
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSetData {
    pub labor: BTreeMap<String, RateItem>,
    pub equipment: BTreeMap<String, RateItem>,
    pub consumables: BTreeMap<String, RateItem>,
    pub overhead: BTreeMap<String, OverheadItem>,
}

impl RateSetData {
    /// 区分ごとの項目マップ
    pub fn items(&self, category: RateCategory) -> &BTreeMap<String, RateItem> {
        match category {
            RateCategory::Labor => &self.labor,
            RateCategory::Equipment => &self.equipment,
            RateCategory::Consumables => &self.consumables,
        }
    }

    pub fn items_mut(&mut self, category: RateCategory) -> &mut BTreeMap<String, RateItem> {
        match category {
            RateCategory::Labor => &mut self.labor,
            RateCategory::Equipment => &mut self.equipment,
            RateCategory::Consumables => &mut self.consumables,
        }
    }

    pub fn get(&self, category: RateCategory, key: &str) -> Option<&RateItem> {
        self.items(category).get(key)
    }
}

/// 公表単価セット（読み取り専用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRateSet {
    pub id: String,
    pub label: String,
    pub data: RateSetData,
}

/// カスタム単価セット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRateSet {
    pub id: String,
    pub name: String,
    pub origin_base_set_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub data: RateSetData,
}

/// 見積が参照する単価セット
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RateSetRef {
    Base { id: String },
    Custom { id: String },
}

impl RateSetRef {
    pub fn base(id: impl Into<String>) -> Self {
        RateSetRef::Base { id: id.into() }
    }

    pub fn custom(id: impl Into<String>) -> Self {
        RateSetRef::Custom { id: id.into() }
    }

    pub fn id(&self) -> &str {
        match self {
            RateSetRef::Base { id } | RateSetRef::Custom { id } => id,
        }
    }
}

/// `base:MLIT-2026` / `custom:<uuid>` 形式
impl fmt::Display for RateSetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSetRef::Base { id } => write!(f, "base:{}", id),
            RateSetRef::Custom { id } => write!(f, "custom:{}", id),
        }
    }
}

impl FromStr for RateSetRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid rate set ref: {}. Use base:<id> or custom:<id>", s))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("Rate set id is empty: {}", s));
        }
        match kind.trim().to_lowercase().as_str() {
            "base" => Ok(RateSetRef::base(id)),
            "custom" => Ok(RateSetRef::custom(id)),
            _ => Err(format!("Invalid rate set ref: {}. Use base:<id> or custom:<id>", s)),
        }
    }
}

/// 工種
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkType {
    pub id: String,
    pub name: String,
    pub order: f64,
}

/// 見積明細
///
/// name/unit/unitPriceYen は追加時点の単価項目のスナップショット。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLine {
    pub id: String,
    pub work_type_id: String,
    pub category: RateCategory,
    pub key: String,
    pub name: String,
    pub unit: RateUnit,
    #[serde(deserialize_with = "number_or_zero")]
    pub qty: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub unit_price_yen: f64,
    #[serde(default)]
    pub is_unit_price_overridden: bool,
}

/// 諸経費の計上方法
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OverheadMode {
    /// 小計に対する率
    Rate {
        #[serde(deserialize_with = "number_or_zero")]
        rate: f64,
    },
    /// 定額（円）
    Yen {
        #[serde(deserialize_with = "number_or_zero")]
        yen: f64,
    },
}

impl Default for OverheadMode {
    fn default() -> Self {
        OverheadMode::Rate { rate: 0.0 }
    }
}

/// 諸経費モードの種別（値を持たない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverheadKind {
    Rate,
    Yen,
}

impl OverheadMode {
    pub fn kind(&self) -> OverheadKind {
        match self {
            OverheadMode::Rate { .. } => OverheadKind::Rate,
            OverheadMode::Yen { .. } => OverheadKind::Yen,
        }
    }

    /// 指定モードの初期値（率0 / 0円）
    pub fn reset(kind: OverheadKind) -> Self {
        match kind {
            OverheadKind::Rate => OverheadMode::Rate { rate: 0.0 },
            OverheadKind::Yen => OverheadMode::Yen { yen: 0.0 },
        }
    }
}

impl FromStr for OverheadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rate" | "率" => Ok(OverheadKind::Rate),
            "yen" | "定額" => Ok(OverheadKind::Yen),
            _ => Err(format!("Unknown overhead mode: {}. Use rate or yen", s)),
        }
    }
}

/// 見積
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub rate_set_ref: RateSetRef,
    pub work_types: Vec<WorkType>,
    pub lines: Vec<EstimateLine>,
    pub overhead: OverheadMode,
}

/// 集計結果（円）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub labor: i64,
    pub equipment: i64,
    pub consumables: i64,
    pub base_subtotal: i64,
    pub overhead: i64,
    pub grand_total: i64,
}
