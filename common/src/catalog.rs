//! 公表単価カタログ
//!
//! 起動時に静的データから組み立てる読み取り専用の単価セット一覧。
//! 取り出しは常にディープコピーを返し、カタログ本体は共有されない。

use crate::error::{Error, Result};
use crate::types::{BaseRateSet, OverheadItem, OverheadUnit, RateItem, RateSetData, RateUnit};
use serde::{Deserialize, Serialize};

/// 2026年版の既定単価セットID
pub const DEFAULT_BASE_SET_ID: &str = "MLIT-2026";

const YEAR: u32 = 2026;

/// 都道府県（PREF-01 〜 PREF-47 の順）
const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

/// 一覧表示用のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

/// 公表単価カタログ
#[derive(Debug, Clone, Default)]
pub struct RateCatalog {
    entries: Vec<BaseRateSet>,
}

impl RateCatalog {
    /// 任意のエントリから構築（並び順は保持）
    pub fn new(entries: Vec<BaseRateSet>) -> Self {
        Self { entries }
    }

    /// 組み込みの2026年版カタログ
    pub fn builtin() -> &'static RateCatalog {
        lazy_static::lazy_static! {
            static ref BUILTIN: RateCatalog = RateCatalog::builtin_2026();
        }
        &BUILTIN
    }

    /// 国交省 + 47都道府県。全エントリが雛形のコピー
    pub fn builtin_2026() -> Self {
        let template = master_template();
        let mut entries = Vec::with_capacity(PREFECTURES.len() + 1);

        entries.push(BaseRateSet {
            id: format!("MLIT-{}", YEAR),
            label: format!("国交省（{}）", YEAR),
            data: template.clone(),
        });

        for (i, pref) in PREFECTURES.iter().enumerate() {
            entries.push(BaseRateSet {
                id: format!("PREF-{:02}-{}", i + 1, YEAR),
                label: format!("{}（{}）", pref, YEAR),
                data: template.clone(),
            });
        }

        Self { entries }
    }

    /// IDで取得（ディープコピー）
    pub fn get(&self, id: &str) -> Result<BaseRateSet> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("公表単価セット", id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// 静的データの順序のまま一覧を返す
    pub fn list(&self) -> Vec<CatalogEntry> {
        self.entries
            .iter()
            .map(|e| CatalogEntry {
                id: e.id.clone(),
                label: e.label.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 雛形データ
fn master_template() -> RateSetData {
    let mut data = RateSetData::default();

    data.labor.insert(
        "SURVEYOR".into(),
        RateItem {
            name: "測量士".into(),
            unit: RateUnit::PersonDay,
            unit_price_yen: 28000.0,
        },
    );

    data.equipment.insert(
        "TS".into(),
        RateItem {
            name: "トータルステーション".into(),
            unit: RateUnit::Day,
            unit_price_yen: 4500.0,
        },
    );

    data.consumables.insert(
        "SPRAY".into(),
        RateItem {
            name: "マーキングスプレー".into(),
            unit: RateUnit::Can,
            unit_price_yen: 600.0,
        },
    );

    for (key, name, value) in [
        ("overhead.rate", "現場管理費率（例）", 0.25),
        ("general_admin.rate", "一般管理費率（例）", 0.1),
        ("tax.rate", "消費税率（例）", 0.1),
    ] {
        data.overhead.insert(
            key.into(),
            OverheadItem {
                name: name.into(),
                unit: OverheadUnit::Rate,
                value,
            },
        );
    }

    data
}
