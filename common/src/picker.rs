//! 工種テンプレートと単価項目の選択候補

use crate::types::{RateCategory, RateItem, RateSetData};

/// よく使う工種
pub const WORK_TYPE_TEMPLATES: [&str; 13] = [
    "基準点測量",
    "水準測量",
    "路線測量",
    "現地測量",
    "用地測量",
    "出来形管理",
    "丁張",
    "墨出し",
    "境界立会",
    "UAV写真測量",
    "点群処理/解析",
    "図化/編集",
    "成果作成",
];

/// 大文字小文字を無視した部分一致（空クエリは常に一致）
pub fn includes_loose(hay: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    hay.to_lowercase().contains(&needle.to_lowercase())
}

/// クエリに一致する工種テンプレート（名前順）
pub fn filter_work_type_templates(query: &str) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = WORK_TYPE_TEMPLATES
        .iter()
        .copied()
        .filter(|name| includes_loose(name, query))
        .collect();
    names.sort();
    names
}

/// 単価項目の候補（名称順、名称またはコードで絞り込み）
pub fn filter_rate_items<'a>(
    rates: &'a RateSetData,
    category: RateCategory,
    query: &str,
) -> Vec<(&'a str, &'a RateItem)> {
    let mut entries: Vec<(&str, &RateItem)> = rates
        .items(category)
        .iter()
        .filter(|(key, item)| includes_loose(&item.name, query) || includes_loose(key, query))
        .map(|(key, item)| (key.as_str(), item))
        .collect();
    entries.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
    entries
}
