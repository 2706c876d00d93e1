//! カスタム単価セットの作成と編集

use crate::catalog::RateCatalog;
use crate::error::{Error, Result};
use crate::estimate::date_part;
use crate::types::{CustomRateSet, RateCategory, RateItem, RateSetData, RateUnit};

pub fn default_custom_name(now: &str) -> String {
    format!("カスタム単価（{}）", date_part(now))
}

/// 公表単価セットをディープコピーしてカスタム単価セットを作る
///
/// 名前が空白のみの場合は日付入りの既定名を使う。保存は呼び出し側で行う。
pub fn create_custom_from_base(
    catalog: &RateCatalog,
    base_set_id: &str,
    name: &str,
    id: impl Into<String>,
    now: &str,
) -> Result<CustomRateSet> {
    let base = catalog.get(base_set_id)?;
    let name = match name.trim() {
        "" => default_custom_name(now),
        trimmed => trimmed.to_string(),
    };

    Ok(CustomRateSet {
        id: id.into(),
        name,
        origin_base_set_id: base.id,
        created_at: now.to_string(),
        updated_at: now.to_string(),
        data: base.data,
    })
}

impl RateSetData {
    fn item_mut(&mut self, category: RateCategory, key: &str) -> Result<&mut RateItem> {
        self.items_mut(category)
            .get_mut(key)
            .ok_or_else(|| Error::not_found("単価項目", format!("{}/{}", category.code(), key)))
    }

    pub fn set_unit_price(&mut self, category: RateCategory, key: &str, unit_price_yen: f64) -> Result<()> {
        self.item_mut(category, key)?.unit_price_yen = unit_price_yen;
        Ok(())
    }

    /// 名称・単位の変更（Noneの項目は据え置き）
    pub fn update_item_meta(
        &mut self,
        category: RateCategory,
        key: &str,
        name: Option<&str>,
        unit: Option<RateUnit>,
    ) -> Result<()> {
        let item = self.item_mut(category, key)?;
        if let Some(name) = name {
            item.name = name.to_string();
        }
        if let Some(unit) = unit {
            item.unit = unit;
        }
        Ok(())
    }

    /// 項目を追加（同じコードがあれば置き換え）
    pub fn add_item(
        &mut self,
        category: RateCategory,
        code: &str,
        name: &str,
        unit: RateUnit,
        unit_price_yen: f64,
    ) -> Result<()> {
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() || name.is_empty() {
            return Err(Error::InvalidInput("コードと名称は必須です".into()));
        }

        self.items_mut(category).insert(
            code.to_string(),
            RateItem {
                name: name.to_string(),
                unit,
                unit_price_yen,
            },
        );
        Ok(())
    }

    pub fn remove_item(&mut self, category: RateCategory, key: &str) -> Result<RateItem> {
        self.items_mut(category)
            .remove(key)
            .ok_or_else(|| Error::not_found("単価項目", format!("{}/{}", category.code(), key)))
    }

    pub fn set_overhead_value(&mut self, key: &str, value: f64) -> Result<()> {
        let item = self
            .overhead
            .get_mut(key)
            .ok_or_else(|| Error::not_found("諸経費項目", key))?;
        item.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_BASE_SET_ID;

    const NOW: &str = "2026-04-01T09:00:00.000Z";

    #[test]
    fn test_create_custom_copies_base() {
        let catalog = RateCatalog::builtin();
        let custom = create_custom_from_base(catalog, "PREF-01-2026", " 札幌用 ", "c1", NOW).unwrap();

        assert_eq!(custom.name, "札幌用");
        assert_eq!(custom.origin_base_set_id, "PREF-01-2026");
        assert_eq!(custom.created_at, NOW);
        assert_eq!(custom.updated_at, NOW);
        assert_eq!(custom.data, catalog.get("PREF-01-2026").unwrap().data);
    }

    #[test]
    fn test_create_custom_default_name() {
        let custom =
            create_custom_from_base(RateCatalog::builtin(), DEFAULT_BASE_SET_ID, "   ", "c1", NOW).unwrap();
        assert_eq!(custom.name, "カスタム単価（2026-04-01）");
    }

    #[test]
    fn test_create_custom_unknown_base() {
        let err = create_custom_from_base(RateCatalog::builtin(), "NOPE", "x", "c1", NOW).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_edit_custom_does_not_touch_catalog() {
        let catalog = RateCatalog::builtin_2026();
        let mut custom = create_custom_from_base(&catalog, DEFAULT_BASE_SET_ID, "", "c1", NOW).unwrap();
        custom
            .data
            .set_unit_price(RateCategory::Labor, "SURVEYOR", 30000.0)
            .unwrap();

        assert_eq!(custom.data.labor["SURVEYOR"].unit_price_yen, 30000.0);
        assert_eq!(
            catalog.get(DEFAULT_BASE_SET_ID).unwrap().data.labor["SURVEYOR"].unit_price_yen,
            28000.0
        );
    }

    #[test]
    fn test_item_editing() {
        let mut data = RateCatalog::builtin().get(DEFAULT_BASE_SET_ID).unwrap().data;

        data.add_item(RateCategory::Labor, " ASSIST ", "測量助手", RateUnit::PersonDay, 21000.0)
            .unwrap();
        assert_eq!(data.labor["ASSIST"].name, "測量助手");

        data.update_item_meta(RateCategory::Labor, "ASSIST", Some("測量補助員"), None)
            .unwrap();
        data.update_item_meta(RateCategory::Labor, "ASSIST", None, Some(RateUnit::Day))
            .unwrap();
        assert_eq!(data.labor["ASSIST"].name, "測量補助員");
        assert_eq!(data.labor["ASSIST"].unit, RateUnit::Day);

        let removed = data.remove_item(RateCategory::Labor, "ASSIST").unwrap();
        assert_eq!(removed.unit_price_yen, 21000.0);
        assert!(data.remove_item(RateCategory::Labor, "ASSIST").unwrap_err().is_not_found());

        assert!(matches!(
            data.add_item(RateCategory::Equipment, "", "名称", RateUnit::Day, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(data.set_unit_price(RateCategory::Equipment, "NOPE", 1.0).is_err());
    }

    #[test]
    fn test_set_overhead_value() {
        let mut data = RateCatalog::builtin().get(DEFAULT_BASE_SET_ID).unwrap().data;
        data.set_overhead_value("tax.rate", 0.08).unwrap();
        assert_eq!(data.overhead["tax.rate"].value, 0.08);
        assert!(data.set_overhead_value("nope", 1.0).unwrap_err().is_not_found());
    }
}
