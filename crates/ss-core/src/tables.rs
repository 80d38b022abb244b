//! 參考對照表
//!
//! 合併因素、前置時間、特殊品類最低安全庫存、店舖類型固定安全庫存。
//! 全部為唯讀查表，計算期間可在多個執行緒間共享。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ClassCategory, ClassCode};

/// 合併因素 MF 與對應服務水準
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeFactor {
    /// 乘數
    pub value: Decimal,
    /// 服務水準（%）
    pub service_level: Decimal,
}

impl MergeFactor {
    pub fn new(value: Decimal, service_level: Decimal) -> Self {
        Self {
            value,
            service_level,
        }
    }
}

/// 受最低安全庫存要求約束的品類代碼
pub const MINIMUM_CATEGORY_CODE: &str = "0302";

/// 參考對照表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// 店舖等級 → 合併因素
    pub merge_factors: BTreeMap<ClassCode, MergeFactor>,

    /// Supply Source → 前置時間（天）
    pub lead_times: BTreeMap<String, u32>,

    /// 未對應 Supply Source 的前置時間
    pub default_lead_time: u32,

    /// 品類代碼 → 店舖等級 → 最低安全庫存
    pub category_minimums: BTreeMap<String, BTreeMap<ClassCode, u32>>,

    /// 區域 → 等級類別 → 貨場面積 → 固定安全庫存
    pub shop_type_stock: BTreeMap<String, BTreeMap<ClassCategory, BTreeMap<String, u32>>>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        let merge_factors = [
            (ClassCode::AA, 258, 2, 995, 1),
            (ClassCode::A1, 233, 2, 990, 1),
            (ClassCode::A2, 205, 2, 980, 1),
            (ClassCode::A3, 188, 2, 970, 1),
            (ClassCode::B1, 175, 2, 960, 1),
            (ClassCode::B2, 1645, 3, 950, 1),
            (ClassCode::C1, 1555, 3, 940, 1),
            (ClassCode::C2, 148, 2, 930, 1),
            (ClassCode::D1, 128, 2, 900, 1),
        ]
        .into_iter()
        .map(|(class, mf, mf_scale, level, level_scale)| {
            (
                class,
                MergeFactor::new(Decimal::new(mf, mf_scale), Decimal::new(level, level_scale)),
            )
        })
        .collect();

        let lead_times = BTreeMap::from([
            ("1".to_string(), 7), // 行貨
            ("2".to_string(), 3), // 倉貨
            ("4".to_string(), 7), // 行貨
        ]);

        let category_minimums = BTreeMap::from([(
            MINIMUM_CATEGORY_CODE.to_string(),
            ClassCode::ALL
                .iter()
                .map(|class| {
                    let minimum = match class.category() {
                        ClassCategory::A => 12,
                        ClassCategory::B => 10,
                        ClassCategory::C | ClassCategory::D => 6,
                    };
                    (*class, minimum)
                })
                .collect(),
        )]);

        let shop_type_stock = BTreeMap::from([
            (
                "HK".to_string(),
                shop_type_region([
                    (ClassCategory::A, [18, 18, 18, 12, 6]),
                    (ClassCategory::B, [18, 18, 12, 12, 6]),
                    (ClassCategory::C, [12, 12, 12, 6, 0]),
                    (ClassCategory::D, [9, 9, 6, 3, 0]),
                ]),
            ),
            (
                "MO".to_string(),
                shop_type_region([
                    (ClassCategory::A, [24, 24, 18, 18, 12]),
                    (ClassCategory::B, [18, 18, 12, 12, 6]),
                    (ClassCategory::C, [12, 12, 12, 6, 0]),
                    (ClassCategory::D, [9, 9, 6, 3, 0]),
                ]),
            ),
        ]);

        Self {
            merge_factors,
            lead_times,
            default_lead_time: 7,
            category_minimums,
            shop_type_stock,
        }
    }
}

/// 貨場面積順序：XL, L, M, S, XS
const SHOP_SIZES: [&str; 5] = ["XL", "L", "M", "S", "XS"];

fn shop_type_region(
    rows: [(ClassCategory, [u32; 5]); 4],
) -> BTreeMap<ClassCategory, BTreeMap<String, u32>> {
    rows.into_iter()
        .map(|(category, values)| {
            let sizes = SHOP_SIZES
                .iter()
                .zip(values)
                .map(|(size, qty)| (size.to_string(), qty))
                .collect();
            (category, sizes)
        })
        .collect()
}

impl ReferenceTables {
    /// 查詢合併因素（等級未登錄時返回 None）
    pub fn merge_factor(&self, class: ClassCode) -> Option<MergeFactor> {
        self.merge_factors.get(&class).copied()
    }

    /// 依 Supply Source 查詢前置時間，未知代碼使用預設值
    pub fn lead_time(&self, supply_source: &str) -> u32 {
        self.lead_times
            .get(supply_source.trim())
            .copied()
            .unwrap_or(self.default_lead_time)
    }

    /// 查詢特殊品類最低安全庫存
    ///
    /// `category_code` 會先經過 [`normalize_category_code`]。
    pub fn category_minimum(&self, category_code: &str, class: ClassCode) -> Option<u32> {
        let code = normalize_category_code(category_code)?;
        if code != MINIMUM_CATEGORY_CODE {
            return None;
        }
        self.category_minimums.get(&code)?.get(&class).copied()
    }

    /// 查詢店舖類型固定安全庫存（任一鍵為空或查無資料時返回 None）
    pub fn shop_type_stock(
        &self,
        region: &str,
        category: ClassCategory,
        shop_size: &str,
    ) -> Option<u32> {
        let region = region.trim().to_ascii_uppercase();
        let shop_size = shop_size.trim().to_ascii_uppercase();
        if region.is_empty() || shop_size.is_empty() {
            return None;
        }
        self.shop_type_stock
            .get(&region)?
            .get(&category)?
            .get(&shop_size)
            .copied()
    }
}

/// 正規化品類代碼
///
/// 去除空白與試算表數值殘留的 ".0"，三位數字代碼左補零到四位（"302" → "0302"）。
/// 空白代碼返回 None。
pub fn normalize_category_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("0{}", trimmed));
    }
    Some(trimmed.to_string())
}
