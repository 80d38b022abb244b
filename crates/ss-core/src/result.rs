//! 計算結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{days_of_cover, ClassCode, LineItemInput};

/// 計算模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMode {
    /// 店舖類型固定值
    ShopType,
    /// RP Type 跳過計算
    Skipped,
    /// 直接使用 Target Qty
    TargetQty,
    /// 標準公式
    Standard,
    /// 由商品目標數量分配
    TargetAllocation,
}

impl CalculationMode {
    pub fn label(&self) -> &'static str {
        match self {
            CalculationMode::ShopType => "Shop Type Configuration",
            CalculationMode::Skipped => "skipped",
            CalculationMode::TargetQty => "Target Qty",
            CalculationMode::Standard => "Standard",
            CalculationMode::TargetAllocation => "Target Allocation",
        }
    }
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 標準公式中實際生效的約束
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundConstraints {
    /// MOQ 約束生效
    pub moq: bool,
    /// 天數下限生效
    pub max_days: bool,
    /// 特殊品類最低要求生效
    pub category_minimum: bool,
}

impl BoundConstraints {
    pub fn is_empty(&self) -> bool {
        !(self.moq || self.max_days || self.category_minimum)
    }
}

impl fmt::Display for BoundConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<&str> = [
            (self.moq, "MOQ"),
            (self.max_days, "Max Days"),
            (self.category_minimum, "Category Minimum"),
        ]
        .iter()
        .filter(|(bound, _)| *bound)
        .map(|(_, label)| *label)
        .collect();
        f.write_str(&parts.join(" + "))
    }
}

/// 約束標籤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintApplied {
    Standard(BoundConstraints),
    ShopType,
    Skipped,
    TargetQty,
    TargetAllocation,
}

impl fmt::Display for ConstraintApplied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintApplied::Standard(bound) => bound.fmt(f),
            ConstraintApplied::ShopType => f.write_str("Shop Type"),
            ConstraintApplied::Skipped => f.write_str("skipped"),
            ConstraintApplied::TargetQty => f.write_str("Target Qty"),
            ConstraintApplied::TargetAllocation => f.write_str("Target Allocation"),
        }
    }
}

/// 平均日銷量計算方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AverageMethod {
    /// (上月 + 前兩月) / 60
    FixedWindow,
    /// 三期總量 / 三期總天數（或上市天數）
    DateAware {
        /// 實際使用的分母天數
        denominator_days: i64,
        /// 分母是否被上市天數截短
        launch_truncated: bool,
    },
}

/// 目標數量分配補丁
///
/// 套用後以下欄位改為反映分配結果：`target_safety_stock`、`target_diff`、
/// `target_safety_stock_days`、`allocation_weight`、`constraint_applied`、`calculation_mode`。
/// 標準公式欄位（`suggested_safety_stock` 等）保持原值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPatch {
    /// 分配數量
    pub allocated_qty: u64,
    /// 使用的權重（已套用下限 1）
    pub weight: u32,
    /// 商品目標總量
    pub item_target: u64,
}

/// 單筆計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub item_code: String,
    pub location_code: String,
    pub class_code: ClassCode,
    pub rp_type: String,
    pub product_hierarchy: String,
    pub description: String,

    /// 現有安全庫存（缺值時為 0）
    pub original_safety_stock: Decimal,
    pub original_safety_stock_days: Decimal,
    pub mtd_qty: Decimal,
    pub last_month_qty: Decimal,
    pub last_2_month_qty: Decimal,

    pub avg_daily_sales: Decimal,
    pub average_method: AverageMethod,
    pub lead_time_days: u32,
    pub merge_factor: Decimal,
    pub service_level: Decimal,
    pub preliminary_ss: Decimal,
    pub preliminary_ss_days: Decimal,
    pub ss_after_moq: Decimal,
    pub ss_after_moq_days: Decimal,
    /// 實際套用的天數設定
    pub max_days_applied: u32,
    /// 查到的特殊品類最低要求
    pub category_minimum: Option<u32>,

    /// 建議安全庫存
    pub suggested_safety_stock: Decimal,
    pub safety_stock_days: Decimal,
    /// 建議值 - 現有值
    pub suggested_diff: Decimal,

    pub constraint_applied: ConstraintApplied,
    pub calculation_mode: CalculationMode,
    pub target_qty_used: bool,

    pub target_safety_stock: Option<u64>,
    pub target_diff: Option<Decimal>,
    pub target_safety_stock_days: Option<Decimal>,
    pub allocation_weight: Option<u32>,

    /// 計算步驟說明
    pub notes: String,
}

impl CalculationResult {
    /// 以輸入記錄建立結果骨架，數值欄位為 0，由計算器填入
    pub fn from_record(
        record: &LineItemInput,
        class_code: ClassCode,
        avg_daily_sales: Decimal,
        average_method: AverageMethod,
    ) -> Self {
        let original = record.original_safety_stock.unwrap_or(Decimal::ZERO);
        Self {
            item_code: record.item_code.clone(),
            location_code: record.location_code.clone(),
            class_code,
            rp_type: record.rp_type.clone().unwrap_or_default(),
            product_hierarchy: record.product_hierarchy.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            original_safety_stock: original,
            original_safety_stock_days: record
                .original_safety_stock
                .map(|qty| days_of_cover(qty, avg_daily_sales))
                .unwrap_or(Decimal::ZERO),
            mtd_qty: record.mtd_qty.unwrap_or(Decimal::ZERO),
            last_month_qty: record.last_month_qty,
            last_2_month_qty: record.last_2_month_qty,
            avg_daily_sales,
            average_method,
            lead_time_days: 0,
            merge_factor: Decimal::ZERO,
            service_level: Decimal::ZERO,
            preliminary_ss: Decimal::ZERO,
            preliminary_ss_days: Decimal::ZERO,
            ss_after_moq: Decimal::ZERO,
            ss_after_moq_days: Decimal::ZERO,
            max_days_applied: 0,
            category_minimum: None,
            suggested_safety_stock: Decimal::ZERO,
            safety_stock_days: Decimal::ZERO,
            suggested_diff: -original,
            constraint_applied: ConstraintApplied::Standard(BoundConstraints::default()),
            calculation_mode: CalculationMode::Standard,
            target_qty_used: false,
            target_safety_stock: None,
            target_diff: None,
            target_safety_stock_days: None,
            allocation_weight: None,
            notes: String::new(),
        }
    }

    /// 設定最終建議值，同步更新支撐天數與差異
    pub fn set_suggested(&mut self, suggested: Decimal) {
        self.suggested_safety_stock = suggested;
        self.safety_stock_days = days_of_cover(suggested, self.avg_daily_sales);
        self.suggested_diff = suggested.saturating_sub(self.original_safety_stock);
    }

    /// 套用目標數量分配（唯一允許的建立後修改）
    pub fn apply_allocation(&mut self, patch: AllocationPatch) {
        let allocated = Decimal::from(patch.allocated_qty);
        self.target_safety_stock = Some(patch.allocated_qty);
        self.target_diff = Some(allocated.saturating_sub(self.original_safety_stock));
        self.target_safety_stock_days = Some(days_of_cover(allocated, self.avg_daily_sales));
        self.allocation_weight = Some(patch.weight);
        self.constraint_applied = ConstraintApplied::TargetAllocation;
        self.calculation_mode = CalculationMode::TargetAllocation;

        // 重複分配時只保留最後一次說明
        if let Some(idx) = self.notes.find(ALLOCATION_NOTE_PREFIX) {
            self.notes.truncate(idx.saturating_sub(1));
        }
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(&format!(
            "{}商品目標 {}，權重 {}，分配 {}",
            ALLOCATION_NOTE_PREFIX, patch.item_target, patch.weight, patch.allocated_qty
        ));
    }

    /// 是否已由目標數量分配
    pub fn is_allocated(&self) -> bool {
        self.target_safety_stock.is_some()
    }
}

const ALLOCATION_NOTE_PREFIX: &str = "目標分配：";

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CalculationResult {
        let record = LineItemInput::new(
            "ART001",
            "S001",
            "AA",
            Decimal::from(120),
            Decimal::from(240),
            "1",
            Decimal::from(10),
        )
        .with_original_safety_stock(Decimal::from(30));
        let mut result = CalculationResult::from_record(
            &record,
            ClassCode::AA,
            Decimal::from(6),
            AverageMethod::FixedWindow,
        );
        result.notes = "計算步驟：".to_string();
        result
    }

    #[test]
    fn test_constraint_labels() {
        let none = BoundConstraints::default();
        assert_eq!(none.to_string(), "none");

        let both = BoundConstraints {
            moq: true,
            max_days: true,
            category_minimum: false,
        };
        assert_eq!(both.to_string(), "MOQ + Max Days");

        let all = BoundConstraints {
            moq: true,
            max_days: true,
            category_minimum: true,
        };
        assert_eq!(
            ConstraintApplied::Standard(all).to_string(),
            "MOQ + Max Days + Category Minimum"
        );
        assert_eq!(ConstraintApplied::Skipped.to_string(), "skipped");
        assert_eq!(CalculationMode::Skipped.to_string(), "skipped");
        assert_eq!(CalculationMode::TargetQty.to_string(), "Target Qty");
    }

    #[test]
    fn test_original_days_from_record() {
        let result = sample_result();

        assert_eq!(result.original_safety_stock, Decimal::from(30));
        assert_eq!(result.original_safety_stock_days, Decimal::from(5));
        assert_eq!(result.suggested_diff, Decimal::from(-30));
    }

    #[test]
    fn test_set_suggested() {
        let mut result = sample_result();
        result.set_suggested(Decimal::from(42));

        assert_eq!(result.suggested_safety_stock, Decimal::from(42));
        assert_eq!(result.safety_stock_days, Decimal::from(7));
        assert_eq!(result.suggested_diff, Decimal::from(12));
    }

    #[test]
    fn test_apply_allocation_patch() {
        let mut result = sample_result();
        result.set_suggested(Decimal::from(42));

        result.apply_allocation(AllocationPatch {
            allocated_qty: 43,
            weight: 3,
            item_target: 100,
        });

        assert!(result.is_allocated());
        assert_eq!(result.target_safety_stock, Some(43));
        assert_eq!(result.target_diff, Some(Decimal::from(13)));
        assert_eq!(result.target_safety_stock_days, Some(Decimal::new(717, 2)));
        assert_eq!(result.constraint_applied, ConstraintApplied::TargetAllocation);
        assert_eq!(result.calculation_mode, CalculationMode::TargetAllocation);
        // 標準公式欄位不變
        assert_eq!(result.suggested_safety_stock, Decimal::from(42));
        assert!(result.notes.contains("分配 43"));
    }

    #[test]
    fn test_reapply_allocation_replaces_note() {
        let mut result = sample_result();

        result.apply_allocation(AllocationPatch {
            allocated_qty: 10,
            weight: 3,
            item_target: 20,
        });
        result.apply_allocation(AllocationPatch {
            allocated_qty: 12,
            weight: 3,
            item_target: 24,
        });

        assert_eq!(result.target_safety_stock, Some(12));
        assert_eq!(result.notes.matches(ALLOCATION_NOTE_PREFIX).count(), 1);
        assert!(result.notes.starts_with("計算步驟："));
        assert!(result.notes.contains("分配 12"));
    }

    #[test]
    fn test_extreme_suggested_does_not_overflow() {
        let record = LineItemInput::new(
            "ART001",
            "S001",
            "AA",
            Decimal::ZERO,
            Decimal::ZERO,
            "1",
            Decimal::ZERO,
        )
        .with_original_safety_stock(Decimal::MIN);
        let mut result = CalculationResult::from_record(
            &record,
            ClassCode::AA,
            Decimal::new(1, 2),
            AverageMethod::FixedWindow,
        );

        result.set_suggested(Decimal::MAX);

        assert_eq!(result.suggested_diff, Decimal::MAX);
        assert_eq!(result.safety_stock_days, Decimal::MAX);
        assert_eq!(result.original_safety_stock_days, Decimal::MIN);
    }
}
