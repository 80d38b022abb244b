//! 安全庫存主計算器
//!
//! 模式優先順序（先命中者生效）：
//! 1. 店舖類型固定值
//! 2. RP Type = ND 跳過
//! 3. Target Qty 直接採用
//! 4. 標準公式

use rust_decimal::Decimal;
use ss_core::{
    AverageMethod, BoundConstraints, CalculationMode, CalculationResult, ClassCode,
    ConstraintApplied, LineItemInput, ReferenceTables, Result, SafetyStockConfig,
};

use crate::average::{AverageCalculator, FIXED_WINDOW_DAYS};
use crate::constraints::ConstraintCalculator;
use crate::lead_time::LeadTimeCalculator;

/// 跳過計算的 RP Type
pub const SKIP_RP_TYPE: &str = "ND";

/// 安全庫存計算器
#[derive(Debug, Clone)]
pub struct SafetyStockCalculator {
    /// 計算設定（已驗證）
    config: SafetyStockConfig,

    /// 參考對照表
    tables: ReferenceTables,
}

impl SafetyStockCalculator {
    /// 創建新的計算器，設定不合法時直接拒絕
    pub fn new(config: SafetyStockConfig, tables: ReferenceTables) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tables })
    }

    /// 使用內建對照表創建計算器
    pub fn with_default_tables(config: SafetyStockConfig) -> Result<Self> {
        Self::new(config, ReferenceTables::default())
    }

    pub fn config(&self) -> &SafetyStockConfig {
        &self.config
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// 計算單筆記錄
    pub fn calculate(&self, record: &LineItemInput) -> Result<CalculationResult> {
        compute(record, &self.config, &self.tables)
    }
}

/// 計算單筆記錄的建議安全庫存
///
/// 只有驗證錯誤（缺少識別欄位、無法識別的店舖等級、數值溢位）會以 `Err` 返回；
/// 查表失敗與平均日銷量 <= 0 一律以預設值處理並寫入計算步驟說明。
pub fn compute(
    record: &LineItemInput,
    config: &SafetyStockConfig,
    tables: &ReferenceTables,
) -> Result<CalculationResult> {
    let class = record.validate_identity()?;

    // 所有模式都先算平均日銷量，供報表使用
    let (avg_daily_sales, average_method) = AverageCalculator::calculate(record)?;
    let mut result =
        CalculationResult::from_record(record, class, avg_daily_sales, average_method);

    let mut trace = Vec::new();
    trace.push(format!(
        "Article {} / Site {}，Shop Class {}",
        record.item_code, record.location_code, class
    ));
    trace.push(describe_average(record, avg_daily_sales, average_method));

    if let Some(fixed) = shop_type_value(record, class, config, tables, &mut trace) {
        tracing::debug!(
            "{} / {} 使用店舖類型固定值 {}",
            record.item_code,
            record.location_code,
            fixed
        );
        trace.push(format!(
            "店舖類型模式：Region {} / 類別 {} / Shop Size {} → 固定安全庫存 {}",
            record.region.as_deref().unwrap_or_default().trim(),
            class.category(),
            record.shop_size.as_deref().unwrap_or_default().trim(),
            fixed
        ));
        result.set_suggested(Decimal::from(fixed));
        result.constraint_applied = ConstraintApplied::ShopType;
        result.calculation_mode = CalculationMode::ShopType;
        return Ok(finish(result, trace));
    }

    if should_skip(record, config) {
        tracing::debug!(
            "{} / {} RP Type 為 {}，跳過計算",
            record.item_code,
            record.location_code,
            SKIP_RP_TYPE
        );
        let original = record.original_safety_stock.unwrap_or(Decimal::ZERO);
        trace.push(format!(
            "RP Type = {}，跳過計算，保留現有安全庫存 {}",
            SKIP_RP_TYPE, original
        ));
        result.set_suggested(original);
        result.constraint_applied = ConstraintApplied::Skipped;
        result.calculation_mode = CalculationMode::Skipped;
        return Ok(finish(result, trace));
    }

    if let Some(target_qty) = target_qty(record, config) {
        let suggested = target_qty.ceil().max(Decimal::ZERO);
        tracing::debug!(
            "{} / {} 使用 Target Qty {}",
            record.item_code,
            record.location_code,
            suggested
        );
        trace.push(format!(
            "Target Qty 模式：目標數量 {} → 建議安全庫存 {}",
            target_qty, suggested
        ));
        result.set_suggested(suggested);
        result.constraint_applied = ConstraintApplied::TargetQty;
        result.calculation_mode = CalculationMode::TargetQty;
        result.target_qty_used = true;
        return Ok(finish(result, trace));
    }

    standard(record, class, config, tables, &mut result, &mut trace)?;
    Ok(finish(result, trace))
}

/// 標準公式
fn standard(
    record: &LineItemInput,
    class: ClassCode,
    config: &SafetyStockConfig,
    tables: &ReferenceTables,
    result: &mut CalculationResult,
    trace: &mut Vec<String>,
) -> Result<()> {
    let avg = result.avg_daily_sales;

    // Step 1: 前置時間
    let lead_time = LeadTimeCalculator::determine(&record.supply_source, tables);
    trace.push(format!(
        "前置時間：Supply Source {} → {} 天（√ = {}）",
        record.supply_source.trim(),
        lead_time,
        LeadTimeCalculator::sqrt_days(lead_time).round_dp(4)
    ));

    // Step 2: 合併因素
    let merge_factor = LeadTimeCalculator::merge_factor(class, tables)?;
    trace.push(format!(
        "合併因素：{} → MF {}（服務水準 {}%）",
        class, merge_factor.value, merge_factor.service_level
    ));

    // Step 3: 初步安全庫存
    let preliminary = ConstraintCalculator::preliminary(avg, lead_time, merge_factor.value)?;
    trace.push(format!(
        "初步安全庫存 = {} × √{} × {} → {}",
        avg, lead_time, merge_factor.value, preliminary
    ));

    // Step 4: MOQ 約束
    let candidate = ConstraintCalculator::moq_candidate(
        record.moq,
        config.moq_multiplier,
        config.moq_mode,
    )?;
    let (after_moq, moq_bound) = ConstraintCalculator::apply_moq(
        preliminary,
        record.moq,
        config.moq_multiplier,
        config.moq_mode,
    )?;
    trace.push(format!(
        "MOQ 約束：MOQ {}，候選值 {} → max({}, {}) = {}{}",
        record.moq,
        candidate,
        preliminary,
        candidate,
        after_moq,
        if moq_bound { "（生效）" } else { "" }
    ));

    // Step 5: 天數下限
    let days = config.max_days_for(class);
    let (mut suggested, max_days_bound) =
        ConstraintCalculator::apply_max_days(after_moq, avg, days)?;
    if avg > Decimal::ZERO {
        let day_floor = ConstraintCalculator::days_candidate(avg, days)?;
        trace.push(format!(
            "天數約束：{} × {} 天 = {} → max({}, {}) = {}{}",
            avg,
            days,
            day_floor,
            after_moq,
            day_floor,
            suggested,
            if max_days_bound { "（生效）" } else { "" }
        ));
    } else {
        trace.push(format!("天數約束：平均日銷量 {} <= 0，不調整", avg));
    }

    // Step 6: 特殊品類最低要求
    let category_minimum = record
        .special_category
        .as_deref()
        .and_then(|code| tables.category_minimum(code, class));
    let mut category_bound = false;
    if let Some(minimum) = category_minimum {
        let (value, bound) = ConstraintCalculator::apply_category_minimum(suggested, minimum);
        trace.push(format!(
            "特殊品類最低要求：MCH2 {} / {} → 最低 {}，max({}, {}) = {}{}",
            record.special_category.as_deref().unwrap_or_default().trim(),
            class,
            minimum,
            suggested,
            minimum,
            value,
            if bound { "（生效）" } else { "" }
        ));
        suggested = value;
        category_bound = bound;
    }

    result.lead_time_days = lead_time;
    result.merge_factor = merge_factor.value;
    result.service_level = merge_factor.service_level;
    result.preliminary_ss = preliminary;
    result.preliminary_ss_days = ss_core::days_of_cover(preliminary, avg);
    result.ss_after_moq = after_moq;
    result.ss_after_moq_days = ss_core::days_of_cover(after_moq, avg);
    result.max_days_applied = days;
    result.category_minimum = category_minimum;
    result.set_suggested(suggested);

    let bound = BoundConstraints {
        moq: moq_bound,
        max_days: max_days_bound,
        category_minimum: category_bound,
    };
    result.constraint_applied = ConstraintApplied::Standard(bound);
    result.calculation_mode = CalculationMode::Standard;

    trace.push(format!(
        "建議安全庫存 {}，支撐天數 {}，約束：{}",
        suggested, result.safety_stock_days, bound
    ));

    tracing::debug!(
        "{} / {} 標準公式：初步 {}，MOQ 後 {}，最終 {}（{}）",
        record.item_code,
        record.location_code,
        preliminary,
        after_moq,
        suggested,
        bound
    );

    Ok(())
}

/// 店舖類型模式命中時返回固定值
///
/// 模式開啟但查無固定值時寫入計算步驟說明，由後續模式處理。
fn shop_type_value(
    record: &LineItemInput,
    class: ClassCode,
    config: &SafetyStockConfig,
    tables: &ReferenceTables,
    trace: &mut Vec<String>,
) -> Option<u32> {
    if !config.use_shop_type_mode {
        return None;
    }
    let region = record.region.as_deref().unwrap_or_default().trim();
    let shop_size = record.shop_size.as_deref().unwrap_or_default().trim();
    let value = tables.shop_type_stock(region, class.category(), shop_size);
    if value.is_none() {
        tracing::debug!(
            "{} / {} 店舖類型查無資料（Region {:?}, Shop Size {:?}），改用後續模式",
            record.item_code,
            record.location_code,
            region,
            shop_size
        );
        trace.push(format!(
            "店舖類型模式：Region {} / 類別 {} / Shop Size {} 查無固定值，改用後續模式",
            region,
            class.category(),
            shop_size
        ));
    }
    value
}

fn should_skip(record: &LineItemInput, config: &SafetyStockConfig) -> bool {
    !config.calculate_for_all_rp_types
        && record
            .rp_type
            .as_deref()
            .is_some_and(|rp| rp.trim().eq_ignore_ascii_case(SKIP_RP_TYPE))
}

fn target_qty(record: &LineItemInput, config: &SafetyStockConfig) -> Option<Decimal> {
    if config.use_target_qty_mode {
        record.target_qty
    } else {
        None
    }
}

fn describe_average(record: &LineItemInput, avg: Decimal, method: AverageMethod) -> String {
    match method {
        AverageMethod::FixedWindow => format!(
            "平均日銷量 = ({} + {}) / {} = {}",
            record.last_month_qty, record.last_2_month_qty, FIXED_WINDOW_DAYS, avg
        ),
        AverageMethod::DateAware {
            denominator_days,
            launch_truncated,
        } => {
            let mtd = record.mtd_qty.unwrap_or(Decimal::ZERO);
            let suffix = if launch_truncated {
                "（依上市日期截短分母）"
            } else {
                ""
            };
            format!(
                "平均日銷量 = ({} + {} + {}) / {} 天 = {}{}",
                mtd,
                record.last_month_qty,
                record.last_2_month_qty,
                denominator_days,
                avg,
                suffix
            )
        }
    }
}

fn finish(mut result: CalculationResult, trace: Vec<String>) -> CalculationResult {
    result.notes = trace.join("\n");
    result
}
