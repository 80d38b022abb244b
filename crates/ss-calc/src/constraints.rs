//! 標準公式的各約束步驟

use rust_decimal::Decimal;
use ss_core::{MoqMode, Result, SsError};

use crate::lead_time::LeadTimeCalculator;

/// 計算步驟的數值超出 `Decimal` 範圍
pub(crate) fn overflow(step: &str) -> SsError {
    SsError::Validation(format!("{}數值溢位", step))
}

/// 約束計算器
pub struct ConstraintCalculator;

impl ConstraintCalculator {
    /// 初步安全庫存 = 平均日銷量 × √前置時間 × MF，向上取整
    pub fn preliminary(
        avg_daily_sales: Decimal,
        lead_time_days: u32,
        merge_factor: Decimal,
    ) -> Result<Decimal> {
        let raw = avg_daily_sales
            .checked_mul(LeadTimeCalculator::sqrt_days(lead_time_days))
            .and_then(|value| value.checked_mul(merge_factor))
            .ok_or_else(|| overflow("初步安全庫存"))?;
        Ok(raw.ceil().max(Decimal::ZERO))
    }

    /// MOQ 候選最低值
    pub fn moq_candidate(moq: Decimal, multiplier: Decimal, mode: MoqMode) -> Result<Decimal> {
        match mode {
            MoqMode::Multiplier => moq.checked_mul(multiplier),
            MoqMode::AddOne => moq.checked_add(Decimal::ONE),
        }
        .ok_or_else(|| overflow("MOQ 候選值"))
    }

    /// 套用 MOQ 約束
    ///
    /// 返回 (向上取整後的結果, MOQ 候選值是否大於初步值)
    pub fn apply_moq(
        preliminary: Decimal,
        moq: Decimal,
        multiplier: Decimal,
        mode: MoqMode,
    ) -> Result<(Decimal, bool)> {
        let candidate = Self::moq_candidate(moq, multiplier, mode)?;
        let after_moq = preliminary.max(candidate);
        Ok((after_moq.ceil(), after_moq > preliminary))
    }

    /// 天數下限候選值：平均日銷量 × 天數
    pub fn days_candidate(avg_daily_sales: Decimal, days: u32) -> Result<Decimal> {
        avg_daily_sales
            .checked_mul(Decimal::from(days))
            .ok_or_else(|| overflow("天數約束"))
    }

    /// 套用天數下限：max(MOQ 後值, 平均日銷量 × 天數)
    ///
    /// 平均日銷量 <= 0 時不做任何調整。
    pub fn apply_max_days(
        after_moq: Decimal,
        avg_daily_sales: Decimal,
        days: u32,
    ) -> Result<(Decimal, bool)> {
        if avg_daily_sales <= Decimal::ZERO {
            return Ok((after_moq.ceil(), false));
        }
        let candidate = Self::days_candidate(avg_daily_sales, days)?;
        let suggested = after_moq.max(candidate);
        Ok((suggested.ceil(), suggested > after_moq))
    }

    /// 套用特殊品類最低要求：max(目前值, 最低值)
    pub fn apply_category_minimum(current: Decimal, minimum: u32) -> (Decimal, bool) {
        let minimum = Decimal::from(minimum);
        if minimum > current {
            (minimum, true)
        } else {
            (current, false)
        }
    }
}
