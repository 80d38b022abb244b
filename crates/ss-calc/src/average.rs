//! 平均日銷量計算

use rust_decimal::Decimal;
use ss_core::calendar::days_since_launch;
use ss_core::{round2, AverageMethod, LineItemInput, Result};

use crate::constraints::overflow;

/// 固定窗口天數
pub const FIXED_WINDOW_DAYS: i64 = 60;

/// 平均日銷量計算器
pub struct AverageCalculator;

impl AverageCalculator {
    /// 計算平均日銷量
    ///
    /// 記錄同時帶有本月至今銷量與三期天數時使用日期感知模式，否則使用固定 60 天窗口。
    /// 銷量合計超出 `Decimal` 範圍時返回驗證錯誤。
    pub fn calculate(record: &LineItemInput) -> Result<(Decimal, AverageMethod)> {
        match (record.mtd_qty, record.period_days()) {
            (Some(mtd_qty), Some(period_days)) => {
                let total_qty = mtd_qty
                    .checked_add(record.last_month_qty)
                    .and_then(|qty| qty.checked_add(record.last_2_month_qty))
                    .ok_or_else(|| overflow("銷量合計"))?;
                let launch_days = match (record.launch_date, record.reference_date) {
                    (Some(launch), Some(reference)) => Some(days_since_launch(launch, reference)),
                    _ => None,
                };
                Ok(Self::date_aware(total_qty, period_days.total(), launch_days))
            }
            _ => Ok((
                Self::fixed_window(record.last_month_qty, record.last_2_month_qty)?,
                AverageMethod::FixedWindow,
            )),
        }
    }

    /// 固定窗口：(上月 + 前兩月) / 60，保留 2 位小數
    pub fn fixed_window(last_month_qty: Decimal, last_2_month_qty: Decimal) -> Result<Decimal> {
        let total_qty = last_month_qty
            .checked_add(last_2_month_qty)
            .ok_or_else(|| overflow("銷量合計"))?;
        Ok(round2(total_qty / Decimal::from(FIXED_WINDOW_DAYS)))
    }

    /// 日期感知：總銷量 / 總天數
    ///
    /// 上市天數少於三期總天數時以上市天數為分母，避免新品被上市前的天數稀釋。
    /// 分母 <= 0 時平均為 0。
    pub fn date_aware(
        total_qty: Decimal,
        total_days: i64,
        launch_days: Option<i64>,
    ) -> (Decimal, AverageMethod) {
        let (denominator_days, launch_truncated) = match launch_days {
            Some(days) if days < total_days => (days, true),
            _ => (total_days, false),
        };

        let method = AverageMethod::DateAware {
            denominator_days,
            launch_truncated,
        };

        if denominator_days <= 0 {
            return (Decimal::ZERO, method);
        }

        (round2(total_qty / Decimal::from(denominator_days)), method)
    }
}
