//! 前置時間與合併因素查詢

use rust_decimal::{Decimal, MathematicalOps};
use ss_core::{ClassCode, MergeFactor, ReferenceTables, SsError};

/// 前置時間計算器
pub struct LeadTimeCalculator;

impl LeadTimeCalculator {
    /// 依 Supply Source 判斷前置時間（未知代碼使用預設 7 天）
    pub fn determine(supply_source: &str, tables: &ReferenceTables) -> u32 {
        let lead_time = tables.lead_time(supply_source);
        if !tables.lead_times.contains_key(supply_source.trim()) {
            tracing::debug!(
                "Supply Source {:?} 無對應前置時間，使用預設 {} 天",
                supply_source,
                lead_time
            );
        }
        lead_time
    }

    /// 前置時間的平方根
    pub fn sqrt_days(lead_time_days: u32) -> Decimal {
        Decimal::from(lead_time_days)
            .sqrt()
            .unwrap_or(Decimal::ZERO)
    }

    /// 依店舖等級取得合併因素
    pub fn merge_factor(
        class: ClassCode,
        tables: &ReferenceTables,
    ) -> ss_core::Result<MergeFactor> {
        tables.merge_factor(class).ok_or_else(|| {
            SsError::Validation(format!("合併因素對照表缺少 Shop Class：{}", class))
        })
    }
}
