//! # Safety Stock Core
//!
//! 核心資料模型與類型定義

use rust_decimal::{Decimal, RoundingStrategy};

pub mod calendar;
pub mod class;
pub mod config;
pub mod record;
pub mod result;
pub mod tables;

// Re-export 主要類型
pub use calendar::PeriodDays;
pub use class::{ClassCategory, ClassCode};
pub use config::{MoqMode, SafetyStockConfig};
pub use record::LineItemInput;
pub use result::{
    AllocationPatch, AverageMethod, BoundConstraints, CalculationMode, CalculationResult,
    ConstraintApplied,
};
pub use tables::{MergeFactor, ReferenceTables};

/// 安全庫存錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum SsError {
    #[error("資料驗證失敗: {0}")]
    Validation(String),

    #[error("無效的設定: {0}")]
    InvalidConfig(String),

    #[error("檔案讀寫錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 格式錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SsError>;

/// 兩位小數四捨五入（中點遠離零）
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 支撐天數：數量 / 平均日銷量，平均日銷量 <= 0 時為 0
///
/// 結果超出 `Decimal` 範圍時取 `Decimal::MAX`（負數取 `Decimal::MIN`）。
pub fn days_of_cover(quantity: Decimal, avg_daily_sales: Decimal) -> Decimal {
    if avg_daily_sales <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match quantity.checked_div(avg_daily_sales) {
        Some(days) => round2(days),
        None if quantity.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}
