//! 銷售期間天數

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 三個銷售期間的天數（本月至今、上月、前兩月）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDays {
    /// 本月至今天數
    pub mtd_days: u32,
    /// 上月天數
    pub last_month_days: u32,
    /// 前兩月天數
    pub last_2_month_days: u32,
}

impl PeriodDays {
    pub fn new(mtd_days: u32, last_month_days: u32, last_2_month_days: u32) -> Self {
        Self {
            mtd_days,
            last_month_days,
            last_2_month_days,
        }
    }

    /// 依參考日期推算各期間天數
    ///
    /// 本月至今 = 參考日期的日；上月與前兩月取實際月份天數（含閏年、跨年）。
    pub fn from_reference_date(reference: NaiveDate) -> Self {
        let (last_year, last_month) = previous_month(reference.year(), reference.month());
        let (last_2_year, last_2_month) = previous_month(last_year, last_month);

        Self {
            mtd_days: reference.day(),
            last_month_days: days_in_month(last_year, last_month),
            last_2_month_days: days_in_month(last_2_year, last_2_month),
        }
    }

    /// 三期總天數
    pub fn total(&self) -> i64 {
        i64::from(self.mtd_days)
            + i64::from(self.last_month_days)
            + i64::from(self.last_2_month_days)
    }
}

/// 上市日期到參考日期的天數（含頭尾），上市日期晚於參考日期時為 0 或負數
pub fn days_since_launch(launch: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - launch).num_days() + 1
}

/// 取得上一個月（年, 月）
fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// 取得指定月份的天數
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        _ => 0,
    }
}
