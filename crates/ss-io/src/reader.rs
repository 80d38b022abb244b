//! 輸入記錄讀取
//!
//! 只接受標準欄位名稱（與 [`LineItemInput`] 欄位同名）。
//! 必要欄位格式錯誤時整批失敗；可選欄位格式錯誤時視為缺值。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use ss_core::{LineItemInput, PeriodDays};
use std::io::Read;
use std::path::Path;

use crate::Result;

/// CSV 單列
#[derive(Debug, Deserialize)]
struct InputRow {
    item_code: String,
    location_code: String,
    class_code: String,
    last_month_qty: Decimal,
    last_2_month_qty: Decimal,
    supply_source: String,
    moq: Decimal,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    mtd_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    mtd_days: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    last_month_days: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    last_2_month_days: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    original_safety_stock: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    target_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    launch_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    reference_date: Option<NaiveDate>,

    #[serde(default)]
    rp_type: Option<String>,
    #[serde(default)]
    special_category: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    shop_size: Option<String>,
    #[serde(default)]
    product_hierarchy: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl InputRow {
    fn into_record(self) -> LineItemInput {
        let mut record = LineItemInput::new(
            self.item_code,
            self.location_code,
            self.class_code,
            self.last_month_qty,
            self.last_2_month_qty,
            self.supply_source,
            self.moq,
        );
        record.mtd_qty = self.mtd_qty;
        record.mtd_days = self.mtd_days;
        record.last_month_days = self.last_month_days;
        record.last_2_month_days = self.last_2_month_days;
        record.original_safety_stock = self.original_safety_stock;
        record.target_qty = self.target_qty;
        record.launch_date = self.launch_date;
        record.reference_date = self.reference_date;
        record.rp_type = non_blank(self.rp_type);
        record.special_category = non_blank(self.special_category);
        record.region = non_blank(self.region);
        record.shop_size = non_blank(self.shop_size);
        record.product_hierarchy = non_blank(self.product_hierarchy);
        record.description = non_blank(self.description);

        // 有參考日期但未提供三期天數時，由參考日期推算
        if let (Some(reference), None) = (record.reference_date, record.period_days()) {
            record = record.with_period_days(PeriodDays::from_reference_date(reference));
        }
        record
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 從 CSV 讀取輸入記錄
pub fn load_records<R: Read>(reader: R) -> Result<Vec<LineItemInput>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<InputRow>() {
        records.push(row?.into_record());
    }

    tracing::info!("讀取輸入記錄 {} 筆", records.len());
    Ok(records)
}

/// 從 CSV 檔案讀取輸入記錄
pub fn load_records_file(path: impl AsRef<Path>) -> Result<Vec<LineItemInput>> {
    let file = std::fs::File::open(path.as_ref())?;
    load_records(file)
}

/// 為未帶參考日期的記錄補上參考日期與三期天數
///
/// 記錄原有的參考日期與天數保持不變。返回被補上的筆數。
pub fn apply_reference_date(records: &mut [LineItemInput], reference: NaiveDate) -> usize {
    let periods = PeriodDays::from_reference_date(reference);
    let mut filled = 0;
    for record in records.iter_mut().filter(|r| r.reference_date.is_none()) {
        record.reference_date = Some(reference);
        if record.period_days().is_none() {
            record.mtd_days = Some(periods.mtd_days);
            record.last_month_days = Some(periods.last_month_days);
            record.last_2_month_days = Some(periods.last_2_month_days);
        }
        filled += 1;
    }
    filled
}
