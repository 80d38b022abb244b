//! 計算結果匯出

use rust_decimal::Decimal;
use serde::Serialize;
use ss_core::{AverageMethod, CalculationResult};
use std::io::Write;
use std::path::Path;

use crate::Result;

/// 匯出列（欄位順序即 CSV 欄位順序）
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub item_code: &'a str,
    pub location_code: &'a str,
    pub class_code: &'a str,
    pub rp_type: &'a str,
    pub product_hierarchy: &'a str,
    pub description: &'a str,
    pub original_safety_stock: Decimal,
    pub original_safety_stock_days: Decimal,
    pub mtd_qty: Decimal,
    pub last_month_qty: Decimal,
    pub last_2_month_qty: Decimal,
    pub avg_daily_sales: Decimal,
    pub average_method: String,
    pub lead_time_days: u32,
    pub merge_factor: Decimal,
    pub service_level: Decimal,
    pub preliminary_ss: Decimal,
    pub ss_after_moq: Decimal,
    pub max_days_applied: u32,
    pub category_minimum: Option<u32>,
    pub suggested_safety_stock: Decimal,
    pub suggested_diff: Decimal,
    pub constraint_applied: String,
    pub preliminary_ss_days: Decimal,
    pub ss_after_moq_days: Decimal,
    pub safety_stock_days: Decimal,
    pub target_qty_used: bool,
    pub target_safety_stock: Option<u64>,
    pub target_diff: Option<Decimal>,
    pub target_safety_stock_days: Option<Decimal>,
    pub allocation_weight: Option<u32>,
    pub calculation_mode: &'static str,
    pub notes: &'a str,
}

impl<'a> From<&'a CalculationResult> for ExportRow<'a> {
    fn from(r: &'a CalculationResult) -> Self {
        Self {
            item_code: &r.item_code,
            location_code: &r.location_code,
            class_code: r.class_code.as_str(),
            rp_type: &r.rp_type,
            product_hierarchy: &r.product_hierarchy,
            description: &r.description,
            original_safety_stock: r.original_safety_stock,
            original_safety_stock_days: r.original_safety_stock_days,
            mtd_qty: r.mtd_qty,
            last_month_qty: r.last_month_qty,
            last_2_month_qty: r.last_2_month_qty,
            avg_daily_sales: r.avg_daily_sales,
            average_method: describe_method(r.average_method),
            lead_time_days: r.lead_time_days,
            merge_factor: r.merge_factor,
            service_level: r.service_level,
            preliminary_ss: r.preliminary_ss,
            ss_after_moq: r.ss_after_moq,
            max_days_applied: r.max_days_applied,
            category_minimum: r.category_minimum,
            suggested_safety_stock: r.suggested_safety_stock,
            suggested_diff: r.suggested_diff,
            constraint_applied: r.constraint_applied.to_string(),
            preliminary_ss_days: r.preliminary_ss_days,
            ss_after_moq_days: r.ss_after_moq_days,
            safety_stock_days: r.safety_stock_days,
            target_qty_used: r.target_qty_used,
            target_safety_stock: r.target_safety_stock,
            target_diff: r.target_diff,
            target_safety_stock_days: r.target_safety_stock_days,
            allocation_weight: r.allocation_weight,
            calculation_mode: r.calculation_mode.label(),
            notes: &r.notes,
        }
    }
}

fn describe_method(method: AverageMethod) -> String {
    match method {
        AverageMethod::FixedWindow => "fixed_window".to_string(),
        AverageMethod::DateAware {
            denominator_days,
            launch_truncated: true,
        } => format!("date_aware({}d, launch)", denominator_days),
        AverageMethod::DateAware {
            denominator_days, ..
        } => format!("date_aware({}d)", denominator_days),
    }
}

/// 匯出計算結果為 CSV
pub fn export_results<W: Write>(writer: W, results: &[CalculationResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in results {
        wtr.serialize(ExportRow::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}

/// 匯出計算結果為 CSV 檔案
pub fn export_results_file(
    path: impl AsRef<Path>,
    results: &[CalculationResult],
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    export_results(file, results)?;
    tracing::info!("已匯出 {} 筆結果到 {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ss_core::{AllocationPatch, ClassCode, LineItemInput};

    fn sample() -> CalculationResult {
        let record = LineItemInput::new(
            "ART001",
            "S001",
            "AA",
            Decimal::from(120),
            Decimal::from(240),
            "1",
            Decimal::from(10),
        );
        let mut result = CalculationResult::from_record(
            &record,
            ClassCode::AA,
            Decimal::from(6),
            AverageMethod::FixedWindow,
        );
        result.set_suggested(Decimal::from(42));
        result.notes = "第一行\n第二行".to_string();
        result
    }

    #[test]
    fn test_export_header_and_row() {
        let mut buf = Vec::new();
        export_results(&mut buf, &[sample()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("item_code,location_code,class_code,rp_type"));
        assert!(header.ends_with("allocation_weight,calculation_mode,notes"));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "ART001");
        assert_eq!(&row[2], "AA");
        assert_eq!(&row[12], "fixed_window");
        assert_eq!(&row[20], "42");
        // 多行說明以引號包住
        assert_eq!(&row[row.len() - 1], "第一行\n第二行");
    }

    #[test]
    fn test_export_allocated_row() {
        let mut result = sample();
        result.apply_allocation(AllocationPatch {
            allocated_qty: 43,
            weight: 3,
            item_target: 100,
        });

        let mut buf = Vec::new();
        export_results(&mut buf, &[result]).unwrap();
        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();

        let field = |name: &str| {
            let idx = headers.iter().position(|h| h == name).unwrap();
            row[idx].to_string()
        };
        assert_eq!(field("target_safety_stock"), "43");
        assert_eq!(field("allocation_weight"), "3");
        assert_eq!(field("calculation_mode"), "Target Allocation");
        assert_eq!(field("constraint_applied"), "Target Allocation");
    }
}
