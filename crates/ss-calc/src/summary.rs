//! 批次彙總統計

use rust_decimal::Decimal;
use serde::Serialize;
use ss_core::{round2, CalculationResult, ConstraintApplied};
use std::collections::BTreeMap;
use std::fmt;

/// 整批彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// 成功計算的記錄數
    pub total_records: usize,
    pub rejected_records: usize,
    pub moq_bound: usize,
    pub max_days_bound: usize,
    pub category_minimum_bound: usize,
    /// 計算模式 → 筆數（分配後的記錄計入 Target Allocation）
    pub mode_counts: BTreeMap<String, usize>,
    pub total_original: Decimal,
    pub total_suggested: Decimal,
    /// 平均支撐天數
    pub mean_days_of_cover: Decimal,
}

impl BatchSummary {
    pub fn from_results(results: &[CalculationResult], rejected_records: usize) -> Self {
        let mut summary = Self {
            total_records: results.len(),
            rejected_records,
            moq_bound: 0,
            max_days_bound: 0,
            category_minimum_bound: 0,
            mode_counts: BTreeMap::new(),
            total_original: Decimal::ZERO,
            total_suggested: Decimal::ZERO,
            mean_days_of_cover: Decimal::ZERO,
        };

        let mut total_days = Decimal::ZERO;
        for result in results {
            *summary
                .mode_counts
                .entry(result.calculation_mode.label().to_string())
                .or_insert(0) += 1;

            if let ConstraintApplied::Standard(bound) = result.constraint_applied {
                summary.moq_bound += usize::from(bound.moq);
                summary.max_days_bound += usize::from(bound.max_days);
                summary.category_minimum_bound += usize::from(bound.category_minimum);
            }

            summary.total_original = summary
                .total_original
                .saturating_add(result.original_safety_stock);
            summary.total_suggested = summary
                .total_suggested
                .saturating_add(result.suggested_safety_stock);
            total_days = total_days.saturating_add(result.safety_stock_days);
        }

        summary.mean_days_of_cover = mean(total_days, results.len());
        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "計算完成：{} 筆，拒絕 {} 筆",
            self.total_records, self.rejected_records
        )?;
        for (mode, count) in &self.mode_counts {
            writeln!(f, "  {}: {}", mode, count)?;
        }
        writeln!(
            f,
            "約束生效：MOQ {}，Max Days {}，Category Minimum {}",
            self.moq_bound, self.max_days_bound, self.category_minimum_bound
        )?;
        writeln!(
            f,
            "現有安全庫存合計 {}，建議安全庫存合計 {}",
            self.total_original, self.total_suggested
        )?;
        write!(f, "平均支撐天數 {}", self.mean_days_of_cover)
    }
}

/// 單一商品彙總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub item_code: String,
    pub location_count: usize,
    pub total_original: Decimal,
    pub total_suggested: Decimal,
    /// 分配總量（未分配時為 None）
    pub total_allocated: Option<u64>,
    pub mean_days_of_cover: Decimal,
}

impl ItemSummary {
    /// 依商品分組彙總，按商品編號排序
    pub fn by_item(results: &[CalculationResult]) -> Vec<ItemSummary> {
        let mut grouped: BTreeMap<&str, Vec<&CalculationResult>> = BTreeMap::new();
        for result in results {
            grouped.entry(result.item_code.as_str()).or_default().push(result);
        }

        grouped
            .into_iter()
            .map(|(item_code, rows)| {
                let allocated: Vec<u64> =
                    rows.iter().filter_map(|r| r.target_safety_stock).collect();
                let total_days = saturating_sum(rows.iter().map(|r| r.safety_stock_days));
                ItemSummary {
                    item_code: item_code.to_string(),
                    location_count: rows.len(),
                    total_original: saturating_sum(rows.iter().map(|r| r.original_safety_stock)),
                    total_suggested: saturating_sum(
                        rows.iter().map(|r| r.suggested_safety_stock),
                    ),
                    total_allocated: if allocated.is_empty() {
                        None
                    } else {
                        Some(allocated.iter().sum())
                    },
                    mean_days_of_cover: mean(total_days, rows.len()),
                }
            })
            .collect()
    }
}

/// 合計超出 `Decimal` 範圍時停在上下限
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round2(total / Decimal::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchCalculator, SafetyStockCalculator};
    use ss_core::{LineItemInput, SafetyStockConfig};

    fn record(item: &str, site: &str, class: &str, last: i64, last_2: i64) -> LineItemInput {
        let source = if class == "D1" { "2" } else { "1" };
        LineItemInput::new(
            item,
            site,
            class,
            Decimal::from(last),
            Decimal::from(last_2),
            source,
            Decimal::from(10),
        )
    }

    fn results() -> Vec<CalculationResult> {
        let config = SafetyStockConfig::default().with_calculate_for_all_rp_types(false);
        let calculator = SafetyStockCalculator::with_default_tables(config).unwrap();
        let records = vec![
            // 6 × 7 = 42 → Max Days
            record("ART001", "S001", "AA", 120, 240)
                .with_original_safety_stock(Decimal::from(30)),
            // MOQ 13
            record("ART001", "S002", "D1", 3, 3),
            // 跳過，保留 9
            record("ART002", "S001", "B1", 60, 60)
                .with_rp_type("ND")
                .with_original_safety_stock(Decimal::from(9)),
        ];
        BatchCalculator::compute_all(&records, &calculator).results
    }

    #[test]
    fn test_batch_summary_counts() {
        let summary = BatchSummary::from_results(&results(), 2);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.rejected_records, 2);
        assert_eq!(summary.moq_bound, 1);
        assert_eq!(summary.max_days_bound, 1);
        assert_eq!(summary.category_minimum_bound, 0);
        assert_eq!(summary.mode_counts.get("Standard"), Some(&2));
        assert_eq!(summary.mode_counts.get("skipped"), Some(&1));
        assert_eq!(summary.total_original, Decimal::from(39));
        assert_eq!(summary.total_suggested, Decimal::from(64));
        assert!(summary.to_string().contains("建議安全庫存合計 64"));
    }

    #[test]
    fn test_item_summary_with_allocation() {
        let mut results = results();
        BatchCalculator::apply_targets(
            &mut results,
            &BTreeMap::from([("ART001".to_string(), 40)]),
            &SafetyStockConfig::default().class_weights,
        );

        let items = ItemSummary::by_item(&results);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_code, "ART001");
        assert_eq!(items[0].location_count, 2);
        assert_eq!(items[0].total_suggested, Decimal::from(55));
        assert_eq!(items[0].total_allocated, Some(40));
        assert_eq!(items[1].total_allocated, None);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let config = SafetyStockConfig::default().with_calculate_for_all_rp_types(false);
        let calculator = SafetyStockCalculator::with_default_tables(config).unwrap();
        let records: Vec<LineItemInput> = ["S001", "S002"]
            .iter()
            .map(|site| {
                record("ART001", site, "AA", 120, 240)
                    .with_rp_type("ND")
                    .with_original_safety_stock(Decimal::MAX)
            })
            .collect();
        let results = BatchCalculator::compute_all(&records, &calculator).results;

        let summary = BatchSummary::from_results(&results, 0);
        assert_eq!(summary.total_original, Decimal::MAX);
        assert_eq!(summary.total_suggested, Decimal::MAX);
        assert_eq!(ItemSummary::by_item(&results)[0].total_suggested, Decimal::MAX);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_results(&[], 0);
        assert_eq!(summary.mean_days_of_cover, Decimal::ZERO);
        assert!(ItemSummary::by_item(&[]).is_empty());
    }
}
