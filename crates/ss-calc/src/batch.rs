//! 批次計算
//!
//! 每筆記錄互相獨立，使用 rayon 平行計算，輸出順序與輸入相同。

use rayon::prelude::*;
use ss_core::{CalculationResult, ClassCategory, LineItemInput, SsError};
use std::collections::BTreeMap;

use crate::allocation::TargetAllocator;
use crate::calculator::SafetyStockCalculator;

/// 驗證失敗而被拒絕的記錄
#[derive(Debug)]
pub struct RejectedRecord {
    /// 輸入中的位置（從 0 開始）
    pub index: usize,
    pub item_code: String,
    pub location_code: String,
    pub error: SsError,
}

/// 批次計算結果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// 成功的計算結果（保持輸入順序）
    pub results: Vec<CalculationResult>,

    /// 被拒絕的記錄
    pub rejected: Vec<RejectedRecord>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.results.len() + self.rejected.len()
    }
}

/// 批次計算器
pub struct BatchCalculator;

impl BatchCalculator {
    /// 平行計算所有記錄
    pub fn compute_all(
        records: &[LineItemInput],
        calculator: &SafetyStockCalculator,
    ) -> BatchOutcome {
        tracing::info!("開始批次計算：{} 筆記錄", records.len());
        let start_time = std::time::Instant::now();

        let computed: Vec<(usize, Result<CalculationResult, SsError>)> = records
            .par_iter()
            .enumerate()
            .map(|(idx, record)| (idx, calculator.calculate(record)))
            .collect();

        let mut outcome = BatchOutcome::default();
        for (index, computed) in computed {
            match computed {
                Ok(result) => outcome.results.push(result),
                Err(error) => {
                    let record = &records[index];
                    tracing::warn!(
                        "第 {} 筆記錄被拒絕（Article {}, Site {}）：{}",
                        index + 1,
                        record.item_code,
                        record.location_code,
                        error
                    );
                    outcome.rejected.push(RejectedRecord {
                        index,
                        item_code: record.item_code.clone(),
                        location_code: record.location_code.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "批次計算完成：成功 {} 筆，拒絕 {} 筆，耗時 {:?}",
            outcome.results.len(),
            outcome.rejected.len(),
            start_time.elapsed()
        );

        outcome
    }

    /// 依商品目標數量分配
    ///
    /// 目標為 0 的商品不分配。返回實際完成分配的商品數。
    pub fn apply_targets(
        results: &mut [CalculationResult],
        targets: &BTreeMap<String, u64>,
        class_weights: &BTreeMap<ClassCategory, u32>,
    ) -> usize {
        let mut allocated_items = 0;
        for (item_code, &target) in targets {
            if TargetAllocator::allocate(results, item_code, target, class_weights) > 0 {
                allocated_items += 1;
            }
        }

        tracing::info!(
            "目標分配完成：{} 個商品有目標，{} 個商品已分配",
            targets.len(),
            allocated_items
        );

        allocated_items
    }
}
