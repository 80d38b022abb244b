//! 目標數量分配（最大餘數法）
//!
//! 把商品層級的目標總量依店舖等級權重分配到各門市，
//! 全程使用整數運算，分配結果總和必定等於目標總量。

use ss_core::{AllocationPatch, CalculationResult, ClassCategory};
use std::collections::BTreeMap;

/// 目標數量分配器
pub struct TargetAllocator;

impl TargetAllocator {
    /// 對指定商品的所有門市分配目標總量
    ///
    /// 只處理 `item_code` 相符的結果；`target` 為 0 或沒有相符結果時不做任何事。
    /// 返回被分配的門市數。
    pub fn allocate(
        results: &mut [CalculationResult],
        item_code: &str,
        target: u64,
        class_weights: &BTreeMap<ClassCategory, u32>,
    ) -> usize {
        if target == 0 {
            tracing::debug!("商品 {} 目標數量為 0，不分配", item_code);
            return 0;
        }

        let indices: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.item_code == item_code)
            .map(|(idx, _)| idx)
            .collect();

        if indices.is_empty() {
            tracing::debug!("商品 {} 沒有對應門市，不分配", item_code);
            return 0;
        }

        let weights: Vec<u32> = indices
            .iter()
            .map(|&idx| effective_weight(results[idx].class_code.category(), class_weights))
            .collect();

        let allocated = apportion(&weights, target);

        for ((&idx, &weight), &qty) in indices.iter().zip(&weights).zip(&allocated) {
            results[idx].apply_allocation(AllocationPatch {
                allocated_qty: qty,
                weight,
                item_target: target,
            });
        }

        tracing::info!(
            "商品 {} 目標 {} 已分配到 {} 個門市",
            item_code,
            target,
            indices.len()
        );

        indices.len()
    }
}

/// 取得等級類別的有效權重
///
/// 未設定時為 1；設定為 0 時提升為 1，避免門市被分配到 0。
pub fn effective_weight(
    category: ClassCategory,
    class_weights: &BTreeMap<ClassCategory, u32>,
) -> u32 {
    match class_weights.get(&category) {
        Some(0) => {
            tracing::warn!("等級類別 {} 的權重為 0，以 1 計算", category);
            1
        }
        Some(&weight) => weight,
        None => 1,
    }
}

/// 最大餘數法分配
///
/// 每份先取 `floor(weight × target / Σweight)`，剩餘數量依餘數由大到小逐一補 1，
/// 餘數相同時依輸入順序。總權重為 0 時全部返回 0。
pub fn apportion(weights: &[u32], target: u64) -> Vec<u64> {
    let total_weight: u128 = weights.iter().map(|&w| u128::from(w)).sum();
    if total_weight == 0 || weights.is_empty() {
        return vec![0; weights.len()];
    }

    let target_wide = u128::from(target);
    let mut allocated = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());

    for &weight in weights {
        let numerator = u128::from(weight) * target_wide;
        // 商不超過 target，必定能放回 u64
        allocated.push((numerator / total_weight) as u64);
        remainders.push(numerator % total_weight);
    }

    let distributed: u64 = allocated.iter().sum();
    let leftover = (target - distributed) as usize;

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    for &idx in order.iter().take(leftover) {
        allocated[idx] += 1;
    }

    allocated
}
