//! 商品目標數量讀取（`item_code,target_qty`）

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::{IoError, Result};

#[derive(Debug, Deserialize)]
struct TargetRow {
    item_code: String,
    target_qty: Decimal,
}

/// 從 CSV 讀取商品目標數量
///
/// 小數向上取整，負數視為 0（不分配）。同一商品出現多次時以最後一列為準。
pub fn load_targets<R: Read>(reader: R) -> Result<BTreeMap<String, u64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut targets = BTreeMap::new();
    for (idx, row) in csv_reader.deserialize::<TargetRow>().enumerate() {
        let row = row?;
        let line = idx as u64 + 2;
        if row.item_code.is_empty() {
            return Err(IoError::InvalidRow {
                line,
                message: "item_code 不能為空".to_string(),
            });
        }

        let qty = row
            .target_qty
            .max(Decimal::ZERO)
            .ceil()
            .to_u64()
            .ok_or_else(|| IoError::InvalidRow {
                line,
                message: format!("target_qty 超出範圍：{}", row.target_qty),
            })?;

        if targets.insert(row.item_code.clone(), qty).is_some() {
            tracing::warn!("商品 {} 的目標數量重複，使用第 {} 行", row.item_code, line);
        }
    }

    tracing::info!("讀取商品目標 {} 筆", targets.len());
    Ok(targets)
}

/// 從 CSV 檔案讀取商品目標數量
pub fn load_targets_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, u64>> {
    let file = std::fs::File::open(path.as_ref())?;
    load_targets(file)
}
