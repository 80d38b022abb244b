//! 安全庫存計算命令列工具

mod logging;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ss_calc::{BatchCalculator, BatchSummary, ItemSummary, SafetyStockCalculator};
use ss_core::{ReferenceTables, SafetyStockConfig};
use std::path::PathBuf;

/// 安全庫存建議計算
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 計算建議安全庫存並匯出 CSV
    Calculate {
        /// 輸入記錄 CSV
        #[arg(short, long)]
        input: PathBuf,

        /// 結果輸出 CSV
        #[arg(short, long)]
        output: PathBuf,

        /// 設定檔（JSON，不存在時使用預設值）
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// 商品目標數量 CSV（item_code,target_qty）
        #[arg(short, long)]
        targets: Option<PathBuf>,

        /// 參考日期（YYYY-MM-DD），套用到未帶參考日期的記錄
        #[arg(short, long)]
        reference_date: Option<NaiveDate>,
    },

    /// 寫出預設設定檔
    InitSettings {
        /// 設定檔路徑
        path: PathBuf,

        /// 覆寫已存在的檔案
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    logging::init();

    match Cli::parse().command {
        Command::Calculate {
            input,
            output,
            settings,
            targets,
            reference_date,
        } => calculate(input, output, settings, targets, reference_date),
        Command::InitSettings { path, force } => init_settings(path, force),
    }
}

fn calculate(
    input: PathBuf,
    output: PathBuf,
    settings: Option<PathBuf>,
    targets: Option<PathBuf>,
    reference_date: Option<NaiveDate>,
) -> Result<()> {
    let config = match &settings {
        Some(path) => SafetyStockConfig::load_from_file(path)
            .with_context(|| format!("無法載入設定檔 {}", path.display()))?,
        None => SafetyStockConfig::default(),
    };
    let calculator = SafetyStockCalculator::new(config, ReferenceTables::default())?;

    let mut records = ss_io::load_records_file(&input)
        .with_context(|| format!("無法讀取輸入檔 {}", input.display()))?;
    if let Some(reference) = reference_date {
        let filled = ss_io::apply_reference_date(&mut records, reference);
        tracing::info!("參考日期 {} 套用到 {} 筆記錄", reference, filled);
    }

    let mut outcome = BatchCalculator::compute_all(&records, &calculator);

    if let Some(path) = &targets {
        let item_targets = ss_io::load_targets_file(path)
            .with_context(|| format!("無法讀取目標數量檔 {}", path.display()))?;
        BatchCalculator::apply_targets(
            &mut outcome.results,
            &item_targets,
            &calculator.config().class_weights,
        );
    }

    ss_io::export_results_file(&output, &outcome.results)
        .with_context(|| format!("無法寫出結果 {}", output.display()))?;

    let summary = BatchSummary::from_results(&outcome.results, outcome.rejected.len());
    println!("{}", summary);

    if targets.is_some() {
        for item in ItemSummary::by_item(&outcome.results) {
            if let Some(allocated) = item.total_allocated {
                println!(
                    "  {}：{} 個門市，分配 {}，建議合計 {}",
                    item.item_code, item.location_count, allocated, item.total_suggested
                );
            }
        }
    }

    for rejected in &outcome.rejected {
        eprintln!(
            "第 {} 筆（Article {}, Site {}）被拒絕：{}",
            rejected.index + 1,
            rejected.item_code,
            rejected.location_code,
            rejected.error
        );
    }

    Ok(())
}

fn init_settings(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} 已存在，使用 --force 覆寫", path.display());
    }
    SafetyStockConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("無法寫出設定檔 {}", path.display()))?;
    println!("已寫出預設設定：{}", path.display());
    Ok(())
}
