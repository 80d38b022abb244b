//! # Safety Stock I/O
//!
//! CSV 輸入、商品目標數量與結果匯出

pub mod reader;
pub mod targets;
pub mod writer;

pub use reader::{apply_reference_date, load_records, load_records_file};
pub use targets::{load_targets, load_targets_file};
pub use writer::{export_results, export_results_file, ExportRow};

use ss_core::SsError;

/// 檔案處理錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("CSV 格式錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("檔案讀寫錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("第 {line} 行資料錯誤: {message}")]
    InvalidRow { line: u64, message: String },

    #[error(transparent)]
    Core(#[from] SsError),
}

pub type Result<T> = std::result::Result<T, IoError>;
