//! # Safety Stock Calculation Engine
//!
//! 安全庫存計算引擎與目標數量分配

pub mod allocation;
pub mod average;
pub mod batch;
pub mod calculator;
pub mod constraints;
pub mod lead_time;
pub mod summary;

// Re-export 主要類型
pub use allocation::{apportion, TargetAllocator};
pub use average::AverageCalculator;
pub use batch::{BatchCalculator, BatchOutcome, RejectedRecord};
pub use calculator::{compute, SafetyStockCalculator};
pub use constraints::ConstraintCalculator;
pub use lead_time::LeadTimeCalculator;
pub use summary::{BatchSummary, ItemSummary};
