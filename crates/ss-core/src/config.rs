//! 安全庫存計算設定

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::{ClassCategory, ClassCode, Result, SsError};

/// 天數設定的允許範圍
pub const MIN_DAYS: u32 = 3;
pub const MAX_DAYS: u32 = 21;

/// MOQ 約束模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoqMode {
    /// 乘數模式：MOQ × multiplier
    Multiplier,
    /// 加 1 模式：MOQ + 1
    AddOne,
}

/// 計算參數（單次計算期間不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyStockConfig {
    /// 全域天數設定（3-21）
    pub max_safety_stock_days: u32,

    /// 按店舖等級覆寫的天數設定，未設定的等級使用全域值
    pub per_class_max_days: BTreeMap<ClassCode, u32>,

    /// MOQ 乘數（> 0）
    pub moq_multiplier: Decimal,

    /// MOQ 約束模式
    pub moq_mode: MoqMode,

    /// 記錄帶有 Target Qty 時直接使用該值
    pub use_target_qty_mode: bool,

    /// 以店舖類型固定值取代公式（查表成功時）
    pub use_shop_type_mode: bool,

    /// false 時 RP Type 為 "ND" 的記錄保留原安全庫存
    pub calculate_for_all_rp_types: bool,

    /// 等級類別權重（僅用於目標數量分配）
    pub class_weights: BTreeMap<ClassCategory, u32>,
}

impl Default for SafetyStockConfig {
    fn default() -> Self {
        Self {
            max_safety_stock_days: 7,
            per_class_max_days: BTreeMap::new(),
            moq_multiplier: Decimal::new(125, 2),
            moq_mode: MoqMode::Multiplier,
            use_target_qty_mode: false,
            use_shop_type_mode: false,
            calculate_for_all_rp_types: true,
            class_weights: default_class_weights(),
        }
    }
}

/// 預設權重 A:3, B:2, C:1, D:1
pub fn default_class_weights() -> BTreeMap<ClassCategory, u32> {
    BTreeMap::from([
        (ClassCategory::A, 3),
        (ClassCategory::B, 2),
        (ClassCategory::C, 1),
        (ClassCategory::D, 1),
    ])
}

impl SafetyStockConfig {
    /// 建構器模式：設置全域天數
    pub fn with_max_safety_stock_days(mut self, days: u32) -> Self {
        self.max_safety_stock_days = days;
        self
    }

    /// 建構器模式：設置單一等級的天數
    pub fn with_class_max_days(mut self, class: ClassCode, days: u32) -> Self {
        self.per_class_max_days.insert(class, days);
        self
    }

    /// 建構器模式：設置 MOQ 乘數
    pub fn with_moq_multiplier(mut self, multiplier: Decimal) -> Self {
        self.moq_multiplier = multiplier;
        self
    }

    /// 建構器模式：設置 MOQ 模式
    pub fn with_moq_mode(mut self, mode: MoqMode) -> Self {
        self.moq_mode = mode;
        self
    }

    /// 建構器模式：啟用/停用 Target Qty 模式
    pub fn with_target_qty_mode(mut self, enabled: bool) -> Self {
        self.use_target_qty_mode = enabled;
        self
    }

    /// 建構器模式：啟用/停用店舖類型模式
    pub fn with_shop_type_mode(mut self, enabled: bool) -> Self {
        self.use_shop_type_mode = enabled;
        self
    }

    /// 建構器模式：是否計算所有 RP Type
    pub fn with_calculate_for_all_rp_types(mut self, enabled: bool) -> Self {
        self.calculate_for_all_rp_types = enabled;
        self
    }

    /// 建構器模式：設置等級類別權重
    pub fn with_class_weight(mut self, category: ClassCategory, weight: u32) -> Self {
        self.class_weights.insert(category, weight);
        self
    }

    /// 取得特定等級的天數設定（未覆寫時返回全域設定）
    pub fn max_days_for(&self, class: ClassCode) -> u32 {
        self.per_class_max_days
            .get(&class)
            .copied()
            .unwrap_or(self.max_safety_stock_days)
    }

    /// 取得等級類別權重，未設定時為 1
    pub fn weight_for(&self, category: ClassCategory) -> u32 {
        self.class_weights.get(&category).copied().unwrap_or(1)
    }

    /// 驗證設定參數是否在有效範圍內
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.max_safety_stock_days) {
            return Err(SsError::InvalidConfig(format!(
                "max_safety_stock_days 必須在 {}-{} 之間，當前值：{}",
                MIN_DAYS, MAX_DAYS, self.max_safety_stock_days
            )));
        }

        if self.moq_multiplier <= Decimal::ZERO {
            return Err(SsError::InvalidConfig(format!(
                "moq_multiplier 必須大於 0，當前值：{}",
                self.moq_multiplier
            )));
        }

        for (class, days) in &self.per_class_max_days {
            if !(MIN_DAYS..=MAX_DAYS).contains(days) {
                return Err(SsError::InvalidConfig(format!(
                    "Shop Class {} 的天數必須在 {}-{} 之間，當前值：{}",
                    class, MIN_DAYS, MAX_DAYS, days
                )));
            }
        }

        Ok(())
    }

    /// 從 JSON 字串載入並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SafetyStockConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 轉為 JSON 字串
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 從檔案載入設定，檔案不存在時返回預設設定
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// 將設定儲存到 JSON 檔案
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = SafetyStockConfig::default();

        assert_eq!(config.max_safety_stock_days, 7);
        assert_eq!(config.moq_multiplier, Decimal::new(125, 2));
        assert_eq!(config.moq_mode, MoqMode::Multiplier);
        assert!(config.calculate_for_all_rp_types);
        assert!(!config.use_target_qty_mode);
        assert!(!config.use_shop_type_mode);
        assert_eq!(config.weight_for(ClassCategory::A), 3);
        assert_eq!(config.weight_for(ClassCategory::D), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SafetyStockConfig::default()
            .with_max_safety_stock_days(10)
            .with_class_max_days(ClassCode::AA, 14)
            .with_moq_mode(MoqMode::AddOne)
            .with_target_qty_mode(true)
            .with_class_weight(ClassCategory::C, 0);

        assert_eq!(config.max_days_for(ClassCode::AA), 14);
        assert_eq!(config.max_days_for(ClassCode::B1), 10);
        assert_eq!(config.moq_mode, MoqMode::AddOne);
        assert!(config.use_target_qty_mode);
        assert_eq!(config.weight_for(ClassCategory::C), 0);
    }

    #[rstest]
    #[case(2)]
    #[case(22)]
    fn test_reject_global_days_out_of_range(#[case] days: u32) {
        let config = SafetyStockConfig::default().with_max_safety_stock_days(days);
        assert!(matches!(config.validate(), Err(SsError::InvalidConfig(_))));
    }

    #[rstest]
    #[case(3)]
    #[case(21)]
    fn test_accept_days_at_bounds(#[case] days: u32) {
        let config = SafetyStockConfig::default()
            .with_max_safety_stock_days(days)
            .with_class_max_days(ClassCode::D1, days);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reject_class_days_out_of_range() {
        let config = SafetyStockConfig::default().with_class_max_days(ClassCode::C2, 30);
        assert!(matches!(config.validate(), Err(SsError::InvalidConfig(_))));
    }

    #[test]
    fn test_reject_non_positive_multiplier() {
        let config = SafetyStockConfig::default().with_moq_multiplier(Decimal::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_with_partial_fields() {
        let json = r#"{
            "max_safety_stock_days": 9,
            "moq_mode": "add_one",
            "per_class_max_days": { "AA": 12 }
        }"#;
        let config = SafetyStockConfig::from_json_str(json).unwrap();

        assert_eq!(config.max_safety_stock_days, 9);
        assert_eq!(config.moq_mode, MoqMode::AddOne);
        assert_eq!(config.max_days_for(ClassCode::AA), 12);
        // 未提供的欄位使用預設值
        assert_eq!(config.moq_multiplier, Decimal::new(125, 2));
        assert_eq!(config.weight_for(ClassCategory::B), 2);
    }

    #[test]
    fn test_json_rejects_unknown_class_key() {
        let json = r#"{ "per_class_max_days": { "E9": 7 } }"#;
        assert!(matches!(
            SafetyStockConfig::from_json_str(json),
            Err(SsError::Json(_))
        ));
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let json = r#"{ "max_safety_stock_days": 40 }"#;
        assert!(matches!(
            SafetyStockConfig::from_json_str(json),
            Err(SsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("ss-core-config-{}", std::process::id()));
        let path = dir.join("nested").join("settings.json");

        let config = SafetyStockConfig::default()
            .with_max_safety_stock_days(12)
            .with_shop_type_mode(true);
        config.save_to_file(&path).unwrap();

        let loaded = SafetyStockConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = std::env::temp_dir().join("ss-core-does-not-exist").join("settings.json");
        let loaded = SafetyStockConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, SafetyStockConfig::default());
    }
}
