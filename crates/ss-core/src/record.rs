//! 輸入記錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ClassCode, PeriodDays, Result, SsError};

/// 單筆（商品, 門市）輸入記錄
///
/// 由外部資料準備步驟產生：欄位已正規化、型別已轉換、必要欄位非空。
/// 可選欄位格式錯誤時一律視為缺值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// 商品編號
    pub item_code: String,

    /// 門市代碼
    pub location_code: String,

    /// 店舖等級（原始文字，計算時驗證）
    pub class_code: String,

    /// 上月銷量
    pub last_month_qty: Decimal,

    /// 前兩月銷量
    pub last_2_month_qty: Decimal,

    /// 本月至今銷量
    pub mtd_qty: Option<Decimal>,

    /// 本月至今天數
    pub mtd_days: Option<u32>,

    /// 上月天數
    pub last_month_days: Option<u32>,

    /// 前兩月天數
    pub last_2_month_days: Option<u32>,

    /// 供應來源代碼
    pub supply_source: String,

    /// 最小訂購量
    pub moq: Decimal,

    /// 現有安全庫存
    pub original_safety_stock: Option<Decimal>,

    /// 補貨類型（RP Type）
    pub rp_type: Option<String>,

    /// 特殊品類代碼（MCH2）
    pub special_category: Option<String>,

    /// 區域
    pub region: Option<String>,

    /// 貨場面積
    pub shop_size: Option<String>,

    /// 目標數量
    pub target_qty: Option<Decimal>,

    /// 上市日期
    pub launch_date: Option<NaiveDate>,

    /// 參考日期
    pub reference_date: Option<NaiveDate>,

    /// 產品階層
    pub product_hierarchy: Option<String>,

    /// 商品描述
    pub description: Option<String>,
}

impl LineItemInput {
    /// 創建新的輸入記錄（必要欄位）
    pub fn new(
        item_code: impl Into<String>,
        location_code: impl Into<String>,
        class_code: impl Into<String>,
        last_month_qty: Decimal,
        last_2_month_qty: Decimal,
        supply_source: impl Into<String>,
        moq: Decimal,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            location_code: location_code.into(),
            class_code: class_code.into(),
            last_month_qty,
            last_2_month_qty,
            mtd_qty: None,
            mtd_days: None,
            last_month_days: None,
            last_2_month_days: None,
            supply_source: supply_source.into(),
            moq,
            original_safety_stock: None,
            rp_type: None,
            special_category: None,
            region: None,
            shop_size: None,
            target_qty: None,
            launch_date: None,
            reference_date: None,
            product_hierarchy: None,
            description: None,
        }
    }

    /// 建構器模式：設置本月至今銷量
    pub fn with_mtd_qty(mut self, qty: Decimal) -> Self {
        self.mtd_qty = Some(qty);
        self
    }

    /// 建構器模式：設置三期天數
    pub fn with_period_days(mut self, days: PeriodDays) -> Self {
        self.mtd_days = Some(days.mtd_days);
        self.last_month_days = Some(days.last_month_days);
        self.last_2_month_days = Some(days.last_2_month_days);
        self
    }

    /// 建構器模式：設置參考日期，並依參考日期推算三期天數
    pub fn with_reference_date_periods(self, reference: NaiveDate) -> Self {
        self.with_period_days(PeriodDays::from_reference_date(reference))
            .with_reference_date(reference)
    }

    /// 建構器模式：設置參考日期
    pub fn with_reference_date(mut self, reference: NaiveDate) -> Self {
        self.reference_date = Some(reference);
        self
    }

    /// 建構器模式：設置上市日期
    pub fn with_launch_date(mut self, launch: NaiveDate) -> Self {
        self.launch_date = Some(launch);
        self
    }

    /// 建構器模式：設置現有安全庫存
    pub fn with_original_safety_stock(mut self, qty: Decimal) -> Self {
        self.original_safety_stock = Some(qty);
        self
    }

    /// 建構器模式：設置補貨類型
    pub fn with_rp_type(mut self, rp_type: impl Into<String>) -> Self {
        self.rp_type = Some(rp_type.into());
        self
    }

    /// 建構器模式：設置特殊品類代碼
    pub fn with_special_category(mut self, code: impl Into<String>) -> Self {
        self.special_category = Some(code.into());
        self
    }

    /// 建構器模式：設置區域與貨場面積
    pub fn with_shop_type(
        mut self,
        region: impl Into<String>,
        shop_size: impl Into<String>,
    ) -> Self {
        self.region = Some(region.into());
        self.shop_size = Some(shop_size.into());
        self
    }

    /// 建構器模式：設置目標數量
    pub fn with_target_qty(mut self, qty: Decimal) -> Self {
        self.target_qty = Some(qty);
        self
    }

    /// 建構器模式：設置產品階層與商品描述
    pub fn with_product_info(
        mut self,
        product_hierarchy: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.product_hierarchy = Some(product_hierarchy.into());
        self.description = Some(description.into());
        self
    }

    /// 三期天數（任一缺值時返回 None）
    pub fn period_days(&self) -> Option<PeriodDays> {
        Some(PeriodDays::new(
            self.mtd_days?,
            self.last_month_days?,
            self.last_2_month_days?,
        ))
    }

    /// 驗證識別欄位並解析店舖等級
    pub fn validate_identity(&self) -> Result<ClassCode> {
        if self.item_code.trim().is_empty() {
            return Err(SsError::Validation("Article 不能為空".to_string()));
        }
        if self.location_code.trim().is_empty() {
            return Err(SsError::Validation(format!(
                "Site 不能為空（Article {}）",
                self.item_code
            )));
        }
        if self.class_code.trim().is_empty() {
            return Err(SsError::Validation(format!(
                "Shop Class 不能為空（Article {}, Site {}）",
                self.item_code, self.location_code
            )));
        }
        self.class_code.parse()
    }
}
