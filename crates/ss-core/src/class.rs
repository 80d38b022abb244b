//! 店舖等級模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SsError;

/// 店舖等級（Shop Class）
///
/// 九個有效值，依服務水準由高到低排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassCode {
    AA,
    A1,
    A2,
    A3,
    B1,
    B2,
    C1,
    C2,
    D1,
}

impl ClassCode {
    /// 所有有效等級
    pub const ALL: [ClassCode; 9] = [
        ClassCode::AA,
        ClassCode::A1,
        ClassCode::A2,
        ClassCode::A3,
        ClassCode::B1,
        ClassCode::B2,
        ClassCode::C1,
        ClassCode::C2,
        ClassCode::D1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassCode::AA => "AA",
            ClassCode::A1 => "A1",
            ClassCode::A2 => "A2",
            ClassCode::A3 => "A3",
            ClassCode::B1 => "B1",
            ClassCode::B2 => "B2",
            ClassCode::C1 => "C1",
            ClassCode::C2 => "C2",
            ClassCode::D1 => "D1",
        }
    }

    /// 等級歸類：{AA,A1,A2,A3}→A, {B1,B2}→B, {C1,C2}→C, {D1}→D
    pub fn category(&self) -> ClassCategory {
        match self {
            ClassCode::AA | ClassCode::A1 | ClassCode::A2 | ClassCode::A3 => ClassCategory::A,
            ClassCode::B1 | ClassCode::B2 => ClassCategory::B,
            ClassCode::C1 | ClassCode::C2 => ClassCategory::C,
            ClassCode::D1 => ClassCategory::D,
        }
    }
}

impl FromStr for ClassCode {
    type Err = SsError;

    /// 解析等級代碼（忽略前後空白與大小寫）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        ClassCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                SsError::Validation(format!(
                    "無效的 Shop Class：{}，有效值：AA, A1, A2, A3, B1, B2, C1, C2, D1",
                    s
                ))
            })
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 等級類別（用於權重分配與店舖類型查表）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassCategory {
    A,
    B,
    C,
    D,
}

impl ClassCategory {
    pub const ALL: [ClassCategory; 4] = [
        ClassCategory::A,
        ClassCategory::B,
        ClassCategory::C,
        ClassCategory::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassCategory::A => "A",
            ClassCategory::B => "B",
            ClassCategory::C => "C",
            ClassCategory::D => "D",
        }
    }
}

impl fmt::Display for ClassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
