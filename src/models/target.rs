use serde::{Deserialize, Serialize};

use crate::models::common::math_utils;

/// 設計目標（捜索対象の水上目標）
///
/// 長さ・高さ（メートル）と最大速力（ノット）を持ちます。
/// 高さ軸は長さ軸より短く、センサー探知距離の制約側になります。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTarget {
    /// 目標種別（例: "Frigate"）
    #[serde(rename = "type")]
    pub label: String,
    /// 目標の長さ（m、水平方向）
    pub length_m: f64,
    /// 目標の高さ（m、垂直方向）
    pub height_m: f64,
    /// 最大速力（kt）
    pub max_speed_kts: f64,
}

impl DesignTarget {
    pub fn new(label: impl Into<String>, dims_m: (f64, f64), max_speed_kts: f64) -> Self {
        Self {
            label: label.into(),
            length_m: dims_m.0,
            height_m: dims_m.1,
            max_speed_kts,
        }
    }

    /// (長さ, 高さ) の組
    pub fn dims(&self) -> (f64, f64) {
        (self.length_m, self.height_m)
    }

    /// 最大速力（m/s）
    pub fn max_speed_mps(&self) -> f64 {
        math_utils::knots_to_mps(self.max_speed_kts)
    }
}

/// 捜索対象海域（AOI）
///
/// 矩形の捜索区域と、区域までの進出・帰投距離、再捜索時間要求を保持します。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    /// 区域の長さ（m、捜索レグ方向）
    pub length_m: f64,
    /// 区域の幅（m、レグ間隔方向）
    pub width_m: f64,
    /// 進出距離（m）
    pub ingress_m: f64,
    /// 帰投距離（m）
    pub egress_m: f64,
    /// 再捜索時間要求（時間）
    pub revisit_time_hr: f64,
}

impl AreaOfInterest {
    /// 区域の面積（m²）
    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }

    /// 進出＋帰投の合計距離（m）
    pub fn transit_m(&self) -> f64 {
        self.ingress_m + self.egress_m
    }
}
