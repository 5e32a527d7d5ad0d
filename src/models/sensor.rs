use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{
    common::{math_utils, AxisPair},
    target::DesignTarget,
};

/// EO/IRセンサーの等級
///
/// 等級そのものは単なる値で、光学諸元は `SensorAssumption::baseline` の
/// 対応表から引きます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorClass {
    Low,
    Med,
    High,
}

impl SensorClass {
    pub const ALL: [SensorClass; 3] = [SensorClass::Low, SensorClass::Med, SensorClass::High];

    pub fn name(&self) -> &'static str {
        match self {
            SensorClass::Low => "LOW",
            SensorClass::Med => "MED",
            SensorClass::High => "HIGH",
        }
    }
}

impl fmt::Display for SensorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(SensorClass::Low),
            "MED" | "MEDIUM" => Ok(SensorClass::Med),
            "HIGH" => Ok(SensorClass::High),
            _ => Err(format!("無効なセンサー等級: {}. 利用可能: LOW, MED, HIGH", s)),
        }
    }
}

/// センサーの光学諸元の仮定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorAssumption {
    /// 視野角（度、水平・垂直）
    pub fov_deg: (f64, f64),
    /// 画素数（水平・垂直）
    pub resolution: (u32, u32),
    /// 探知に必要なJohnson基準の画素数
    pub johnson_req: u32,
    /// センサー単価（百万ドル）
    pub cost: f64,
}

impl SensorAssumption {
    /// 等級ごとの標準諸元
    ///
    /// # 引数
    ///
    /// * `class` - センサー等級
    /// * `johnson_req` - Johnson基準の画素数（2: 認知, 8: 識別, 13: 類別 など）
    pub fn baseline(class: SensorClass, johnson_req: u32) -> Self {
        let (fov, res, cost) = match class {
            SensorClass::Low => (15.0, 640, 0.05),
            SensorClass::Med => (30.0, 1024, 1.0),
            SensorClass::High => (60.0, 1920, 10.0),
        };
        Self {
            fov_deg: (fov, fov),
            resolution: (res, res),
            johnson_req,
            cost,
        }
    }

    /// 視野角（ラジアン、水平・垂直）
    pub fn fov_rad(&self) -> AxisPair {
        (
            math_utils::deg_to_rad(self.fov_deg.0),
            math_utils::deg_to_rad(self.fov_deg.1),
        )
    }

    /// 1画素あたりの瞬時視野 IFOV（ラジアン、水平・垂直）
    pub fn ifov_rad(&self) -> AxisPair {
        let fov = self.fov_rad();
        (
            fov.0 / self.resolution.0 as f64,
            fov.1 / self.resolution.1 as f64,
        )
    }
}

/// センサー探知性能
///
/// (センサー, 目標) の組ごとに一度だけ計算されます。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorPerformance {
    /// 斜距離での探知距離（m、長さ軸・高さ軸）
    pub slant_detection_range: AxisPair,
}

/// センサー諸元と目標寸法から斜距離探知距離を計算
///
/// 各軸で IFOV = FOV / 画素数、必要GSD = 目標寸法 / Johnson画素数、
/// 斜距離 = GSD / IFOV とします。水平軸は目標長さ、垂直軸は目標高さに対応します。
pub fn calc_sensor_performance(
    assumption: &SensorAssumption,
    target: &DesignTarget,
) -> SensorPerformance {
    let ifov = assumption.ifov_rad();
    let johnson = assumption.johnson_req as f64;
    let gsd = (target.length_m / johnson, target.height_m / johnson);

    SensorPerformance {
        slant_detection_range: (gsd.0 / ifov.0, gsd.1 / ifov.1),
    }
}
