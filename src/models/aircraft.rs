use serde::Serialize;

use crate::config::Config;
use crate::models::{
    common::{math_utils, SECONDS_PER_HOUR},
    sensor::{SensorAssumption, SensorClass},
};

/// 捜索機
///
/// 1回の評価における機体のスナップショットです。コストと滞空時間は
/// 生成時に一度だけ計算し、以降は変更しません。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aircraft {
    /// 飛行高度（kft）
    pub alt_kft: f64,
    /// 飛行高度（m）
    pub alt_m: f64,
    /// 巡航速度（マッハ）
    pub mach: f64,
    /// 旋回時のバンク角（ラジアン）
    pub bank_angle_rad: f64,
    /// 減速率（G、負値で減速）
    pub decel_gees: f64,
    /// 最小機動速度（マッハ）
    pub min_mach: f64,
    pub sensor: SensorClass,
    pub sensor_assumption: SensorAssumption,
    /// 機体単価（百万ドル、センサー込み）
    pub cost_musd: f64,
    /// 滞空時間（時間）
    pub endurance_hr: f64,
    /// 滞空時間（秒）
    pub endurance_s: f64,
}

impl Aircraft {
    pub fn new(config: &Config) -> Self {
        let alt_m = math_utils::kft_to_m(config.altitude_kft);
        let endurance_hr = endurance(config.mach, alt_m);

        Self {
            alt_kft: config.altitude_kft,
            alt_m,
            mach: config.mach,
            bank_angle_rad: math_utils::deg_to_rad(config.maneuver.bank_angle_deg),
            decel_gees: config.maneuver.decel_gees,
            min_mach: config.maneuver.min_mach,
            sensor: config.sensor,
            sensor_assumption: config.sensor_assumption.clone(),
            cost_musd: cost(config.mach, alt_m, &config.sensor_assumption),
            endurance_hr,
            endurance_s: endurance_hr * SECONDS_PER_HOUR,
        }
    }

    /// 巡航速度（m/s）
    pub fn cruise_speed_mps(&self) -> f64 {
        math_utils::mach_to_mps(self.mach)
    }

    /// 最小機動速度（m/s）
    pub fn min_speed_mps(&self) -> f64 {
        math_utils::mach_to_mps(self.min_mach)
    }
}

/// 滞空時間モデル（時間）
///
/// 規定の近似式は高度を kft で受け取るため、メートルから換算して適用します。
pub fn endurance(mach: f64, alt_m: f64) -> f64 {
    let alt_kft = math_utils::m_to_kft(alt_m);
    -18.75 * mach.powi(2) + 8.0893 * mach + 0.01 * alt_kft.powi(2) + 0.05 * alt_kft + 9.2105
}

/// 機体コストモデル（百万ドル）
pub fn cost(mach: f64, alt_m: f64, sensor_assumption: &SensorAssumption) -> f64 {
    let alt_kft = math_utils::m_to_kft(alt_m);
    50.0 * mach.powi(2) - 35.0 * mach + 0.03 * alt_kft.powi(2) - 0.2 * alt_kft
        + 11.0
        + sensor_assumption.cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::reference_config;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_aircraft_derived_values() {
        let config = reference_config();
        let ac = Aircraft::new(&config);

        assert_abs_diff_eq!(ac.alt_m, 15_000.0 / 3.2808, epsilon = 1e-9);
        assert_abs_diff_eq!(ac.bank_angle_rad, 35.0_f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(ac.cruise_speed_mps(), 205.8, epsilon = 1e-9);
        assert_abs_diff_eq!(ac.min_speed_mps(), 51.45, epsilon = 1e-9);

        // 15kft, M0.6: -6.75 + 4.85358 + 2.25 + 0.75 + 9.2105
        assert_abs_diff_eq!(ac.endurance_hr, 10.31408, epsilon = 1e-3);
        assert_abs_diff_eq!(ac.endurance_s, ac.endurance_hr * 3600.0, epsilon = 1e-9);
        // 18 - 21 + 6.75 - 3 + 11 + 1
        assert_abs_diff_eq!(ac.cost_musd, 12.75, epsilon = 1e-3);
    }

    #[test]
    fn test_cost_includes_sensor_cost() {
        let low = SensorAssumption::baseline(SensorClass::Low, 8);
        let high = SensorAssumption::baseline(SensorClass::High, 8);
        let diff = cost(0.5, 3000.0, &high) - cost(0.5, 3000.0, &low);
        assert_abs_diff_eq!(diff, 9.95, epsilon = 1e-12);
    }
}
