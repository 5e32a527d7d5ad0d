use serde::Serialize;
use tracing::debug;

use crate::models::{common::AxisPair, target::AreaOfInterest};

pub const REASON_ALTITUDE_EXCEEDS_SLANT_RANGE: &str = "altitude exceeds slant detection range";

/// 捜索機の地表面探知フットプリント
///
/// 各値は (長さ軸, 高さ軸) の組です。高度が斜距離探知距離を超える場合は
/// `valid = false` となり、距離はすべて `None` になります。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPerformance {
    pub valid: bool,
    pub reason: Option<String>,
    /// 地上距離での探知距離（m）
    pub ground_detection_range: Option<AxisPair>,
    /// 進行方向前方の探知距離（m）
    pub downtrack_detection_range: Option<AxisPair>,
    /// 進行方向に直交する探知幅（m）
    pub crosstrack_detection_width: Option<AxisPair>,
}

impl SearchPerformance {
    fn invalid(reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
            ground_detection_range: None,
            downtrack_detection_range: None,
            crosstrack_detection_width: None,
        }
    }

    /// 高さ軸（制約側）の前方探知距離
    pub fn downtrack_height_axis(&self) -> Option<f64> {
        self.downtrack_detection_range.map(|range| range.1)
    }

    /// 高さ軸（制約側）の探知幅
    pub fn crosstrack_height_axis(&self) -> Option<f64> {
        self.crosstrack_detection_width.map(|width| width.1)
    }

    /// 長さ軸の探知幅
    pub fn crosstrack_length_axis(&self) -> Option<f64> {
        self.crosstrack_detection_width.map(|width| width.0)
    }
}

/// 斜距離探知距離と高度から地表面のフットプリントを計算
///
/// 高度が斜距離以上の軸があれば、その高度からは目標を見下ろせないため
/// 直ちに不成立として返します。
///
/// 前方距離と探知幅への投影には両軸とも水平視野角の半角を用います
/// （センサー視野はほぼ正方形という前提）。
///
/// # 引数
///
/// * `alt_m` - 飛行高度（m）
/// * `slant_det_range` - 斜距離探知距離（m、長さ軸・高さ軸）
/// * `fov_rad` - 視野角（ラジアン、水平・垂直）
/// * `_aoi` - 捜索区域
pub fn calc_search_performance(
    alt_m: f64,
    slant_det_range: AxisPair,
    fov_rad: AxisPair,
    _aoi: &AreaOfInterest,
) -> SearchPerformance {
    for slant in [slant_det_range.0, slant_det_range.1] {
        if alt_m >= slant {
            debug!(alt_m, slant, "高度が斜距離探知距離以上のため探知不能");
            return SearchPerformance::invalid(REASON_ALTITUDE_EXCEEDS_SLANT_RANGE);
        }
    }

    let ground = |slant: f64| (slant.powi(2) - alt_m.powi(2)).sqrt();
    let ground_range = (ground(slant_det_range.0), ground(slant_det_range.1));

    let half_fov_h = fov_rad.0 / 2.0;
    let downtrack = (
        ground_range.0 * half_fov_h.cos(),
        ground_range.1 * half_fov_h.cos(),
    );
    let crosstrack = (
        2.0 * ground_range.0 * half_fov_h.sin(),
        2.0 * ground_range.1 * half_fov_h.sin(),
    );

    SearchPerformance {
        valid: true,
        reason: None,
        ground_detection_range: Some(ground_range),
        downtrack_detection_range: Some(downtrack),
        crosstrack_detection_width: Some(crosstrack),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn aoi() -> AreaOfInterest {
        AreaOfInterest {
            length_m: 100_000.0,
            width_m: 100_000.0,
            ingress_m: 100_000.0,
            egress_m: 100_000.0,
            revisit_time_hr: 6.0,
        }
    }

    #[test]
    fn test_ground_range_is_pythagorean() {
        let fov = (30.0_f64.to_radians(), 30.0_f64.to_radians());
        let perf = calc_search_performance(4_000.0, (48_000.0, 12_000.0), fov, &aoi());

        assert!(perf.valid);
        assert!(perf.reason.is_none());
        let ground = perf.ground_detection_range.unwrap();
        assert_abs_diff_eq!(ground.0, (48_000.0_f64.powi(2) - 4_000.0_f64.powi(2)).sqrt(), epsilon = 1e-6);
        assert_abs_diff_eq!(ground.1, (12_000.0_f64.powi(2) - 4_000.0_f64.powi(2)).sqrt(), epsilon = 1e-6);

        let half = 15.0_f64.to_radians();
        let downtrack = perf.downtrack_detection_range.unwrap();
        let crosstrack = perf.crosstrack_detection_width.unwrap();
        assert_abs_diff_eq!(downtrack.1, ground.1 * half.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(crosstrack.0, 2.0 * ground.0 * half.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(crosstrack.1, 2.0 * ground.1 * half.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_projection_uses_horizontal_half_angle_for_both_axes() {
        // 垂直視野角を変えても前方距離・探知幅は変わらない
        let narrow_v = calc_search_performance(1_000.0, (20_000.0, 8_000.0), (0.5, 0.1), &aoi());
        let wide_v = calc_search_performance(1_000.0, (20_000.0, 8_000.0), (0.5, 1.2), &aoi());
        assert_eq!(narrow_v.downtrack_detection_range, wide_v.downtrack_detection_range);
        assert_eq!(narrow_v.crosstrack_detection_width, wide_v.crosstrack_detection_width);
    }

    #[test]
    fn test_altitude_at_or_above_either_slant_range_is_invalid() {
        let fov = (0.5, 0.5);
        for alt in [12_000.0, 12_000.1, 30_000.0, 60_000.0] {
            let perf = calc_search_performance(alt, (48_000.0, 12_000.0), fov, &aoi());
            assert!(!perf.valid, "alt={}", alt);
            assert_eq!(perf.reason.as_deref(), Some(REASON_ALTITUDE_EXCEEDS_SLANT_RANGE));
            assert!(perf.ground_detection_range.is_none());
            assert!(perf.downtrack_detection_range.is_none());
            assert!(perf.crosstrack_detection_width.is_none());
        }
    }

    #[test]
    fn test_height_axis_accessors() {
        let perf = calc_search_performance(500.0, (9_000.0, 3_000.0), (0.6, 0.6), &aoi());
        assert_eq!(perf.downtrack_height_axis(), perf.downtrack_detection_range.map(|d| d.1));
        assert_eq!(perf.crosstrack_height_axis(), perf.crosstrack_detection_width.map(|w| w.1));
        assert_eq!(perf.crosstrack_length_axis(), perf.crosstrack_detection_width.map(|w| w.0));
    }
}
