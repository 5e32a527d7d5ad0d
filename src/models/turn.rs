//! # 反転旋回（ターンアラウンド）モデル
//!
//! 捜索レグの終端で、隣接レグへ横方向にオフセットしながら 180° 針路を
//! 反転するのに要する時間と経路幾何を計算します。
//!
//! 1. **減速直進**: 区域を出た後、高さ軸の前方探知距離ぶん直進しながら
//!    最小機動速度まで減速（センサーの空白を作らないための余裕距離）
//! 2. **旋回**: 協調旋回の半径 R = v²/(g·tanφ) で反転。オフセット S が
//!    2R 以上なら直線＋半円、2R 未満なら3円弧のS字旋回
//! 3. **加速直進**: 1 の鏡像（同じ所要時間で巡航速度へ復帰）

use std::f64::consts::PI;

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{
    aircraft::Aircraft,
    common::{math_utils, GEE, SECONDS_PER_HOUR},
    error::ModelError,
    footprint::SearchPerformance,
};

/// 減速直進区間の計算結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StraightLeg {
    /// 区間の所要時間（秒）
    pub time_s: f64,
    /// 区間終端での速度（m/s）
    pub final_speed_mps: f64,
    /// そのうち減速に費やした時間（秒）
    pub decel_time_s: f64,
}

/// 旋回区間の経路形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnGeometry {
    /// 直線区間＋半円（S ≥ 2R）
    StraightAndArc,
    /// 3円弧のS字旋回（S < 2R）
    STurn,
}

/// 反転旋回の所要時間と幾何
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TurnAroundTime {
    /// 合計所要時間（秒）
    pub total_s: f64,
    /// 区域離脱後の減速直進（秒）
    pub exit_leg_s: f64,
    /// 旋回区間（秒）
    pub turn_s: f64,
    /// 区域再進入前の加速直進（秒）
    pub entry_leg_s: f64,
    /// 旋回時の機動速度（m/s）
    pub maneuver_speed_mps: f64,
    /// 旋回半径（m）
    pub turn_radius_m: f64,
    /// 旋回で掃引する合計角度（ラジアン）
    pub swept_angle_rad: f64,
    /// 旋回区間中の直線距離（m）
    pub straight_segment_m: f64,
    /// 要求された横方向オフセット（m）
    pub lateral_offset_m: f64,
    pub geometry: TurnGeometry,
}

impl TurnAroundTime {
    /// 合計所要時間（時間）
    pub fn total_hr(&self) -> f64 {
        self.total_s / SECONDS_PER_HOUR
    }
}

/// 一定の減速度で所定距離を直進する区間の所要時間と終端速度
///
/// 最小速度 `v_min` を下回ることはなく、到達後は等速で残りの距離を進みます。
/// 距離内で最小速度に達しない場合は ½at² + v0·t − d = 0 の正の根を用います。
///
/// # 引数
///
/// * `v0` - 初速（m/s）
/// * `v_min` - 最小速度（m/s）
/// * `accel` - 加速度（m/s²、負値で減速）
/// * `distance` - 直進距離（m）
pub fn straight_decel_leg(v0: f64, v_min: f64, accel: f64, distance: f64) -> StraightLeg {
    if distance <= 0.0 {
        return StraightLeg {
            time_s: 0.0,
            final_speed_mps: v0,
            decel_time_s: 0.0,
        };
    }

    // 減速しない、またはすでに最小速度以下
    if accel >= 0.0 || v0 <= v_min {
        return StraightLeg {
            time_s: distance / v0,
            final_speed_mps: v0,
            decel_time_s: 0.0,
        };
    }

    let t_min = (v_min - v0) / accel;
    let d_min = (v_min.powi(2) - v0.powi(2)) / (2.0 * accel);

    if distance <= d_min {
        // 最小速度に達する前に距離を消化する
        let final_speed = (v0.powi(2) + 2.0 * accel * distance).sqrt();
        let t = 2.0 * distance / (v0 + final_speed);
        StraightLeg {
            time_s: t,
            final_speed_mps: final_speed,
            decel_time_s: t,
        }
    } else {
        StraightLeg {
            time_s: t_min + (distance - d_min) / v_min,
            final_speed_mps: v_min,
            decel_time_s: t_min,
        }
    }
}

/// 協調水平旋回の旋回半径（m）
pub fn turn_radius(speed_mps: f64, bank_angle_rad: f64) -> f64 {
    speed_mps.powi(2) / (GEE * bank_angle_rad.tan())
}

/// 協調水平旋回による反転の所要時間を計算
///
/// # 引数
///
/// * `ac` - 捜索機
/// * `lateral_offset_m` - 次のレグまでの横方向オフセット S（m）
/// * `search_perf` - 探知フットプリント（高さ軸の前方探知距離を直進余裕に使用）
///
/// # 戻り値
///
/// 所要時間と経路幾何。S字旋回の acos 引数が定義域外になる組み合わせは
/// `ModelError::AcosDomain` として返します。
pub fn calc_turnaround_time(
    ac: &Aircraft,
    lateral_offset_m: f64,
    search_perf: &SearchPerformance,
) -> Result<TurnAroundTime, ModelError> {
    let buffer_m = search_perf
        .downtrack_height_axis()
        .ok_or(ModelError::InvalidSearchPerformance)?;

    let exit_leg = straight_decel_leg(
        ac.cruise_speed_mps(),
        ac.min_speed_mps(),
        ac.decel_gees * GEE,
        buffer_m,
    );
    let speed = exit_leg.final_speed_mps;
    let radius = math_utils::ensure_finite(turn_radius(speed, ac.bank_angle_rad), "旋回半径")?;

    let (geometry, swept_angle, straight_m) = if lateral_offset_m >= 2.0 * radius {
        (TurnGeometry::StraightAndArc, PI, lateral_offset_m - 2.0 * radius)
    } else {
        let arg = (radius + lateral_offset_m / 2.0) / (2.0 * radius);
        let reversal = math_utils::checked_acos(arg, "S字旋回").inspect_err(|e| {
            warn!(lateral_offset_m, radius, "S字旋回の幾何が成立しません: {}", e);
        })?;
        (TurnGeometry::STurn, PI + 4.0 * reversal, 0.0)
    };

    let turn_s = (straight_m + swept_angle * radius) / speed;
    let total_s = math_utils::ensure_finite(exit_leg.time_s + turn_s + exit_leg.time_s, "反転所要時間")?;

    debug!(
        lateral_offset_m,
        radius,
        speed,
        ?geometry,
        total_s,
        "反転旋回: 減速 {:.1}秒 / 旋回 {:.1}秒",
        exit_leg.time_s,
        turn_s
    );

    Ok(TurnAroundTime {
        total_s,
        exit_leg_s: exit_leg.time_s,
        turn_s,
        entry_leg_s: exit_leg.time_s,
        maneuver_speed_mps: speed,
        turn_radius_m: radius,
        swept_angle_rad: swept_angle,
        straight_segment_m: straight_m,
        lateral_offset_m,
        geometry,
    })
}
