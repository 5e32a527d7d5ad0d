use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    aircraft::Aircraft,
    common::SECONDS_PER_HOUR,
    error::ModelError,
    footprint::SearchPerformance,
    target::AreaOfInterest,
    turn::TurnAroundTime,
};

pub const REASON_NO_SEARCH_LEGS: &str = "endurance cannot support any search legs";

/// 端数処理で浮動小数点誤差による切り上げを避けるための相対余裕
const FLEET_ROUNDING_SLACK: f64 = 1e-9;

/// 1ソーティあたりの捜索性能
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchRate {
    /// 1レグの長さ（m）
    pub leg_length_m: f64,
    /// 1ソーティで飛行できるレグ数
    pub n_legs: u32,
    /// 1ソーティで捜索できる幅（m）
    pub width_covered_m: f64,
    /// ソーティ全体の所要時間（時間、進出・帰投込み）
    pub sortie_time_hr: f64,
    /// 捜索率（m²/時間）
    pub search_rate_m2_per_hr: f64,
}

/// 捜索率の計算で発生する不成立・エラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchRateError {
    /// 滞空時間内に1レグも飛行できない
    #[error("{}", REASON_NO_SEARCH_LEGS)]
    NoSearchLegs,
    /// 無効なフットプリントなどモデル適用範囲外の入力
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// 機体1機の捜索率を計算
///
/// 1ソーティは 進出 → n本のレグ（間に n−1 回の反転）→ 帰投 で構成され、
/// 滞空時間に収まる最大の n を採用します。レグ長は区域長から両端の
/// 前方探知距離（高さ軸）を差し引いたものです。
///
/// # 引数
///
/// * `ac` - 捜索機（巡航速度と滞空時間）
/// * `aoi` - 捜索区域
/// * `turn_around` - 収束した反転時間
/// * `sweep_width_m` - 有効掃引幅（m）
/// * `search_perf` - 探知フットプリント
pub fn calc_ac_search_rate(
    ac: &Aircraft,
    aoi: &AreaOfInterest,
    turn_around: &TurnAroundTime,
    sweep_width_m: f64,
    search_perf: &SearchPerformance,
) -> Result<SearchRate, SearchRateError> {
    let speed = ac.cruise_speed_mps();
    let downtrack_h = search_perf
        .downtrack_height_axis()
        .ok_or(ModelError::InvalidSearchPerformance)?;

    let leg_length_m = (aoi.length_m - 2.0 * downtrack_h).max(0.0);
    let leg_time_s = leg_length_m / speed;
    let transit_time_s = aoi.transit_m() / speed;
    let turn_s = turn_around.total_s;

    let available_s = ac.endurance_s - transit_time_s;
    let legs = ((available_s + turn_s) / (leg_time_s + turn_s)).floor();

    if !legs.is_finite() || legs < 1.0 {
        debug!(available_s, leg_time_s, turn_s, "滞空時間内にレグを飛行できない");
        return Err(SearchRateError::NoSearchLegs);
    }

    let n_legs = legs as u32;
    let n = n_legs as f64;
    let sortie_time_s = transit_time_s + n * leg_time_s + (n - 1.0) * turn_s;
    let sortie_time_hr = sortie_time_s / SECONDS_PER_HOUR;
    let width_covered_m = n * sweep_width_m;

    Ok(SearchRate {
        leg_length_m,
        n_legs,
        width_covered_m,
        sortie_time_hr,
        search_rate_m2_per_hr: width_covered_m * aoi.length_m / sortie_time_hr,
    })
}

/// 再捜索時間要求を満たすのに必要な同時滞空機数
///
/// N × 捜索率 × 再捜索時間 ≥ 区域面積 を満たす最小の整数 N（1以上）を返します。
///
/// 比率が整数ちょうどのときに丸め誤差で1機多くならないよう、比率に 1e-9 の
/// 相対余裕を与えてから切り上げます。そのため比率が整数をごく僅か
/// （相対 1e-9 以内）に超える場合は、厳密な不等式より1機少ない N を返します。
pub fn calc_onsta_requirement(area_m2: f64, search_rate_m2_per_hr: f64, revisit_time_hr: f64) -> u32 {
    let required = area_m2 / (search_rate_m2_per_hr * revisit_time_hr);
    let n = (required * (1.0 - FLEET_ROUNDING_SLACK)).ceil();
    n.max(1.0) as u32
}
