//! # Evaluation モジュール
//!
//! 1つの構成（目標・区域・高度・速度・センサー・機動パラメータ）に対して
//! 捜索成立性と必要機数を評価します。
//!
//! ## 処理順序
//!
//! 1. **センサー探知性能**: 光学諸元と目標寸法から斜距離探知距離
//! 2. **探知フットプリント**: 高度から地上距離・前方距離・探知幅
//! 3. **有効掃引幅**: 反転時間と連成した不動点反復
//! 4. **捜索率・必要機数**: 滞空時間内のレグ数から捜索率と同時滞空機数
//!
//! いずれかの段で不成立になった時点で `valid = false` と理由を記録して返し、
//! 以降のフィールドは未設定のままにします。旋回幾何などのモデル適用範囲外の
//! エラーは `Err` として呼び出し元へ伝播します。

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::models::{
    aircraft::Aircraft,
    error::ModelError,
    footprint::{calc_search_performance, SearchPerformance, REASON_ALTITUDE_EXCEEDS_SLANT_RANGE},
    search_rate::{calc_ac_search_rate, calc_onsta_requirement, SearchRate, SearchRateError, REASON_NO_SEARCH_LEGS},
    sensor::{calc_sensor_performance, SensorPerformance},
    sweep_width::{calc_effective_sweep_width, IterationOutcome},
    turn::TurnAroundTime,
};

pub const REASON_TARGET_CAN_EVADE: &str =
    "effective sweep width is not positive: target can evade detection between legs";

/// 評価が不成立になった理由の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Infeasibility {
    /// 入力値が範囲外（評価前の検証で不合格）
    InvalidConfig,
    /// 高度が斜距離探知距離を超えている
    AltitudeExceedsSlantRange,
    /// 有効掃引幅が0以下（目標が回避可能）
    NonPositiveSweepWidth,
    /// 滞空時間内に1レグも飛行できない
    EnduranceExhausted,
}

impl Infeasibility {
    pub fn reason(&self) -> &'static str {
        match self {
            Infeasibility::InvalidConfig => "invalid configuration",
            Infeasibility::AltitudeExceedsSlantRange => REASON_ALTITUDE_EXCEEDS_SLANT_RANGE,
            Infeasibility::NonPositiveSweepWidth => REASON_TARGET_CAN_EVADE,
            Infeasibility::EnduranceExhausted => REASON_NO_SEARCH_LEGS,
        }
    }
}

/// 1構成の評価結果
///
/// 入力構成をそのまま保持し、各段が成功するたびにフィールドを埋めていきます。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    pub config: Config,
    pub valid: bool,
    pub reason: Option<String>,
    pub failure: Option<Infeasibility>,
    pub aircraft: Option<Aircraft>,
    pub sensor_performance: Option<SensorPerformance>,
    pub search_performance: Option<SearchPerformance>,
    pub turn_around: Option<TurnAroundTime>,
    pub effective_sweep_width_m: Option<f64>,
    pub sweep_iterations: Option<u32>,
    pub sweep_outcome: Option<IterationOutcome>,
    pub search_rate: Option<SearchRate>,
    /// 必要な同時滞空機数
    pub onsta_req_n: Option<u32>,
    /// 必要機数ぶんの機体コスト（百万ドル）
    pub onsta_req_cost_musd: Option<f64>,
}

impl ModelResult {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            valid: true,
            reason: None,
            failure: None,
            aircraft: None,
            sensor_performance: None,
            search_performance: None,
            turn_around: None,
            effective_sweep_width_m: None,
            sweep_iterations: None,
            sweep_outcome: None,
            search_rate: None,
            onsta_req_n: None,
            onsta_req_cost_musd: None,
        }
    }

    /// 評価前の検証で不合格になった構成の結果
    pub fn rejected(config: Config, message: impl Into<String>) -> Self {
        let mut result = Self::new(config);
        result.valid = false;
        result.reason = Some(message.into());
        result.failure = Some(Infeasibility::InvalidConfig);
        result
    }

    fn fail(mut self, failure: Infeasibility) -> Self {
        debug!(config = %self.config.label(), reason = failure.reason(), "評価不成立");
        self.valid = false;
        self.reason = Some(failure.reason().to_string());
        self.failure = Some(failure);
        self
    }

    /// 反復上限に達した近似解かどうか
    pub fn sweep_cap_reached(&self) -> bool {
        self.sweep_outcome == Some(IterationOutcome::IterationCap)
    }
}

/// 1構成を評価
///
/// 入力は `Config::validate` で検証済みであることを前提とします。
///
/// # 戻り値
///
/// 不成立（高度・回避・滞空時間）は `Ok` の中で `valid = false` として返します。
/// モデルの適用範囲外（acosの定義域外など）は `Err(ModelError)` です。
pub fn evaluate(config: &Config) -> Result<ModelResult, ModelError> {
    let mut result = ModelResult::new(config.clone());

    let ac = Aircraft::new(config);

    let sensor_perf = calc_sensor_performance(&config.sensor_assumption, &config.target);
    result.sensor_performance = Some(sensor_perf);

    let search_perf = calc_search_performance(
        ac.alt_m,
        sensor_perf.slant_detection_range,
        config.sensor_assumption.fov_rad(),
        &config.aoi,
    );
    let footprint_valid = search_perf.valid;
    result.search_performance = Some(search_perf.clone());
    if !footprint_valid {
        result.aircraft = Some(ac);
        return Ok(result.fail(Infeasibility::AltitudeExceedsSlantRange));
    }

    let sweep = calc_effective_sweep_width(config, &ac, &search_perf)?;
    result.turn_around = Some(sweep.turn_around);
    result.effective_sweep_width_m = Some(sweep.sweep_width_m);
    result.sweep_iterations = Some(sweep.iterations);
    result.sweep_outcome = Some(sweep.outcome);
    if !sweep.is_feasible() {
        result.aircraft = Some(ac);
        return Ok(result.fail(Infeasibility::NonPositiveSweepWidth));
    }

    let rate = match calc_ac_search_rate(
        &ac,
        &config.aoi,
        &sweep.turn_around,
        sweep.sweep_width_m,
        &search_perf,
    ) {
        Ok(rate) => rate,
        Err(SearchRateError::NoSearchLegs) => {
            result.aircraft = Some(ac);
            return Ok(result.fail(Infeasibility::EnduranceExhausted));
        }
        Err(SearchRateError::Model(e)) => return Err(e),
    };
    result.search_rate = Some(rate);

    let onsta_req_n = calc_onsta_requirement(
        config.aoi.area_m2(),
        rate.search_rate_m2_per_hr,
        config.aoi.revisit_time_hr,
    );
    result.onsta_req_n = Some(onsta_req_n);
    result.onsta_req_cost_musd = Some(onsta_req_n as f64 * ac.cost_musd);
    result.aircraft = Some(ac);

    debug!(
        config = %config.label(),
        sweep_width_m = sweep.sweep_width_m,
        onsta_req_n,
        "評価完了"
    );

    Ok(result)
}
