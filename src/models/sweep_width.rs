//! # 有効掃引幅ソルバー
//!
//! レグ間隔（有効掃引幅）は、ある地点を機体が離れている時間（1レグ＋反転）に
//! 依存し、反転時間はレグ間隔を横方向オフセットとして依存します。
//! この循環依存を不動点反復で解きます。
//!
//! 各反復では現在の推定値で反転時間を求め、最悪ケースの2種類の目標から
//! 掃引幅の候補を計算し、小さい方を次の推定値とします。
//!
//! - **ビーミング目標**: 機体の航跡に直交して航行し、長さ軸を見せる目標
//! - **グランシング目標**: 見かけの長さが高さと等しくなる相対方位
//!   acos(高さ/長さ) で航行し、探知距離が最小になる目標

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    aircraft::Aircraft,
    common::math_utils,
    error::ModelError,
    footprint::SearchPerformance,
    turn::{calc_turnaround_time, TurnAroundTime},
};

/// 収束判定の相対許容誤差
pub const SWEEP_WIDTH_TOLERANCE: f64 = 0.01;

/// 反復回数の上限
pub const MAX_SWEEP_WIDTH_ITERATIONS: u32 = 25;

/// 不動点反復の終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IterationOutcome {
    /// 相対変化が許容誤差以下になった
    Converged,
    /// 反復上限に達した（最後の値を近似解として採用）
    IterationCap,
    /// 候補値が0以下になった（目標は常に回避可能）
    NonPositive,
}

/// 不動点反復の結果
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPoint<T> {
    /// 最後に計算された値
    pub value: f64,
    /// 最後の反復で得られた付随情報
    pub aux: T,
    /// 実行した反復回数
    pub iterations: u32,
    pub outcome: IterationOutcome,
}

/// 上限付きの不動点反復ソルバー
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointSolver {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for FixedPointSolver {
    fn default() -> Self {
        Self {
            tolerance: SWEEP_WIDTH_TOLERANCE,
            max_iterations: MAX_SWEEP_WIDTH_ITERATIONS,
        }
    }
}

impl FixedPointSolver {
    /// 不動点反復を実行
    ///
    /// `step` は現在の推定値から (次の候補値, 付随情報) を返します。
    /// 候補が0以下なら即座に `NonPositive` で終了し、前回値との相対変化が
    /// 許容誤差以下なら `Converged`、上限回数に達したら `IterationCap` で
    /// 最後の候補値を返します。
    pub fn solve<T, F>(&self, initial: f64, mut step: F) -> Result<FixedPoint<T>, ModelError>
    where
        F: FnMut(f64) -> Result<(f64, T), ModelError>,
    {
        let mut estimate = initial;
        let mut iterations = 0;

        loop {
            iterations += 1;
            let (candidate, aux) = step(estimate)?;
            let candidate = math_utils::ensure_finite(candidate, "掃引幅候補")?;

            if candidate <= 0.0 {
                debug!(iterations, candidate, "掃引幅候補が0以下");
                return Ok(FixedPoint {
                    value: candidate,
                    aux,
                    iterations,
                    outcome: IterationOutcome::NonPositive,
                });
            }

            let change = relative_change(estimate, candidate);
            debug!(iterations, estimate, candidate, change, "不動点反復");

            if change <= self.tolerance {
                return Ok(FixedPoint {
                    value: candidate,
                    aux,
                    iterations,
                    outcome: IterationOutcome::Converged,
                });
            }

            if iterations >= self.max_iterations {
                warn!(
                    iterations,
                    candidate, change, "反復上限に達したため最後の値を採用します"
                );
                return Ok(FixedPoint {
                    value: candidate,
                    aux,
                    iterations,
                    outcome: IterationOutcome::IterationCap,
                });
            }

            estimate = candidate;
        }
    }
}

fn relative_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return f64::INFINITY;
    }
    ((current - previous) / previous).abs()
}

/// 1反復ぶんの掃引幅候補
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepCandidates {
    /// この反復で使った反転時間
    pub turn_around: TurnAroundTime,
    /// ビーミング目標に対する候補（m）
    pub beaming_m: f64,
    /// グランシング目標に対する候補（m）
    pub glancing_m: f64,
}

/// 有効掃引幅の解
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepWidthSolution {
    /// 有効掃引幅（m）。0以下なら目標は回避可能
    pub sweep_width_m: f64,
    /// 最後の反復での反転時間
    pub turn_around: TurnAroundTime,
    pub beaming_candidate_m: f64,
    pub glancing_candidate_m: f64,
    pub iterations: u32,
    pub outcome: IterationOutcome,
}

impl SweepWidthSolution {
    pub fn is_feasible(&self) -> bool {
        self.sweep_width_m > 0.0
    }

    pub fn cap_reached(&self) -> bool {
        self.outcome == IterationOutcome::IterationCap
    }
}

/// 有効掃引幅を標準の許容誤差・上限回数で計算
pub fn calc_effective_sweep_width(
    config: &Config,
    ac: &Aircraft,
    search_perf: &SearchPerformance,
) -> Result<SweepWidthSolution, ModelError> {
    calc_effective_sweep_width_with(&FixedPointSolver::default(), config, ac, search_perf)
}

/// 指定したソルバー設定で有効掃引幅を計算
///
/// 初期推定値は高さ軸の探知幅です。
///
/// # 戻り値
///
/// 収束値（または上限到達時の最後の値、0以下の候補）と、その時点の反転時間
pub fn calc_effective_sweep_width_with(
    solver: &FixedPointSolver,
    config: &Config,
    ac: &Aircraft,
    search_perf: &SearchPerformance,
) -> Result<SweepWidthSolution, ModelError> {
    let (width_len, width_h) = search_perf
        .crosstrack_detection_width
        .ok_or(ModelError::InvalidSearchPerformance)?;
    let downtrack_h = search_perf
        .downtrack_height_axis()
        .ok_or(ModelError::InvalidSearchPerformance)?;

    let aoi_length = config.aoi.length_m;
    let cruise_speed = ac.cruise_speed_mps();
    let target_speed = config.target.max_speed_mps();

    let aspect = math_utils::checked_acos(
        config.target.height_m / config.target.length_m,
        "グランシング目標の相対方位",
    )?;
    let glancing_crosstrack_speed = target_speed * aspect.cos();

    let solution = solver.solve(width_h, |estimate| {
        let turn_around = calc_turnaround_time(ac, estimate, search_perf)?;

        // 1往復（区域長×2）＋反転の間にビーミング目標が横切る距離
        let beaming_time = 2.0 * aoi_length / cruise_speed + turn_around.total_s;
        let beaming_m = width_len - target_speed * beaming_time;

        let glancing_time = (2.0 * aoi_length - downtrack_h) / cruise_speed + turn_around.total_s;
        let glancing_m = width_h - glancing_crosstrack_speed * glancing_time;

        Ok((
            beaming_m.min(glancing_m),
            SweepCandidates {
                turn_around,
                beaming_m,
                glancing_m,
            },
        ))
    })?;

    Ok(SweepWidthSolution {
        sweep_width_m: solution.value,
        turn_around: solution.aux.turn_around,
        beaming_candidate_m: solution.aux.beaming_m,
        glancing_candidate_m: solution.aux.glancing_m,
        iterations: solution.iterations,
        outcome: solution.outcome,
    })
}
