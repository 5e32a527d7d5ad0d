//! # Sweep モジュール
//!
//! 高度 × マッハ × センサー等級の格子上で構成を展開し、各点を評価します。
//!
//! 各評価は入力だけで決まる純粋な計算で共有状態を持たないため、
//! tokio のブロッキングワーカーに分散して並列に実行し、結果は格子の順序
//! （高度 → マッハ → センサー）に並べ直して返します。
//!
//! - 入力検証で不合格の点は評価せず `valid = false` として記録
//! - 高度・回避・滞空時間による不成立はそのまま記録して続行
//! - モデル適用範囲外のエラー（`ModelError`）はスイープ全体を中断

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{Config, StudyConfig};
use crate::evaluation::{evaluate, Infeasibility, ModelResult};
use crate::models::error::ModelError;

/// 評価点の並び
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub points: Vec<Config>,
}

impl SweepPlan {
    /// スタディの格子を展開
    pub fn from_study(study: &StudyConfig) -> Self {
        let mut points = Vec::with_capacity(study.point_count());
        for &altitude_kft in &study.sweep.altitudes_kft {
            for &mach in &study.sweep.machs {
                for &sensor in &study.sweep.sensors {
                    points.push(study.point(altitude_kft, mach, sensor));
                }
            }
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// スイープ実行時のエラー
#[derive(Debug, Error)]
pub enum SweepError {
    /// ワーカープールの構築に失敗
    #[error("ワーカープールの構築に失敗: {0}")]
    Runtime(#[source] std::io::Error),
    /// 評価タスクが異常終了
    #[error("評価タスクが異常終了: {0}")]
    Join(#[source] tokio::task::JoinError),
    /// モデル適用範囲外のパラメータ
    #[error("モデル適用範囲外の構成 {label}: {source}")]
    Model {
        label: String,
        #[source]
        source: ModelError,
    },
}

/// 1点を検証してから評価
///
/// 検証で不合格なら評価せずに不成立として記録します。
pub fn evaluate_point(config: Config) -> Result<ModelResult, SweepError> {
    if let Err(e) = config.validate() {
        debug!(config = %config.label(), "入力検証で不合格: {}", e);
        let message = match e {
            crate::config::ConfigError::ValidationError(msg) => msg,
            other => other.to_string(),
        };
        return Ok(ModelResult::rejected(config, message));
    }

    evaluate(&config).map_err(|source| {
        error!(config = %config.label(), "モデルエラー: {}", source);
        SweepError::Model {
            label: config.label(),
            source,
        }
    })
}

/// スイープを実行
///
/// # 引数
///
/// * `plan` - 評価点の並び
/// * `workers` - ワーカースレッド数（0 なら tokio の既定値）
///
/// # 戻り値
///
/// `plan` と同じ順序の評価結果
pub fn run_sweep(plan: SweepPlan, workers: usize) -> Result<Vec<ModelResult>, SweepError> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if workers > 0 {
        builder.worker_threads(workers).max_blocking_threads(workers);
    }
    let runtime = builder.build().map_err(SweepError::Runtime)?;

    let total = plan.len();
    info!("=== スイープ実行開始 ({}点) ===", total);

    let results = runtime.block_on(async move {
        let handles: Vec<_> = plan
            .points
            .into_iter()
            .map(|config| tokio::task::spawn_blocking(move || evaluate_point(config)))
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let result = handle.await.map_err(SweepError::Join)??;
            if (index + 1) % 10 == 0 || index + 1 == total {
                info!("進行状況: {}/{}", index + 1, total);
            }
            results.push(result);
        }
        Ok::<_, SweepError>(results)
    })?;

    info!("=== スイープ完了 ===");
    Ok(results)
}

/// スイープ結果の集計
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid_by_reason: HashMap<Infeasibility, usize>,
    /// 反復上限で打ち切られた点の数
    pub iteration_caps: usize,
    /// 必要機数コストが最小の成立点のインデックス
    pub cheapest: Option<usize>,
}

impl SweepSummary {
    pub fn from_results(results: &[ModelResult]) -> Self {
        let mut summary = SweepSummary {
            total: results.len(),
            ..Default::default()
        };

        let mut best_cost = f64::INFINITY;
        for (index, result) in results.iter().enumerate() {
            if result.sweep_cap_reached() {
                summary.iteration_caps += 1;
            }

            if result.valid {
                summary.valid += 1;
                if let Some(cost) = result.onsta_req_cost_musd {
                    if cost < best_cost {
                        best_cost = cost;
                        summary.cheapest = Some(index);
                    }
                }
            } else if let Some(failure) = result.failure {
                *summary.invalid_by_reason.entry(failure).or_insert(0) += 1;
            }
        }

        summary
    }

    pub fn invalid(&self) -> usize {
        self.total - self.valid
    }

    /// 集計を表示
    pub fn print(&self, results: &[ModelResult]) {
        println!("=== スイープ結果 ===");
        println!("評価点数: {}", self.total);
        println!("成立: {}", self.valid);
        println!("不成立: {}", self.invalid());
        for failure in [
            Infeasibility::InvalidConfig,
            Infeasibility::AltitudeExceedsSlantRange,
            Infeasibility::NonPositiveSweepWidth,
            Infeasibility::EnduranceExhausted,
        ] {
            if let Some(count) = self.invalid_by_reason.get(&failure) {
                println!("  {}: {}", failure.reason(), count);
            }
        }
        if self.iteration_caps > 0 {
            println!("反復上限で打ち切り: {}", self.iteration_caps);
        }

        if let Some(result) = self.cheapest.and_then(|i| results.get(i)) {
            println!();
            println!("=== 最小コスト構成 ===");
            println!("構成: {}", result.config.label());
            if let Some(w) = result.effective_sweep_width_m {
                println!("有効掃引幅: {:.0}m", w);
            }
            if let Some(n) = result.onsta_req_n {
                println!("必要滞空機数: {}機", n);
            }
            if let Some(cost) = result.onsta_req_cost_musd {
                println!("必要コスト: ${:.2}M", cost);
            }
        }
    }
}
