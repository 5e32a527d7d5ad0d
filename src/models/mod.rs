// 基本定数と単位変換
pub mod common;
pub mod error;

// 入力（目標・区域・センサー・機体）
pub mod target;
pub mod sensor;
pub mod aircraft;

// 捜索性能の各段
pub mod footprint;
pub mod turn;
pub mod sweep_width;
pub mod search_rate;

// 便利な re-export
pub use common::*;
pub use error::ModelError;
pub use target::{AreaOfInterest, DesignTarget};
pub use sensor::{calc_sensor_performance, SensorAssumption, SensorClass, SensorPerformance};
pub use aircraft::Aircraft;
pub use footprint::{calc_search_performance, SearchPerformance};
pub use turn::{calc_turnaround_time, TurnAroundTime, TurnGeometry};
pub use sweep_width::{calc_effective_sweep_width, FixedPointSolver, IterationOutcome, SweepWidthSolution};
pub use search_rate::{calc_ac_search_rate, calc_onsta_requirement, SearchRate, SearchRateError};
