//! # searchcalc
//!
//! 航空機搭載センサーによる海上捜索の成立性評価と必要機数の算定。
//!
//! センサー諸元と目標寸法から探知フットプリントを求め、反転旋回時間と
//! 有効掃引幅を連成させて解き、滞空時間内の捜索率から再捜索時間要求を
//! 満たす同時滞空機数を求めます。

pub mod config;
pub mod evaluation;
pub mod export;
pub mod logging;
pub mod models;
pub mod sweep;
