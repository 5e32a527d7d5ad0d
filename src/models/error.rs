use thiserror::Error;

/// モデル計算で発生する数値・幾何エラー
///
/// 探知不能や回避可能といった「評価結果としての不成立」とは区別され、
/// モデルの適用範囲外のパラメータであることを呼び出し元に伝播します。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("acos の引数が定義域 [-1, 1] の外です ({context}: {value})")]
    AcosDomain { context: &'static str, value: f64 },

    #[error("計算結果が有限値ではありません ({context})")]
    NonFiniteValue { context: &'static str },

    #[error("探知フットプリントが無効なため旋回・掃引幅を計算できません")]
    InvalidSearchPerformance,
}
