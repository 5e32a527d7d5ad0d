use crate::models::error::ModelError;

/// 重力加速度（m/s²）
pub const GEE: f64 = 9.80665;

/// マッハ1の速度（m/s）
pub const MACH_M_PER_SEC: f64 = 343.0;

/// 1メートルあたりのフィート数
pub const FEET_PER_METER: f64 = 3.2808;

/// 1ノットあたりの速度（m/s）
pub const KNOTS_TO_MPS: f64 = 1852.0 / 3600.0;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// (長さ軸, 高さ軸) の組
///
/// 探知距離などは常にこの順序で保持します。高さ軸が制約側になります。
pub type AxisPair = (f64, f64);

/// 単位変換と数学ユーティリティ関数
pub mod math_utils {
    use super::*;

    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// ラジアンを度に変換
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }

    /// 高度 kft → m
    pub fn kft_to_m(alt_kft: f64) -> f64 {
        alt_kft * 1000.0 / FEET_PER_METER
    }

    /// 高度 m → kft
    pub fn m_to_kft(alt_m: f64) -> f64 {
        alt_m * FEET_PER_METER / 1000.0
    }

    pub fn mach_to_mps(mach: f64) -> f64 {
        mach * MACH_M_PER_SEC
    }

    pub fn knots_to_mps(knots: f64) -> f64 {
        knots * KNOTS_TO_MPS
    }

    /// 定義域チェック付きの逆余弦
    ///
    /// 引数が [-1, 1] の外、または有限でない場合はクランプせずにエラーを返します。
    /// 旋回幾何などで不可能なパラメータの組み合わせを表面化させるために使います。
    ///
    /// # 引数
    ///
    /// * `value` - acosの引数
    /// * `context` - エラーメッセージに含める計算箇所の名前
    pub fn checked_acos(value: f64, context: &'static str) -> Result<f64, ModelError> {
        if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
            return Err(ModelError::AcosDomain { context, value });
        }
        Ok(value.acos())
    }

    /// 計算結果が有限値であることを確認
    pub fn ensure_finite(value: f64, context: &'static str) -> Result<f64, ModelError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ModelError::NonFiniteValue { context })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::math_utils::*;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unit_conversions() {
        assert_abs_diff_eq!(deg_to_rad(180.0), std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(rad_to_deg(std::f64::consts::FRAC_PI_2), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(kft_to_m(15.0), 15_000.0 / FEET_PER_METER, epsilon = 1e-9);
        assert_abs_diff_eq!(m_to_kft(kft_to_m(22.5)), 22.5, epsilon = 1e-9);
        assert_abs_diff_eq!(mach_to_mps(0.6), 205.8, epsilon = 1e-9);
        assert_abs_diff_eq!(knots_to_mps(3600.0), 1852.0, epsilon = 1e-9);
    }

    #[test]
    fn test_checked_acos_rejects_out_of_domain() {
        assert_abs_diff_eq!(checked_acos(1.0, "unit").unwrap(), 0.0);
        assert_abs_diff_eq!(checked_acos(-1.0, "unit").unwrap(), std::f64::consts::PI);
        assert!(matches!(
            checked_acos(1.000_001, "unit"),
            Err(ModelError::AcosDomain { context: "unit", .. })
        ));
        assert!(checked_acos(-1.5, "unit").is_err());
        assert!(checked_acos(f64::NAN, "unit").is_err());
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(2.0, "x").unwrap(), 2.0);
        assert!(matches!(
            ensure_finite(f64::INFINITY, "x"),
            Err(ModelError::NonFiniteValue { context: "x" })
        ));
    }
}
