use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::{
    sensor::{SensorAssumption, SensorClass},
    target::{AreaOfInterest, DesignTarget},
};

/// スタディのメタデータ
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudyMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// 反転旋回の機動パラメータ
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ManeuverParams {
    /// バンク角（度）
    pub bank_angle_deg: f64,
    /// 減速率（G、負値で減速）
    pub decel_gees: f64,
    /// 最小機動速度（マッハ）
    pub min_mach: f64,
}

/// パラメータスイープの格子
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SweepGrid {
    pub altitudes_kft: Vec<f64>,
    pub machs: Vec<f64>,
    pub sensors: Vec<SensorClass>,
}

/// スタディ設定（YAMLファイル全体）
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudyConfig {
    pub meta: StudyMeta,
    pub target: DesignTarget,
    pub aoi: AreaOfInterest,
    pub maneuver: ManeuverParams,
    /// 全センサー共通のJohnson基準（個別指定がない場合）
    pub johnson_req: u32,
    /// センサー等級ごとの諸元の上書き
    #[serde(default)]
    pub sensors: HashMap<SensorClass, SensorAssumption>,
    pub sweep: SweepGrid,
}

/// 1回の評価に必要な入力一式
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub target: DesignTarget,
    pub aoi: AreaOfInterest,
    pub altitude_kft: f64,
    pub mach: f64,
    pub sensor: SensorClass,
    pub sensor_assumption: SensorAssumption,
    pub maneuver: ManeuverParams,
}

impl Config {
    /// 表示用のラベル（例: "15kft/M0.6/MED"）
    pub fn label(&self) -> String {
        format!("{}kft/M{}/{}", self.altitude_kft, self.mach, self.sensor)
    }

    /// 入力値の範囲チェック
    ///
    /// コアモデルは検証済みの入力を前提とするため、評価前にここで弾きます。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sa = &self.sensor_assumption;
        if sa.johnson_req == 0 {
            return Err(invalid("johnson_req must be positive"));
        }
        if sa.resolution.0 == 0 || sa.resolution.1 == 0 {
            return Err(invalid("sensor resolution must be positive"));
        }
        for fov in [sa.fov_deg.0, sa.fov_deg.1] {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(invalid(format!("sensor fov_deg must be in (0, 180): {}", fov)));
            }
        }
        if !(sa.cost >= 0.0) {
            return Err(invalid("sensor cost must not be negative"));
        }

        if !(self.mach > 0.0) {
            return Err(invalid("mach must be positive"));
        }
        if !(self.altitude_kft > 0.0) {
            return Err(invalid("altitude_kft must be positive"));
        }

        let aoi = &self.aoi;
        for (name, value) in [
            ("aoi length_m", aoi.length_m),
            ("aoi width_m", aoi.width_m),
            ("aoi revisit_time_hr", aoi.revisit_time_hr),
        ] {
            if !(value > 0.0) {
                return Err(invalid(format!("{} must be positive", name)));
            }
        }
        if !(aoi.ingress_m >= 0.0 && aoi.egress_m >= 0.0) {
            return Err(invalid("aoi ingress_m/egress_m must not be negative"));
        }

        let target = &self.target;
        if !(target.length_m > 0.0 && target.height_m > 0.0) {
            return Err(invalid("target dimensions must be positive"));
        }
        if target.height_m > target.length_m {
            return Err(invalid("target height_m must not exceed length_m"));
        }
        if !(target.max_speed_kts > 0.0) {
            return Err(invalid("target max_speed_kts must be positive"));
        }

        let manx = &self.maneuver;
        if !(manx.bank_angle_deg > 0.0 && manx.bank_angle_deg < 90.0) {
            return Err(invalid("bank_angle_deg must be in (0, 90)"));
        }
        if !(manx.decel_gees <= 0.0) {
            return Err(invalid("decel_gees must be zero or negative"));
        }
        if !(manx.min_mach > 0.0) {
            return Err(invalid("min_mach must be positive"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

impl StudyConfig {
    /// YAMLファイルからスタディ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;

        let config: StudyConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 海上捜索の標準スタディ
    ///
    /// フリゲート（150m × 40m、25kt）、100km四方の区域、進出・帰投各100km、
    /// 再捜索6時間、識別レベル（Johnson 8）。
    pub fn baseline() -> Self {
        Self {
            meta: StudyMeta {
                version: "1.0".to_string(),
                name: "maritime_baseline".to_string(),
                description: "Frigate search in a 100 km x 100 km maritime AOI".to_string(),
            },
            target: DesignTarget::new("Frigate", (150.0, 40.0), 25.0),
            aoi: AreaOfInterest {
                length_m: 100_000.0,
                width_m: 100_000.0,
                ingress_m: 100_000.0,
                egress_m: 100_000.0,
                revisit_time_hr: 6.0,
            },
            maneuver: ManeuverParams {
                bank_angle_deg: 35.0,
                decel_gees: -0.7,
                min_mach: 0.15,
            },
            johnson_req: 8,
            sensors: HashMap::new(),
            sweep: SweepGrid {
                altitudes_kft: vec![5.0, 10.0, 15.0, 20.0, 25.0],
                machs: vec![0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
                sensors: SensorClass::ALL.to_vec(),
            },
        }
    }

    /// スタディ全体の構造的な検証
    ///
    /// 個々の評価点の値域チェックは `Config::validate` が行います。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.altitudes_kft.is_empty() {
            return Err(invalid("sweep altitudes_kft must not be empty"));
        }
        if self.sweep.machs.is_empty() {
            return Err(invalid("sweep machs must not be empty"));
        }
        if self.sweep.sensors.is_empty() {
            return Err(invalid("sweep sensors must not be empty"));
        }
        Ok(())
    }

    /// センサー等級の諸元（上書きがあればそれを、なければ標準表を使用）
    pub fn sensor_assumption(&self, class: SensorClass) -> SensorAssumption {
        self.sensors
            .get(&class)
            .cloned()
            .unwrap_or_else(|| SensorAssumption::baseline(class, self.johnson_req))
    }

    /// 1評価点の入力を組み立て
    pub fn point(&self, altitude_kft: f64, mach: f64, sensor: SensorClass) -> Config {
        Config {
            target: self.target.clone(),
            aoi: self.aoi.clone(),
            altitude_kft,
            mach,
            sensor,
            sensor_assumption: self.sensor_assumption(sensor),
            maneuver: self.maneuver.clone(),
        }
    }

    /// 評価点の総数
    pub fn point_count(&self) -> usize {
        self.sweep.altitudes_kft.len() * self.sweep.machs.len() * self.sweep.sensors.len()
    }

    /// スタディの概要を表示
    pub fn print_summary(&self) {
        println!("=== スタディ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== 設計目標 ===");
        println!("種別: {}", self.target.label);
        println!("寸法: {:.0}m × {:.0}m", self.target.length_m, self.target.height_m);
        println!("最大速力: {:.1}kt", self.target.max_speed_kts);
        println!();

        println!("=== 捜索区域 ===");
        println!("区域: {:.0}km × {:.0}km", self.aoi.length_m / 1000.0, self.aoi.width_m / 1000.0);
        println!("進出/帰投: {:.0}km / {:.0}km", self.aoi.ingress_m / 1000.0, self.aoi.egress_m / 1000.0);
        println!("再捜索時間: {:.1}時間", self.aoi.revisit_time_hr);
        println!();

        println!("=== 機動 ===");
        println!("バンク角: {:.0}°", self.maneuver.bank_angle_deg);
        println!("減速率: {:.2}G", self.maneuver.decel_gees);
        println!("最小機動速度: M{:.2}", self.maneuver.min_mach);
        println!();

        println!("=== スイープ ===");
        println!("高度: {:?} kft", self.sweep.altitudes_kft);
        println!("マッハ: {:?}", self.sweep.machs);
        for class in &self.sweep.sensors {
            let sa = self.sensor_assumption(*class);
            println!(
                "  {}: FOV {:?}°, {}×{}px, Johnson {}, ${}M",
                class, sa.fov_deg, sa.resolution.0, sa.resolution.1, sa.johnson_req, sa.cost
            );
        }
        println!("評価点数: {}", self.point_count());
    }
}

/// 設定読み込み・検証エラー
#[derive(Debug)]
pub enum ConfigError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "スタディファイルが見つかりません: {}", path.display())
            }
            ConfigError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ConfigError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 検証用の参照構成（MEDセンサー、15kft、M0.6）
    pub(crate) fn reference_config() -> Config {
        Config {
            target: DesignTarget::new("Frigate", (160.0, 40.0), 25.0),
            aoi: AreaOfInterest {
                length_m: 100_000.0,
                width_m: 100_000.0,
                ingress_m: 100_000.0,
                egress_m: 100_000.0,
                revisit_time_hr: 6.0,
            },
            altitude_kft: 15.0,
            mach: 0.6,
            sensor: SensorClass::Med,
            sensor_assumption: SensorAssumption {
                fov_deg: (30.0, 30.0),
                resolution: (960, 960),
                johnson_req: 6,
                cost: 1.0,
            },
            maneuver: ManeuverParams {
                bank_angle_deg: 35.0,
                decel_gees: -0.7,
                min_mach: 0.15,
            },
        }
    }

    fn assert_rejected(config: Config, fragment: &str) {
        match config.validate() {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains(fragment), "'{}' に '{}' が含まれない", msg, fragment)
            }
            other => panic!("検証エラーを期待: {:?}", other),
        }
    }

    #[test]
    fn test_reference_config_is_valid() {
        assert!(reference_config().validate().is_ok());
        assert_eq!(reference_config().label(), "15kft/M0.6/MED");
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let mut c = reference_config();
        c.sensor_assumption.johnson_req = 0;
        assert_rejected(c, "johnson_req");

        let mut c = reference_config();
        c.sensor_assumption.resolution = (960, 0);
        assert_rejected(c, "resolution");

        let mut c = reference_config();
        c.sensor_assumption.fov_deg = (0.0, 30.0);
        assert_rejected(c, "fov_deg");

        let mut c = reference_config();
        c.sensor_assumption.fov_deg = (30.0, 180.0);
        assert_rejected(c, "fov_deg");

        let mut c = reference_config();
        c.mach = 0.0;
        assert_rejected(c, "mach");

        let mut c = reference_config();
        c.altitude_kft = -5.0;
        assert_rejected(c, "altitude_kft");

        let mut c = reference_config();
        c.aoi.width_m = 0.0;
        assert_rejected(c, "width_m");

        let mut c = reference_config();
        c.aoi.revisit_time_hr = f64::NAN;
        assert_rejected(c, "revisit_time_hr");

        let mut c = reference_config();
        c.target.height_m = 0.0;
        assert_rejected(c, "dimensions");

        let mut c = reference_config();
        c.target.max_speed_kts = 0.0;
        assert_rejected(c, "max_speed_kts");
    }

    #[test]
    fn test_rejects_out_of_range_maneuver() {
        let mut c = reference_config();
        c.maneuver.bank_angle_deg = 90.0;
        assert_rejected(c, "bank_angle_deg");

        let mut c = reference_config();
        c.maneuver.decel_gees = 0.3;
        assert_rejected(c, "decel_gees");

        let mut c = reference_config();
        c.maneuver.min_mach = 0.0;
        assert_rejected(c, "min_mach");

        let mut c = reference_config();
        c.target.height_m = 200.0;
        assert_rejected(c, "height_m");
    }

    #[test]
    fn test_baseline_yaml_matches_builtin_study() {
        let yaml = include_str!("../scenarios/maritime_baseline.yaml");
        let study: StudyConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(study.validate().is_ok());
        assert_eq!(study, StudyConfig::baseline());
        assert_eq!(study.point_count(), 5 * 6 * 3);
    }

    #[test]
    fn test_sensor_override_takes_precedence() {
        let yaml = r#"
meta: { version: "1.0", name: "override", description: "MED override" }
target: { type: Frigate, length_m: 160, height_m: 40, max_speed_kts: 25 }
aoi: { length_m: 100000, width_m: 100000, ingress_m: 100000, egress_m: 100000, revisit_time_hr: 6 }
maneuver: { bank_angle_deg: 35, decel_gees: -0.7, min_mach: 0.15 }
johnson_req: 8
sensors:
  MED: { fov_deg: [30, 30], resolution: [960, 960], johnson_req: 6, cost: 1.0 }
sweep:
  altitudes_kft: [15]
  machs: [0.6]
  sensors: [LOW, MED]
"#;
        let study: StudyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(study.sensor_assumption(SensorClass::Med).resolution, (960, 960));
        assert_eq!(study.sensor_assumption(SensorClass::Med).johnson_req, 6);
        assert_eq!(study.sensor_assumption(SensorClass::Low), SensorAssumption::baseline(SensorClass::Low, 8));

        let point = study.point(15.0, 0.6, SensorClass::Med);
        assert_eq!(point, reference_config());
    }

    #[test]
    fn test_empty_sweep_is_rejected() {
        let mut study = StudyConfig::baseline();
        study.sweep.machs.clear();
        assert!(matches!(study.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = StudyConfig::from_file("scenarios/does_not_exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
