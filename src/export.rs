//! スイープ結果の書き出し（CSV / YAML）

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::evaluation::ModelResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("ファイル書き込みエラー: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML変換エラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

const CSV_HEADER: &str = "altitude(kft),mach,sensor,target,target_speed(kts),\
valid,reason,\
cost($M),endurance(hr),\
slant_range_len(m),slant_range_h(m),\
crosstrack_len(m),crosstrack_h(m),downtrack_h(m),\
turn_around(s),turn_geometry,turn_radius(m),\
sweep_width(m),iterations,iteration_outcome,\
n_legs,sortie_time(hr),search_rate(m2/hr),\
onsta_req_n,onsta_req_cost($M)";

/// 欠損値は空欄
fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// カンマや引用符を含む文字列はダブルクォートで囲む
fn quote(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// 1結果分のCSV行を作成
pub fn create_csv_row(result: &ModelResult) -> String {
    let config = &result.config;
    let sensor_perf = result.sensor_performance.as_ref();
    let search_perf = result.search_performance.as_ref();
    let turn = result.turn_around.as_ref();
    let rate = result.search_rate.as_ref();
    let ac = result.aircraft.as_ref();

    let fields = [
        config.altitude_kft.to_string(),
        config.mach.to_string(),
        config.sensor.to_string(),
        quote(&config.target.label),
        config.target.max_speed_kts.to_string(),
        result.valid.to_string(),
        quote(result.reason.as_deref().unwrap_or("")),
        opt(ac.map(|a| a.cost_musd)),
        opt(ac.map(|a| a.endurance_hr)),
        opt(sensor_perf.map(|s| s.slant_detection_range.0)),
        opt(sensor_perf.map(|s| s.slant_detection_range.1)),
        opt(search_perf.and_then(|p| p.crosstrack_length_axis())),
        opt(search_perf.and_then(|p| p.crosstrack_height_axis())),
        opt(search_perf.and_then(|p| p.downtrack_height_axis())),
        opt(turn.map(|t| t.total_s)),
        opt(turn.map(|t| format!("{:?}", t.geometry))),
        opt(turn.map(|t| t.turn_radius_m)),
        opt(result.effective_sweep_width_m),
        opt(result.sweep_iterations),
        opt(result.sweep_outcome.map(|o| format!("{:?}", o))),
        opt(rate.map(|r| r.n_legs)),
        opt(rate.map(|r| r.sortie_time_hr)),
        opt(rate.map(|r| r.search_rate_m2_per_hr)),
        opt(result.onsta_req_n),
        opt(result.onsta_req_cost_musd),
    ];

    fields.join(",")
}

/// CSVを任意のライターへ書き出す
pub fn write_csv_to<W: Write>(writer: &mut W, results: &[ModelResult]) -> Result<(), ExportError> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for result in results {
        writeln!(writer, "{}", create_csv_row(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// 結果をCSVファイルに書き出す
pub fn write_csv<P: AsRef<Path>>(path: P, results: &[ModelResult]) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_csv_to(&mut writer, results)?;
    info!("CSV出力: {} ({}行)", path.as_ref().display(), results.len());
    Ok(())
}

/// 結果をYAMLファイルに書き出す
///
/// 各段の中間結果を含む全フィールドをそのまま出力します。
pub fn write_yaml<P: AsRef<Path>>(path: P, results: &[ModelResult]) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, results)?;
    writer.flush()?;
    info!("YAML出力: {} ({}件)", path.as_ref().display(), results.len());
    Ok(())
}
