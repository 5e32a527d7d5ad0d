use clap::{Arg, ArgAction, Command};
use tracing::info;

use searchcalc::config::StudyConfig;
use searchcalc::export::{write_csv, write_yaml};
use searchcalc::logging::{init_logging, level_from_verbosity, parse_log_level, LogConfig, LogOutput};
use searchcalc::sweep::{run_sweep, SweepPlan, SweepSummary};

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("searchcalc")
        .version("0.1.0")
        .about("捜索成立性評価 (Search Coverage Feasibility)")
        .long_about("航空機搭載センサーによる海上捜索の成立性評価ツール\n\
                     高度・速度・センサー等級の組み合わせごとに有効掃引幅と必要滞空機数を算定します。")
        .arg(
            Arg::new("study")
                .short('s')
                .long("study")
                .value_name("FILE")
                .help("スタディファイル(.yaml)のパスを指定")
                .long_help("評価するスタディファイル(.yaml)のパスを指定します。\n\
                           指定しない場合、組み込みの海上捜索ベースラインで実行されます。")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(ArgAction::SetTrue)
                .help("スタディの情報のみ表示して終了")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("結果をCSVファイルに出力")
        )
        .arg(
            Arg::new("yaml")
                .long("yaml")
                .value_name("FILE")
                .help("全中間結果をYAMLファイルに出力")
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
                .help("並列ワーカー数 (0: CPU数)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .value_parser(["console", "file", "both"])
                .default_value("console")
                .help("ログ出力先 (console, file, both)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)。-v より優先")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("詳細出力レベル (-v: 進行状況, -vv: 評価点ごと, -vvv: 反復ごと)")
        )
        .get_matches();

    println!("捜索成立性評価 (Search Coverage Feasibility) - searchcalc v0.1.0");
    println!();

    let verbose_level = matches.get_count("verbose");
    let level = matches
        .get_one::<String>("log-level")
        .map(|s| parse_log_level(s))
        .unwrap_or_else(|| level_from_verbosity(verbose_level));
    let output = matches
        .get_one::<String>("log-output")
        .and_then(|s| s.parse::<LogOutput>().ok())
        .unwrap_or(LogOutput::Console);

    // ガードは main の終了まで保持する
    let _log_guard = match init_logging(LogConfig {
        level,
        output,
        ..LogConfig::default()
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    };

    let options = RunOptions {
        study_path: matches.get_one::<String>("study").cloned(),
        info_only: matches.get_flag("info"),
        csv_path: matches.get_one::<String>("output").cloned(),
        yaml_path: matches.get_one::<String>("yaml").cloned(),
        workers: matches.get_one::<usize>("jobs").copied().unwrap_or(0),
        verbose_level,
    };

    if let Err(e) = run(options) {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

struct RunOptions {
    study_path: Option<String>,
    info_only: bool,
    csv_path: Option<String>,
    yaml_path: Option<String>,
    workers: usize,
    verbose_level: u8,
}

/// スタディを読み込んでスイープを実行
fn run(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let study = match &options.study_path {
        Some(path) => {
            let study = StudyConfig::from_file(path)?;
            info!("スタディファイル読み込み完了: {}", path);
            study
        }
        None => {
            println!("スタディファイル未指定のため組み込みベースラインを使用します。");
            println!();
            StudyConfig::baseline()
        }
    };

    study.print_summary();
    println!();

    if options.info_only {
        return Ok(());
    }

    let plan = SweepPlan::from_study(&study);
    let results = run_sweep(plan, options.workers)?;

    if options.verbose_level > 0 {
        println!("=== 評価点一覧 ===");
        for result in &results {
            match (result.valid, result.onsta_req_n) {
                (true, Some(n)) => println!(
                    "  {:<18} 掃引幅 {:>7.0}m  必要機数 {:>3}機",
                    result.config.label(),
                    result.effective_sweep_width_m.unwrap_or(0.0),
                    n
                ),
                _ => println!(
                    "  {:<18} 不成立: {}",
                    result.config.label(),
                    result.reason.as_deref().unwrap_or("-")
                ),
            }
        }
        println!();
    }

    let summary = SweepSummary::from_results(&results);
    summary.print(&results);

    if let Some(path) = &options.csv_path {
        write_csv(path, &results)?;
        println!();
        println!("CSV出力: {}", path);
    }
    if let Some(path) = &options.yaml_path {
        write_yaml(path, &results)?;
        println!("YAML出力: {}", path);
    }

    Ok(())
}
