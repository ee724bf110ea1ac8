//! # Scenario-Harness 入口
//!
//! 按名称选择并运行内置场景，每个场景输出一个 Verdict。
//!
//! ## 退出码
//! - `0`: 所有场景通过
//! - `1`: 至少一个场景失败或被跳过
//! - `2`: 配置错误（配置文件、环境变量、未知场景名）
//!
//! ## 环境变量
//! - `RUST_LOG`: 日志过滤（默认使用配置中的 `log_level`）
//! - `HARNESS_*`: 覆盖配置项，例如 `HARNESS_WEBDRIVER_URL`

use anyhow::Context;
use clap::Parser;
use scenario_harness::{
    config::Config,
    report::RunReport,
    scenario::{Scenario, ScenarioRunner},
    scenarios,
    session::{SessionManager, SessionManagerImpl},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scenario-harness", version, about = "Run end-to-end browser and REST scenarios")]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "HARNESS_CONFIG")]
    config: Option<PathBuf>,

    /// Scenario to run (repeatable); all scenarios when omitted
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,

    /// Run up to N scenarios at once
    #[arg(long, value_name = "N")]
    parallel: Option<usize>,

    /// Stop after the first scenario that does not pass
    #[arg(long)]
    fail_fast: bool,

    /// Write a JSON run report to this relative path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// WebDriver endpoint, overriding the configuration
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,
}

const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

fn load_config(cli: &Cli) -> scenario_harness::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy())?.merge_env()?,
        None => Config::from_env()?,
    };

    if let Some(url) = &cli.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if let Some(parallel) = cli.parallel {
        if parallel == 0 {
            return Err(scenario_harness::Error::configuration(
                "--parallel must be at least 1",
            ));
        }
        config.parallelism = parallel;
    }
    Ok(config)
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("{:#}", e);
        return ExitCode::from(EXIT_CONFIG);
    }

    info!("Scenario-Harness v{}", scenario_harness::VERSION);

    if cli.list {
        for scenario in scenarios::catalog() {
            println!("{:<28} {}", scenario.name(), scenario.description());
        }
        return ExitCode::SUCCESS;
    }

    let selected = match scenarios::select(scenarios::catalog(), &cli.scenarios) {
        Ok(selected) => selected,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    info!(
        "Configuration loaded: webdriver={}, parallelism={}, scenarios={}",
        config.webdriver_url,
        config.parallelism,
        selected.len()
    );

    let config = Arc::new(config);
    let manager: Arc<dyn SessionManager> = Arc::new(SessionManagerImpl::from_config(&config));
    let runner = ScenarioRunner::new(manager.clone(), config.clone());

    let verdicts = if cli.fail_fast {
        runner.run_sequential(&selected, true).await
    } else {
        runner.run_all(&selected).await
    };

    if manager.session_count() > 0 {
        warn!("{} session(s) still registered after the run", manager.session_count());
    }

    let report = RunReport::new(verdicts);
    info!(
        "Run finished: {} passed, {} failed, {} skipped",
        report.summary.passed, report.summary.failed, report.summary.skipped
    );

    if let Some(path) = &cli.report {
        if let Err(e) = report.write_to_path(path) {
            error!("Failed to write report to {}: {}", path.display(), e);
            return ExitCode::from(EXIT_CONFIG);
        }
        info!("Report written to {}", path.display());
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    }
}
