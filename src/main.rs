use clap::Parser;
use eth_trading_agent::utils::{logger, validation::Validate};
use eth_trading_agent::{AgentError, CliConfig, Heartbeat, Supervisor, TokioSleeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_agent_config() {
        Ok(config) => config,
        Err(e) => exit_on_startup_error(e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_on_startup_error(e);
    }

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    tracing::info!("Starting {} ({} mode)", config.agent.name, config.agent.mode);

    let heartbeat = Heartbeat::new(
        config.monitoring_enabled(),
        config.monitoring.heartbeat_every_ticks,
    );
    if heartbeat.is_monitoring() {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let supervisor = Supervisor::new(config, TokioSleeper, heartbeat);

    match supervisor.run().await {
        Ok(report) => {
            tracing::debug!("Shutdown report: {:?}", report);
            Ok(())
        }
        Err(e) => exit_on_startup_error(e),
    }
}

fn exit_on_startup_error(e: AgentError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
