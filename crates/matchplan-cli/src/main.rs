use clap::Parser;
use matchplan_cli::tracing_setup::init_tracing;
use matchplan_cli::{Cli, PlanConfig};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting matchplan");

    let config = PlanConfig::load(cli.config.as_deref())?.apply_env_overrides();

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = cli.execute(&config, &mut stdout) {
        error!(error = %err, "Command failed");
        return Err(err);
    }

    Ok(())
}
