use std::path::PathBuf;

use clap::Parser;

use heart_risk_gateway::lifecycle::startup;

#[derive(Parser)]
#[command(name = "heart-risk-gateway")]
#[command(about = "HTTP gateway for heart disease risk prediction", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "HEART_RISK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::resolve_config(args.config.as_deref())?;
    startup::run(config).await?;
    Ok(())
}
