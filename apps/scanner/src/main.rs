use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{ConnectivityProbe, RedemptionFlow, ReqwestGateway, TcpConnectivityProbe};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod presenter;

use config::load_settings;
use input::pump_scanner_input;
use presenter::ConsolePresenter;

#[derive(Parser, Debug)]
struct Args {
    /// TOML file with endpoint and timeout settings.
    #[arg(long, default_value = "scanner.toml")]
    config: PathBuf,
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Redeem a single code and exit instead of reading stdin.
    #[arg(long)]
    code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(endpoint_url) = args.endpoint_url {
        settings.endpoint_url = endpoint_url;
    }

    settings.validate()?;
    let endpoint = settings.endpoint()?;
    let probe: Arc<dyn ConnectivityProbe> = match &settings.connectivity_target {
        Some(target) => Arc::new(TcpConnectivityProbe::new(
            target.as_str(),
            settings.connectivity_timeout(),
        )?),
        None => Arc::new(TcpConnectivityProbe::for_endpoint(
            &endpoint,
            settings.connectivity_timeout(),
        )?),
    };
    let gateway = Arc::new(ReqwestGateway::new(endpoint, settings.request_timeout())?);
    info!(endpoint = %gateway.endpoint(), "redemption client ready");
    let flow = RedemptionFlow::new(probe, gateway, Arc::new(ConsolePresenter));

    if let Some(code) = args.code {
        flow.set_input(code);
        flow.submit().await;
        return Ok(());
    }

    println!("Scan or type a barcode and press Enter (Ctrl-D to quit).");
    pump_scanner_input(tokio::io::stdin(), &flow).await?;

    info!("input closed; session ended");
    Ok(())
}
