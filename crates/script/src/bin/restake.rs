use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;

use restaking_scripts::amount::StakeAmount;
use restaking_scripts::consts::Network;
use restaking_scripts::runtime::Runtime;
use restaking_scripts::tracing as tracing_config;
use restaking_scripts::utils::read_env;
use restaking_scripts::workflow::{self, Action, Outcome};

// cargo run --bin restake -- --network goerli --action deposit --asset stETH --amount 0.0001
// Values not passed as flags are collected interactively.

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct RestakeArgs {
    #[clap(long)]
    network: Option<Network>,
    #[clap(long)]
    action: Option<Action>,
    #[clap(long)]
    asset: Option<String>,
    #[clap(long)]
    amount: Option<StakeAmount>,
}

fn prompt<T: FromStr>(label: &str) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    loop {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            anyhow::bail!("stdin closed while waiting for input");
        }
        match line.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("Invalid input: {e}"),
        }
    }
}

fn prompt_symbol() -> anyhow::Result<String> {
    loop {
        let symbol: String = prompt("Asset symbol (e.g. stETH)")?;
        if !symbol.is_empty() {
            return Ok(symbol);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // logging setup
    tracing_config::setup_logger(
        tracing_config::LoggingConfig::default()
            .use_format(read_env("LOG_FORMAT", tracing_config::LogFormat::Plain)),
    );

    let args = RestakeArgs::parse();
    tracing::debug!("Args: {:?}", args);

    let network = match args.network {
        Some(network) => network,
        None => prompt("Network (goerli|mainnet)")?,
    };
    let action = match args.action {
        Some(action) => action,
        None => prompt("Action (swap|deposit|both)")?,
    };
    let asset = match args.asset {
        Some(asset) => asset,
        None => prompt_symbol()?,
    };
    let amount = match args.amount {
        Some(amount) => amount,
        None => prompt("Amount in ether units (e.g. 0.0001)")?,
    };

    let runtime = Runtime::init_from_env(network).context("Failed to initialize runtime")?;

    let outcome = workflow::run(&runtime.ops, &runtime.network, action, &asset, amount).await?;

    match &outcome {
        Outcome::Completed => tracing::info!("Workflow complete"),
        recovered => tracing::warn!("Workflow finished without changes: {recovered}"),
    }
    Ok(())
}
