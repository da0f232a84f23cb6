//! # Chaincode Host
//!
//! Reads invocation requests from stdin, one JSON object per line, and
//! writes one JSON reply per line to stdout. Logs go to stderr.
//!
//! ```text
//! $ echo '{"function":"queryByOwner","args":["tom"]}' | chaincode-host
//! {"tx_id":"…","status":200,"message":"","payload":"[]","encoding":"utf8","committed_writes":0}
//! ```
//!
//! Stops at end of input or on Ctrl+C.

use anyhow::{bail, Context, Result};
use asset_chaincode::adapters::StateDatabase;
use chaincode_runtime::{ChaincodeHost, HostConfig};
use clap::Parser;
use ledger_telemetry::init_telemetry;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Development host for the asset chaincode
#[derive(Parser, Debug)]
#[command(name = "chaincode-host")]
#[command(about = "Run asset chaincode invocations from stdin against an in-memory ledger")]
struct Args {
    /// State database to emulate (couchdb or goleveldb); overrides CHAINCODE_STATE_DB
    #[arg(long)]
    state_db: Option<StateDatabase>,

    /// Collection for public asset records; overrides ASSET_PUBLIC_COLLECTION
    #[arg(long)]
    public_collection: Option<String>,

    /// Collection for confidential details; overrides ASSET_PRIVATE_COLLECTION
    #[arg(long)]
    private_collection: Option<String>,

    /// Log filter; overrides CHAINCODE_LOG_LEVEL
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

fn load_config(args: Args) -> Result<HostConfig> {
    let mut config = HostConfig::from_env()?;

    if let Some(state_db) = args.state_db {
        config.state_db = state_db;
    }
    if let Some(name) = args.public_collection {
        config.chaincode.public_collection = name;
    }
    if let Some(name) = args.private_collection {
        config.chaincode.private_collection = name;
    }
    if let Some(level) = args.log_level {
        config.telemetry.log_level = level;
    }
    if args.json_logs {
        config.telemetry.json_logs = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(Args::parse())?;
    let telemetry =
        init_telemetry(config.telemetry.clone()).context("failed to initialize logging")?;

    let host = ChaincodeHost::new(&config);
    let init = host.init();
    if !init.is_success() {
        bail!("chaincode init failed: {}", init.message);
    }
    info!(
        service = telemetry.service_name(),
        state_db = %config.state_db,
        public = %config.chaincode.public_collection,
        private = %config.chaincode.private_collection,
        "Host ready, reading invocations from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("End of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let reply = host.handle_line(&line);
                let mut out = serde_json::to_vec(&reply).context("failed to encode reply")?;
                out.push(b'\n');
                stdout.write_all(&out).await.context("failed to write reply")?;
                stdout.flush().await.context("failed to flush stdout")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(
        assets = host.ledger().len(&config.chaincode.public_collection),
        "Host stopped"
    );
    Ok(())
}
