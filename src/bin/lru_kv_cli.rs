//! lru_kv_cli - command-line client for an lru_kv server.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use lru_kv::client::CacheClient;

#[derive(Parser, Debug)]
#[command(name = "lru_kv_cli")]
#[command(about = "Get, set and delete keys on an lru_kv server")]
struct Args {
    /// Server base URL
    #[arg(long = "addr", env = "LRU_KV_ADDR", default_value = "http://127.0.0.1:3000")]
    addr: String,

    /// Request timeout in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value stored under KEY
    Get { key: String },

    /// Store VALUE under KEY
    Set {
        key: String,
        value: String,
        /// Time-to-live in seconds, 0 never expires
        #[arg(long = "ttl", default_value_t = 60)]
        ttl: u64,
    },

    /// Remove KEY
    Del { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = CacheClient::with_timeout(&args.addr, Duration::from_millis(args.timeout_ms))?;

    match args.command {
        Command::Get { key } => match client.get(&key).await? {
            Some(value) => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&value).context("failed to write value")?;
                writeln!(stdout)?;
            }
            None => bail!("key not found: {key}"),
        },
        Command::Set { key, value, ttl } => {
            client.set(&key, value, Duration::from_secs(ttl)).await?;
            println!("OK");
        }
        Command::Del { key } => {
            if client.delete(&key).await? {
                println!("deleted");
            } else {
                println!("not found");
            }
        }
    }

    Ok(())
}
