//! TTLKV - A Concurrent In-Memory Key-Value Store with TTL
//!
//! This is the main entry point for the `ttlkv` binary. It starts a store,
//! reads commands from stdin one per line, and prints each reply.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ttlkv::{CommandHandler, KvStore, StoreConfig};

/// Parse configuration from command-line arguments
fn config_from_args() -> anyhow::Result<StoreConfig> {
    let mut config = StoreConfig::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sweep-interval-ms" | "-i" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sweep-interval-ms requires a value"))?;
                let ms: u64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid sweep interval: {}", value))?;
                config = config.with_sweep_interval(Duration::from_millis(ms));
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-v" => {
                println!("ttlkv version {}", ttlkv::VERSION);
                std::process::exit(0);
            }
            other => {
                print_help();
                anyhow::bail!("unknown argument: {}", other);
            }
        }
    }

    config.validate()?;
    Ok(config)
}

fn print_help() {
    println!(
        r#"
TTLKV - A Concurrent In-Memory Key-Value Store with TTL

USAGE:
    ttlkv [OPTIONS]

OPTIONS:
    -i, --sweep-interval-ms <MS>    Interval between expiry sweeps (default: 1000)
    -v, --version                   Print version information
    -h, --help                      Print this help message

COMMANDS (one per line on stdin):
    SET <key> <value> [ttl-seconds]
    GET <key>
    DEL <key>

Requests are logged at info level; set RUST_LOG=warn to silence them.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config_from_args()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = Arc::new(KvStore::start(config)?);
    let handler = CommandHandler::new(Arc::clone(&store));

    let result = tokio::select! {
        result = read_loop(handler) => result,
        result = signal::ctrl_c() => {
            info!("Shutdown signal received");
            result.map_err(anyhow::Error::from)
        }
    };

    // Stop background work before anything else is torn down
    store.shutdown();
    info!("Shutdown complete");
    result
}

/// Reads commands from stdin until EOF.
///
/// Stdin is read on a plain thread so a pending read never holds up runtime
/// shutdown after Ctrl+C.
async fn read_loop(handler: CommandHandler) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<std::io::Result<Vec<u8>>>(64);

    std::thread::spawn(move || {
        let mut stdin = std::io::stdin().lock();
        loop {
            let mut buf = Vec::new();
            let line = match stdin.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => Ok(buf),
                Err(e) => Err(e),
            };
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });

    while let Some(line) = rx.recv().await {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match handler.execute_bytes(&line) {
            Ok(reply) => println!("{}", reply),
            Err(e) => {
                debug!(error = %e, "Request failed");
                println!("ERR {}", e);
            }
        }
    }

    info!("End of input");
    Ok(())
}
