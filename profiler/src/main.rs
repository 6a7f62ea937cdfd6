mod cli;
mod report;

use anyhow::Result;
use std::env;

/// Filtro de logs; se puede sobreescribir con PROFILER_LOG.
fn log_filter() -> String {
    env::var("PROFILER_LOG").unwrap_or_else(|_| "profiler=info,model=info".to_string())
}

fn main() -> Result<()> {
    // logs a stderr, stdout queda para los reportes
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    cli::run()
}
