//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, installs the signal handler and
//! runs the server on the configured transport until the channel closes or a
//! termination signal arrives.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use weather_mcp_server::core::{
    Config, McpServer, Shutdown, SignalGuard, TransportService, config::LoggingConfig,
};

fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(serve(config.clone()));

    // A pending stdin read sits on a blocking thread that never returns on
    // its own; bound how long we wait for it.
    runtime.shutdown_timeout(config.server.shutdown_grace());

    info!("Server stopped");
    result
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting {} v{}", config.server.name, config.server.version);

    // Create the MCP server
    let server = McpServer::new(config.clone())?;

    info!("Server initialized with {} tool(s)", server.list_tools().len());

    let shutdown = Shutdown::new();
    let signals = SignalGuard::install(&shutdown)?;

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server, shutdown.signal()).await?;

    drop(signals);
    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the protocol.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
