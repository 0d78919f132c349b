mod game_store;
mod server_config;
mod tictactoe_service;

use clap::Parser;
use common::{logger, log, tic_tac_toe_server::TicTacToeServer};
use tonic::transport::Server;

use game_store::GameStore;
use tictactoe_service::TicTacToeServiceImpl;

#[derive(Parser)]
#[command(name = "tictactoe_server")]
struct Args {
    /// Port to listen on, overrides the config file.
    port: Option<u16>,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = server_config::get_config_manager(args.config.as_deref()).get_config()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let prefix = if args.use_log_prefix || config.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let addr = config.socket_addr()?;
    let store = GameStore::new();
    let service = TicTacToeServiceImpl::new(store);

    log!("Server listening on {}...", addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutting down");
    };

    Server::builder()
        .add_service(TicTacToeServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal)
        .await?;

    log!("Server shut down gracefully");

    Ok(())
}
