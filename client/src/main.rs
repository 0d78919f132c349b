mod board_view;

use clap::{Parser, Subcommand, ValueEnum};
use common::{logger, log, proto, tic_tac_toe_client::TicTacToeClient};
use tonic::transport::Channel;

#[derive(Parser)]
#[command(name = "tictactoe_client")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    address: String,

    #[arg(long)]
    use_log_prefix: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new game.
    Create,
    /// Show the current state of a game.
    Get { game_id: i64 },
    /// Place a mark on a cell (1-9, row by row from the top left).
    Move {
        game_id: i64,
        mark: MarkArg,
        cell: i32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MarkArg {
    Cross,
    Nought,
}

impl From<MarkArg> for proto::Mark {
    fn from(mark: MarkArg) -> Self {
        match mark {
            MarkArg::Cross => proto::Mark::Cross,
            MarkArg::Nought => proto::Mark::Nought,
        }
    }
}

async fn run(
    client: &mut TicTacToeClient<Channel>,
    command: Command,
) -> Result<proto::Game, tonic::Status> {
    let response = match command {
        Command::Create => client.create_game(proto::CreateGameRequest {}).await?,
        Command::Get { game_id } => client.get_game(proto::GetGameRequest { game_id }).await?,
        Command::Move { game_id, mark, cell } => {
            let mark: proto::Mark = mark.into();
            client
                .make_move(proto::MakeMoveRequest {
                    game_id,
                    r#move: Some(proto::Move { mark: mark as i32, cell }),
                })
                .await?
        }
    };
    Ok(response.into_inner())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = args.use_log_prefix.then(|| "Client".to_string());
    logger::init_logger(prefix);

    let mut client = TicTacToeClient::connect(args.address.clone())
        .await
        .map_err(|e| format!("Failed to connect to server at {}: {}", args.address, e))?;

    match run(&mut client, args.command).await {
        Ok(game) => {
            println!("{}", serde_yaml_ng::to_string(&game)?);
            println!("{}", board_view::render(&game));
            Ok(())
        }
        Err(status) => {
            log!("Request failed: {:?}: {}", status.code(), status.message());
            std::process::exit(1);
        }
    }
}
