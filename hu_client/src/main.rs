//! A heads-up poker console client.
//!
//! The client creates or joins a game through the matchmaking server, then
//! plays it over a websocket.

use anyhow::{Context, Result};
use hu_client::{
    api_client::ApiClient,
    config::{ClientConfig, Overrides},
    display::ConsolePresenter,
    logging,
    websocket_client::WebSocketClient,
};
use hu_poker::PlayerId;
use pico_args::Arguments;

const HELP: &str = "\
Play heads-up poker against another client

USAGE:
  hu_client [OPTIONS]

OPTIONS:
  --server URL          Matchmaking server URL  [env: HU_SERVER_URL, default: http://127.0.0.1:8000]
  --game ID             Game to join; a new one is created if omitted  [env: HU_GAME_ID]
  --timeout TICKS       Turn countdown length  [env: HU_TURN_TIMEOUT_SECS, default: 30]
  --client-id ID        Skip matchmaking and connect as this client id
  --url URL             Websocket URL to use with --client-id

FLAGS:
  -h, --help            Print help information
";

struct Args {
    overrides: Overrides,
    client_id: Option<String>,
    ws_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    logging::init();

    let args = Args {
        overrides: Overrides {
            server_url: pargs.opt_value_from_str("--server")?,
            game_id: pargs.opt_value_from_str("--game")?,
            turn_ticks: pargs.opt_value_from_str("--timeout")?,
        },
        client_id: pargs.opt_value_from_str("--client-id")?,
        ws_url: pargs.opt_value_from_str("--url")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}. Try --help");
    }

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.overrides).context("Invalid configuration")?;
    let api_client = ApiClient::new(config.server_url.clone());

    let (client_id, ws_url) = match args.client_id {
        Some(client_id) => {
            let client_id = PlayerId::new(&client_id);
            let ws_url = args
                .ws_url
                .unwrap_or_else(|| api_client.websocket_url(&client_id));
            (client_id, ws_url)
        }
        None => {
            let game_id = match &config.game_id {
                Some(game_id) => game_id.clone(),
                None => {
                    let game_id = api_client
                        .create_game()
                        .await
                        .context("Failed to create a game")?;
                    println!("Created game {game_id}. Share it with your opponent.");
                    game_id
                }
            };
            let joined = api_client
                .join_game(&game_id)
                .await
                .context("Failed to join the game")?;
            (joined.client_id, joined.url)
        }
    };

    println!("Playing as {client_id}. Type 'help' for commands.");
    let ws_client = WebSocketClient::new(ws_url, client_id, config);
    ws_client.connect_and_play(ConsolePresenter::stdout()).await?;

    println!("\nDisconnected from table.");
    Ok(())
}
