//! arena — model battle and website analyzer client
//!
//! Usage:
//!   arena battle "Explain quantum computing"   → stream a three-model battle
//!   arena battle --live "..."                 → also print tokens as they arrive
//!   arena chat "Hello"                        → one avatar chat turn
//!   arena chat                                → chat, one turn per stdin line
//!   arena analyze example.com                 → analyze a site, print growth projection
//!   arena growth 62                           → print the projection for a score
//!   arena version                             → show version

use arena::render;
use arena_client::{
    overall_score, AnalyzeClient, BattleClient, BattleHandle, BattleOutcome, CancellationToken,
    ChatClient, ChatOutcome,
};
use arena_core::config::DEFAULT_CONFIG_FILE;
use arena_core::growth::projections;
use arena_core::scoring::Standings;
use arena_core::{ArenaConfig, BattleRequest, Board, ChatUpdate, Conversation, Update};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "arena",
    about = "Model battle and website analyzer client",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (or set ARENA_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Path to config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one battle between claude, gpt and gemini
    Battle {
        /// Challenge prompt
        prompt: String,
        /// Print tokens as they stream in
        #[arg(long, default_value_t = false)]
        live: bool,
    },
    /// Chat with the avatar assistant
    Chat {
        /// Message to send; without it, each stdin line is a turn
        message: Option<String>,
    },
    /// Analyze a website
    Analyze {
        /// Website URL (e.g. example.com)
        url: String,
    },
    /// Print the projected growth for a site score
    Growth {
        /// Current overall score, 0-100
        score: f64,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ArenaConfig::load(&config_path)
        .with_env()
        .with_backend_override(cli.backend_url.clone());

    match cli.command {
        Commands::Battle { prompt, live } => run_battle(&config, prompt, live).await?,
        Commands::Chat { message } => run_chat(&config, message).await?,
        Commands::Analyze { url } => run_analyze(&config, &url).await?,
        Commands::Growth { score } => {
            print!("{}", render::render_growth(&projections(score)));
        }
        Commands::Version => {
            println!("arena v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_tracing(
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arena=info,arena_client=info,arena_core=info".into());
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log file: {}", path.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}

async fn run_battle(config: &ArenaConfig, prompt: String, live: bool) -> anyhow::Result<()> {
    let client = BattleClient::new(config)?;
    let handle = BattleHandle::new();
    let mut board = Board::new();
    let request = BattleRequest::new(prompt);

    let token = handle.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let outcome = handle
        .run(&client, &request, &mut board, |update, board| match update {
            Update::Token { entity, text } if live => {
                print!("[{}] {}", entity, text);
                let _ = std::io::stdout().flush();
            }
            Update::Completed { entity } => {
                if live {
                    println!();
                }
                println!("{}", render::render_card(*entity, board.get(*entity)));
            }
            _ => {}
        })
        .await?;

    match outcome {
        BattleOutcome::Finished => {}
        BattleOutcome::Ended => eprintln!("Battle stream ended early; restart to try again."),
        BattleOutcome::Cancelled => eprintln!("Battle cancelled."),
    }

    println!("{}", render::render_board(&board));
    let standings = Standings::from_board(&board);
    if !standings.entries().is_empty() {
        print!("{}", render::render_standings(&standings));
    }
    Ok(())
}

async fn run_chat(config: &ArenaConfig, message: Option<String>) -> anyhow::Result<()> {
    use tokio::io::AsyncBufReadExt;

    let client = ChatClient::new(config)?;
    let cancel = CancellationToken::new();
    let mut conversation = Conversation::new();

    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    if let Some(text) = message {
        return chat_turn(&client, &mut conversation, &text, &cancel).await;
    }

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = lines.next_line() => next?,
        };
        let Some(line) = next else { break };
        if line.trim().is_empty() {
            continue;
        }
        chat_turn(&client, &mut conversation, &line, &cancel).await?;
    }
    Ok(())
}

async fn chat_turn(
    client: &ChatClient,
    conversation: &mut Conversation,
    text: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let sent = client
        .send(conversation, text, cancel, |update, _| {
            if let ChatUpdate::Token(token) = update {
                print!("{}", token);
                let _ = std::io::stdout().flush();
            }
        })
        .await;
    println!();

    match sent {
        Ok(ChatOutcome::Finished) => {}
        Ok(ChatOutcome::Ended) => eprintln!("Reply ended early."),
        Ok(ChatOutcome::Cancelled) => eprintln!("Chat cancelled."),
        Err(e) => {
            tracing::debug!("chat turn failed: {}", e);
            if let Some(reply) = conversation.reply() {
                eprintln!("{}", reply);
            }
        }
    }
    Ok(())
}

async fn run_analyze(config: &ArenaConfig, url: &str) -> anyhow::Result<()> {
    let client = AnalyzeClient::new(config)?;
    let report = match client.analyze(url).await {
        Ok(report) => report,
        Err(e) => anyhow::bail!(e.user_message()),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(score) = overall_score(&report) {
        println!();
        println!("Projected growth (overall score {:.1}):", score);
        print!("{}", render::render_growth(&projections(score)));
    }
    Ok(())
}
