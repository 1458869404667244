mod ascii;
mod link;
mod stream;

use std::pin::pin;
use std::time::Duration;

use board::engine::Engine;
use board::geometry::{Cell, Point};
use board::scene::Scene;
use board::session::Session;
use clap::{Args, Parser, Subcommand};
use futures_util::stream::SplitStream;
use futures_util::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing_subscriber::EnvFilter;
use wire::BoardUpdate;

use crate::link::{ChannelLink, forward_outbound};
use crate::stream::inbound_stream;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("connection closed before the board was ready")]
    Closed,
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("no entity at cell ({x}, {y})")]
    EmptyCell { x: i32, y: i32 },
    #[error("select intent was not sent")]
    NotSent,
    #[error("writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

#[derive(Parser, Debug)]
#[command(name = "board-viewer", about = "Headless viewer for the grid game board")]
struct Cli {
    #[arg(long, env = "BOARD_WS_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Virtual surface width in pixels.
    #[arg(long, default_value_t = 610.0)]
    width: f64,

    /// Virtual surface height in pixels.
    #[arg(long, default_value_t = 610.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board as updates arrive.
    Watch(WatchArgs),
    /// Select the entity at a cell, as a click on it would.
    Select(SelectArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Stop after this many board updates.
    #[arg(long)]
    max_messages: Option<usize>,

    /// Print the board after every update instead of only at the end.
    #[arg(long, default_value_t = false)]
    follow: bool,
}

#[derive(Args, Debug)]
struct SelectArgs {
    #[arg(long)]
    x: i32,

    #[arg(long)]
    y: i32,

    /// How long to wait for the entity to appear.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

type ViewerSession = Session<Scene, ChannelLink>;
type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let (session, source, writer) = connect(&cli.url, cli.width, cli.height).await?;
    let updates = inbound_stream(source);

    match cli.command {
        Command::Watch(args) => run_watch(session, updates, writer, args).await,
        Command::Select(args) => run_select(session, updates, writer, args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn connect(
    url: &str,
    width: f64,
    height: f64,
) -> Result<(ViewerSession, SplitStream<Socket>, JoinHandle<()>), CliError> {
    let (ws, _) = connect_async(url).await.map_err(|error| CliError::WsConnect(Box::new(error)))?;
    tracing::info!(%url, "connected");

    let (sink, source) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(forward_outbound(rx, sink));

    let engine = Engine::new(Scene::new(), width, height);
    Ok((Session::new(engine, ChannelLink::new(tx)), source, writer))
}

async fn run_watch(
    mut session: ViewerSession,
    updates: impl Stream<Item = BoardUpdate>,
    writer: JoinHandle<()>,
    args: WatchArgs,
) -> Result<(), CliError> {
    let mut updates = pin!(updates);
    let mut received = 0_usize;
    loop {
        let Some(update) = updates.next().await else {
            session.on_close();
            break;
        };
        session.apply(update);
        received += 1;
        tracing::debug!(received, summary = %ascii::summary(session.engine()), "update applied");
        if args.follow {
            println!("{}", ascii::render(session.engine()));
        }
        if args.max_messages.is_some_and(|limit| received >= limit) {
            break;
        }
    }

    if !args.follow {
        println!("{}", ascii::render(session.engine()));
    }
    let stats = session.engine().stats();
    tracing::info!(
        received,
        duplicate_adds = stats.duplicate_adds,
        healed_inserts = stats.healed_inserts,
        unknown_removals = stats.unknown_removals,
        evicted = stats.evicted,
        "{}",
        ascii::summary(session.engine())
    );
    finish(session, writer).await
}

async fn run_select(
    mut session: ViewerSession,
    updates: impl Stream<Item = BoardUpdate>,
    writer: JoinHandle<()>,
    args: SelectArgs,
) -> Result<(), CliError> {
    let cell = Cell::new(args.x, args.y);
    let mut updates = pin!(updates);
    let wait = async {
        while session.engine().entity_at(cell).is_none() {
            let Some(update) = updates.next().await else {
                return Err(CliError::Closed);
            };
            session.apply(update);
        }
        Ok(())
    };
    tokio::time::timeout(Duration::from_secs(args.timeout_secs), wait)
        .await
        .map_err(|_| CliError::Timeout(args.timeout_secs))??;

    let point = cell_center(&session, cell);
    let Some(id) = session.on_pointer(point) else {
        return Err(if session.engine().entity_at(cell).is_none() {
            CliError::EmptyCell { x: args.x, y: args.y }
        } else {
            CliError::NotSent
        });
    };
    println!("selected entity {id} at ({}, {})", args.x, args.y);
    println!("{}", ascii::render(session.engine()));
    finish(session, writer).await
}

fn cell_center(session: &ViewerSession, cell: Cell) -> Point {
    let grid = session.engine().grid();
    let origin = grid.cell_origin(cell);
    Point::new(origin.x + grid.cell_half_width, origin.y + grid.cell_half_height)
}

/// Drop the session so the writer drains its queue and closes the socket.
async fn finish(session: ViewerSession, writer: JoinHandle<()>) -> Result<(), CliError> {
    tracing::debug!(intents_sent = session.intents_sent(), "shutting down");
    drop(session);
    writer.await?;
    Ok(())
}
