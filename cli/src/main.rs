use std::f64::consts::TAU;
use std::time::Duration;

use canvas::engine::{EngineConfig, EngineCore, Event};
use canvas::hit::HitFootprint;
use canvas::input::PointerPhase;
use canvas::session::GatePolicy;
use canvas::viewport::{Point, ViewRect};
use canvas::world::StalePolicy;
use clap::{Args, Parser, Subcommand};
use frames::{ClientMessage, Frame, ProtocolError, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

type WsError = tokio_tungstenite::tungstenite::Error;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<WsError>),
    #[error("websocket error: {0}")]
    Ws(Box<WsError>),
    #[error("websocket closed")]
    WsClosed,
    #[error("join to lobby {lobby} rejected: {message}")]
    Rejected { lobby: String, message: String },
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("object `{0}` never appeared in a snapshot")]
    MissingObject(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<WsError> for CliError {
    fn from(error: WsError) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[derive(Parser, Debug)]
#[command(name = "physboard-cli", about = "Headless participant for a physboard lobby")]
struct Cli {
    #[arg(long, env = "PHYSBOARD_WS_URL", default_value = "ws://127.0.0.1:3000/ws")]
    ws_url: String,

    #[arg(long, env = "PHYSBOARD_LOBBY")]
    lobby: String,

    #[arg(long, value_parser = policy::<GatePolicy>, default_value = "drop", help = "drop | queue")]
    gate: GatePolicy,

    #[arg(long, value_parser = policy::<StalePolicy>, default_value = "retain", help = "retain | prune")]
    stale: StalePolicy,

    #[arg(
        long,
        value_parser = policy::<HitFootprint>,
        default_value = "axis_aligned",
        help = "axis_aligned | rotated"
    )]
    footprint: HitFootprint,

    #[arg(long, help = "Seed for hue selection; random when omitted")]
    seed: Option<u64>,

    #[arg(long, default_value_t = 10, help = "Seconds to wait for the join acknowledgment")]
    join_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

/// Parse a policy name the same way the browser host's JSON config does.
fn policy<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.to_owned())).map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join, follow the lobby for a while, then print the final state as JSON.
    Watch(WatchArgs),
    /// Move the cursor around a circle so other participants see it.
    Orbit(OrbitArgs),
    /// Grab an object and fling it.
    Throw(ThrowArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long, default_value_t = 10)]
    seconds: u64,
}

#[derive(Args, Debug)]
struct OrbitArgs {
    #[arg(long, default_value_t = 1024.0)]
    cx: f64,
    #[arg(long, default_value_t = 512.0)]
    cy: f64,
    #[arg(long, default_value_t = 200.0)]
    radius: f64,
    #[arg(long, default_value_t = 4.0, help = "Seconds per revolution")]
    period: f64,
    #[arg(long, default_value_t = 10)]
    seconds: u64,
    #[arg(long, default_value_t = 30)]
    hz: u32,
}

#[derive(Args, Debug)]
struct ThrowArgs {
    /// Object id to grab.
    id: String,
    #[arg(long, allow_hyphen_values = true, default_value_t = 300.0)]
    dx: f64,
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    dy: f64,
    #[arg(long, default_value_t = 200, help = "Gesture duration in milliseconds")]
    millis: u64,
    #[arg(long, default_value_t = 10)]
    steps: u32,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            lobby_id: self.lobby.clone(),
            gate: self.gate,
            stale: self.stale,
            footprint: self.footprint,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut participant = Participant::connect(&cli.ws_url, cli.engine_config(), seed).await?;
    participant.join(Duration::from_secs(cli.join_timeout)).await?;

    let result = match cli.command {
        Command::Watch(args) => run_watch(&mut participant, args).await,
        Command::Orbit(args) => run_orbit(&mut participant, args).await,
        Command::Throw(args) => run_throw(&mut participant, args).await,
    };

    participant.leave().await;
    result
}

// =============================================================
// Commands
// =============================================================

async fn run_watch(participant: &mut Participant, args: WatchArgs) -> Result<(), CliError> {
    participant.follow_until(Instant::now() + Duration::from_secs(args.seconds)).await?;
    print_json(&participant.summary())
}

async fn run_orbit(participant: &mut Participant, args: OrbitArgs) -> Result<(), CliError> {
    let started = Instant::now();
    let deadline = started + Duration::from_secs(args.seconds);
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(args.hz.max(1))));
    let center = Point::new(args.cx, args.cy);

    loop {
        tokio::select! {
            _ = sleep_until(deadline) => break,
            _ = ticker.tick() => {
                let t = started.elapsed().as_secs_f64();
                let at = orbit_point(center, args.radius, args.period, t);
                participant.pointer(PointerPhase::Move, at).await?;
            }
            frame = next_frame(&mut participant.stream) => participant.accept(frame?).await?,
        }
    }
    tracing::info!(cursors = participant.core.presence.len(), "orbit finished");
    Ok(())
}

async fn run_throw(participant: &mut Participant, args: ThrowArgs) -> Result<(), CliError> {
    let origin = participant.wait_for_object(&args.id, Duration::from_secs(10)).await?;
    let path = throw_path(origin, Point::new(args.dx, args.dy), args.steps);
    let step = Duration::from_millis(args.millis / u64::from(args.steps.max(1)));

    let sent = participant.pointer(PointerPhase::Down, origin).await?;
    if !sent.iter().any(|m| matches!(m, ClientMessage::DragStart { id, .. } if *id == args.id)) {
        return Err(CliError::MissingObject(args.id));
    }
    let mut release = origin;
    for at in path {
        sleep(step).await;
        participant.pointer(PointerPhase::Move, at).await?;
        release = at;
    }
    let sent = participant.pointer(PointerPhase::Up, release).await?;
    for message in sent {
        if let ClientMessage::DragEnd { velocity: Some(v) } = message {
            tracing::info!(id = %args.id, vx = v.x, vy = v.y, "thrown");
        }
    }

    participant.follow_until(Instant::now() + Duration::from_secs(1)).await?;
    print_json(&participant.summary())
}

/// Position on a circle `t` seconds into an orbit of the given period.
fn orbit_point(center: Point, radius: f64, period: f64, t: f64) -> Point {
    let phase = if period > 0.0 { TAU * t / period } else { 0.0 };
    Point::new(center.x + radius * phase.cos(), center.y + radius * phase.sin())
}

/// Evenly spaced pointer positions from just past `origin` to `origin + delta`.
fn throw_path(origin: Point, delta: Point, steps: u32) -> Vec<Point> {
    let steps = steps.max(1);
    (1..=steps).map(|i| origin + delta * (f64::from(i) / f64::from(steps))).collect()
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

// =============================================================
// Participant
// =============================================================

/// One lobby connection driving an [`EngineCore`].
///
/// Pointer input is synthesised on a canvas rendered at its logical size, so
/// viewport and canvas coordinates coincide.
struct Participant {
    stream: WsStream,
    core: EngineCore,
    started: Instant,
}

impl Participant {
    async fn connect(url: &str, config: EngineConfig, seed: u64) -> Result<Self, CliError> {
        tracing::info!(%url, lobby = %config.lobby_id, "connecting");
        let (stream, _) = connect_async(url).await.map_err(|e| CliError::WsConnect(Box::new(e)))?;
        Ok(Self { stream, core: EngineCore::new(config, seed), started: Instant::now() })
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Read frames until the join is acknowledged.
    async fn join(&mut self, timeout: Duration) -> Result<(), CliError> {
        let deadline = Instant::now() + timeout;
        while !self.core.gateway.is_joined() {
            tokio::select! {
                _ = sleep_until(deadline) => return Err(CliError::Timeout("join acknowledgment")),
                frame = next_frame(&mut self.stream) => self.accept(frame?).await?,
            }
        }
        Ok(())
    }

    /// Apply inbound frames until `deadline`.
    async fn follow_until(&mut self, deadline: Instant) -> Result<(), CliError> {
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return Ok(()),
                frame = next_frame(&mut self.stream) => self.accept(frame?).await?,
            }
        }
    }

    /// Wait until a snapshot lists `id`; returns its center.
    async fn wait_for_object(&mut self, id: &str, timeout: Duration) -> Result<Point, CliError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(obj) = self.core.world.get(id) {
                return Ok(obj.center());
            }
            tokio::select! {
                _ = sleep_until(deadline) => return Err(CliError::MissingObject(id.to_owned())),
                frame = next_frame(&mut self.stream) => self.accept(frame?).await?,
            }
        }
    }

    /// Dispatch a synthetic pointer event; returns what was sent.
    async fn pointer(&mut self, phase: PointerPhase, at: Point) -> Result<Vec<ClientMessage>, CliError> {
        let bounds = ViewRect::new(0.0, 0.0, canvas::consts::CANVAS_WIDTH, canvas::consts::CANVAS_HEIGHT);
        let event = Event::Pointer { phase, client: at, bounds, ts_ms: self.now_ms() };
        self.dispatch(event).await
    }

    async fn accept(&mut self, frame: Frame) -> Result<(), CliError> {
        match ServerMessage::from_frame(&frame) {
            Ok(Some(message)) => {
                log_inbound(&message);
                self.dispatch(Event::Server(message)).await?;
                Ok(())
            }
            Ok(None) => {
                tracing::debug!(syscall = %frame.syscall, "ignoring frame");
                Ok(())
            }
            Err(ProtocolError::Rejected { message, .. }) => {
                self.core.handle(Event::JoinRejected(message.clone()));
                Err(CliError::Rejected { lobby: self.core.lobby_id().to_owned(), message })
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed frame");
                Ok(())
            }
        }
    }

    async fn dispatch(&mut self, event: Event) -> Result<Vec<ClientMessage>, CliError> {
        let out = self.core.handle(event);
        let ts = now_epoch_ms();
        for message in &out {
            tracing::debug!(syscall = message.syscall(), "send");
            let frame = message.clone().into_frame(Some(self.core.lobby_id()), ts);
            self.stream.send(Message::Binary(frames::encode_frame(&frame).into())).await?;
        }
        Ok(out)
    }

    /// Send the leave intent and close, logging rather than failing.
    async fn leave(&mut self) {
        if let Err(e) = self.dispatch(Event::Teardown).await {
            tracing::warn!(error = %e, "leave failed");
        }
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "close failed");
        }
        self.core.handle(Event::Disconnected);
    }

    fn summary(&self) -> Value {
        let session = self.core.gateway.session();
        json!({
            "lobby_id": self.core.lobby_id(),
            "client_id": session.local_id,
            "hue": session.local_hue,
            "objects": self.core.world.all().collect::<Vec<_>>(),
            "anchors": self.core.world.anchors(),
            "cursors": self
                .core
                .presence
                .cursors()
                .map(|(id, c)| json!({ "id": id, "x": c.position.x, "y": c.position.y, "hue": c.hue }))
                .collect::<Vec<_>>(),
        })
    }
}

fn log_inbound(message: &ServerMessage) {
    match message {
        ServerMessage::SessionConnected { client_id } => tracing::info!(%client_id, "session connected"),
        ServerMessage::Joined => tracing::info!("joined"),
        ServerMessage::Snapshot { objects, anchors } => {
            tracing::debug!(objects = objects.len(), anchors = anchors.len(), "snapshot");
        }
        ServerMessage::PresenceMoved { id, at } => tracing::trace!(%id, x = at.x, y = at.y, "presence"),
        ServerMessage::PresenceRemoved { id } => tracing::info!(%id, "participant left"),
    }
}

/// Next decodable frame. Undecodable binary messages are logged and skipped.
async fn next_frame(stream: &mut WsStream) -> Result<Frame, CliError> {
    loop {
        let Some(message) = stream.next().await else {
            return Err(CliError::WsClosed);
        };
        match message? {
            Message::Binary(bytes) => match frames::decode_frame(&bytes) {
                Ok(frame) => return Ok(frame),
                Err(e) => tracing::warn!(error = %e, len = bytes.len(), "skipping undecodable frame"),
            },
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

fn now_epoch_ms() -> i64 {
    let Ok(duration) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}
