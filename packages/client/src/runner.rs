//! Client main loop.

use std::time::{Duration, Instant};

use cursorhub_server::{
    domain::Username,
    infrastructure::dto::websocket::{BROADCAST, BroadcastPayload, EventEnvelope, UPDATE_POSITION, UpdatePositionPayload},
};
use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    args::ClientArgs,
    command::{Command, HELP},
    display::format_broadcast,
    error::ClientError,
    orbit::orbit_position,
};

/// Tracks the time between sends; the server needs a positive `delta`.
struct DeltaClock {
    last: Option<Instant>,
}

impl DeltaClock {
    fn new() -> Self {
        Self { last: None }
    }

    /// Milliseconds since the previous call, at least 1.
    fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = self.last.map_or(0, |last| now.saturating_duration_since(last).as_millis());
        self.last = Some(now);
        elapsed.max(1) as f64
    }
}

fn encode_update(x: f64, y: f64, delta: f64) -> Result<String, serde_json::Error> {
    EventEnvelope::new(UPDATE_POSITION, &UpdatePositionPayload { x, y, delta })?.to_json()
}

/// Connect and run until the user quits or the server closes the connection.
pub async fn run_client(args: ClientArgs) -> Result<(), ClientError> {
    let username = Username::new(args.username.clone())?;
    if args.orbit && args.interval_ms == 0 {
        return Err(ClientError::InvalidArgs("interval-ms must be at least 1".to_string()));
    }

    let url = args.connect_url();
    tracing::info!("Connecting to {}", url);
    let (ws, _) = connect_async(url).await?;
    println!("connected as '{}'", username);

    let (mut write, mut read) = ws.split();
    let (tx, mut rx) = mpsc::channel::<(f64, f64)>(32);

    // Print every broadcast until the server goes away
    let own_name = username.as_str().to_string();
    let mut reader = tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => print_event(text.as_str(), &own_name),
                Ok(Message::Close(_)) => {
                    println!("server closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // Positions from the prompt or the orbit go out in order
    let mut writer = tokio::spawn(async move {
        let mut clock = DeltaClock::new();
        while let Some((x, y)) = rx.recv().await {
            let frame = encode_update(x, y, clock.tick(Instant::now()))?;
            write.send(Message::Text(frame.into())).await?;
        }
        write.send(Message::Close(None)).await?;
        Ok::<(), ClientError>(())
    });

    let input = if args.orbit {
        tokio::spawn(orbit_loop(tx, args.radius, args.interval_ms))
    } else {
        tokio::task::spawn_blocking(move || prompt_loop(tx))
    };

    tokio::select! {
        result = input => match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Input error: {}", e),
            Err(e) => tracing::error!("Input task failed: {}", e),
        },
        _ = &mut reader => return Ok(()),
    }

    // The input side dropped its sender; the writer sends a close frame.
    match tokio::time::timeout(Duration::from_secs(2), &mut writer).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => tracing::error!("Writer task failed: {}", e),
        Err(_) => writer.abort(),
    }
    let _ = tokio::time::timeout(Duration::from_secs(2), &mut reader).await;
    Ok(())
}

fn print_event(text: &str, own_name: &str) {
    let event = match EventEnvelope::parse(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Unreadable frame: {}", e);
            return;
        }
    };
    if event.r#type != BROADCAST {
        tracing::debug!("Ignoring '{}' event", event.r#type);
        return;
    }

    match event.decode_payload::<BroadcastPayload>() {
        Ok(payload) => {
            println!("--- {} online", payload.len());
            for line in format_broadcast(&payload, own_name) {
                println!("{line}");
            }
        }
        Err(e) => tracing::warn!("Unreadable broadcast: {}", e),
    }
}

async fn orbit_loop(tx: mpsc::Sender<(f64, f64)>, radius: f64, interval_ms: u64) -> Result<(), ClientError> {
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
    let mut tick = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if tx.send(orbit_position(tick, radius)).await.is_err() {
                    return Ok(());
                }
                tick = tick.wrapping_add(1);
            }
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// Blocking prompt; returns when the user quits.
fn prompt_loop(tx: mpsc::Sender<(f64, f64)>) -> Result<(), ClientError> {
    let mut editor = DefaultEditor::new()?;
    println!("{HELP}");

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Ok(Command::Move { x, y }) => {
                if tx.blocking_send((x, y)).is_err() {
                    return Ok(());
                }
            }
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Empty) => {}
            Err(message) => println!("{message}"),
        }
    }
}
