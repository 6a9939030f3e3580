use super::events::{
    decode_server_frame, encode_setup_frame, encode_user_text_frame, ServerEvent,
};
use crate::credential::ApiCredential;
use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{connect, Message, WebSocket};

const SOCKET_IDLE_SLEEP: Duration = Duration::from_millis(40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryClass {
    Retryable,
    NonRetryable,
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    SendText(String),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected,
    Delta(String),
    TurnComplete,
    Interrupted,
    Reconnecting { attempt: u32 },
    Closed { reason: String, retryable: bool },
}

/// Everything the worker needs to open and re-open the session; captured once
/// at spawn so the worker never reads shared state.
#[derive(Debug, Clone)]
pub struct LiveSessionSpec {
    pub endpoint: String,
    pub model: String,
    pub voice: String,
    pub system_instruction: String,
    pub reconnect_backoff_ms: u64,
    pub max_reconnect_attempts: u32,
}

pub struct LiveSessionHandle {
    commands: Sender<SessionCommand>,
    events: Receiver<SessionEvent>,
    worker: Option<JoinHandle<()>>,
}

impl LiveSessionHandle {
    pub fn send_text(&self, text: &str) -> Result<(), String> {
        self.commands
            .send(SessionCommand::SendText(text.to_string()))
            .map_err(|_| "live session worker is gone".to_string())
    }

    pub fn try_event(&self) -> Option<SessionEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(SessionEvent::Closed {
                reason: "live session worker disconnected unexpectedly".to_string(),
                retryable: false,
            }),
        }
    }

    pub fn close(mut self) {
        let _ = self.commands.send(SessionCommand::Close);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

pub fn spawn_live_session(spec: LiveSessionSpec, credential: &ApiCredential) -> LiveSessionHandle {
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let credential = credential.clone();
    let worker = thread::spawn(move || {
        run_session_loop(&spec, &credential, &command_rx, &event_tx);
    });
    LiveSessionHandle {
        commands: command_tx,
        events: event_rx,
        worker: Some(worker),
    }
}

pub fn live_connect_url(endpoint: &str, credential: &ApiCredential) -> String {
    format!(
        "{}?key={}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(credential.expose())
    )
}

fn run_session_loop(
    spec: &LiveSessionSpec,
    credential: &ApiCredential,
    commands: &Receiver<SessionCommand>,
    events: &Sender<SessionEvent>,
) {
    let backoff = Duration::from_millis(spec.reconnect_backoff_ms.max(1));
    let mut attempt = 0u32;

    loop {
        let url = live_connect_url(&spec.endpoint, credential);
        let mut socket = match connect(url.as_str()) {
            Ok((socket, _)) => socket,
            Err(err) => {
                let reason = format!("session connect failed: {err}");
                if !schedule_retry(&reason, &mut attempt, spec, backoff, commands, events) {
                    return;
                }
                continue;
            }
        };

        if let Err(err) = set_socket_nonblocking(&mut socket) {
            let _ = events.send(SessionEvent::Closed {
                reason: err,
                retryable: false,
            });
            return;
        }

        let setup = encode_setup_frame(&spec.model, &spec.system_instruction, &spec.voice);
        if let Err(err) = socket.send(Message::Text(setup)) {
            let reason = format!("session setup failed: {err}");
            if !schedule_retry(&reason, &mut attempt, spec, backoff, commands, events) {
                return;
            }
            continue;
        }

        match pump_connection(&mut socket, commands, events) {
            ConnectionOutcome::CloseRequested => {
                let _ = socket.close(None);
                let _ = events.send(SessionEvent::Closed {
                    reason: "closed".to_string(),
                    retryable: false,
                });
                return;
            }
            ConnectionOutcome::Disconnected(reason) => {
                attempt = 0;
                let _ = socket.close(None);
                if !schedule_retry(&reason, &mut attempt, spec, backoff, commands, events) {
                    return;
                }
            }
        }
    }
}

/// Decides between reconnecting and giving up, emitting the matching event.
/// Returns false when the loop should end.
fn schedule_retry(
    reason: &str,
    attempt: &mut u32,
    spec: &LiveSessionSpec,
    backoff: Duration,
    commands: &Receiver<SessionCommand>,
    events: &Sender<SessionEvent>,
) -> bool {
    if classify_session_failure(reason) == RetryClass::NonRetryable {
        let _ = events.send(SessionEvent::Closed {
            reason: reason.to_string(),
            retryable: false,
        });
        return false;
    }
    *attempt += 1;
    if *attempt > spec.max_reconnect_attempts {
        let _ = events.send(SessionEvent::Closed {
            reason: format!("{reason} (gave up after {} attempts)", spec.max_reconnect_attempts),
            retryable: true,
        });
        return false;
    }
    let _ = events.send(SessionEvent::Reconnecting { attempt: *attempt });
    sleep_reconnect(backoff, commands)
}

/// Backoff sleep in small steps so a Close command still lands promptly.
fn sleep_reconnect(backoff: Duration, commands: &Receiver<SessionCommand>) -> bool {
    let mut remaining = backoff + reconnect_jitter(backoff);
    while remaining > Duration::ZERO {
        match commands.try_recv() {
            Ok(SessionCommand::Close) | Err(TryRecvError::Disconnected) => return false,
            Ok(SessionCommand::SendText(_)) | Err(TryRecvError::Empty) => {}
        }
        let step = remaining.min(Duration::from_millis(25));
        thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
    true
}

fn reconnect_jitter(backoff: Duration) -> Duration {
    let ceiling = backoff.min(Duration::from_millis(500)).as_millis() as u64;
    if ceiling == 0 {
        return Duration::ZERO;
    }
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_nanos() as u64)
        .unwrap_or(0);
    Duration::from_millis(seed % (ceiling + 1))
}

fn classify_session_failure(message: &str) -> RetryClass {
    let lower = message.to_ascii_lowercase();
    if [
        "401",
        "403",
        "unauthorized",
        "forbidden",
        "api key",
        "api_key_invalid",
        "permission",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
    {
        RetryClass::NonRetryable
    } else {
        RetryClass::Retryable
    }
}

enum ConnectionOutcome {
    CloseRequested,
    Disconnected(String),
}

fn pump_connection(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    commands: &Receiver<SessionCommand>,
    events: &Sender<SessionEvent>,
) -> ConnectionOutcome {
    loop {
        loop {
            match commands.try_recv() {
                Ok(SessionCommand::SendText(text)) => {
                    let frame = encode_user_text_frame(&text);
                    if let Err(err) = socket.send(Message::Text(frame)) {
                        return ConnectionOutcome::Disconnected(format!(
                            "session send failed: {err}"
                        ));
                    }
                }
                Ok(SessionCommand::Close) => return ConnectionOutcome::CloseRequested,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return ConnectionOutcome::CloseRequested,
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => match decode_server_frame(text.as_str()) {
                ServerEvent::SetupComplete => {
                    let _ = events.send(SessionEvent::Connected);
                }
                ServerEvent::Delta(delta) => {
                    let _ = events.send(SessionEvent::Delta(delta));
                }
                ServerEvent::TurnComplete => {
                    let _ = events.send(SessionEvent::TurnComplete);
                }
                ServerEvent::Interrupted => {
                    let _ = events.send(SessionEvent::Interrupted);
                }
                ServerEvent::Ignored => {}
            },
            Ok(Message::Binary(_)) => {}
            Ok(Message::Ping(payload)) => {
                let _ = socket.send(Message::Pong(payload));
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Frame(_)) => {}
            Ok(Message::Close(_)) => {
                return ConnectionOutcome::Disconnected("server closed the session".to_string());
            }
            Err(tungstenite::Error::Io(err))
                if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
            {
                thread::sleep(SOCKET_IDLE_SLEEP);
            }
            Err(tungstenite::Error::ConnectionClosed) => {
                return ConnectionOutcome::Disconnected("session connection closed".to_string());
            }
            Err(err) => {
                return ConnectionOutcome::Disconnected(format!("session read failed: {err}"));
            }
        }
    }
}

fn set_socket_nonblocking(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
) -> Result<(), String> {
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_nonblocking(true),
        MaybeTlsStream::Rustls(stream) => stream.sock.set_nonblocking(true),
        _ => Ok(()),
    }
    .map_err(|err| format!("failed to configure live session stream: {err}"))
}
