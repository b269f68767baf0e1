//! Event-queue runtime.
//!
//! Bridges asynchronous sources (clock ticks, peer messages, user actions)
//! into the synchronous [`SessionMachine`]. Every source posts a
//! [`SessionEvent`] to one queue; [`EventLoop::run`] handles them one at a
//! time, in arrival order, each to completion.
//!
//! The machine's collaborators are not `Send`, so `run` is driven on the
//! current task (`block_on`, a `LocalSet`, or a current-thread test).

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::GameConfig;

use crate::state::clock::TickToken;
use crate::state::machine::{RoundEnd, SessionError, SessionMachine};
use crate::state::session::LetterHint;
use crate::state::sync::{PeerMessage, Transport, TransportError};

/// Something that happened, to be applied to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Start a new round
    Start,
    Tick(TickToken),
    /// Words the board matched
    Matches(Vec<String>),
    /// Raw inbound message from the peer
    Peer(String),
    IntroDismissed,
    NextLetter(LetterHint),
    Earthquake,
    Pause,
    Resume,
    /// The board filled up
    Gameover,
    Retry,
    /// Stop the loop
    Shutdown,
}

/// The queue every event source posts to.
#[derive(Debug)]
pub struct EventQueue {
    sender: UnboundedSender<SessionEvent>,
    receiver: UnboundedReceiver<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> UnboundedSender<SessionEvent> {
        self.sender.clone()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport that delivers encoded envelopes into a peer's event queue.
#[derive(Debug, Clone)]
pub struct PeerLink {
    peer: UnboundedSender<SessionEvent>,
}

impl PeerLink {
    pub fn new(peer: UnboundedSender<SessionEvent>) -> Self {
        Self { peer }
    }
}

impl Transport for PeerLink {
    fn send(&mut self, message: &PeerMessage) -> Result<(), TransportError> {
        let line = message.to_json()?;
        self.peer
            .send(SessionEvent::Peer(line))
            .map_err(|_| TransportError::Closed)
    }
}

/// Post `Tick(token)` every `period` until the queue closes.
///
/// The first tick arrives one full period after the call.
pub fn spawn_ticker(
    token: TickToken,
    period: Duration,
    queue: WeakUnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(sender) = queue.upgrade() else {
                break;
            };
            if sender.send(SessionEvent::Tick(token)).is_err() {
                break;
            }
        }
    })
}

/// Owns the machine and drains its event queue.
pub struct EventLoop {
    machine: SessionMachine,
    events: UnboundedReceiver<SessionEvent>,
    queue: WeakUnboundedSender<SessionEvent>,
    tick_interval: Duration,
    ticker: Option<(TickToken, JoinHandle<()>)>,
    round_ends: UnboundedSender<RoundEnd>,
    round_ends_rx: Option<UnboundedReceiver<RoundEnd>>,
}

impl EventLoop {
    /// The loop ends on [`SessionEvent::Shutdown`] or once every sender
    /// obtained from `queue` has been dropped.
    pub fn new(machine: SessionMachine, queue: EventQueue, tick_interval: Duration) -> Self {
        let EventQueue { sender, receiver } = queue;
        let (round_ends, round_ends_rx) = mpsc::unbounded_channel();
        Self {
            machine,
            events: receiver,
            queue: sender.downgrade(),
            tick_interval,
            ticker: None,
            round_ends,
            round_ends_rx: Some(round_ends_rx),
        }
    }

    /// Tick at `config.tick_interval`.
    pub fn from_config(machine: SessionMachine, queue: EventQueue, config: &GameConfig) -> Self {
        Self::new(machine, queue, config.tick_interval)
    }

    /// Concluded rounds, for presenting the end-of-round view.
    pub fn round_ends(&mut self) -> Option<UnboundedReceiver<RoundEnd>> {
        self.round_ends_rx.take()
    }

    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    /// Process events until shutdown and hand the machine back.
    pub async fn run(mut self) -> SessionMachine {
        info!("event loop started");
        while let Some(event) = self.events.recv().await {
            match self.handle(event) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => break,
                Err(error) => warn!(%error, "event rejected"),
            }
        }
        self.stop_ticker();
        info!("event loop stopped");
        self.machine
    }

    fn handle(&mut self, event: SessionEvent) -> Result<ControlFlow<()>, SessionError> {
        match event {
            SessionEvent::Start => {
                let token = self.machine.initialize()?;
                self.start_ticker(token);
            }
            SessionEvent::Tick(token) => {
                self.machine.tick(token);
            }
            SessionEvent::Matches(words) => {
                self.machine.apply_matches(&words)?;
            }
            SessionEvent::Peer(raw) => {
                if let Some(end) = self.machine.receive_peer_message(&raw)? {
                    self.conclude(end);
                }
            }
            SessionEvent::IntroDismissed => self.machine.change_game_status()?,
            SessionEvent::NextLetter(letter) => self.machine.update_next_letter_hint(letter),
            SessionEvent::Earthquake => {
                self.machine.decrease_earthquake()?;
            }
            SessionEvent::Pause => {
                self.machine.pause_game()?;
                self.stop_ticker();
            }
            SessionEvent::Resume => {
                let token = self.machine.resume_game()?;
                self.start_ticker(token);
            }
            SessionEvent::Gameover => {
                let end = self.machine.handle_gameover()?;
                self.conclude(end);
            }
            SessionEvent::Retry => {
                let token = self.machine.retry()?;
                self.start_ticker(token);
            }
            SessionEvent::Shutdown => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn conclude(&mut self, end: RoundEnd) {
        self.stop_ticker();
        if self.round_ends.send(end).is_err() {
            debug!("no listener for round ends");
        }
    }

    fn start_ticker(&mut self, token: TickToken) {
        if matches!(&self.ticker, Some((running, _)) if *running == token) {
            return;
        }
        self.stop_ticker();
        let handle = spawn_ticker(token, self.tick_interval, self.queue.clone());
        self.ticker = Some((token, handle));
    }

    fn stop_ticker(&mut self) {
        if let Some((_, handle)) = self.ticker.take() {
            handle.abort();
        }
    }
}
