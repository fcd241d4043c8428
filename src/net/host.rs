//! Host worker that owns the canonical [`GameState`].
//!
//! Every mutation funnels through one task consuming a command queue: local
//! host actions, peer traffic, roster changes and timer ticks. After each
//! committed change the worker projects one view per seat and pushes it.
//!
//! Timers (automated-seat think delay, post-roster settle delay) are spawned
//! tasks that feed a tick back into the same queue. An automated tick carries
//! the revision it was scheduled for and is ignored once the state moved on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::ai::{Decision, GreedyPolicy, MovePolicy};
use crate::core::action::{Intent, IntentRecord};
use crate::core::config::SessionConfig;
use crate::core::rng::GameRng;
use crate::core::seat::Seat;
use crate::core::state::{GameState, Phase};
use crate::error::{MoveError, Result, SessionError};
use crate::rules::{self, Meld, Transition};
use crate::tiles::{Deal, Tile};

use super::channel::{ConnectionState, PeerChannel, PeerId};
use super::handle::HostHandle;
use super::protocol::{HostBound, WireMessage};
use super::view::{project, GameView};

/// Commands consumed by the host worker.
pub(crate) enum Command {
    StartGame {
        reply: oneshot::Sender<()>,
    },
    Submit {
        seat: Seat,
        intent: Intent,
        reply: oneshot::Sender<std::result::Result<Transition, MoveError>>,
    },
    AttachPeer {
        channel: Arc<dyn PeerChannel>,
        reply: oneshot::Sender<Result<(PeerId, Seat)>>,
    },
    PeerMessage {
        peer: PeerId,
        message: WireMessage,
    },
    PeerState {
        peer: PeerId,
        state: ConnectionState,
    },
    /// Think-delay tick for the automated seat to act at `revision`.
    AutoTurn {
        revision: u64,
    },
    /// Settle-delay tick after a roster or connection change.
    Rebroadcast,
    QueryView {
        seat: Seat,
        reply: oneshot::Sender<GameView>,
    },
    QueryState {
        reply: oneshot::Sender<GameState>,
    },
    QueryHistory {
        reply: oneshot::Sender<Vec<IntentRecord>>,
    },
    Shutdown,
}

struct PeerLink {
    id: PeerId,
    seat: Seat,
    channel: Arc<dyn PeerChannel>,
    connection: ConnectionState,
}

impl PeerLink {
    fn deliver(&self, message: &WireMessage) {
        if let Err(err) = self.channel.send(message) {
            warn!(peer = %self.id, seat = %self.seat, %err, "failed to send {}", message.kind);
        }
    }
}

/// Background task that serializes every change to the canonical state.
pub(crate) struct HostWorker {
    state: GameState,
    config: SessionConfig,
    rng: GameRng,
    policy: Box<dyn MovePolicy>,
    peers: Vec<PeerLink>,
    next_peer: u32,
    history: Vec<IntentRecord>,
    command_rx: mpsc::Receiver<Command>,
    command_tx: mpsc::WeakSender<Command>,
    view_tx: watch::Sender<GameView>,
    auto_turn: Option<JoinHandle<()>>,
}

impl HostWorker {
    /// Main worker loop. Ends on `Shutdown` or once every handle is dropped.
    pub(crate) async fn run(mut self) {
        info!(role = %self.state.role(), seed = self.rng.seed(), "host worker started");

        while let Some(command) = self.command_rx.recv().await {
            if let Command::Shutdown = command {
                break;
            }
            self.handle_command(command);
        }

        if let Some(pending) = self.auto_turn.take() {
            pending.abort();
        }
        info!("host worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::StartGame { reply } => {
                self.start_game();
                if reply.send(()).is_err() {
                    debug!("StartGame reply channel closed (caller dropped)");
                }
            }
            Command::Submit {
                seat,
                intent,
                reply,
            } => {
                let result = self.submit_local(seat, intent);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::AttachPeer { channel, reply } => {
                let result = self.attach_peer(channel);
                if reply.send(result).is_err() {
                    debug!("AttachPeer reply channel closed (caller dropped)");
                }
            }
            Command::PeerMessage { peer, message } => self.on_peer_message(peer, message),
            Command::PeerState { peer, state } => self.on_peer_state(peer, state),
            Command::AutoTurn { revision } => self.run_auto_turn(revision),
            Command::Rebroadcast => self.broadcast(),
            Command::QueryView { seat, reply } => {
                if reply.send(project(&self.state, seat)).is_err() {
                    debug!("QueryView reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::QueryHistory { reply } => {
                if reply.send(self.history.clone()).is_err() {
                    debug!("QueryHistory reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    // === Transitions ===

    fn start_game(&mut self) {
        let context = format!("deal-{}", self.state.deals() + 1);
        let deal = Deal::shuffled(&mut self.rng.for_context(&context));

        rules::start_game(&mut self.state, deal);
        self.history.clear();
        info!(
            deal = self.state.deals(),
            pool = self.state.pool().len(),
            "dealt a new game"
        );

        let start = WireMessage::start_game();
        for link in self.peers.iter().filter(|p| p.connection.is_open()) {
            link.deliver(&start);
        }
        self.after_mutation();
    }

    fn apply_intent(
        &mut self,
        seat: Seat,
        intent: Intent,
    ) -> std::result::Result<Transition, MoveError> {
        let transition = rules::apply(&mut self.state, seat, &intent)?;

        if transition.is_win() {
            info!(winner = %seat, "game won");
        } else {
            debug!(%seat, ?transition, "transition committed");
        }
        self.history
            .push(IntentRecord::new(seat, intent, self.state.revision()));
        Ok(transition)
    }

    fn submit_local(
        &mut self,
        seat: Seat,
        intent: Intent,
    ) -> std::result::Result<Transition, MoveError> {
        match self.apply_intent(seat, intent) {
            Ok(transition) => {
                self.after_mutation();
                Ok(transition)
            }
            Err(err) => {
                debug!(%seat, %err, "local intent rejected");
                Err(err)
            }
        }
    }

    fn after_mutation(&mut self) {
        self.broadcast();
        self.reschedule_auto_turn();
    }

    // === Automated seats ===

    fn reschedule_auto_turn(&mut self) {
        if let Some(pending) = self.auto_turn.take() {
            pending.abort();
        }

        let Phase::InProgress { current } = self.state.phase() else {
            return;
        };
        if self.state.is_human(current) {
            return;
        }

        let revision = self.state.revision();
        trace!(seat = %current, revision, "automated turn scheduled");
        self.auto_turn = Some(self.schedule(
            self.config.think_delay(),
            Command::AutoTurn { revision },
        ));
    }

    fn run_auto_turn(&mut self, revision: u64) {
        if revision != self.state.revision() {
            trace!(revision, current = self.state.revision(), "stale automated tick ignored");
            return;
        }
        let Phase::InProgress { current: seat } = self.state.phase() else {
            return;
        };
        if self.state.is_human(seat) {
            return;
        }
        self.auto_turn = None;

        let hand: Vec<Tile> = self.state.hand(seat).iter().copied().collect();
        let board: Vec<Meld> = self.state.board().iter().cloned().collect();
        let decision = self.policy.decide(&hand, &board, self.state.has_meld(seat));
        debug!(%seat, ?decision, "automated seat decided");

        let committed = match &decision {
            Decision::Commit { .. } => match self.apply_intent(seat, decision.to_intent()) {
                Ok(transition) => Some(transition),
                Err(err) => {
                    warn!(%seat, %err, "automated commit rejected, drawing instead");
                    None
                }
            },
            Decision::Draw => None,
        };

        let outcome = match committed {
            Some(transition) if transition.is_win() => Ok(transition),
            Some(_) => self.apply_intent(seat, Intent::EndTurn),
            None => match self.apply_intent(seat, Intent::Draw) {
                Err(MoveError::PoolEmpty) => self.apply_intent(seat, Intent::EndTurn),
                other => other,
            },
        };
        if let Err(err) = outcome {
            warn!(%seat, %err, "automated turn could not advance");
        }

        self.after_mutation();
    }

    fn schedule(&self, delay: Duration, command: Command) -> JoinHandle<()> {
        let commands = self.command_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = commands.upgrade() {
                // The worker is gone if this fails.
                let _ = tx.send(command).await;
            }
        })
    }

    // === Peers ===

    fn attach_peer(&mut self, channel: Arc<dyn PeerChannel>) -> Result<(PeerId, Seat)> {
        let Some(seat) = Seat::clients().find(|s| self.peers.iter().all(|p| p.seat != *s)) else {
            warn!("peer rejected, all client seats are taken");
            return Err(SessionError::RosterFull);
        };

        let id = PeerId(self.next_peer);
        self.next_peer += 1;
        self.peers.push(PeerLink {
            id,
            seat,
            channel,
            connection: ConnectionState::Connecting,
        });
        self.state.set_human(seat, true);
        info!(peer = %id, %seat, "peer attached");

        // A pending automated move for this seat no longer applies.
        self.reschedule_auto_turn();
        self.schedule(self.config.settle_delay(), Command::Rebroadcast);
        Ok((id, seat))
    }

    fn peer_seat(&self, peer: PeerId) -> Option<Seat> {
        self.peers.iter().find(|p| p.id == peer).map(|p| p.seat)
    }

    fn on_peer_message(&mut self, peer: PeerId, message: WireMessage) {
        let Some(seat) = self.peer_seat(peer) else {
            warn!(%peer, "message from unknown peer dropped");
            return;
        };

        let kind = message.kind;
        let inbound = match message.into_host_bound(seat) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(%peer, %seat, %err, "malformed {} dropped", kind);
                return;
            }
        };

        match self.state.phase() {
            Phase::InProgress { current } if current == seat => {}
            phase => {
                debug!(%seat, ?phase, "stale {} dropped", kind);
                return;
            }
        }

        let intent = match inbound {
            HostBound::Draw => Intent::Draw,
            HostBound::EndTurn => Intent::EndTurn,
            HostBound::Move(payload) => match payload.to_intent(&self.state, seat) {
                Ok(intent) => intent,
                Err(err) => {
                    warn!(%peer, %seat, %err, "undecodable move dropped");
                    return;
                }
            },
        };

        match self.apply_intent(seat, intent) {
            Ok(_) => self.after_mutation(),
            Err(err) => debug!(%seat, %err, "illegal {} dropped", kind),
        }
    }

    fn on_peer_state(&mut self, peer: PeerId, state: ConnectionState) {
        let Some(link) = self.peers.iter_mut().find(|p| p.id == peer) else {
            warn!(%peer, %state, "state change from unknown peer");
            return;
        };
        if link.connection == state {
            return;
        }
        link.connection = state;

        match state {
            ConnectionState::Connected => info!(%peer, seat = %link.seat, "peer connected"),
            ConnectionState::Connecting => debug!(%peer, seat = %link.seat, "peer connecting"),
            ConnectionState::Disconnected | ConnectionState::Failed => {
                warn!(%peer, seat = %link.seat, %state, "peer connection lost");
            }
        }
        self.schedule(self.config.settle_delay(), Command::Rebroadcast);
    }

    /// Push a fresh projection to the local host view and every open peer.
    fn broadcast(&mut self) {
        self.view_tx
            .send_replace(project(&self.state, Seat::HOST));

        for link in self.peers.iter().filter(|p| p.connection.is_open()) {
            match WireMessage::update_state(&project(&self.state, link.seat)) {
                Ok(message) => link.deliver(&message),
                Err(err) => warn!(peer = %link.id, %err, "failed to encode view"),
            }
        }

        trace!(
            revision = self.state.revision(),
            peers = self.peers.len(),
            "views broadcast"
        );
    }
}

/// A running host: the worker task plus a handle to it.
pub struct Host {
    handle: HostHandle,
    worker: JoinHandle<()>,
}

impl Host {
    /// Spawn a host worker with the default greedy policy.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(config: SessionConfig) -> Self {
        Self::spawn_with_policy(config, GreedyPolicy)
    }

    /// Spawn a host worker whose automated seats use `policy`.
    #[must_use]
    pub fn spawn_with_policy(config: SessionConfig, policy: impl MovePolicy + 'static) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));

        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        let mut human = config.human_seats.clone();
        human[Seat::HOST] = true;
        let state = GameState::new(config.role, human);
        let (view_tx, view_rx) = watch::channel(project(&state, Seat::HOST));

        let worker = HostWorker {
            state,
            config,
            rng,
            policy: Box::new(policy),
            peers: Vec::new(),
            next_peer: 0,
            history: Vec::new(),
            command_rx,
            command_tx: command_tx.downgrade(),
            view_tx,
            auto_turn: None,
        };

        Self {
            handle: HostHandle::new(command_tx, view_rx),
            worker: tokio::spawn(worker.run()),
        }
    }

    #[must_use]
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WorkerJoin` if the worker task panicked.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.send_shutdown().await;
        drop(self.handle);
        self.worker.await.map_err(SessionError::WorkerJoin)
    }
}
