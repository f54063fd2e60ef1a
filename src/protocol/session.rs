//! # Session State Machine
//!
//! Drives the connection lifecycle from decoded packets: login, world
//! join, snapshot transfer, spawn, and server-instructed redirects.
//!
//! ## States
//! `Disconnected → Connecting → Connected → Authenticating →
//! WorldRequested → WorldTransferring → WorldLoaded → Spawned`, with a
//! `Redirecting` side transition reachable from any connected state.
//! There is no terminal state; disconnection returns to `Disconnected`
//! and clears all session-owned state.
//!
//! ## Async boundaries
//! World snapshot decoding and hostname resolution are suspend points
//! executed by the client shell; the session only emits [`Command`]s for
//! them. Every reset bumps a generation counter and each decode request
//! carries the generation it was issued under, so results of a
//! superseded decode are discarded instead of populating a stale world.
//!
//! ## Spawn guard
//! The world must have been loaded for the configured settle delay
//! before the client spawns. The guard is re-evaluated opportunistically
//! before each dispatched packet rather than on its own timer, so spawn
//! can be delayed arbitrarily if the server goes quiet. This matches the
//! reference protocol behavior.

use std::f64::consts::PI;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::core::packet::{Packet, PacketKind};
use crate::error::{ProtocolError, Result};
use crate::utils::time::protocol_timestamp;
use crate::world::World;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Authenticating,
    WorldRequested,
    WorldTransferring,
    WorldLoaded,
    Spawned,
    Redirecting,
}

/// Asynchronous work the client shell must execute on the session's
/// behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Decompress and parse a world snapshot off the event loop.
    DecodeWorld { compressed: Vec<u8>, generation: u64 },
    /// Resolve the host and reconnect against the resolved address.
    Redirect { host: String },
}

/// Observations surfaced to the caller without affecting the state
/// machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Chat { user_id: String, message: String },
}

/// Commands and events produced while dispatching one inbound batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub commands: Vec<Command>,
    pub events: Vec<SessionEvent>,
}

/// The session aggregate: state machine, world, position, and the
/// outbound packet queue.
///
/// Single-owner by design; all mutation happens from the event loop, so
/// no locking is required.
pub struct Session {
    state: SessionState,
    co_id: String,
    token: String,
    world_dest: String,
    settle_delay: Duration,

    world: Option<World>,
    spawned: bool,

    x: f64,
    y: f64,
    last_grid: Option<(i32, i32)>,

    queue: Vec<Packet>,
    generation: u64,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            state: SessionState::Disconnected,
            co_id: config.co_id.clone(),
            token: config.token.clone(),
            world_dest: config.world.clone(),
            settle_delay: config.settle_delay,
            world: None,
            spawned: false,
            x: 0.0,
            y: 0.0,
            last_grid: None,
            queue: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn spawned(&self) -> bool {
        self.spawned
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Generation of the most recent async decode request; bumped on
    /// every reset and every new world-data packet.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A transport connection attempt has started.
    pub fn begin_connect(&mut self) {
        self.state = SessionState::Connecting;
    }

    /// The transport connected: enqueue the login announcement and the
    /// fire-and-forget client info preamble. The caller flushes the
    /// queue immediately afterwards and starts the sync timer.
    pub fn on_connect(&mut self) {
        info!("connected");
        self.push(Packet::login());
        self.push(Packet::client_info());
        self.state = SessionState::Connected;
    }

    /// The transport closed. Clears all session-owned state; the
    /// decision to reconnect is left to the caller.
    pub fn on_disconnect(&mut self) {
        info!("disconnected");
        self.reset();
        self.state = SessionState::Disconnected;
    }

    /// Full reset ahead of a redirect reconnect: the new connection must
    /// not see any state or queued packets from the old one.
    pub fn reset_for_redirect(&mut self) {
        self.reset();
        self.state = SessionState::Connecting;
    }

    fn reset(&mut self) {
        self.world = None;
        self.spawned = false;
        self.x = 0.0;
        self.y = 0.0;
        self.last_grid = None;
        self.queue.clear();
        // invalidates any in-flight decode
        self.generation += 1;
    }

    /// Dispatch one decoded inbound batch in index order.
    ///
    /// The spawn guard runs before each contained packet, so a settled
    /// world spawns on the next inbound traffic of any kind.
    pub fn handle_batch(&mut self, packets: Vec<Packet>) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for packet in packets {
            self.check_spawn();
            self.dispatch(packet, &mut outcome)?;
        }
        Ok(outcome)
    }

    fn dispatch(&mut self, packet: Packet, outcome: &mut BatchOutcome) -> Result<()> {
        debug!(id = packet.id(), "received packet");

        match packet.kind() {
            PacketKind::VerifyChallenge => {
                info!("logging in");
                let credentials = Packet::credentials(&self.co_id, &self.token);
                self.push(credentials);
                self.state = SessionState::Authenticating;
            }
            PacketKind::CredentialAck => {
                let join = Packet::join_world(&self.world_dest);
                self.push(join);
                self.state = SessionState::WorldRequested;
            }
            PacketKind::WorldTransfer => {
                let name = packet.get_str("WN")?.to_string();
                info!(world = %name, "transferring to world");
                self.push(Packet::get_world(&name));
                self.state = SessionState::WorldTransferring;
            }
            PacketKind::Redirect => {
                let host = packet.get_str("IP")?.to_string();
                info!(host = %host, "redirect requested");
                self.state = SessionState::Redirecting;
                outcome.commands.push(Command::Redirect { host });
            }
            PacketKind::WorldData => {
                let compressed = packet.get_bytes("W")?.to_vec();
                // a second snapshot supersedes any pending decode
                self.generation += 1;
                outcome.commands.push(Command::DecodeWorld {
                    compressed,
                    generation: self.generation,
                });
                self.push(Packet::spawn_request());
                self.state = SessionState::WorldLoaded;
            }
            PacketKind::Chat => {
                let body = packet.get_document("CmB")?;
                let message = body
                    .get_str("message")
                    .map_err(|_| ProtocolError::MissingField("message"))?
                    .to_string();
                let user_id = body
                    .get_str("userID")
                    .map_err(|_| ProtocolError::MissingField("userID"))?
                    .to_string();
                info!(user = %user_id, text = %message, "chat message");
                outcome.events.push(SessionEvent::Chat { user_id, message });
            }
            PacketKind::Unknown => {
                debug!(id = packet.id(), "ignoring unrecognized packet tag");
            }
        }
        Ok(())
    }

    /// Install a decoded world snapshot. Returns false (and drops the
    /// world) if the decode was issued under a superseded generation.
    pub fn install_world(&mut self, world: World, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale world decode"
            );
            return false;
        }
        info!(
            size_x = world.size_x,
            size_y = world.size_y,
            "world snapshot installed"
        );
        self.world = Some(world);
        true
    }

    fn check_spawn(&mut self) {
        if self.spawned {
            return;
        }
        let spawn = match &self.world {
            Some(world) if world.age() >= self.settle_delay => world.spawn_position(),
            _ => return,
        };
        self.move_to(spawn.0, spawn.1);
        self.spawned = true;
        self.state = SessionState::Spawned;
        info!(x = spawn.0, y = spawn.1, "spawned into world");
    }

    /// Move to a position with default animation/direction parameters.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.move_to_with(x, y, 1, 7);
    }

    /// Move to a position.
    ///
    /// Emits a discrete grid move only when the grid cell
    /// `(floor(x*pi), floor(y*pi))` changed since the last send, and a
    /// continuous position update unconditionally.
    pub fn move_to_with(&mut self, x: f64, y: f64, a: i32, d: i32) {
        let grid = ((x * PI).floor() as i32, (y * PI).floor() as i32);
        if self.last_grid != Some(grid) {
            self.push(Packet::move_discrete(grid.0, grid.1));
        }
        self.push(Packet::move_position(x, y, protocol_timestamp(), a, d));
        self.last_grid = Some(grid);
        self.x = x;
        self.y = y;
    }

    /// Periodic time-sync tick. Only enqueues; the packet rides out with
    /// the next flush.
    pub fn sync_tick(&mut self) {
        self.push(Packet::sync_time(protocol_timestamp()));
    }

    /// Append a packet to the outbound queue (FIFO).
    pub fn push(&mut self, packet: Packet) {
        self.queue.push(packet);
    }

    /// Drain the entire queue for one flush, preserving FIFO order.
    pub fn drain(&mut self) -> Vec<Packet> {
        std::mem::take(&mut self.queue)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
