//! # Client Shell
//!
//! Owns the TCP transport and the single-consumer event loop around the
//! session state machine.
//!
//! All work happens in response to one of four external events
//! (transport data arrival, transport close, the periodic time-sync tick,
//! and world-decode completion), merged through one `tokio::select!` and
//! processed strictly in arrival order. The session itself never touches
//! I/O; the shell executes its [`Command`]s:
//!
//! - `DecodeWorld` runs the LZMA inflate on the blocking pool and feeds
//!   the result back through an mpsc channel, tagged with the generation
//!   it was issued under.
//! - `Redirect` resolves the new host first; a resolution failure aborts
//!   the redirect with `ProtocolError::Resolution` instead of attempting
//!   a connection to an invalid address. On success the old transport is
//!   dropped and the session fully reset before the new connection opens,
//!   so no stale packets leak into it.
//!
//! A clean remote close ends [`Client::run`] with `Ok(())`; the decision
//! to reconnect is left to the caller. A current-generation decode
//! failure is fatal for the connection and surfaces after teardown;
//! superseded decode results, failed or not, are dropped.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::core::batch;
use crate::core::frame::FrameReassembler;
use crate::error::{ProtocolError, Result};
use crate::protocol::session::{Command, Session};
use crate::world::{decode_snapshot, World};

/// How one connection ended.
enum ConnectionOutcome {
    /// Remote closed the transport; the session has been reset.
    Closed,
    /// Server-instructed redirect to a resolved address.
    Redirect(SocketAddr),
}

/// The protocol client: session plus transport event loop.
pub struct Client {
    config: ClientConfig,
    session: Session,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let session = Session::new(&config);
        Self { config, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connect and drive the session until the server closes the
    /// transport, following redirects to other server addresses.
    pub async fn run(&mut self) -> Result<()> {
        let mut addr = resolve(&self.config.server_host, self.config.server_port).await?;
        loop {
            match self.run_connection(addr).await? {
                ConnectionOutcome::Closed => return Ok(()),
                ConnectionOutcome::Redirect(next) => addr = next,
            }
        }
    }

    async fn run_connection(&mut self, addr: SocketAddr) -> Result<ConnectionOutcome> {
        let result = self.drive(addr).await;
        if result.is_err() {
            // a failed connection never leaves session state behind
            self.session.on_disconnect();
        }
        result
    }

    async fn drive(&mut self, addr: SocketAddr) -> Result<ConnectionOutcome> {
        self.session.begin_connect();
        info!(%addr, "connecting");
        let mut stream = TcpStream::connect(addr).await?;

        self.session.on_connect();
        flush(&mut stream, &mut self.session).await?;

        let mut reassembler = FrameReassembler::new();
        let (decode_tx, mut decode_rx) = mpsc::channel::<(u64, Result<World>)>(4);
        let mut sync_timer = interval_at(
            Instant::now() + self.config.sync_interval,
            self.config.sync_interval,
        );
        let mut read_buf = vec![0u8; 8192];

        loop {
            tokio::select! {
                read = stream.read(&mut read_buf) => {
                    let n = read?;
                    if n == 0 {
                        self.session.on_disconnect();
                        return Ok(ConnectionOutcome::Closed);
                    }
                    let Some(payload) = reassembler.feed(&read_buf[..n])? else {
                        continue;
                    };

                    let packets = batch::decode(&payload)?;
                    debug!(count = packets.len(), "inbound batch");
                    let outcome = self.session.handle_batch(packets)?;

                    for command in outcome.commands {
                        match command {
                            Command::DecodeWorld { compressed, generation } => {
                                spawn_decode(decode_tx.clone(), compressed, generation);
                            }
                            Command::Redirect { host } => {
                                // resolve before teardown so a lookup failure
                                // aborts the redirect entirely
                                let next =
                                    resolve(&host, self.config.server_port).await?;
                                info!(%next, "redirecting");
                                self.session.reset_for_redirect();
                                return Ok(ConnectionOutcome::Redirect(next));
                            }
                        }
                    }

                    flush(&mut stream, &mut self.session).await?;
                }

                _ = sync_timer.tick() => {
                    // enqueued only; rides out with the next flush
                    self.session.sync_tick();
                }

                completed = decode_rx.recv() => {
                    if let Some((generation, result)) = completed {
                        // a superseded decode carries no weight either way;
                        // only a current-generation failure is fatal
                        if generation == self.session.generation() {
                            self.session.install_world(result?, generation);
                        } else {
                            debug!(generation, "dropping superseded decode result");
                        }
                    }
                }
            }
        }
    }
}

/// Run the snapshot decode on the blocking pool and report back through
/// the completion channel.
fn spawn_decode(tx: mpsc::Sender<(u64, Result<World>)>, compressed: Vec<u8>, generation: u64) {
    tokio::spawn(async move {
        let result = match tokio::task::spawn_blocking(move || decode_snapshot(&compressed)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProtocolError::Decompression),
        };
        let _ = tx.send((generation, result)).await;
    });
}

/// Drain the session queue into one encoded batch and write it out.
/// The reference protocol flushes after every inbound batch even when
/// the queue is empty, so this writes unconditionally.
async fn flush(stream: &mut TcpStream, session: &mut Session) -> Result<()> {
    let packets = session.drain();
    let wire = batch::encode(&packets)?;
    stream.write_all(&wire).await?;
    debug!(packets = packets.len(), bytes = wire.len(), "flushed outbound batch");
    Ok(())
}

/// Resolve a hostname to the first address it yields.
async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|e| ProtocolError::Resolution(format!("{host}: {e}")))?;
    addrs
        .next()
        .ok_or_else(|| ProtocolError::Resolution(format!("{host}: no addresses returned")))
}
