//! Server network layer handling UDP requests and dispatch to the services

use crate::config::ServerConfig;
use crate::error::ServiceError;
use crate::login::login;
use crate::registration::register;
use crate::session_stats::record_for_login;
use crate::sqlite::SqliteStore;
use crate::statistics::get_stats;
use crate::store::{Store, StoreError};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, MAX_PACKET_SIZE};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, oneshot};

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    Shutdown,
}

/// Response queued for the sender task
#[derive(Debug)]
pub struct Reply {
    pub packet: Packet,
    pub addr: SocketAddr,
}

/// Accepts requests and answers each one independently
pub struct Server {
    socket: Arc<UdpSocket>,
    config: Arc<ServerConfig>,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    reply_tx: mpsc::UnboundedSender<Reply>,
    reply_rx: Option<mpsc::UnboundedReceiver<Reply>>,
}

impl Server {
    /// Prepares the database schema, then binds the socket
    pub async fn new(config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        prepare_database(&config).await?;
        info!("Database ready at {}", config.database.display());

        let socket = Arc::new(UdpSocket::bind(&config.bind_addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            config: Arc::new(config),
            server_tx,
            server_rx,
            reply_tx,
            reply_rx: Some(reply_rx),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sender that can stop [`Server::run`] with [`ServerMessage::Shutdown`]
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = vec![0u8; MAX_PACKET_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing reply queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let Some(mut reply_rx) = self.reply_rx.take() else {
            return;
        };

        tokio::spawn(async move {
            while let Some(Reply { packet, addr }) = reply_rx.recv().await {
                if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                    error!("Failed to send reply to {}: {}", addr, e);
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    /// Runs one request on its own task so a slow store call never delays others
    fn spawn_request(&self, packet: Packet, addr: SocketAddr) {
        let config = Arc::clone(&self.config);
        let reply_tx = self.reply_tx.clone();

        tokio::spawn(async move {
            let response = handle_request(&config, packet).await;
            if let Err(e) = reply_tx.send(Reply {
                packet: response,
                addr,
            }) {
                error!("Failed to queue reply for {}: {}", addr, e);
            }
        });
    }

    /// Main server loop
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver();
        self.spawn_network_sender();

        info!("Server started successfully");

        loop {
            match self.server_rx.recv().await {
                Some(ServerMessage::PacketReceived { packet, addr }) => {
                    if packet.is_request() {
                        debug!("Request from {}: {}", addr, request_kind(&packet));
                        self.spawn_request(packet, addr);
                    } else {
                        warn!("Unexpected packet type from client at {}", addr);
                    }
                }
                Some(ServerMessage::Shutdown) | None => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

fn request_kind(packet: &Packet) -> &'static str {
    match packet {
        Packet::Register(_) => "register",
        Packet::Stats(_) => "stats",
        Packet::Login { .. } => "login",
        Packet::RecordSession { .. } => "record-session",
        _ => "other",
    }
}

async fn prepare_database(config: &ServerConfig) -> Result<(), ServiceError> {
    let path = config.database.clone();
    let busy_timeout = config.request_timeout;

    tokio::task::spawn_blocking(move || -> Result<(), ServiceError> {
        let mut store = SqliteStore::open(&path, busy_timeout)?;
        store.bootstrap()?;
        Ok(())
    })
    .await
    .map_err(|e| ServiceError::Worker(e.to_string()))?
}

/// Answers a single request.
///
/// The store work runs on a blocking thread with its own connection and a
/// deadline of `request_timeout`. When the deadline passes the running
/// statement is interrupted and the worker's own result is awaited, so a
/// fault reply always means the request's transaction was rolled back.
pub async fn handle_request(config: &ServerConfig, packet: Packet) -> Packet {
    let path = config.database.clone();
    let limit = config.request_timeout;
    let deadline = Instant::now() + limit;
    let (interrupt_tx, mut interrupt_rx) = oneshot::channel();

    let mut work = tokio::task::spawn_blocking(move || -> Result<Packet, ServiceError> {
        let mut store = SqliteStore::open(&path, limit)?.with_deadline(deadline);
        let _ = interrupt_tx.send(store.interrupt_handle());
        dispatch(&mut store, &packet)
    });

    let (joined, overran) = match tokio::time::timeout(limit, &mut work).await {
        Ok(joined) => (joined, false),
        Err(_) => {
            if let Ok(handle) = interrupt_rx.try_recv() {
                handle.interrupt();
            }
            (work.await, true)
        }
    };

    match settle(joined, overran, limit) {
        Ok(response) => response,
        Err(e) => {
            error!("Request aborted: {}", e);
            Packet::Fault {
                reason: e.public_message(config.expose_store_errors),
            }
        }
    }
}

/// Turns the worker's result into the request's final result.
///
/// Any failure of a worker that ran past its deadline counts as a timeout;
/// its transaction has already been rolled back or interrupted.
fn settle(
    joined: Result<Result<Packet, ServiceError>, tokio::task::JoinError>,
    overran: bool,
    limit: Duration,
) -> Result<Packet, ServiceError> {
    match joined {
        Ok(Err(ServiceError::Store(StoreError::Expired))) => Err(ServiceError::TimedOut(limit)),
        Ok(Err(e)) if overran => {
            debug!("Request interrupted at deadline: {}", e);
            Err(ServiceError::TimedOut(limit))
        }
        Ok(result) => {
            if overran && result.is_ok() {
                warn!("Request finished after its {:?} deadline", limit);
            }
            result
        }
        Err(join_error) => Err(ServiceError::Worker(join_error.to_string())),
    }
}

/// Routes a request packet to its service and wraps the outcome
pub fn dispatch<S: Store>(store: &mut S, packet: &Packet) -> Result<Packet, ServiceError> {
    match packet {
        Packet::Register(form) => match form.submitted() {
            Some(request) => Ok(Packet::Registration(register(store, &request)?)),
            None => Ok(Packet::NotSubmitted),
        },
        Packet::Stats(form) => match form.submitted() {
            Some(user) => Ok(Packet::StatsResult {
                user: user.to_string(),
                lookup: get_stats(store, user)?,
            }),
            None => Ok(Packet::NotSubmitted),
        },
        Packet::Login { user, credential } => {
            Ok(Packet::LoginResult(login(store, user, credential)?))
        }
        Packet::RecordSession {
            user,
            credential,
            values,
        } => Ok(Packet::SessionRecorded(record_for_login(
            store, user, credential, values,
        )?)),
        _ => Ok(Packet::Fault {
            reason: "Unexpected packet type".to_string(),
        }),
    }
}
