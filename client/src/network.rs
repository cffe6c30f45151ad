use bincode::{deserialize, serialize};
use log::{debug, warn};
use shared::{
    LoginOutcome, Packet, RegistrationForm, RegistrationOutcome, SessionOutcome, StatKind,
    StatsForm, StatsLookup, MAX_PACKET_SIZE,
};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::{timeout, Instant};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server address {0:?}")]
    InvalidAddress(String),

    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    #[error("packet codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("no response from server within {0:?}")]
    TimedOut(Duration),

    #[error("server fault: {0}")]
    Fault(String),

    #[error("unexpected response: {0:?}")]
    UnexpectedReply(Packet),
}

/// One-shot request/response client. Every call sends a single datagram and
/// waits for the matching reply from the server address.
pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    timeout: Duration,
}

impl Client {
    pub async fn new(server_addr: &str, timeout: Duration) -> Result<Self, ClientError> {
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ClientError::InvalidAddress(server_addr.to_string()))?;

        let bind_addr = if server_addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr).await?;

        Ok(Client {
            socket,
            server_addr,
            timeout,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Sends `packet` and returns whatever the server answers, faults included.
    pub async fn request(&self, packet: &Packet) -> Result<Packet, ClientError> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;

        let deadline = Instant::now() + self.timeout;
        let mut buf = vec![0u8; MAX_PACKET_SIZE];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (len, addr) = timeout(remaining, self.socket.recv_from(&mut buf))
                .await
                .map_err(|_| ClientError::TimedOut(self.timeout))??;

            if addr != self.server_addr {
                debug!("Ignoring datagram from {}", addr);
                continue;
            }

            match deserialize::<Packet>(&buf[..len]) {
                Ok(reply) => return Ok(reply),
                Err(e) => warn!("Dropping undecodable reply from {}: {}", addr, e),
            }
        }
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<Packet, ClientError> {
        self.request(&Packet::Register(form)).await
    }

    pub async fn stats(&self, form: StatsForm) -> Result<Packet, ClientError> {
        self.request(&Packet::Stats(form)).await
    }

    /// Logs in with the plaintext password, hashed locally before sending.
    pub async fn login(&self, user: &str, password: &str) -> Result<LoginOutcome, ClientError> {
        let packet = Packet::Login {
            user: user.to_string(),
            credential: shared::hash(password),
        };
        match self.request(&packet).await? {
            Packet::LoginResult(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    /// Saves a finished session; the password is hashed like [`Client::login`].
    pub async fn record_session(
        &self,
        user: &str,
        password: &str,
        values: Vec<(StatKind, i64)>,
    ) -> Result<SessionOutcome, ClientError> {
        let packet = Packet::RecordSession {
            user: user.to_string(),
            credential: shared::hash(password),
            values,
        };
        match self.request(&packet).await? {
            Packet::SessionRecorded(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    /// Typed variant of [`Client::register`] for callers that always submit.
    pub async fn register_user(
        &self,
        user: &str,
        pass: &str,
        cpass: &str,
    ) -> Result<RegistrationOutcome, ClientError> {
        match self.register(RegistrationForm::new(user, pass, cpass)).await? {
            Packet::Registration(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    pub async fn lookup_stats(&self, user: &str) -> Result<StatsLookup, ClientError> {
        match self.stats(StatsForm::new(user)).await? {
            Packet::StatsResult { lookup, .. } => Ok(lookup),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(packet: Packet) -> ClientError {
    match packet {
        Packet::Fault { reason } => ClientError::Fault(reason),
        other => ClientError::UnexpectedReply(other),
    }
}

/// Parses `stat=value` pairs such as `highest_score=2048`.
pub fn parse_stat_value(text: &str) -> Option<(StatKind, i64)> {
    let (name, value) = text.split_once('=')?;
    let kind = StatKind::parse(name)?;
    let value = value.trim().parse().ok()?;
    Some((kind, value))
}
