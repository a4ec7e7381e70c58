//! Statsd metrics exporter
//!
//! Sends counters and timers over raw UDP, fire-and-forget.
//!
//! ## Design
//! - **Raw UDP sockets** - bound to an ephemeral IPv4 port, non-blocking
//! - **Best-effort delivery** - a failed send is logged at `warn` and
//!   dropped, never surfaced to the instrumented code
//! - **Prefix** - prepended to every key, e.g. `dev.app`
//!
//! ## Protocol
//! ```text
//! <PREFIX>.<KEY>:<VALUE>|<TYPE>
//! ```
//!
//! Examples:
//! - Counter: `dev.app.jobs.export.run.call.total:1|c`
//! - Timer: `dev.app.jobs.export.run.success.total:10.250000|ms`

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use opscope_common::MetricsClient;
use opscope_domain::constants::DEFAULT_STATSD_MAXUDPSIZE;
use opscope_domain::{MetricsConfig, OpscopeError};
use parking_lot::Mutex;

/// Errors raised while setting up the statsd socket
#[derive(Debug, thiserror::Error)]
pub enum StatsdError {
    /// Host/port could not be resolved
    #[error("Failed to resolve statsd address {addr}: {source}")]
    Resolve {
        /// The `host:port` that was looked up
        addr: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Resolution succeeded but produced no IPv4 endpoint
    #[error("Statsd address {0} has no IPv4 endpoint")]
    NoIpv4Address(String),

    /// Local socket could not be opened
    #[error("Failed to open statsd socket: {0}")]
    Socket(#[from] io::Error),
}

impl From<StatsdError> for OpscopeError {
    fn from(err: StatsdError) -> Self {
        OpscopeError::Metrics(err.to_string())
    }
}

/// Statsd client using a raw UDP socket
///
/// Thread-safe: `send_to` on a shared `UdpSocket` needs no locking.
#[derive(Debug)]
pub struct StatsdClient {
    socket: UdpSocket,
    target: SocketAddr,
    prefix: String,
    max_datagram_size: usize,
}

impl StatsdClient {
    /// Resolve `host:port` and open a socket for it.
    ///
    /// # Errors
    /// Fails if the address does not resolve to an IPv4 endpoint or the
    /// local socket cannot be opened.
    pub fn new(host: &str, port: u16, prefix: &str) -> Result<Self, StatsdError> {
        let addr = format!("{host}:{port}");
        let target = addr
            .to_socket_addrs()
            .map_err(|source| StatsdError::Resolve { addr: addr.clone(), source })?
            .find(SocketAddr::is_ipv4)
            .ok_or(StatsdError::NoIpv4Address(addr))?;

        Self::with_addr(target, prefix)
    }

    /// Client for the host, port, prefix and datagram limit in `config`.
    ///
    /// # Errors
    /// See [`StatsdClient::new`].
    pub fn from_config(config: &MetricsConfig) -> Result<Self, StatsdError> {
        Ok(Self::new(&config.host, config.port, &config.prefix)?
            .with_max_datagram_size(config.max_datagram_size))
    }

    /// Override the datagram size limit used by [`StatsdClient::pipeline`]
    #[must_use]
    pub fn with_max_datagram_size(mut self, max_datagram_size: usize) -> Self {
        self.max_datagram_size = max_datagram_size;
        self
    }

    /// Client for an already resolved address
    ///
    /// # Errors
    /// Fails if the local socket cannot be opened.
    pub fn with_addr(target: SocketAddr, prefix: &str) -> Result<Self, StatsdError> {
        // Bind to any available port (OS will assign)
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;

        tracing::debug!(%target, prefix, "Statsd client ready");

        Ok(Self {
            socket,
            target,
            prefix: prefix.trim_end_matches('.').to_string(),
            max_datagram_size: DEFAULT_STATSD_MAXUDPSIZE,
        })
    }

    /// Buffering pipeline over this client, packing up to
    /// [`StatsdClient::max_datagram_size`] bytes per datagram.
    pub fn pipeline(self: &Arc<Self>) -> StatsdPipeline {
        StatsdPipeline::new(Arc::clone(self), self.max_datagram_size)
    }

    /// Largest payload a pipeline packs into one datagram
    pub fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    /// Prefix prepended to every key
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Address datagrams are sent to
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    fn metric_name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    /// `<name>:<amount>|c`
    pub fn counter_line(&self, key: &str, amount: i64) -> String {
        format!("{}:{}|c", self.metric_name(key), amount)
    }

    /// `<name>:<milliseconds>|ms`, six decimals
    pub fn timing_line(&self, key: &str, duration: Duration) -> String {
        format!("{}:{:.6}|ms", self.metric_name(key), duration.as_secs_f64() * 1000.0)
    }

    /// Send one datagram (non-blocking, best-effort).
    fn send(&self, payload: &str) {
        match self.socket.send_to(payload.as_bytes(), self.target) {
            Ok(_) => tracing::trace!(payload, "Sent statsd datagram"),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                tracing::warn!(payload, error = %e, "Dropped metric: send would block");
            }
            Err(e) => {
                tracing::warn!(payload, error = %e, "Failed to send metric to statsd");
            }
        }
    }
}

impl MetricsClient for StatsdClient {
    fn incr(&self, key: &str, amount: i64) {
        self.send(&self.counter_line(key, amount));
    }

    fn timing(&self, key: &str, duration: Duration) {
        self.send(&self.timing_line(key, duration));
    }
}

/// Buffering front for a [`StatsdClient`].
///
/// Lines accumulate until [`StatsdPipeline::flush`] (or drop), then go out
/// joined by `\n` in as few datagrams as fit `max_datagram_size`. A single
/// line longer than the limit is sent on its own.
#[derive(Debug)]
pub struct StatsdPipeline {
    client: Arc<StatsdClient>,
    max_datagram_size: usize,
    lines: Mutex<Vec<String>>,
}

impl StatsdPipeline {
    /// Pipeline over `client` with the given datagram size limit
    pub fn new(client: Arc<StatsdClient>, max_datagram_size: usize) -> Self {
        Self { client, max_datagram_size, lines: Mutex::new(Vec::new()) }
    }

    /// Datagram size limit this pipeline packs to
    pub fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    /// Number of buffered lines
    pub fn pending(&self) -> usize {
        self.lines.lock().len()
    }

    /// Send everything buffered so far; returns the number of datagrams.
    pub fn flush(&self) -> usize {
        let lines = std::mem::take(&mut *self.lines.lock());
        let datagrams = pack_datagrams(&lines, self.max_datagram_size);
        for datagram in &datagrams {
            self.client.send(datagram);
        }
        datagrams.len()
    }
}

impl MetricsClient for StatsdPipeline {
    fn incr(&self, key: &str, amount: i64) {
        let line = self.client.counter_line(key, amount);
        self.lines.lock().push(line);
    }

    fn timing(&self, key: &str, duration: Duration) {
        let line = self.client.timing_line(key, duration);
        self.lines.lock().push(line);
    }
}

impl Drop for StatsdPipeline {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Join `lines` with `\n` into payloads of at most `max_size` bytes.
fn pack_datagrams(lines: &[String], max_size: usize) -> Vec<String> {
    let mut datagrams = Vec::new();
    let mut current = String::new();

    for line in lines {
        if !current.is_empty() && current.len() + 1 + line.len() > max_size {
            datagrams.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        datagrams.push(current);
    }
    datagrams
}
