//! UdpSink - one JSON datagram per record

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::Arc;

use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError};
use tracing::{debug, instrument, warn};

use super::layout::JsonLayout;

/// Datagram limit when `max_packet_size` is not set
pub const DEFAULT_MAX_PACKET_SIZE: usize = 65000;

/// Configuration for UdpSink
#[derive(Debug, Clone)]
pub struct NetworkSinkConfig {
    /// Target address
    pub addr: SocketAddr,
    /// Max datagram size (UDP typically 65507 for IPv4)
    pub max_packet_size: usize,
}

impl NetworkSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| "missing 'addr' parameter".to_string())?;

        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| format!("invalid address '{}': {}", addr_str, e))?;

        let max_packet_size = match params.get("max_packet_size") {
            Some(s) => match s.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => return Err("max_packet_size must be greater than zero".to_string()),
                Err(e) => return Err(format!("invalid max_packet_size '{}': {}", s, e)),
            },
            None => DEFAULT_MAX_PACKET_SIZE,
        };

        Ok(Self {
            addr,
            max_packet_size,
        })
    }
}

/// Sink that sends JSON-encoded records over UDP
///
/// Derived sinks share the socket.
#[derive(Debug, Clone)]
pub struct UdpSink {
    name: String,
    min_level: Level,
    config: NetworkSinkConfig,
    socket: Arc<UdpSocket>,
    layout: JsonLayout,
}

impl UdpSink {
    /// Bind an ephemeral local port and connect to the target
    #[instrument(name = "udp_sink_new", skip(name, config), fields(target = %config.addr))]
    pub fn new(
        name: impl Into<String>,
        config: NetworkSinkConfig,
        min_level: Level,
    ) -> std::io::Result<Self> {
        let name = name.into();
        let bind_addr = if config.addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(config.addr)?;

        debug!(sink = %name, target = %config.addr, "UdpSink connected");

        Ok(Self {
            name,
            min_level,
            config,
            socket: Arc::new(socket),
            layout: JsonLayout::new(),
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
        min_level: Level,
    ) -> std::io::Result<Self> {
        let config = NetworkSinkConfig::from_params(params)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Self::new(name, config, min_level)
    }

    pub fn shared(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    fn prepare_payload(&self, record: &LogRecord) -> Result<Vec<u8>, SinkError> {
        let mut data = self
            .layout
            .encode_line(record)
            .map_err(|e| SinkError::encode(&self.name, e.to_string()))?;
        data.pop(); // datagrams need no line terminator

        if data.len() > self.config.max_packet_size {
            warn!(
                sink = %self.name,
                size = data.len(),
                max = self.config.max_packet_size,
                "Packet too large, record rejected"
            );
            return Err(SinkError::write(
                &self.name,
                format!(
                    "encoded record is {} bytes, limit is {}",
                    data.len(),
                    self.config.max_packet_size
                ),
            ));
        }

        Ok(data)
    }
}

impl LogSink for UdpSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: LogRecord) -> Result<(), SinkError> {
        let data = self.prepare_payload(&record)?;
        let sent = self
            .socket
            .send(&data)
            .map_err(|e| SinkError::io(&self.name, e))?;
        debug!(sink = %self.name, bytes = sent, "Sent");
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink {
        Arc::new(Self {
            layout: self.layout.with_attrs(attrs),
            ..self.clone()
        })
    }

    fn with_scope(&self, name: &str) -> SharedSink {
        Arc::new(Self {
            layout: self.layout.with_scope(name),
            ..self.clone()
        })
    }
}
