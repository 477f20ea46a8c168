use crate::errors::DomainError;

pub const DEFAULT_BROKER_ADDR: &str = "localhost:6379";

const DEFAULT_CACHE_CAPACITY: usize = 10_000;
const DEFAULT_QUEUE_CAPACITY: usize = 4_096;

/// Plugin configuration.
///
/// The host's config file carries a single `dcache HOST:PORT` directive; the
/// sizing knobs below are compile-time defaults exposed for tests and
/// embedders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcacheConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub positive_capacity: usize,
    pub negative_capacity: usize,
    pub queue_capacity: usize,
}

impl DcacheConfig {
    /// Parses the argument of the `dcache` directive. Missing or malformed
    /// addresses are setup errors.
    pub fn from_directive(addr: &str) -> Result<Self, DomainError> {
        let (host, port) = parse_host_port(addr)
            .ok_or_else(|| DomainError::InvalidBrokerAddress(addr.to_string()))?;
        if host.is_empty() {
            return Err(DomainError::InvalidBrokerAddress(addr.to_string()));
        }
        Ok(Self {
            broker_host: host.to_string(),
            broker_port: port,
            positive_capacity: DEFAULT_CACHE_CAPACITY,
            negative_capacity: DEFAULT_CACHE_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    pub fn with_positive_capacity(mut self, capacity: usize) -> Self {
        self.positive_capacity = capacity;
        self
    }

    pub fn with_negative_capacity(mut self, capacity: usize) -> Self {
        self.negative_capacity = capacity;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn broker_addr(&self) -> String {
        if self.broker_host.contains(':') {
            format!("[{}]:{}", self.broker_host, self.broker_port)
        } else {
            format!("{}:{}", self.broker_host, self.broker_port)
        }
    }
}

impl Default for DcacheConfig {
    fn default() -> Self {
        // DEFAULT_BROKER_ADDR is statically well-formed.
        Self::from_directive(DEFAULT_BROKER_ADDR).unwrap()
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}
