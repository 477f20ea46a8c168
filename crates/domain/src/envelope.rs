use crate::cache_key::CacheKey;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Wire form of a cache entry on the bus.
///
/// JSON outside, packed RFC 1035 message inside: the envelope stays readable
/// with broker tooling while the DNS payload remains lossless. Field names
/// are part of the wire contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Packed wire-format DNS response, base64 in the JSON.
    #[serde(rename = "Response", with = "base64_bytes")]
    pub response: Vec<u8>,

    /// Question RR type of the producing request.
    #[serde(rename = "Type")]
    pub rtype: u16,

    /// Whether the producing request had the DNSSEC-OK bit set.
    #[serde(rename = "Do")]
    pub dnssec_ok: bool,

    /// Absolute expiry, UNIX seconds, computed by the producer.
    #[serde(rename = "TimeToDie")]
    pub time_to_die: i64,

    /// Producer node id, used for loop-back suppression.
    #[serde(rename = "By")]
    pub by: String,

    /// True for negative responses (NXDOMAIN, NODATA, SERVFAIL).
    #[serde(rename = "Error")]
    pub error: bool,

    /// Question name as transmitted, case preserved.
    #[serde(rename = "Name")]
    pub name: String,
}

impl CacheEnvelope {
    /// Recomputes the cache key on the receiving side.
    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.name, self.rtype)
    }

    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| DomainError::EnvelopeEncode(e.to_string()))
    }

    pub fn decode(payload: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(payload).map_err(|e| DomainError::EnvelopeDecode(e.to_string()))
    }
}

mod base64_bytes {
    use data_encoding::BASE64;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        BASE64
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
