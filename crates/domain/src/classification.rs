use std::fmt;

/// RFC-derived classification of a DNS response.
///
/// The tags mirror the typification a recursive resolver applies before
/// caching: successful answers, the three authoritative non-answers, and the
/// classes that must never be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// NOERROR with a non-empty answer section.
    NoError,
    /// NXDOMAIN.
    NameError,
    /// NOERROR with no answers for the queried type.
    NoData,
    /// NOERROR referral: NS records in the authority section, no SOA.
    Delegation,
    /// SERVFAIL.
    ServerFailure,
    /// Any other response code.
    OtherError,
    /// Zone transfers, NOTIFY, and other non-query traffic.
    Meta,
    /// Dynamic update messages.
    Update,
}

/// Which cache, if any, a classified response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDisposition {
    Positive,
    Negative,
    Skip,
}

impl ResponseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseClass::NoError => "NOERROR",
            ResponseClass::NameError => "NXDOMAIN",
            ResponseClass::NoData => "NODATA",
            ResponseClass::Delegation => "DELEGATION",
            ResponseClass::ServerFailure => "SERVFAIL",
            ResponseClass::OtherError => "OTHERERROR",
            ResponseClass::Meta => "META",
            ResponseClass::Update => "UPDATE",
        }
    }

    pub fn disposition(&self) -> CacheDisposition {
        match self {
            ResponseClass::NoError | ResponseClass::Delegation => CacheDisposition::Positive,
            ResponseClass::NameError | ResponseClass::NoData | ResponseClass::ServerFailure => {
                CacheDisposition::Negative
            }
            ResponseClass::OtherError | ResponseClass::Meta | ResponseClass::Update => {
                CacheDisposition::Skip
            }
        }
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.disposition() == CacheDisposition::Positive
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.disposition() == CacheDisposition::Negative
    }

    /// Whether a message of this class may participate in cache keying.
    /// Truncation is a message-level property and is checked separately.
    #[inline]
    pub fn is_keyable(&self) -> bool {
        !matches!(
            self,
            ResponseClass::OtherError | ResponseClass::Meta | ResponseClass::Update
        )
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
