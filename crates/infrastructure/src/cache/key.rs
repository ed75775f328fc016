use compact_str::CompactString;
use ferrous_shield_domain::RecordType;
use std::hash::{Hash, Hasher};

/// `(domain, record type)`; the domain is lowercased without a trailing dot.
#[derive(Clone, Debug, Eq)]
pub struct CacheKey {
    pub domain: CompactString,
    pub record_type: RecordType,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        let mut domain = CompactString::from(domain.trim_end_matches('.'));
        domain.make_ascii_lowercase();
        Self {
            domain,
            record_type,
        }
    }
}

impl Hash for CacheKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.as_str().hash(state);
        self.record_type.to_u16().hash(state);
    }
}

impl PartialEq for CacheKey {
    #[inline]
    fn eq(&self, other: &CacheKey) -> bool {
        self.record_type == other.record_type && self.domain == other.domain
    }
}
