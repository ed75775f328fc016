use arc_swap::ArcSwap;
use ferrous_shield_domain::WildcardPolicy;
use std::sync::Arc;

/// Process-wide wildcard policy, passed explicitly to whoever needs it.
///
/// Readers copy the whole policy out of one load, so a concurrent
/// `replace` is observed either entirely or not at all.
pub struct WildcardPolicyHandle {
    current: ArcSwap<WildcardPolicy>,
}

impl WildcardPolicyHandle {
    pub fn new(policy: WildcardPolicy) -> Self {
        Self {
            current: ArcSwap::from_pointee(policy),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> WildcardPolicy {
        **self.current.load()
    }

    /// Installs `policy` and returns the one it replaced.
    pub fn replace(&self, policy: WildcardPolicy) -> WildcardPolicy {
        *self.current.swap(Arc::new(policy))
    }
}

impl Default for WildcardPolicyHandle {
    fn default() -> Self {
        Self::new(WildcardPolicy::default())
    }
}
