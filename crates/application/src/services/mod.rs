pub mod precedence;
mod wildcard_coverage;
mod wildcard_policy_handle;

pub use precedence::{ExplicitAllows, PrecedenceResolver};
pub use wildcard_coverage::{EnhancementOutcome, WildcardCoverageProcessor};
pub use wildcard_policy_handle::WildcardPolicyHandle;
