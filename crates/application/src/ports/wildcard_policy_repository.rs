use ferrous_shield_domain::{DomainError, WildcardPolicy};

pub trait WildcardPolicyRepository: Send + Sync {
    fn save(&self, policy: &WildcardPolicy) -> Result<(), DomainError>;
}
