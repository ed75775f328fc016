mod update_policy;

pub use update_policy::UpdateWildcardPolicyUseCase;
