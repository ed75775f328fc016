mod wildcard_policy_toml;

pub use wildcard_policy_toml::TomlWildcardPolicyRepository;
