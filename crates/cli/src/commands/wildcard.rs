use crate::di::UseCases;
use ferrous_shield_domain::{WildcardMode, WildcardPolicy};

pub fn set_wildcard_mode(
    use_cases: &UseCases,
    current: WildcardPolicy,
    mode: i64,
    respect_allowlist: Option<bool>,
) -> anyhow::Result<()> {
    let mode = WildcardMode::try_from(mode).map_err(anyhow::Error::msg)?;
    let policy = requested_policy(current, mode, respect_allowlist);
    let previous = use_cases.update_wildcard_policy.execute(policy)?;

    println!(
        "wildcard mode: {} -> {} (respect_allowlist_precedence = {})",
        previous.mode, policy.mode, policy.respect_allowlist_precedence
    );
    Ok(())
}

/// An omitted flag keeps the current setting.
fn requested_policy(
    current: WildcardPolicy,
    mode: WildcardMode,
    respect_allowlist: Option<bool>,
) -> WildcardPolicy {
    WildcardPolicy::new(
        mode,
        respect_allowlist.unwrap_or(current.respect_allowlist_precedence),
    )
}
