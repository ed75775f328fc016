use crate::di::UseCases;

pub fn check(
    use_cases: &UseCases,
    domains: &[String],
    json: bool,
    top: Option<usize>,
) -> anyhow::Result<()> {
    for domain in domains {
        let decision = use_cases.check_domain.execute(domain)?;

        if json {
            println!("{}", serde_json::to_string(&decision)?);
            continue;
        }

        match &decision.winner {
            Some(rule) => println!(
                "{}\t{}\t{} ({}, {})",
                decision.domain,
                decision.action,
                rule.domain,
                rule.rule_type.to_str(),
                rule.source
            ),
            None => println!("{}\t{}", decision.domain, decision.action),
        }
    }

    if let Some(limit) = top {
        print_top_domains(use_cases, limit, json)?;
    }
    Ok(())
}

fn print_top_domains(use_cases: &UseCases, limit: usize, json: bool) -> anyhow::Result<()> {
    let top = use_cases.top_domains.execute(limit);

    if json {
        println!("{}", serde_json::to_string(&top)?);
        return Ok(());
    }

    println!("most queried:");
    for entry in &top {
        println!("  {:>6}  {}", entry.count, entry.domain);
    }
    Ok(())
}

pub fn explain(use_cases: &UseCases, domain: &str) -> anyhow::Result<()> {
    let decision = use_cases.check_domain.execute(domain)?;

    println!("{} -> {}", decision.domain, decision.action);
    if decision.candidates.is_empty() {
        println!("  no matching rules");
        return Ok(());
    }

    for (rank, rule) in decision.candidates.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {:<8} {:<6} exact={} specificity={} priority={} source={}{}",
            rank + 1,
            rule.domain,
            rule.rule_type.to_str(),
            rule.action,
            rule.domain.as_ref() == decision.domain,
            rule.specificity(),
            rule.priority,
            rule.source,
            if rule.auto_generated { " (auto)" } else { "" },
        );
    }
    Ok(())
}
