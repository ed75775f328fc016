use ferrous_shield_application::ports::WildcardPolicyRepository;
use ferrous_shield_domain::{DomainError, WildcardPolicy};
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table, Value};
use tracing::info;

/// Writes the `[wildcard]` table of the config file in place, keeping every
/// other table, comment and formatting untouched.
pub struct TomlWildcardPolicyRepository {
    path: PathBuf,
}

impl TomlWildcardPolicyRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WildcardPolicyRepository for TomlWildcardPolicyRepository {
    fn save(&self, policy: &WildcardPolicy) -> Result<(), DomainError> {
        let path = self.path.display().to_string();

        let existing = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(DomainError::IoError(format!(
                    "Failed to read {}: {}",
                    path, e
                )))
            }
        };

        let mut doc = existing.parse::<DocumentMut>().map_err(|e| {
            DomainError::ConfigError(format!("Failed to parse {}: {}", path, e))
        })?;

        if !doc.contains_table("wildcard") {
            doc.insert("wildcard", Item::Table(Table::new()));
        }
        let table = doc
            .get_mut("wildcard")
            .and_then(Item::as_table_mut)
            .ok_or_else(|| {
                DomainError::ConfigError(format!("[wildcard] in {} is not a table", path))
            })?;

        set_val(table, "mode", Value::from(i64::from(policy.mode)));
        set_val(
            table,
            "respect_allowlist_precedence",
            Value::from(policy.respect_allowlist_precedence),
        );

        std::fs::write(&self.path, doc.to_string())
            .map_err(|e| DomainError::IoError(format!("Failed to write {}: {}", path, e)))?;

        info!(
            path = %path,
            mode = %policy.mode,
            respect_allowlist_precedence = policy.respect_allowlist_precedence,
            "Wildcard policy saved"
        );

        Ok(())
    }
}

/// Replaces a value but keeps the trailing comment that decorated the old one.
fn set_val(table: &mut Table, key: &str, new_val: Value) {
    match table.get_mut(key) {
        Some(item @ Item::Value(_)) => {
            let suffix = item.as_value().and_then(|v| v.decor().suffix()).cloned();
            *item = Item::Value(new_val);
            if let (Some(s), Some(v)) = (suffix, item.as_value_mut()) {
                v.decor_mut().set_suffix(s);
            }
        }
        Some(item) => *item = Item::Value(new_val),
        None => {
            table.insert(key, Item::Value(new_val));
        }
    }
}
