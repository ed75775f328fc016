mod check;
mod run;
mod wildcard;

pub use check::{check, explain};
pub use run::run;
pub use wildcard::set_wildcard_mode;
