//! Cross-module scenarios run against the in-memory host

#[cfg(test)]
mod legacy_scenarios;

#[cfg(test)]
mod config_scenarios;
