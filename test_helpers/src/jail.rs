//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test a fresh temporary working directory and restores
//! any environment variables it sets. Jails are serialised by figment, so
//! tests exercising `.env` loading or environment overrides cannot observe
//! one another.

use anyhow::{Result, anyhow};

/// Runs `f` in a jail where the closure itself speaks `anyhow`.
///
/// The closure returns `anyhow::Result`, so test bodies can use `ensure!`
/// and apply `?` to `ConfigError`, `std::io::Error`, or figment errors alike
/// without converting them first. A closure error is flattened to its
/// message, context chain included, to cross `Jail::try_with`, then surfaces
/// as an `anyhow::Error` carrying that text. On success the closure's value
/// is handed back.
///
/// # Errors
///
/// Returns an error if the jail cannot be initialised or the closure fails.
///
/// # Examples
///
/// ```
/// use test_helpers::jail::with_jail;
///
/// let answer = with_jail(|jail| {
///     jail.set_env("JAIL_EXAMPLE", "42");
///     Ok(std::env::var("JAIL_EXAMPLE")?)
/// })?;
/// assert_eq!(answer, "42");
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        let value = f(jail).map_err(|err| figment::Error::from(format!("{err:#}")))?;
        output = Some(value);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}
