//! Process-wide runtime switches
//!
//! Two knobs are read from the environment once, on first use:
//!
//! - `MUSHAF_SUBSET_CACHE=1` turns on the subset cache (off by default)
//! - `MUSHAF_THREADS=N` sizes the variant worker pool (0 or unset: all cores)
//!
//! Both can be overridden at runtime; the override wins over the
//! environment from then on.
//!
//! ```
//! use mushaf_core::switches;
//!
//! switches::set_subset_cache_enabled(true);
//! assert!(switches::is_subset_cache_enabled());
//! switches::set_subset_cache_enabled(false);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

pub const SUBSET_CACHE_ENV: &str = "MUSHAF_SUBSET_CACHE";
pub const THREADS_ENV: &str = "MUSHAF_THREADS";

static SUBSET_CACHE: AtomicBool = AtomicBool::new(false);
static THREADS: AtomicUsize = AtomicUsize::new(0);
static ENV_READ: OnceLock<()> = OnceLock::new();

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn read_env() {
    ENV_READ.get_or_init(|| {
        if let Ok(value) = std::env::var(SUBSET_CACHE_ENV) {
            if truthy(&value) {
                SUBSET_CACHE.store(true, Ordering::SeqCst);
                log::info!("Subset cache enabled via {}", SUBSET_CACHE_ENV);
            }
        }
        if let Ok(value) = std::env::var(THREADS_ENV) {
            match value.trim().parse::<usize>() {
                Ok(n) => THREADS.store(n, Ordering::SeqCst),
                Err(_) => log::warn!("Ignoring {}={:?}: not a number", THREADS_ENV, value),
            }
        }
    });
}

pub fn is_subset_cache_enabled() -> bool {
    read_env();
    SUBSET_CACHE.load(Ordering::SeqCst)
}

pub fn set_subset_cache_enabled(enabled: bool) {
    read_env();
    SUBSET_CACHE.store(enabled, Ordering::SeqCst);
    log::debug!(
        "Subset cache {} via runtime call",
        if enabled { "enabled" } else { "disabled" }
    );
}

/// Worker count for variant builds; at least 1
pub fn worker_threads() -> usize {
    read_env();
    match THREADS.load(Ordering::SeqCst) {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        n => n,
    }
}

/// 0 restores the all-cores default
pub fn set_worker_threads(threads: usize) {
    read_env();
    THREADS.store(threads, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(truthy("1"));
        assert!(truthy(" ON "));
        assert!(truthy("Yes"));
        assert!(!truthy("0"));
        assert!(!truthy(""));
    }

    #[test]
    fn worker_threads_never_zero() {
        assert!(worker_threads() >= 1);
    }
}
