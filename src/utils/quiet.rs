use std::sync::Mutex;

use log::LevelFilter;

/// Open guards and the level to restore once the last one is dropped
static QUIET_STATE: Mutex<(usize, LevelFilter)> = Mutex::new((0, LevelFilter::Off));

/// Silences `log` output while alive. Guards may overlap; the level in effect
/// before the first one is restored when the last one is dropped, whether the
/// guarded code returned normally, with an error, or by unwinding.
#[must_use = "diagnostics are restored as soon as the guard is dropped"]
pub struct QuietGuard {
    _private: (),
}

impl QuietGuard {
    pub fn new() -> Self {
        let mut state = QUIET_STATE.lock().unwrap_or_else(|e| e.into_inner());
        if state.0 == 0 {
            state.1 = log::max_level();
            log::set_max_level(LevelFilter::Off);
        }
        state.0 += 1;

        Self { _private: () }
    }
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        let mut state = QUIET_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.0 = state.0.saturating_sub(1);
        if state.0 == 0 {
            log::set_max_level(state.1);
        }
    }
}

/// Serializes tests that observe or change the global log level
#[cfg(test)]
pub(crate) static LOG_LEVEL_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_call() -> Result<(), String> {
        let _quiet = QuietGuard::new();
        assert_eq!(log::max_level(), LevelFilter::Off);

        Err("boom".to_string())
    }

    #[test]
    fn test_guard_restores_level() {
        let _lock = LOG_LEVEL_LOCK.blocking_lock();
        let original = log::max_level();
        log::set_max_level(LevelFilter::Debug);

        {
            let _quiet = QuietGuard::new();
            assert_eq!(log::max_level(), LevelFilter::Off);
        }
        assert_eq!(log::max_level(), LevelFilter::Debug);

        assert!(failing_call().is_err());
        assert_eq!(log::max_level(), LevelFilter::Debug);

        let unwound = std::panic::catch_unwind(|| {
            let _quiet = QuietGuard::new();
            panic!("fetch blew up");
        });
        assert!(unwound.is_err());
        assert_eq!(log::max_level(), LevelFilter::Debug);

        log::set_max_level(original);
    }

    #[test]
    fn test_overlapping_guards() {
        let _lock = LOG_LEVEL_LOCK.blocking_lock();
        let original = log::max_level();
        log::set_max_level(LevelFilter::Info);

        let first = QuietGuard::new();
        let second = QuietGuard::new();
        drop(first);
        assert_eq!(log::max_level(), LevelFilter::Off);
        drop(second);
        assert_eq!(log::max_level(), LevelFilter::Info);

        log::set_max_level(original);
    }
}
