//! Process-wide valuation settings.
//!
//! Engines take an optional override for whether cashflows falling on the
//! reference date still count as live. Without one they fall back to the
//! default held here.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

static SETTINGS: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::default()));

/// Valuation defaults shared by every engine in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    include_reference_date_events: bool,
}

impl Settings {
    /// Snapshot of the current process-wide settings.
    pub fn global() -> Settings {
        *SETTINGS.read()
    }

    /// Replaces the process-wide default for reference-date cashflows.
    pub fn set_include_reference_date_events(include: bool) {
        SETTINGS.write().include_reference_date_events = include;
        log::debug!("include_reference_date_events set to {include}");
    }

    /// Settings with the given reference-date policy.
    #[must_use]
    pub fn with_include_reference_date_events(include: bool) -> Self {
        Self {
            include_reference_date_events: include,
        }
    }

    /// Whether cashflows on the reference date count as not yet occurred.
    pub fn include_reference_date_events(&self) -> bool {
        self.include_reference_date_events
    }

    /// Applies an engine-level override on top of these settings.
    pub fn resolve(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(self.include_reference_date_events)
    }
}

/// Resolves an engine override against the process-wide default.
pub fn include_reference_date_events(explicit: Option<bool>) -> bool {
    Settings::global().resolve(explicit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_wins() {
        let exclude = Settings::with_include_reference_date_events(false);
        let include = Settings::with_include_reference_date_events(true);

        assert!(exclude.resolve(Some(true)));
        assert!(!include.resolve(Some(false)));
        assert!(!exclude.resolve(None));
        assert!(include.resolve(None));
    }

    #[test]
    fn test_default_excludes_reference_date() {
        assert!(!Settings::default().include_reference_date_events());
    }
}
