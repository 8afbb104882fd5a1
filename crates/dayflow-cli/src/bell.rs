use std::io::Write;

use dayflow_core::{Config, Notifier};

/// Rings the terminal bell on stderr.
///
/// Silent unless both the `notifications.bell` config key and the
/// pomodoro sound setting allow it.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.notifications.bell)
    }

    fn audible(&self, sound_enabled: bool) -> bool {
        self.enabled && sound_enabled
    }
}

impl Notifier for TerminalBell {
    fn notify(&self, sound_enabled: bool) {
        if !self.audible(sound_enabled) {
            return;
        }
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            tracing::debug!(error = %e, "bell not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_both_switches() {
        assert!(TerminalBell::new(true).audible(true));
        assert!(!TerminalBell::new(true).audible(false));
        assert!(!TerminalBell::new(false).audible(true));
    }

    #[test]
    fn follows_config_key() {
        let mut config = Config::default();
        assert!(TerminalBell::from_config(&config).audible(true));
        config.notifications.bell = false;
        assert!(!TerminalBell::from_config(&config).audible(true));
    }
}
