// IssueTag - app/watch.rs
//
// Auto-convert on paste: polls the clipboard and replaces newly copied build
// output with its tagged conversion.
//
// New clipboard text is re-read after a short settle delay so a paste still
// being delivered is complete before it is converted. The watcher recognises
// its own output (extraction is idempotent, so converting it again yields
// the same text) and never rewrites it.

use crate::app::state::{AppState, Conversion};
use crate::core::extractor::IssueExtractor;
use crate::platform::clipboard::ClipboardAccess;
use crate::platform::config::AppConfig;
use crate::util::error::ClipboardError;
use std::time::Duration;

/// Timing for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl From<&AppConfig> for WatchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

/// What a single poll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Clipboard holds no text.
    Empty,
    /// Same text as the previous poll, or text that is already converted.
    Unchanged,
    /// New text without any issue lines; left alone.
    NoIssues,
    /// New text was converted and written back.
    Converted(Conversion),
}

/// Clipboard poller bound to an application state and rule set.
pub struct ClipboardWatcher<'a> {
    state: &'a AppState,
    extractor: &'a IssueExtractor,
    settings: WatchSettings,
    last_seen: Option<String>,
}

impl<'a> ClipboardWatcher<'a> {
    pub fn new(state: &'a AppState, extractor: &'a IssueExtractor, settings: WatchSettings) -> Self {
        Self {
            state,
            extractor,
            settings,
            last_seen: None,
        }
    }

    /// Check the clipboard once and convert new build output.
    pub fn poll_once<C: ClipboardAccess>(
        &mut self,
        clipboard: &mut C,
    ) -> Result<PollOutcome, ClipboardError> {
        let Some(first_read) = clipboard.get_text()? else {
            return Ok(PollOutcome::Empty);
        };
        if self.last_seen.as_deref() == Some(first_read.as_str()) {
            return Ok(PollOutcome::Unchanged);
        }

        if !self.settings.settle_delay.is_zero() {
            std::thread::sleep(self.settings.settle_delay);
        }
        let text = clipboard.get_text()?.unwrap_or(first_read);
        self.last_seen = Some(text.clone());

        let conversion = self.state.convert(self.extractor, &text);
        if !conversion.has_issues() {
            tracing::debug!(
                noise = conversion.extraction.noise_lines,
                "Clipboard text has no issues"
            );
            return Ok(PollOutcome::NoIssues);
        }
        if conversion.output == text {
            return Ok(PollOutcome::Unchanged);
        }

        clipboard.set_text(&conversion.output)?;
        self.last_seen = Some(conversion.output.clone());

        tracing::info!(
            issues = conversion.extraction.len(),
            profile = ?conversion.profile,
            "Clipboard converted"
        );
        Ok(PollOutcome::Converted(conversion))
    }

    /// Poll until the process is interrupted.
    ///
    /// Clipboard failures are logged and polling continues; a clipboard
    /// owner going away briefly is normal on some desktops.
    pub fn run<C, F>(&mut self, clipboard: &mut C, mut on_convert: F)
    where
        C: ClipboardAccess,
        F: FnMut(&Conversion),
    {
        tracing::info!(
            poll_ms = self.settings.poll_interval.as_millis() as u64,
            settle_ms = self.settings.settle_delay.as_millis() as u64,
            "Watching clipboard"
        );

        loop {
            match self.poll_once(clipboard) {
                Ok(PollOutcome::Converted(conversion)) => on_convert(&conversion),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Clipboard poll failed"),
            }
            std::thread::sleep(self.settings.poll_interval);
        }
    }
}
