//! Play session tracking and tamper signals
//!
//! Detection itself (devtools heuristics, key interception) belongs to the
//! host. The session only learns that a signal fired and remembers it until
//! an explicit reset.

use serde::{Deserialize, Serialize};

/// Keyboard shortcuts the host intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    /// F12
    DevTools,
    /// Ctrl/Cmd+Shift+I
    Inspector,
    /// Ctrl/Cmd+Shift+J
    Console,
    /// Ctrl/Cmd+Shift+C
    ElementPicker,
    /// Ctrl/Cmd+Shift+K (Firefox)
    WebConsole,
    /// Ctrl/Cmd+U
    ViewSource,
}

impl Shortcut {
    /// Classify a keydown. `ctrl_or_meta` is Ctrl on Windows/Linux, Cmd on macOS.
    pub fn from_key(key: &str, ctrl_or_meta: bool, shift: bool) -> Option<Self> {
        if key == "F12" {
            return Some(Shortcut::DevTools);
        }
        if !ctrl_or_meta {
            return None;
        }
        let letter = key.to_ascii_lowercase();
        match (shift, letter.as_str()) {
            (true, "i") => Some(Shortcut::Inspector),
            (true, "j") => Some(Shortcut::Console),
            (true, "c") => Some(Shortcut::ElementPicker),
            (_, "u") => Some(Shortcut::ViewSource),
            (true, "k") => Some(Shortcut::WebConsole),
            _ => None,
        }
    }

    /// View-source is blocked but harmless; the rest open debugging tools
    pub fn invalidates_session(&self) -> bool {
        !matches!(self, Shortcut::ViewSource)
    }

    /// Message shown to the player when the shortcut is blocked
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Shortcut::DevTools | Shortcut::Inspector => {
                Some("Developer tools are disabled for fair play")
            }
            Shortcut::Console | Shortcut::WebConsole => Some("Console access is disabled for fair play"),
            Shortcut::ElementPicker => Some("Inspect tool is disabled for fair play"),
            Shortcut::ViewSource => None,
        }
    }
}

/// Something the host's tamper detection noticed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TamperSignal {
    /// Developer tools appear to be open
    DevtoolsOpen,
    /// A blocked shortcut was pressed
    BlockedShortcut(Shortcut),
}

impl TamperSignal {
    pub fn invalidates_session(&self) -> bool {
        match self {
            TamperSignal::DevtoolsOpen => true,
            TamperSignal::BlockedShortcut(shortcut) => shortcut.invalidates_session(),
        }
    }
}

/// One accepted score, with its timestamp (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score: u32,
    pub timestamp: f64,
}

/// Summary for admin/debug display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub duration_secs: u64,
    pub is_valid: bool,
    pub score_updates: usize,
    pub last_score: u32,
}

/// Security-scoped play session, distinct from gameplay state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Unix timestamp (ms) when the session began, if it has
    pub started_at: Option<f64>,
    pub last_score: u32,
    pub updates: Vec<ScoreUpdate>,
    valid: bool,
    warning_shown: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            started_at: None,
            last_score: 0,
            updates: Vec::new(),
            valid: true,
            warning_shown: false,
        }
    }
}

impl GameSession {
    /// A fresh, valid session starting now
    pub fn begin(now: f64) -> Self {
        Self {
            started_at: Some(now),
            ..Self::default()
        }
    }

    /// Back to a fresh, unstarted session. The only way to become valid again.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the session compromised. One-way until [`GameSession::reset`].
    pub fn invalidate(&mut self, signal: TamperSignal) {
        if !self.warning_shown {
            log::warn!("Security warning: {signal:?} - scores from this session will be rejected");
            self.warning_shown = true;
        }
        if self.valid {
            log::info!("Session invalidated by {signal:?}");
        }
        self.valid = false;
    }

    /// Feed a signal from the host; ignores ones that don't invalidate
    pub fn observe(&mut self, signal: TamperSignal) {
        if signal.invalidates_session() {
            self.invalidate(signal);
        }
    }

    pub fn record_score_update(&mut self, score: u32, now: f64) {
        self.last_score = score;
        self.updates.push(ScoreUpdate {
            score,
            timestamp: now,
        });
    }

    pub fn info(&self, now: f64) -> SessionInfo {
        let duration_secs = self
            .started_at
            .map(|start| ((now - start) / 1000.0).max(0.0).floor() as u64)
            .unwrap_or(0);
        SessionInfo {
            duration_secs,
            is_valid: self.valid,
            score_updates: self.updates.len(),
            last_score: self.last_score,
        }
    }
}
