//! Lifecycle phases of a settings screen.
//!
//! # State Machine
//!
//! ```text
//! Unconfigured ──configure──▶ Configured ──build──▶ Built
//!       │                          │                  │
//!       └──────────teardown────────┴──────────────────┴──▶ TornDown
//! ```
//!
//! Transitions only move forward. A failed build leaves the screen
//! `Configured`; rebuilding after teardown takes a new screen.

/// Current phase of a [`SettingsScreen`](crate::app::SettingsScreen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    /// Created, no layout resolved yet.
    #[default]
    Unconfigured,

    /// Layout resolved from options and viewport. Nothing drawn.
    Configured,

    /// Every visible row materialized and wired. Accepts interactions.
    Built,

    /// Elements released. Terminal.
    TornDown,
}

impl ScreenPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Built => "built",
            Self::TornDown => "torn down",
        }
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unconfigured, Self::Configured)
                | (Self::Configured, Self::Built)
                | (Self::Unconfigured | Self::Configured | Self::Built, Self::TornDown)
        )
    }
}

impl std::fmt::Display for ScreenPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
