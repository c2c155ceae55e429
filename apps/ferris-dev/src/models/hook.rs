//! Git hook install/uninstall results.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookAction {
    /// Hook file did not exist and was written.
    Installed,
    /// A managed hook was rewritten in place.
    Updated,
    /// A foreign hook was moved aside before writing ours.
    BackedUp,
    /// Our hook was deleted.
    Removed,
    /// Our hook was deleted and the backed-up hook moved back.
    Restored,
    /// Nothing of ours to touch.
    Skipped,
}

impl HookAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookAction::Installed => "installed",
            HookAction::Updated => "updated",
            HookAction::BackedUp => "installed (backed up existing)",
            HookAction::Removed => "removed",
            HookAction::Restored => "removed (restored previous)",
            HookAction::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HookReport {
    pub hook: String,
    pub path: String,
    pub action: HookAction,
}
