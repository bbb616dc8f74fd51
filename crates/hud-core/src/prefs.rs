/// Storage key for the persisted enable/disable choice.
pub const HUD_PREF_KEY: &str = "hud-enabled";
/// Window event whose boolean `detail` mounts or unmounts the HUD.
pub const HUD_TOGGLE_EVENT: &str = "hud-toggle";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HudPreference {
    #[default]
    Enabled,
    Disabled,
}

impl HudPreference {
    /// Stored value to preference. Anything but an explicit `"false"` reads
    /// as enabled, including a missing or unreadable entry.
    pub fn parse(stored: Option<&str>) -> Self {
        match stored.map(str::trim) {
            Some("false") => HudPreference::Disabled,
            _ => HudPreference::Enabled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HudPreference::Enabled => "true",
            HudPreference::Disabled => "false",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == HudPreference::Enabled
    }
}

impl From<bool> for HudPreference {
    fn from(enabled: bool) -> Self {
        if enabled {
            HudPreference::Enabled
        } else {
            HudPreference::Disabled
        }
    }
}
