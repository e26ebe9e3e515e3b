//! Front-end configuration

use serde::Deserialize;

/// Terminal front-end settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Open the help overlay on the first visit
    #[serde(default = "default_show_help_on_start")]
    pub show_help_on_start: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_start: default_show_help_on_start(),
        }
    }
}

fn default_show_help_on_start() -> bool {
    true
}
