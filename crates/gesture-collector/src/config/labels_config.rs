use gesture_collector_core::LabelStyle;

use serde::{Deserialize, Serialize};

/// Spelling of labels in new session names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyleSetting {
    /// `右手_单击[正]_轻`
    #[default]
    Localized,
    /// `right_single_tap_light`
    Neutral,
}

impl From<LabelStyleSetting> for LabelStyle {
    fn from(setting: LabelStyleSetting) -> Self {
        match setting {
            LabelStyleSetting::Localized => LabelStyle::Localized,
            LabelStyleSetting::Neutral => LabelStyle::Neutral,
        }
    }
}

/// Session labelling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Label spelling for new sessions.
    #[serde(default)]
    pub style: LabelStyleSetting,
}
