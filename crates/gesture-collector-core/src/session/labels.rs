//! Session metadata labels.
//!
//! Every label has a localized form (the labels shown on the watch) and a
//! locale-neutral form. Both parse; [`LabelStyle`] picks which one is written
//! into new session names.

use crate::{CollectorError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Which label spelling new session names use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    /// Chinese labels, e.g. `右手_单击[正]_轻`.
    #[default]
    Localized,
    /// ASCII labels, e.g. `right_single_tap_light`.
    Neutral,
}

#[track_caller]
fn invalid_label(kind: &'static str, value: &str) -> CollectorError {
    CollectorError::InvalidLabel {
        kind,
        value: value.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($localized:literal, $neutral:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in picker order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Label text in the requested style.
            pub fn label(self, style: LabelStyle) -> &'static str {
                match (self, style) {
                    $(
                        (Self::$variant, LabelStyle::Localized) => $localized,
                        (Self::$variant, LabelStyle::Neutral) => $neutral,
                    )+
                }
            }

            /// Matches `text` against both label styles.
            pub fn from_label(text: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| {
                    v.label(LabelStyle::Localized) == text || v.label(LabelStyle::Neutral) == text
                })
            }
        }

        impl FromStr for $name {
            type Err = CollectorError;

            #[track_caller]
            fn from_str(s: &str) -> CoreResult<Self> {
                Self::from_label(s.trim()).ok_or_else(|| invalid_label($kind, s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label(LabelStyle::Neutral))
            }
        }
    };
}

label_enum! {
    /// Which wrist the watch is worn on.
    Hand, "hand" {
        /// Left wrist.
        Left => ("左手", "left"),
        /// Right wrist.
        Right => ("右手", "right"),
    }
}

label_enum! {
    /// Gesture performed during the session.
    Gesture, "gesture" {
        /// Single finger tap.
        SingleTap => ("单击[正]", "single_tap"),
        /// Double finger tap.
        DoubleTap => ("双击[正]", "double_tap"),
        /// Closing the hand into a fist.
        Fist => ("握拳[正]", "fist"),
        /// Clapping.
        Clap => ("鼓掌[负]", "clap"),
        /// Shaking the wrist.
        WristShake => ("抖腕[负]", "wrist_shake"),
        /// Slapping a surface.
        Slap => ("拍打[负]", "slap"),
        /// Everyday movement.
        Daily => ("日常[负]", "daily"),
    }
}

label_enum! {
    /// How hard the gesture was performed.
    Force, "force" {
        /// Light force.
        Light => ("轻", "light"),
        /// Heavy force.
        Heavy => ("重", "heavy"),
    }
}

impl Gesture {
    /// Whether this is a target gesture (positive sample) rather than a
    /// distractor movement.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::SingleTap | Self::DoubleTap | Self::Fist)
    }
}

impl Hand {
    /// Directory-name markers by which sessions are discovered, in both
    /// label styles.
    pub fn markers() -> impl Iterator<Item = String> {
        Self::ALL.iter().flat_map(|hand| {
            [LabelStyle::Localized, LabelStyle::Neutral]
                .into_iter()
                .map(move |style| format!("_{}_", hand.label(style)))
        })
    }
}

/// User-selected metadata for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLabels {
    /// Wrist the watch is worn on.
    pub hand: Hand,
    /// Gesture performed.
    pub gesture: Gesture,
    /// Force level.
    pub force: Force,
    /// Free-text note, already sanitized. Never empty.
    pub note: Option<String>,
}

impl SessionLabels {
    /// Builds labels, sanitizing `note` so it is safe as part of a single
    /// path component. A blank note becomes `None`.
    pub fn new(hand: Hand, gesture: Gesture, force: Force, note: Option<&str>) -> Self {
        Self {
            hand,
            gesture,
            force,
            note: note.and_then(sanitize_note),
        }
    }
}

impl Default for SessionLabels {
    fn default() -> Self {
        Self::new(Hand::Right, Gesture::SingleTap, Force::Light, None)
    }
}

fn sanitize_note(note: &str) -> Option<String> {
    let cleaned: String = note
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            c => c,
        })
        .collect();

    (!cleaned.is_empty()).then_some(cleaned)
}
