use crate::session::{Force, Gesture, Hand, LabelStyle, SessionLabels};

use std::fmt;

use chrono::NaiveDateTime;

/// `yyyy_MM_dd_HH_mm_ss`. Lexicographic order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Length of a formatted [`TIMESTAMP_FORMAT`] string.
const TIMESTAMP_LEN: usize = 19;

/// Deterministic session identity:
/// `{timestamp}_{hand}_{gesture}_{force}[_{note}]`.
///
/// Second resolution: two sessions with identical labels started within the
/// same second get the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionName {
    name: String,
    started_at: NaiveDateTime,
    labels: SessionLabels,
}

impl SessionName {
    /// Composes the name for a session started at `started_at`.
    pub fn compose(started_at: NaiveDateTime, labels: &SessionLabels, style: LabelStyle) -> Self {
        let mut name = format!(
            "{}_{}_{}_{}",
            started_at.format(TIMESTAMP_FORMAT),
            labels.hand.label(style),
            labels.gesture.label(style),
            labels.force.label(style),
        );
        if let Some(note) = &labels.note {
            name.push('_');
            name.push_str(note);
        }

        Self {
            name,
            started_at,
            labels: labels.clone(),
        }
    }

    /// Parses a directory name written by [`SessionName::compose`], in either
    /// label style. Returns `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        let stamp = name.get(..TIMESTAMP_LEN)?;
        let started_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;

        let rest = name.get(TIMESTAMP_LEN..)?.strip_prefix('_')?;
        let (hand, rest) = strip_label(rest, Hand::ALL, Hand::label)?;
        let rest = rest.strip_prefix('_')?;
        let (gesture, rest) = strip_label(rest, Gesture::ALL, Gesture::label)?;
        let rest = rest.strip_prefix('_')?;
        let (force, rest) = strip_label(rest, Force::ALL, Force::label)?;

        let note = match rest {
            "" => None,
            tail => Some(tail.strip_prefix('_')?),
        };

        Some(Self {
            name: name.to_string(),
            started_at,
            labels: SessionLabels::new(hand, gesture, force, note),
        })
    }

    /// The full directory name.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Local wall-clock time the session started.
    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Labels the session was recorded with.
    pub fn labels(&self) -> &SessionLabels {
        &self.labels
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Strips the longest label of `variants` (either style) from the front of
/// `input`.
fn strip_label<'a, T: Copy>(
    input: &'a str,
    variants: &[T],
    label: fn(T, LabelStyle) -> &'static str,
) -> Option<(T, &'a str)> {
    variants
        .iter()
        .flat_map(|&v| [(v, label(v, LabelStyle::Localized)), (v, label(v, LabelStyle::Neutral))])
        .filter(|(_, text)| {
            input
                .strip_prefix(text)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('_'))
        })
        .max_by_key(|(_, text)| text.len())
        .map(|(v, text)| (v, &input[text.len()..]))
}
