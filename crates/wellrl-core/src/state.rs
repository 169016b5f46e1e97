//! Diskretisierung der Nutzermerkmale und der kanonische Zustandsschlüssel.
//!
//! [`encode`] ist eine reine Funktion: gleiche Eingabe ergibt immer den gleichen
//! [`UserState`], Werte außerhalb des Bereichs werden geklemmt, nie abgelehnt.
//!
//! Im Snapshot wird ein Zustand als sieben Dezimalfelder, getrennt durch `|`,
//! abgelegt (`alter|geschlecht|bmi|angst|aktivität|engagement|segment`). Der
//! Parser ist strikt: genau sieben Felder, nur Ziffern, jedes Feld im
//! Wertebereich seines Buckets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::UserFeatures;
use crate::segment::Segment;

const KEY_SEPARATOR: char = '|';

pub const MAX_AGE_BUCKET: u8 = 5;
pub const MAX_GENDER: u8 = 1;
pub const MAX_BMI_BUCKET: u8 = 6;
pub const MAX_ANXIETY_BUCKET: u8 = 4;
pub const MAX_ACTIVITY_BUCKET: u8 = 7;
pub const MAX_ENGAGEMENT_BUCKET: u8 = 10;
pub const MAX_SEGMENT_ID: u8 = 5;

/// Feldnamen und Obergrenzen in Schlüsselreihenfolge.
const KEY_FIELDS: [(&str, u8); 7] = [
    ("age_bucket", MAX_AGE_BUCKET),
    ("gender", MAX_GENDER),
    ("bmi_bucket", MAX_BMI_BUCKET),
    ("anxiety_bucket", MAX_ANXIETY_BUCKET),
    ("activity_bucket", MAX_ACTIVITY_BUCKET),
    ("engagement_bucket", MAX_ENGAGEMENT_BUCKET),
    ("segment_id", MAX_SEGMENT_ID),
];

/// Diskreter Nutzerzustand, Schlüssel der Q-Tabelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserState {
    pub age_bucket: u8,
    pub gender: u8,
    pub bmi_bucket: u8,
    pub anxiety_bucket: u8,
    pub activity_bucket: u8,
    pub engagement_bucket: u8,
    pub segment_id: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateKeyError {
    #[error("state key must have {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("state key field `{field}` is not an unsigned integer: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("state key field `{field}` out of range: {value} > {max}")]
    OutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
}

/// `clip(floor(value), 0, max)`; NaN landet im Bucket 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bucket(value: f64, max: u8) -> u8 {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else if floored >= f64::from(max) {
        max
    } else {
        floored as u8
    }
}

/// Überführt Rohmerkmale in einen [`UserState`].
#[must_use]
pub fn encode(features: &UserFeatures) -> UserState {
    let segment = features
        .segment
        .as_deref()
        .map(Segment::lookup)
        .unwrap_or_default();

    UserState {
        age_bucket: bucket(features.age_or_default() / 10.0, MAX_AGE_BUCKET),
        gender: features.gender_or_default(),
        bmi_bucket: bucket((features.bmi_or_default() - 15.0) / 5.0, MAX_BMI_BUCKET),
        anxiety_bucket: bucket(features.anxiety_or_default() / 5.0, MAX_ANXIETY_BUCKET),
        activity_bucket: bucket(features.activity_days_or_default(), MAX_ACTIVITY_BUCKET),
        engagement_bucket: bucket(features.engagement_or_default() * 10.0, MAX_ENGAGEMENT_BUCKET),
        segment_id: segment.id(),
    }
}

impl UserState {
    fn fields(&self) -> [u8; 7] {
        [
            self.age_bucket,
            self.gender,
            self.bmi_bucket,
            self.anxiety_bucket,
            self.activity_bucket,
            self.engagement_bucket,
            self.segment_id,
        ]
    }

    #[must_use]
    pub fn segment(&self) -> Segment {
        Segment::from_id(i64::from(self.segment_id)).unwrap_or_default()
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, value) in self.fields().iter().enumerate() {
            if idx > 0 {
                write!(f, "{KEY_SEPARATOR}")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl FromStr for UserState {
    type Err = StateKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        if parts.len() != KEY_FIELDS.len() {
            return Err(StateKeyError::FieldCount {
                expected: KEY_FIELDS.len(),
                found: parts.len(),
            });
        }

        let mut values = [0u8; 7];
        for ((slot, raw), (field, max)) in values.iter_mut().zip(&parts).zip(KEY_FIELDS) {
            if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(StateKeyError::NotANumber {
                    field,
                    value: (*raw).to_string(),
                });
            }
            let value: u8 = raw.parse().map_err(|_| StateKeyError::NotANumber {
                field,
                value: (*raw).to_string(),
            })?;
            if value > max {
                return Err(StateKeyError::OutOfRange { field, value, max });
            }
            *slot = value;
        }

        let [age_bucket, gender, bmi_bucket, anxiety_bucket, activity_bucket, engagement_bucket, segment_id] =
            values;
        Ok(UserState {
            age_bucket,
            gender,
            bmi_bucket,
            anxiety_bucket,
            activity_bucket,
            engagement_bucket,
            segment_id,
        })
    }
}

impl TryFrom<String> for UserState {
    type Error = StateKeyError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

impl From<UserState> for String {
    fn from(state: UserState) -> Self {
        state.to_string()
    }
}
