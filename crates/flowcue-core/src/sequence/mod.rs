//! Ordered activity lists and the driver that chains them.

mod activity;
mod driver;

pub use activity::Activity;
pub use driver::{ActivityOutcome, DriverOptions, SequenceDriver, SequenceReport, SequenceStop};

use serde::{Deserialize, Serialize};

use crate::cue::AudioProfile;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence")]
pub struct Sequence {
    activities: Vec<Activity>,
}

/// Unchecked wire form; converted through [`Sequence::new`].
#[derive(Deserialize)]
struct RawSequence {
    activities: Vec<Activity>,
}

impl TryFrom<RawSequence> for Sequence {
    type Error = ValidationError;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        Sequence::new(raw.activities)
    }
}

impl Sequence {
    /// # Errors
    ///
    /// Rejects an empty list and any activity without a positive duration.
    pub fn new(activities: Vec<Activity>) -> Result<Self, ValidationError> {
        if activities.is_empty() {
            return Err(ValidationError::EmptyCollection("sequence".into()));
        }
        if let Some(bad) = activities.iter().find(|a| a.duration_secs == 0) {
            return Err(ValidationError::InvalidDuration {
                secs: bad.duration_secs as i64,
            });
        }
        Ok(Self { activities })
    }

    /// A five-pose yoga flow.
    pub fn default_yoga() -> Self {
        let gentle = |name: &str, secs| Activity::new(name, secs, AudioProfile::Gentle);
        Self {
            activities: vec![
                gentle("Breathe", 120),
                gentle("Cat-Cow", 60),
                gentle("Down Dog", 60),
                gentle("Sun Salutation", 300),
                gentle("Warrior Pose", 60),
            ],
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// The activity after `index`, if any. Sequences do not wrap.
    pub fn next_after(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index.checked_add(1)?)
    }

    /// Work time across all activities, excluding get-ready countdowns.
    pub fn total_work_secs(&self) -> u64 {
        self.activities.iter().map(|a| a.duration_secs).sum()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::default_yoga()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence_has_5_gentle_activities() {
        let s = Sequence::default();
        assert_eq!(s.len(), 5);
        assert!(s.activities().iter().all(|a| a.profile == AudioProfile::Gentle));
        assert_eq!(s.total_work_secs(), 120 + 60 + 60 + 300 + 60);
    }

    #[test]
    fn next_after_stops_at_end() {
        let s = Sequence::default();
        assert_eq!(s.next_after(0).map(|a| a.name.as_str()), Some("Cat-Cow"));
        assert!(s.next_after(4).is_none());
        assert!(s.next_after(usize::MAX).is_none());
    }

    #[test]
    fn new_rejects_empty_and_zero_length() {
        assert!(matches!(
            Sequence::new(Vec::new()),
            Err(ValidationError::EmptyCollection(_))
        ));
        let zero = Activity::new("Rest", 0, AudioProfile::Gentle);
        assert_eq!(
            Sequence::new(vec![zero]),
            Err(ValidationError::InvalidDuration { secs: 0 })
        );
    }

    #[test]
    fn deserialize_runs_the_same_checks_as_new() {
        let empty = serde_json::from_str::<Sequence>(r#"{"activities":[]}"#);
        assert!(empty.is_err());

        let zero = r#"{"activities":[{"name":"Rest","duration_secs":0}]}"#;
        assert!(serde_json::from_str::<Sequence>(zero).is_err());

        let json = serde_json::to_string(&Sequence::default_yoga()).unwrap();
        let parsed: Sequence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Sequence::default_yoga());
    }
}
