use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cue::AudioProfile;
use crate::error::ValidationError;

/// One timed exercise: what a session is started for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub duration_secs: u64,
    #[serde(default = "default_profile")]
    pub profile: AudioProfile,
}

fn default_profile() -> AudioProfile {
    AudioProfile::Gentle
}

impl Activity {
    pub fn new(name: impl Into<String>, duration_secs: u64, profile: AudioProfile) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            profile,
        }
    }
}

/// Parses `name:secs` or `name:secs:profile`. The profile defaults to gentle.
impl FromStr for Activity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| ValidationError::InvalidValue {
            field: "activity".into(),
            message,
        };

        let mut parts = s.split(':');
        let name = parts.next().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(invalid(format!("missing name in '{s}'")));
        }
        let secs_str = parts
            .next()
            .ok_or_else(|| invalid(format!("missing duration in '{s}'")))?;
        let secs: i64 = secs_str
            .trim()
            .parse()
            .map_err(|_| invalid(format!("cannot parse '{secs_str}' as seconds")))?;
        if secs <= 0 {
            return Err(ValidationError::InvalidDuration { secs });
        }
        let profile = match parts.next() {
            Some(p) => p.parse::<AudioProfile>().map_err(invalid)?,
            None => default_profile(),
        };
        if parts.next().is_some() {
            return Err(invalid(format!("too many fields in '{s}'")));
        }

        Ok(Activity::new(name, secs as u64, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_seconds() {
        let a: Activity = "Down Dog:60".parse().unwrap();
        assert_eq!(a, Activity::new("Down Dog", 60, AudioProfile::Gentle));
    }

    #[test]
    fn parses_explicit_profile() {
        let a: Activity = "Burpees:45:standard".parse().unwrap();
        assert_eq!(a.profile, AudioProfile::Standard);
        let legacy: Activity = "Sprint:30:high".parse().unwrap();
        assert_eq!(legacy.profile, AudioProfile::Standard);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(":60".parse::<Activity>().is_err());
        assert!("Plank".parse::<Activity>().is_err());
        assert!("Plank:abc".parse::<Activity>().is_err());
        assert!("Plank:30:loud".parse::<Activity>().is_err());
        assert!("Plank:30:gentle:extra".parse::<Activity>().is_err());
        assert_eq!(
            "Plank:0".parse::<Activity>(),
            Err(ValidationError::InvalidDuration { secs: 0 })
        );
    }
}
