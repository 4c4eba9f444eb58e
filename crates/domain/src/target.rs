//! Identifiers for controllable targets.
//!
//! A target id has the `family.object` form, e.g. `switch.heater`. The
//! family names the device class and decides which actuator can turn
//! the target off.

use crate::error::ValidationError;

/// Families that may carry an auto-off timer unless configured otherwise.
pub const DEFAULT_ELIGIBLE_FAMILIES: &[&str] = &["switch", "light", "fan", "media_player"];

/// A validated target identifier of the `family.object` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    /// Parses and validates a target id.
    ///
    /// Both segments must be non-empty and consist of lowercase ASCII
    /// letters, digits and underscores, joined by a single dot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedTargetId`] when the input does
    /// not have the expected shape.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let Some((family, object)) = value.split_once('.') else {
            return Err(ValidationError::MalformedTargetId(value));
        };
        if family.is_empty() || object.is_empty() {
            return Err(ValidationError::MalformedTargetId(value));
        }
        let valid_segment =
            |s: &str| s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_segment(family) || !valid_segment(object) {
            return Err(ValidationError::MalformedTargetId(value));
        }
        Ok(Self(value))
    }

    /// The family segment, e.g. `switch` in `switch.heater`.
    #[must_use]
    pub fn family(&self) -> &str {
        // parse() guarantees the dot is present
        self.0.split_once('.').map_or("", |(family, _)| family)
    }

    /// The object segment, e.g. `heater` in `switch.heater`.
    #[must_use]
    pub fn object(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, object)| object)
    }

    /// The full id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TargetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TargetId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TargetId> for String {
    fn from(value: TargetId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_valid_id() {
        let id = TargetId::parse("switch.heater").unwrap();
        assert_eq!(id.family(), "switch");
        assert_eq!(id.object(), "heater");
        assert_eq!(id.as_str(), "switch.heater");
    }

    #[test]
    fn should_reject_missing_dot() {
        let err = TargetId::parse("heater").unwrap_err();
        assert_eq!(err, ValidationError::MalformedTargetId("heater".to_string()));
    }

    #[test]
    fn should_reject_empty_segments() {
        assert!(TargetId::parse("switch.").is_err());
        assert!(TargetId::parse(".heater").is_err());
        assert!(TargetId::parse(".").is_err());
    }

    #[test]
    fn should_reject_uppercase_and_spaces() {
        assert!(TargetId::parse("Switch.heater").is_err());
        assert!(TargetId::parse("switch.living room").is_err());
    }

    #[test]
    fn should_keep_only_first_dot_as_separator() {
        let id = TargetId::parse("media_player.tv.remote");
        // the object segment would contain a dot, which is not a valid char
        assert!(id.is_err());
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = TargetId::parse("light.desk_lamp").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"light.desk_lamp\"");
        let back: TargetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn should_fail_deserializing_malformed_id() {
        let result: Result<TargetId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(result.is_err());
    }
}
