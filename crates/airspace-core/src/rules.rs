//! Safety rules and thresholds for airport traffic.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::models::SizeClass;

/// Configuration for safety rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyRules {
    /// Two planes reaching the same runway closer than this are a conflict
    pub runway_separation_secs: i64,
}

impl Default for SafetyRules {
    fn default() -> Self {
        Self {
            runway_separation_secs: 60,
        }
    }
}

impl SafetyRules {
    pub fn runway_separation(&self) -> Duration {
        Duration::seconds(self.runway_separation_secs)
    }
}

/// Whether an object of class `object` fits a slot of class `slot`.
///
/// SMALL fits anywhere, MEDIUM fits MEDIUM or LARGE, LARGE fits only LARGE.
pub fn fits(object: SizeClass, slot: SizeClass) -> bool {
    object <= slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fits_table() {
        use SizeClass::*;
        let table = [
            (Small, Small, true),
            (Small, Medium, true),
            (Small, Large, true),
            (Medium, Small, false),
            (Medium, Medium, true),
            (Medium, Large, true),
            (Large, Small, false),
            (Large, Medium, false),
            (Large, Large, true),
        ];
        for (object, slot, expected) in table {
            assert_eq!(fits(object, slot), expected, "{object} in {slot}");
        }
    }

    #[test]
    fn test_default_runway_separation() {
        assert_eq!(SafetyRules::default().runway_separation(), Duration::minutes(1));
    }

    fn size_class() -> impl Strategy<Value = SizeClass> {
        prop_oneof![
            Just(SizeClass::Small),
            Just(SizeClass::Medium),
            Just(SizeClass::Large),
        ]
    }

    proptest! {
        #[test]
        fn fits_fails_only_when_object_is_larger(object in size_class(), slot in size_class()) {
            prop_assert_eq!(!fits(object, slot), object > slot);
        }
    }
}
