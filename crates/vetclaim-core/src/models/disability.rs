use serde::{Deserialize, Serialize};

use super::lenient::{deserialize_rating, deserialize_record_id, deserialize_string_or_empty};

/// A service-connected disability and its assigned percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Disability {
    #[serde(default, deserialize_with = "deserialize_record_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,
}

impl Disability {
    pub fn new(id: i64, name: impl Into<String>, rating: u8) -> Self {
        Self {
            id,
            name: name.into(),
            rating: rating.min(100),
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_strings_are_accepted() {
        let d: Disability =
            serde_json::from_str(r#"{"id":"1700000000000","name":"Tinnitus","rating":"10"}"#)
                .expect("parse disability");
        assert_eq!(d.id, 1_700_000_000_000);
        assert_eq!(d.rating, 10);
    }

    #[test]
    fn test_bad_rating_becomes_zero() {
        let d: Disability =
            serde_json::from_str(r#"{"id":1,"name":"Knee","rating":"abc"}"#).expect("parse");
        assert_eq!(d.rating, 0);
        assert!(!d.is_rated());

        let d: Disability = serde_json::from_str(r#"{"name":"Back","rating":250}"#).expect("parse");
        assert_eq!(d.rating, 100);
        assert_eq!(d.id, 0);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Disability::new(1, "PTSD", 130).rating, 100);
    }
}
