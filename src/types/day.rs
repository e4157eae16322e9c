use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical weekday of the repeating teaching week.
///
/// The canonical names are the Turkish weekday names; English names are
/// accepted as synonyms on input. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All weekdays in week order
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Canonical name used on the wire
    pub fn canonical_name(self) -> &'static str {
        match self {
            Day::Monday => "Pazartesi",
            Day::Tuesday => "Salı",
            Day::Wednesday => "Çarşamba",
            Day::Thursday => "Perşembe",
            Day::Friday => "Cuma",
        }
    }

    /// Zero-based position within the week
    pub fn index(self) -> usize {
        match self {
            Day::Monday => 0,
            Day::Tuesday => 1,
            Day::Wednesday => 2,
            Day::Thursday => 3,
            Day::Friday => 4,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Error for day names outside the accepted set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayParseError(pub String);

impl fmt::Display for DayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a recognized weekday name", self.0)
    }
}

impl std::error::Error for DayParseError {}

impl FromStr for Day {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Unicode lowercasing maps 'I' to 'i', so the ASCII foldings below
        // also cover all-caps Turkish spellings.
        let folded = s.trim().to_lowercase();
        match folded.as_str() {
            "pazartesi" | "monday" => Ok(Day::Monday),
            "salı" | "sali" | "tuesday" => Ok(Day::Tuesday),
            "çarşamba" | "carsamba" | "wednesday" => Ok(Day::Wednesday),
            "perşembe" | "persembe" | "thursday" => Ok(Day::Thursday),
            "cuma" | "friday" => Ok(Day::Friday),
            _ => Err(DayParseError(s.to_string())),
        }
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_name())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_canonical_and_english_names() {
        assert_eq!("Pazartesi".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Salı".parse::<Day>().unwrap(), Day::Tuesday);
        assert_eq!("sali".parse::<Day>().unwrap(), Day::Tuesday);
        assert_eq!("TUESDAY".parse::<Day>().unwrap(), Day::Tuesday);
        assert_eq!("Çarşamba".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("carsamba".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!("Perşembe".parse::<Day>().unwrap(), Day::Thursday);
        assert_eq!("friday".parse::<Day>().unwrap(), Day::Friday);
    }

    #[test]
    fn test_synonym_spellings_normalize_to_same_day() {
        let a: Day = "Salı".parse().unwrap();
        let b: Day = "tuesday".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.canonical_name(), "Salı");
    }

    #[test]
    fn test_rejects_unknown_names() {
        assert!("Sunday".parse::<Day>().is_err());
        assert!("Pzt".parse::<Day>().is_err());
        assert!("".parse::<Day>().is_err());
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&Day::Wednesday).unwrap();
        assert_eq!(json, "\"Çarşamba\"");
        let back: Day = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Day::Wednesday);
    }

    #[test]
    fn test_week_order() {
        for pair in Day::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
