use crate::geo::Position;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Stable identifier of a property record.
///
/// The data document may carry ids as strings or integers; both are
/// normalized to their textual form so that `7` and `"7"` name the same
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TextVisitor).map(RecordId)
    }
}

/// Normalized price of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Price {
    /// Missing, null or blank in the source document.
    #[default]
    Absent,
    /// A finite number.
    Value(f64),
    /// Present but not usable as a number (kept for search).
    Invalid(String),
}

impl Price {
    /// Interpret a textual price the way the document producers write them.
    pub fn parse_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Price::Absent;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Price::Value(n),
            _ => Price::Invalid(trimmed.to_string()),
        }
    }

    pub fn from_number(n: f64) -> Self {
        if n.is_finite() {
            Price::Value(n)
        } else {
            Price::Invalid(n.to_string())
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Value(n) => Some(*n),
            _ => None,
        }
    }

    /// A price is disclosed only when it is a positive number.
    pub fn disclosed(&self) -> Option<f64> {
        self.amount().filter(|n| *n > 0.0)
    }

    /// Amount used for price-bucket tests: a missing price counts as zero,
    /// an unparseable one has no amount at all.
    pub fn bucket_amount(&self) -> Option<f64> {
        match self {
            Price::Absent => Some(0.0),
            Price::Value(n) => Some(*n),
            Price::Invalid(_) => None,
        }
    }

    /// Text matched by free-text search. Missing and zero prices contribute
    /// nothing.
    pub fn search_text(&self) -> String {
        match self {
            Price::Absent => String::new(),
            Price::Value(n) if *n == 0.0 => String::new(),
            Price::Value(n) => number_text(*n),
            Price::Invalid(text) => text.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PriceVisitor;

        impl<'de> Visitor<'de> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a number, a numeric string or null")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Price, E> {
                Ok(Price::Value(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Price, E> {
                Ok(Price::Value(value as f64))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Price, E> {
                Ok(Price::from_number(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Price, E> {
                Ok(Price::parse_text(value))
            }

            fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Price, E> {
                Ok(Price::Absent)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Price, E> {
                Ok(Price::Absent)
            }

            fn visit_none<E: de::Error>(self) -> Result<Price, E> {
                Ok(Price::Absent)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Price, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Price::Absent)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Price, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Price::Absent)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Render a number the way the document producers expect to read it back:
/// integral values have no fractional part.
pub(crate) fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Accepts any scalar and yields its text; containers and null become empty.
struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a string or number")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(number_text(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

/// Only JSON numbers count as coordinates; numeric strings are rejected.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoordinateVisitor;

    impl<'de> Visitor<'de> for CoordinateVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a coordinate in degrees")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value as f64))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value).filter(|v| v.is_finite()))
        }

        fn visit_str<E: de::Error>(self, _value: &str) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(CoordinateVisitor)
}

/// One property listing from the data document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    pub id: RecordId,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub lng: Option<f64>,
    #[serde(deserialize_with = "deserialize_text")]
    pub address: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub seller: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub phone: String,
    pub price: Price,
    #[serde(
        rename = "price_per_m",
        alias = "price_per_area",
        deserialize_with = "deserialize_text"
    )]
    pub price_per_area: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub lot: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub notes: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub photos: String,
}

impl PropertyRecord {
    pub fn new(id: impl Into<RecordId>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        }
    }

    /// Position on the map, if both coordinates are finite.
    pub fn position(&self) -> Option<Position> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Position { lat, lng })
            }
            _ => None,
        }
    }

    /// Marker title: the address, or a 1-based ordinal when it is blank.
    pub fn title(&self, ordinal: usize) -> String {
        if self.address.is_empty() {
            format!("Property #{ordinal}")
        } else {
            self.address.clone()
        }
    }
}
