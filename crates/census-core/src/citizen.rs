//! Citizen records and the enumerated values they carry.
//!
//! Every field travels as a string on the wire. The enumerated fields are
//! constrained by [`Sex`], [`Religion`] and [`VillageRef`] at validation time
//! rather than at decode time, so a listing with one odd record still loads.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

// ─── Lenient scalars ─────────────────────────────────────────────────────────

/// Any JSON scalar the API might use for a textual field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
  Text(String),
  Integer(i64),
  Float(f64),
  Bool(bool),
}

impl Scalar {
  fn into_string(self) -> String {
    match self {
      Scalar::Text(s) => s,
      Scalar::Integer(n) => n.to_string(),
      Scalar::Float(n) => n.to_string(),
      Scalar::Bool(b) => b.to_string(),
    }
  }
}

/// Decode a string, number, bool or `null` into a `String` (`null` → `""`).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(
    Option::<Scalar>::deserialize(deserializer)?
      .map(Scalar::into_string)
      .unwrap_or_default(),
  )
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Server-assigned record identifier.
///
/// The API hands out integers, but the id is only ever echoed back into a URL
/// path, so it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CitizenId(String);

impl CitizenId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CitizenId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<u64> for CitizenId {
  fn from(id: u64) -> Self { Self(id.to_string()) }
}

impl<'de> Deserialize<'de> for CitizenId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Scalar::deserialize(deserializer).map(|s| Self(s.into_string()))
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A citizen record as exchanged with the API.
///
/// `id` is `None` until the server has assigned one. `date_of_birth` is the
/// only optional field and is omitted from request bodies when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:             Option<CitizenId>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub firstname:      String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub midname:        String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub lastname:       String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub sex:            String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub age:            String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub job:            String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub village:        String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub religion:       String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub identification: String,
  #[serde(default, deserialize_with = "lenient_string")]
  pub degree:         String,
  #[serde(
    default,
    deserialize_with = "lenient_string",
    skip_serializing_if = "String::is_empty"
  )]
  pub date_of_birth:  String,
}

impl Citizen {
  /// First, middle and last name joined with single spaces.
  pub fn full_name(&self) -> String {
    [&self.firstname, &self.midname, &self.lastname]
      .into_iter()
      .map(|s| s.trim())
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// An entry of the village lookup listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id:   String,
  #[serde(default, alias = "village_name", deserialize_with = "lenient_string")]
  pub name: String,
}

// ─── Enumerated values ───────────────────────────────────────────────────────

/// A selectable option: the wire value and the text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
  pub value: &'static str,
  pub label: &'static str,
}

/// A closed set of string values accepted by one record field.
pub trait Enumerated:
  Copy + IntoEnumIterator + Into<&'static str> + FromStr + 'static
{
  /// Record field the set belongs to, for error messages.
  const FIELD: &'static str;

  /// The value sent over the wire.
  fn value(self) -> &'static str { self.into() }

  fn label(self) -> &'static str { self.value() }

  fn parse(value: &str) -> Result<Self> {
    value.parse().map_err(|_| Error::UnknownValue {
      field: Self::FIELD,
      value: value.to_string(),
    })
  }

  fn choices() -> Vec<Choice> {
    Self::iter()
      .map(|v| Choice { value: v.value(), label: v.label() })
      .collect()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
pub enum Sex {
  #[strum(serialize = "Nam")]
  Male,
  #[strum(serialize = "Nu")]
  Female,
}

impl Enumerated for Sex {
  const FIELD: &'static str = "sex";

  fn label(self) -> &'static str {
    match self {
      Sex::Male => "Nam",
      Sex::Female => "Nữ",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
pub enum Religion {
  #[strum(serialize = "Không")]
  Unaffiliated,
  #[strum(serialize = "Phật giáo")]
  Buddhist,
  #[strum(serialize = "Thiên chúa giáo")]
  Catholic,
  #[strum(serialize = "Hồi giáo")]
  Muslim,
  #[strum(serialize = "Ấn độ giáo")]
  Hindu,
  #[strum(serialize = "Cao đài giáo")]
  Caodaist,
  #[strum(serialize = "Khác")]
  Other,
}

impl Enumerated for Religion {
  const FIELD: &'static str = "religion";
}

/// Reference to one of the villages the form can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr)]
pub enum VillageRef {
  #[strum(serialize = "1")]
  One,
  #[strum(serialize = "2")]
  Two,
}

impl Enumerated for VillageRef {
  const FIELD: &'static str = "village";
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn decodes_numbers_and_nulls_leniently() {
    let c: Citizen = serde_json::from_value(json!({
      "id": 42,
      "firstname": "An",
      "lastname": "Nguyen",
      "age": 31,
      "village": 2,
      "date_of_birth": null,
    }))
    .unwrap();

    assert_eq!(c.id, Some(CitizenId::from(42)));
    assert_eq!(c.age, "31");
    assert_eq!(c.village, "2");
    assert_eq!(c.midname, "");
    assert_eq!(c.date_of_birth, "");
  }

  #[test]
  fn string_ids_are_kept_verbatim() {
    let c: Citizen = serde_json::from_value(json!({ "id": "abc-1" })).unwrap();
    assert_eq!(c.id.unwrap().as_str(), "abc-1");
  }

  #[test]
  fn body_omits_id_and_empty_date() {
    let c = Citizen {
      firstname: "An".into(),
      ..Citizen::default()
    };
    let v = serde_json::to_value(&c).unwrap();
    assert!(v.get("id").is_none());
    assert!(v.get("date_of_birth").is_none());
    assert_eq!(v["firstname"], "An");
    assert_eq!(v["identification"], "");
  }

  #[test]
  fn village_accepts_alias_and_numeric_id() {
    let v: Village =
      serde_json::from_value(json!({ "id": 1, "village_name": "Thôn 1" })).unwrap();
    assert_eq!(v.id, "1");
    assert_eq!(v.name, "Thôn 1");
  }

  #[test]
  fn full_name_skips_blank_parts() {
    let c = Citizen {
      firstname: "An".into(),
      midname: "  ".into(),
      lastname: "Nguyen".into(),
      ..Citizen::default()
    };
    assert_eq!(c.full_name(), "An Nguyen");
  }

  #[test]
  fn enumerated_values_round_trip_through_wire_strings() {
    assert_eq!(Sex::parse("Nu").unwrap(), Sex::Female);
    assert_eq!(Sex::Female.label(), "Nữ");
    assert_eq!(Religion::parse("Cao đài giáo").unwrap(), Religion::Caodaist);
    assert_eq!(VillageRef::One.value(), "1");
    assert_eq!(Religion::choices().len(), 7);

    let err = VillageRef::parse("3").unwrap_err();
    assert!(err.to_string().contains("village"), "{err}");
  }
}
