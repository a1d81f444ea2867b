//! Field-by-field validation of a citizen form.
//!
//! The schema is a plain table of `(Field, Rule)` pairs. Each rule is a pure
//! check of one field value; fields are validated independently and the first
//! failing check of a field supplies its message.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::citizen::{Choice, Citizen, Enumerated, Religion, Sex, VillageRef};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// One input of the citizen form, in display order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
  Firstname,
  Midname,
  Lastname,
  Sex,
  Age,
  Religion,
  Identification,
  Village,
  Degree,
  Job,
  DateOfBirth,
}

impl Field {
  /// Human-readable label.
  pub fn label(self) -> &'static str {
    match self {
      Field::Firstname => "First Name",
      Field::Midname => "Mid Name",
      Field::Lastname => "Last Name",
      Field::Sex => "Sex",
      Field::Age => "Age",
      Field::Religion => "Religion",
      Field::Identification => "Identification",
      Field::Village => "Village",
      Field::Degree => "Degree",
      Field::Job => "Job",
      Field::DateOfBirth => "Date-Of-Birth",
    }
  }

  /// Options for select-style fields; `None` for free text.
  pub fn choices(self) -> Option<Vec<Choice>> {
    match self {
      Field::Sex => Some(Sex::choices()),
      Field::Religion => Some(Religion::choices()),
      Field::Village => Some(VillageRef::choices()),
      _ => None,
    }
  }

  pub fn get(self, c: &Citizen) -> &str {
    match self {
      Field::Firstname => &c.firstname,
      Field::Midname => &c.midname,
      Field::Lastname => &c.lastname,
      Field::Sex => &c.sex,
      Field::Age => &c.age,
      Field::Religion => &c.religion,
      Field::Identification => &c.identification,
      Field::Village => &c.village,
      Field::Degree => &c.degree,
      Field::Job => &c.job,
      Field::DateOfBirth => &c.date_of_birth,
    }
  }

  pub fn get_mut(self, c: &mut Citizen) -> &mut String {
    match self {
      Field::Firstname => &mut c.firstname,
      Field::Midname => &mut c.midname,
      Field::Lastname => &mut c.lastname,
      Field::Sex => &mut c.sex,
      Field::Age => &mut c.age,
      Field::Religion => &mut c.religion,
      Field::Identification => &mut c.identification,
      Field::Village => &mut c.village,
      Field::Degree => &mut c.degree,
      Field::Job => &mut c.job,
      Field::DateOfBirth => &mut c.date_of_birth,
    }
  }

  /// The rule this field is checked against.
  pub fn rule(self) -> Rule {
    SCHEMA
      .iter()
      .find(|(f, _)| *f == self)
      .map(|(_, r)| *r)
      .unwrap_or(Rule::Optional)
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// A single validation rule.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
  /// Any non-empty string; whitespace counts as content.
  Required(&'static str),
  /// Must be one of an enumerated set of wire values.
  OneOf {
    accepts: fn(&str) -> bool,
    message: &'static str,
  },
  /// Required, digits only, 9 or 12 characters long.
  Identification,
  /// Anything goes.
  Optional,
}

pub const IDENTIFICATION_REQUIRED: &str = "Identification is required";
pub const IDENTIFICATION_DIGITS: &str = "Must be only digits";
pub const IDENTIFICATION_LENGTH: &str =
  "Identification must be 9 or 12 characters";

static DIGITS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex"));

fn is_one_of<E: Enumerated>(value: &str) -> bool { E::parse(value).is_ok() }

/// The citizen form schema. `date_of_birth` is never checked.
pub const SCHEMA: &[(Field, Rule)] = &[
  (Field::Firstname, Rule::Required("First Name is required")),
  (Field::Midname, Rule::Required("Mid Name is required")),
  (Field::Lastname, Rule::Required("Last Name is required")),
  (Field::Sex, Rule::OneOf {
    accepts: is_one_of::<Sex>,
    message: "Sex is required",
  }),
  (Field::Job, Rule::Required("Job is required")),
  (Field::Village, Rule::OneOf {
    accepts: is_one_of::<VillageRef>,
    message: "Village is required",
  }),
  (Field::Religion, Rule::OneOf {
    accepts: is_one_of::<Religion>,
    message: "Religion is required",
  }),
  (Field::Age, Rule::Required("Age is required")),
  (Field::Degree, Rule::Required("Degree is required")),
  (Field::Identification, Rule::Identification),
];

impl Rule {
  /// Check `value`, returning the error message on failure.
  pub fn check(self, value: &str) -> Result<(), &'static str> {
    match self {
      Rule::Required(message) => {
        if value.is_empty() {
          Err(message)
        } else {
          Ok(())
        }
      }
      Rule::OneOf { accepts, message } => {
        if accepts(value) { Ok(()) } else { Err(message) }
      }
      Rule::Identification => check_identification(value),
      Rule::Optional => Ok(()),
    }
  }
}

/// Identification numbers are 9 or 12 ASCII digits.
pub fn check_identification(value: &str) -> Result<(), &'static str> {
  if value.is_empty() {
    return Err(IDENTIFICATION_REQUIRED);
  }
  if !DIGITS.is_match(value) {
    return Err(IDENTIFICATION_DIGITS);
  }
  match value.len() {
    9 | 12 => Ok(()),
    _ => Err(IDENTIFICATION_LENGTH),
  }
}

// ─── Whole-form validation ───────────────────────────────────────────────────

/// Per-field messages produced by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub BTreeMap<Field, &'static str>);

impl ValidationErrors {
  pub fn get(&self, field: Field) -> Option<&'static str> {
    self.0.get(&field).copied()
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
    self.0.keys().copied()
  }
}

/// Validate every field of `c` against [`SCHEMA`].
pub fn validate(c: &Citizen) -> Result<(), ValidationErrors> {
  let errors: BTreeMap<_, _> = SCHEMA
    .iter()
    .filter_map(|(field, rule)| {
      rule.check(field.get(c)).err().map(|msg| (*field, msg))
    })
    .collect();

  if errors.is_empty() {
    Ok(())
  } else {
    Err(ValidationErrors(errors))
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  fn valid_citizen() -> Citizen {
    Citizen {
      id:             None,
      firstname:      "An".into(),
      midname:        "Van".into(),
      lastname:       "Nguyen".into(),
      sex:            "Nam".into(),
      age:            "31".into(),
      job:            "Farmer".into(),
      village:        "1".into(),
      religion:       "Không".into(),
      identification: "123456789".into(),
      degree:         "High school".into(),
      date_of_birth:  String::new(),
    }
  }

  #[test]
  fn valid_citizen_passes() {
    assert_eq!(validate(&valid_citizen()), Ok(()));
  }

  #[test]
  fn each_required_field_fails_alone() {
    for field in Field::iter().filter(|f| *f != Field::DateOfBirth) {
      let mut c = valid_citizen();
      field.get_mut(&mut c).clear();

      let errors = validate(&c).unwrap_err();
      let failed: Vec<_> = errors.fields().collect();
      assert_eq!(failed, vec![field], "clearing {field}");
    }
  }

  #[test]
  fn date_of_birth_is_never_checked() {
    let mut c = valid_citizen();
    c.date_of_birth = "not a date".into();
    assert!(validate(&c).is_ok());
  }

  #[test]
  fn whitespace_is_content_for_required_fields() {
    let mut c = valid_citizen();
    c.job = "   ".into();
    c.degree = " ".into();
    assert_eq!(validate(&c), Ok(()));

    c.identification = "   ".into();
    let errors = validate(&c).unwrap_err();
    assert_eq!(errors.get(Field::Identification), Some(IDENTIFICATION_DIGITS));
    assert_eq!(errors.0.len(), 1);
  }

  #[test]
  fn enumerated_fields_reject_unknown_values() {
    let mut c = valid_citizen();
    c.sex = "male".into();
    c.village = "3".into();
    c.religion = "Pastafarian".into();

    let errors = validate(&c).unwrap_err();
    assert_eq!(errors.get(Field::Sex), Some("Sex is required"));
    assert_eq!(errors.get(Field::Village), Some("Village is required"));
    assert_eq!(errors.get(Field::Religion), Some("Religion is required"));
    assert_eq!(errors.0.len(), 3);
  }

  #[test]
  fn identification_accepts_nine_or_twelve_digits() {
    assert_eq!(check_identification("123456789"), Ok(()));
    assert_eq!(check_identification("012345678901"), Ok(()));
  }

  #[test]
  fn identification_rejects_other_lengths() {
    for len in [1, 8, 10, 11, 13, 20] {
      let id = "7".repeat(len);
      assert_eq!(
        check_identification(&id),
        Err(IDENTIFICATION_LENGTH),
        "length {len}"
      );
    }
  }

  #[test]
  fn identification_rejects_non_digits() {
    for id in ["12345678a", "1234 5678", "-12345678", "１２３４５６７８９", "12345678.0"] {
      assert_eq!(check_identification(id), Err(IDENTIFICATION_DIGITS), "{id:?}");
    }
    assert_eq!(check_identification(""), Err(IDENTIFICATION_REQUIRED));
  }

  #[test]
  fn every_field_has_a_label_and_snake_case_name() {
    assert_eq!(Field::DateOfBirth.to_string(), "date_of_birth");
    assert_eq!(Field::Firstname.to_string(), "firstname");
    assert!(Field::iter().all(|f| !f.label().is_empty()));
    assert!(matches!(Field::DateOfBirth.rule(), Rule::Optional));
    assert!(Field::Sex.choices().is_some());
    assert!(Field::Job.choices().is_none());
  }
}
