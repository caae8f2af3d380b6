//! Schema-driven edit forms.
//!
//! A [`Form`] is derived from the serialised shape of a collection's default
//! payload, so one type serves every collection. Field kinds follow the JSON
//! value of the default: strings are text, `null` is optional text, numbers
//! are integers, booleans are flags and arrays are slot lists.

use folio_core::{
  Collection, Entity, Problem, RecordId, ValidationError,
  content::{
    About, Education, Experience, Profile, Project, Skill, SocialLink, SoftSkill,
    TechFocus,
  },
  slots::SlotList,
};
use serde_json::{Map, Value};

/// What a submitted form writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  New,
  Existing(RecordId),
  Singleton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  /// Blank submits as `null`.
  Optional(String),
  /// Raw input; parsed on build.
  Integer(String),
  Flag(bool),
  Slots(SlotList),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
  pub name:  String,
  pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
  collection: Collection,
  target:     Target,
  fields:     Vec<FormField>,
}

impl Form {
  /// An empty form for a new record, or for a singleton not yet saved.
  pub fn blank(collection: Collection) -> Self {
    let target = if collection.is_singleton() { Target::Singleton } else { Target::New };
    let fields = default_shape(collection)
      .into_iter()
      .map(|(name, value)| {
        let value = field_value(&name, &value, &value);
        FormField { name, value }
      })
      .collect();
    Self { collection, target, fields }
  }

  /// A form pre-filled from a stored record's flat JSON.
  pub fn for_record(collection: Collection, id: RecordId, record: &Value) -> Self {
    let target = if collection.is_singleton() {
      Target::Singleton
    } else {
      Target::Existing(id)
    };
    let fields = default_shape(collection)
      .into_iter()
      .map(|(name, default)| {
        let current = record.get(&name).unwrap_or(&default);
        let value = field_value(&name, &default, current);
        FormField { name, value }
      })
      .collect();
    Self { collection, target, fields }
  }

  pub fn collection(&self) -> Collection { self.collection }

  pub fn target(&self) -> &Target { &self.target }

  pub fn fields(&self) -> &[FormField] { &self.fields }

  pub fn field(&self, name: &str) -> Option<&FieldValue> {
    self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
  }

  pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
    self.fields.iter_mut().find(|f| f.name == name).map(|f| &mut f.value)
  }

  pub fn field_at_mut(&mut self, index: usize) -> Option<&mut FormField> {
    self.fields.get_mut(index)
  }

  /// Set a scalar field from text input. Flags accept `true`/`false`.
  pub fn set(&mut self, name: &str, input: &str) -> Result<(), ValidationError> {
    let value = self
      .field_mut(name)
      .ok_or_else(|| unknown_field(name))?;
    match value {
      FieldValue::Text(s) | FieldValue::Optional(s) | FieldValue::Integer(s) => {
        *s = input.to_owned();
        Ok(())
      }
      FieldValue::Flag(b) => {
        *b = input.trim().parse().map_err(|_| {
          ValidationError::new(name, Problem::Malformed("must be true or false".into()))
        })?;
        Ok(())
      }
      FieldValue::Slots(_) => Err(ValidationError::new(
        name,
        Problem::Malformed("is a list; edit its slots".into()),
      )),
    }
  }

  pub fn slots_mut(&mut self, name: &str) -> Option<&mut SlotList> {
    match self.field_mut(name)? {
      FieldValue::Slots(slots) => Some(slots),
      _ => None,
    }
  }

  /// Assemble the payload: parse integers, drop blank slots, deserialise and
  /// validate.
  pub fn build<E: Entity>(&self) -> Result<E, ValidationError> {
    let mut object = Map::new();
    for field in &self.fields {
      let value = match &field.value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Optional(s) if s.trim().is_empty() => Value::Null,
        FieldValue::Optional(s) => Value::String(s.trim().to_owned()),
        FieldValue::Integer(raw) => Value::from(parse_integer(&field.name, raw)?),
        FieldValue::Flag(b) => Value::Bool(*b),
        FieldValue::Slots(slots) => {
          Value::Array(slots.compact().into_iter().map(Value::String).collect())
        }
      };
      object.insert(field.name.clone(), value);
    }

    let payload: E = serde_json::from_value(Value::Object(object)).map_err(|e| {
      ValidationError::new(E::COLLECTION.key(), Problem::Malformed(e.to_string()))
    })?;
    payload.validate()?;
    Ok(payload)
  }
}

fn field_value(name: &str, default: &Value, current: &Value) -> FieldValue {
  let text = |v: &Value| match v {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  };
  match default {
    Value::Null => FieldValue::Optional(text(current)),
    Value::Number(_) => FieldValue::Integer(text(current)),
    Value::Bool(b) => FieldValue::Flag(current.as_bool().unwrap_or(*b)),
    Value::Array(_) => {
      let values = current
        .as_array()
        .map(|items| items.iter().map(text).collect())
        .unwrap_or_default();
      FieldValue::Slots(SlotList::new(name, values))
    }
    Value::String(_) | Value::Object(_) => FieldValue::Text(text(current)),
  }
}

fn parse_integer(field: &str, raw: &str) -> Result<i64, ValidationError> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(0);
  }
  raw.parse().map_err(|_| {
    ValidationError::new(field, Problem::Malformed(format!("{raw:?} is not a whole number")))
  })
}

fn unknown_field(name: &str) -> ValidationError {
  ValidationError::new(name, Problem::Malformed("no such field".into()))
}

/// The serialised default payload of `collection`, in declaration order.
fn default_shape(collection: Collection) -> Map<String, Value> {
  fn shape<E: Entity>() -> Map<String, Value> {
    match serde_json::to_value(E::default()) {
      Ok(Value::Object(map)) => map,
      _ => Map::new(),
    }
  }

  match collection {
    Collection::Profile => shape::<Profile>(),
    Collection::About => shape::<About>(),
    Collection::SocialLinks => shape::<SocialLink>(),
    Collection::Skills => shape::<Skill>(),
    Collection::SoftSkills => shape::<SoftSkill>(),
    Collection::TechFocus => shape::<TechFocus>(),
    Collection::Projects => shape::<Project>(),
    Collection::Experiences => shape::<Experience>(),
    Collection::Education => shape::<Education>(),
  }
}
