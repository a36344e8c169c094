//! Animal catalog records

use crate::error::{validation_error, AppError};
use crate::models::trimmed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Species of an adoptable animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalType {
    #[default]
    Dog,
    Cat,
    Other,
}

impl AnimalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalType::Dog => "dog",
            AnimalType::Cat => "cat",
            AnimalType::Other => "other",
        }
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(AnimalType::Dog),
            "cat" => Ok(AnimalType::Cat),
            "other" => Ok(AnimalType::Other),
            other => Err(validation_error(format!(
                "Invalid animal type '{}' (expected dog, cat or other)",
                other
            ))),
        }
    }
}

/// Animal as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnimalType,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    /// Public upload path or external URL
    pub photo: Option<String>,
    pub adopted: bool,
    pub created_at: DateTime<Utc>,
}

/// The slice of an animal shown next to an application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnimalType,
    pub breed: Option<String>,
}

impl From<&Animal> for AnimalSummary {
    fn from(animal: &Animal) -> Self {
        Self {
            id: animal.id,
            name: animal.name.clone(),
            kind: animal.kind,
            breed: animal.breed.clone(),
        }
    }
}

/// Input for creating an animal. New animals are never adopted.
#[derive(Debug, Clone, Default)]
pub struct NewAnimal {
    pub name: String,
    pub kind: AnimalType,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

impl NewAnimal {
    /// Build from admin form fields; `uploaded_photo` wins over a `photo` field
    pub fn from_fields(
        fields: &HashMap<String, String>,
        uploaded_photo: Option<String>,
    ) -> Result<Self, AppError> {
        let field = |name: &str| trimmed(fields.get(name).cloned());

        let name = field("name").ok_or_else(|| validation_error("Animal name is required"))?;
        let kind = field("type")
            .map(|t| t.parse::<AnimalType>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            name,
            kind,
            breed: field("breed"),
            age: field("age"),
            size: field("size"),
            description: field("description"),
            photo: uploaded_photo.or_else(|| field("photo")),
        })
    }
}

/// Partial update of an animal. `None` leaves the stored value untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalUpdate {
    pub name: Option<String>,
    pub kind: Option<AnimalType>,
    pub breed: Option<Option<String>>,
    pub age: Option<Option<String>>,
    pub size: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub photo: Option<String>,
    pub adopted: Option<bool>,
}

impl AnimalUpdate {
    /// Shallow-merge semantics over the submitted form fields.
    ///
    /// Blank optional fields clear the stored value. The photo is only ever
    /// replaced: by the uploaded file, or else by a non-blank `photo` field.
    pub fn from_fields(
        fields: &HashMap<String, String>,
        uploaded_photo: Option<String>,
    ) -> Result<Self, AppError> {
        let optional = |name: &str| fields.get(name).map(|v| trimmed(Some(v.clone())));

        let name = match fields.get("name") {
            Some(raw) => Some(
                trimmed(Some(raw.clone()))
                    .ok_or_else(|| validation_error("Animal name cannot be empty"))?,
            ),
            None => None,
        };

        let kind = match optional("type") {
            Some(Some(t)) => Some(t.parse::<AnimalType>()?),
            _ => None,
        };

        let adopted = match optional("adopted") {
            Some(Some(raw)) => Some(parse_flag(&raw)?),
            _ => None,
        };

        Ok(Self {
            name,
            kind,
            breed: optional("breed"),
            age: optional("age"),
            size: optional("size"),
            description: optional("description"),
            photo: uploaded_photo.or_else(|| trimmed(fields.get("photo").cloned())),
            adopted,
        })
    }

    /// Apply the update to an in-memory record
    pub fn apply(&self, animal: &mut Animal) {
        if let Some(name) = &self.name {
            animal.name = name.clone();
        }
        if let Some(kind) = self.kind {
            animal.kind = kind;
        }
        if let Some(breed) = &self.breed {
            animal.breed = breed.clone();
        }
        if let Some(age) = &self.age {
            animal.age = age.clone();
        }
        if let Some(size) = &self.size {
            animal.size = size.clone();
        }
        if let Some(description) = &self.description {
            animal.description = description.clone();
        }
        if let Some(photo) = &self.photo {
            animal.photo = Some(photo.clone());
        }
        if let Some(adopted) = self.adopted {
            animal.adopted = adopted;
        }
    }
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => Err(validation_error("adopted must be true or false")),
    }
}

/// Query string for `GET /api/animals`
#[derive(Debug, Default, Deserialize)]
pub struct AnimalListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample() -> Animal {
        Animal {
            id: Uuid::new_v4(),
            name: "Rex".into(),
            kind: AnimalType::Dog,
            breed: Some("Beagle".into()),
            age: Some("2".into()),
            size: None,
            description: None,
            photo: Some("/uploads/1-photo.jpg".into()),
            adopted: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_animal_serializes_type_field() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "dog");
        assert_eq!(json["adopted"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json["size"].is_null());
    }

    #[test]
    fn test_new_animal_defaults_to_dog() {
        let animal = NewAnimal::from_fields(&fields(&[("name", " Rex "), ("type", "")]), None).unwrap();
        assert_eq!(animal.name, "Rex");
        assert_eq!(animal.kind, AnimalType::Dog);
        assert_eq!(animal.breed, None);
    }

    #[test]
    fn test_new_animal_requires_name_and_known_type() {
        assert!(NewAnimal::from_fields(&fields(&[("type", "cat")]), None).is_err());
        assert!(NewAnimal::from_fields(&fields(&[("name", "Tom"), ("type", "hamster")]), None).is_err());
    }

    #[test]
    fn test_uploaded_photo_beats_photo_field() {
        let f = fields(&[("name", "Tom"), ("photo", "https://example.com/tom.png")]);
        let with_file = NewAnimal::from_fields(&f, Some("/uploads/9-photo.png".into())).unwrap();
        assert_eq!(with_file.photo.as_deref(), Some("/uploads/9-photo.png"));
        let with_url = NewAnimal::from_fields(&f, None).unwrap();
        assert_eq!(with_url.photo.as_deref(), Some("https://example.com/tom.png"));
    }

    #[test]
    fn test_update_merges_submitted_fields_only() {
        let update = AnimalUpdate::from_fields(
            &fields(&[("breed", ""), ("size", "large"), ("photo", ""), ("adopted", "true")]),
            None,
        )
        .unwrap();

        let mut animal = sample();
        update.apply(&mut animal);
        assert_eq!(animal.name, "Rex");
        assert_eq!(animal.breed, None);
        assert_eq!(animal.size.as_deref(), Some("large"));
        assert_eq!(animal.photo.as_deref(), Some("/uploads/1-photo.jpg"));
        assert!(animal.adopted);
    }

    #[test]
    fn test_update_rejects_bad_values() {
        assert!(AnimalUpdate::from_fields(&fields(&[("name", " ")]), None).is_err());
        assert!(AnimalUpdate::from_fields(&fields(&[("adopted", "maybe")]), None).is_err());
        assert!(AnimalUpdate::from_fields(&fields(&[("type", "bird")]), None).is_err());
    }
}
