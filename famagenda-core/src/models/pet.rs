use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSpecies {
    Dog,
    Cat,
    Bird,
    Fish,
    Rabbit,
    Hamster,
    #[default]
    Other,
}

impl fmt::Display for PetSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PetSpecies::Dog => "dog",
            PetSpecies::Cat => "cat",
            PetSpecies::Bird => "bird",
            PetSpecies::Fish => "fish",
            PetSpecies::Rabbit => "rabbit",
            PetSpecies::Hamster => "hamster",
            PetSpecies::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PetSpecies {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dog" => Ok(PetSpecies::Dog),
            "cat" => Ok(PetSpecies::Cat),
            "bird" => Ok(PetSpecies::Bird),
            "fish" => Ok(PetSpecies::Fish),
            "rabbit" => Ok(PetSpecies::Rabbit),
            "hamster" => Ok(PetSpecies::Hamster),
            "other" => Ok(PetSpecies::Other),
            _ => Err(format!(
                "Invalid species '{}'. Valid options: dog, cat, bird, fish, rabbit, hamster, other",
                s
            )),
        }
    }
}

/// A pet together with its care records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub species: PetSpecies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub vaccines: Vec<PetVaccine>,
    #[serde(default)]
    pub baths: Vec<PetBath>,
    #[serde(default)]
    pub created_at: String,
}

impl Pet {
    pub fn new(name: impl Into<String>, species: PetSpecies, color: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            species,
            breed: None,
            birth_date: None,
            color: color.into(),
            photo: None,
            vaccines: Vec::new(),
            baths: Vec::new(),
            created_at: String::new(),
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    /// Most recent bath by date, if any.
    pub fn last_bath(&self) -> Option<&PetBath> {
        self.baths.iter().max_by(|a, b| a.date.cmp(&b.date))
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.species)?;
        if let Some(breed) = &self.breed {
            write!(f, " - {}", breed)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetVaccine {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub vaccine_type: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PetVaccine {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            pet_id: String::new(),
            name: name.into(),
            vaccine_type: String::new(),
            date: date.into(),
            next_date: None,
            notes: None,
        }
    }

    pub fn with_next_date(mut self, next_date: impl Into<String>) -> Self {
        self.next_date = Some(next_date.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetBath {
    pub id: String,
    pub pet_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PetBath {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            pet_id: String::new(),
            date: date.into(),
            location: None,
            notes: None,
        }
    }
}

/// Partial update for a pet. Care records are edited through their own
/// operations.
#[derive(Debug, Clone, Default)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub species: Option<PetSpecies>,
    pub breed: Option<Option<String>>,
    pub birth_date: Option<Option<String>>,
    pub color: Option<String>,
    pub photo: Option<Option<String>>,
}

impl PetUpdate {
    pub(crate) fn apply(self, pet: &mut Pet) {
        if let Some(name) = self.name {
            pet.name = name;
        }
        if let Some(species) = self.species {
            pet.species = species;
        }
        if let Some(breed) = self.breed {
            pet.breed = breed;
        }
        if let Some(birth_date) = self.birth_date {
            pet.birth_date = birth_date;
        }
        if let Some(color) = self.color {
            pet.color = color;
        }
        if let Some(photo) = self.photo {
            pet.photo = photo;
        }
    }
}
