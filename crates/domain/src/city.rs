use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, ValueObject};

/// City a pickup point may be opened in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Kazan,
    Moscow,
    SaintPetersburg,
}

impl City {
    pub const ALL: [City; 3] = [City::Kazan, City::Moscow, City::SaintPetersburg];

    pub fn id(self) -> i16 {
        match self {
            City::Kazan => 1,
            City::Moscow => 2,
            City::SaintPetersburg => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            City::Kazan => "Казань",
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> DomainResult<Self> {
        let wanted = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name().to_lowercase() == wanted)
            .ok_or(DomainError::UnknownCity)
    }
}

impl ValueObject for City {}

impl core::fmt::Display for City {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
