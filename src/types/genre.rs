use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

use crate::{
    config::Config,
    error::RequestFailure,
    traits::*,
    types::id::Id,
};
use derives::*;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Named)]
pub struct Genre {
    pub id:          Id,
    pub name:        String,
    #[serde(default)]
    pub description: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenrePayload {
    pub name:        String,
    pub description: String,
}

impl Validate for GenrePayload {
    fn validate(&self) -> Result<(), RequestFailure> {
        if self.name.trim().is_empty() {
            return Err(RequestFailure::invalid(
                Genre::NAME_SINGULAR,
                "name must not be empty",
            ));
        }
        Ok(())
    }
}

impl Resource for Genre {
    type Payload = GenrePayload;

    fn id(&self) -> Id {
        self.id
    }

    fn to_payload(&self) -> GenrePayload {
        GenrePayload {
            name:        self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Plain name, used by selection prompts.
impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl DisplayTerminal for Genre {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()> {
        write!(
            f,
            "{} {}",
            config.output_genre.format_str(&self.name),
            config.output_id.format_str(self.id)
        )?;
        if !self.description.is_empty() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_paths() {
        assert_eq!(Genre::NAME_SINGULAR, "genre");
        assert_eq!(Genre::collection_path(), "/api/genres");
        assert_eq!(Genre::member_path(Id(4)), "/api/genres/4");
    }

    #[test]
    fn description_is_optional_on_the_wire() {
        let genre: Genre = serde_json::from_str(r#"{"id":3,"name":"Horror"}"#).unwrap();
        assert_eq!(genre.description, "");
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = GenrePayload {
            name:        "  ".into(),
            description: "whatever".into(),
        };
        assert!(matches!(
            payload.validate(),
            Err(RequestFailure::Invalid { resource: "genre", .. })
        ));
    }
}
