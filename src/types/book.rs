use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

use crate::{
    config::Config,
    error::RequestFailure,
    traits::*,
    types::{genre::Genre, id::Id},
};
use derives::*;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Named)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id:               Id,
    pub title:            String,
    pub author:           String,
    pub publication_year: i32,
    #[serde(default)]
    pub genre_id:         Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre:            Option<Genre>,
}

impl Book {
    /// Name of the book's genre, from the embedded record or else from `genres`.
    pub fn genre_name<'a>(&'a self, genres: &'a [Genre]) -> Option<&'a str> {
        if let Some(genre) = &self.genre {
            return Some(&genre.name);
        }
        let genre_id = self.genre_id?;
        genres
            .iter()
            .find(|x| x.id == genre_id)
            .map(|x| x.name.as_str())
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title:            String,
    pub author:           String,
    pub publication_year: i32,
    pub genre_id:         Option<Id>,
}

impl Validate for BookPayload {
    fn validate(&self) -> Result<(), RequestFailure> {
        let reason = if self.title.trim().is_empty() {
            "title must not be empty"
        } else if self.author.trim().is_empty() {
            "author must not be empty"
        } else if self.genre_id.is_none() {
            "a genre must be selected"
        } else {
            return Ok(());
        };
        Err(RequestFailure::invalid(Book::NAME_SINGULAR, reason))
    }
}

impl Resource for Book {
    type Payload = BookPayload;

    fn id(&self) -> Id {
        self.id
    }

    fn to_payload(&self) -> BookPayload {
        BookPayload {
            title:            self.title.clone(),
            author:           self.author.clone(),
            publication_year: self.publication_year,
            genre_id:         self.genre_id.or(self.genre.as_ref().map(|x| x.id)),
        }
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.author)
    }
}

impl DisplayTerminal for Book {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()> {
        write!(
            f,
            "{} {} {} {}",
            config.output_book.format_str(&self.title),
            config.output_id.format_str(self.id),
            config.output_author.format_str(&self.author),
            config.output_year.format_str(self.publication_year),
        )?;
        if let Some(genre) = &self.genre {
            write!(f, " {}", config.output_genre.format_str(&genre.name))?;
            if !genre.description.is_empty() {
                write!(f, " - {}", genre.description)?;
            }
        }
        Ok(())
    }
}
