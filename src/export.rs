use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::types::{book::Book, genre::Genre};

/// One CSV row per cached book.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Export {
    #[serde(rename = "Book Id")]
    book_id:          i64,
    #[serde(rename = "Title")]
    title:            String,
    #[serde(rename = "Author")]
    author:           String,
    #[serde(rename = "Publication Year")]
    publication_year: i32,
    #[serde(rename = "Genre")]
    genre:            Option<String>,
}

impl Export {
    pub fn new(books: &[Book], genres: &[Genre]) -> Vec<Self> {
        books
            .iter()
            .map(|book| Self {
                book_id:          book.id.0,
                title:            book.title.clone(),
                author:           book.author.clone(),
                publication_year: book.publication_year,
                genre:            book.genre_name(genres).map(String::from),
            })
            .collect()
    }

    pub fn export(data: Vec<Self>, writer: impl Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in data {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::Id;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_header_and_resolves_genres() {
        let genres = vec![Genre {
            id: Id(2),
            name: "Horror".into(),
            ..Genre::default()
        }];
        let books = vec![
            Book {
                id: Id(1),
                title: "Dracula".into(),
                author: "Bram Stoker".into(),
                publication_year: 1897,
                genre_id: Some(Id(2)),
                genre: None,
            },
            Book {
                id: Id(7),
                title: "Emma, a novel".into(),
                author: "Jane Austen".into(),
                publication_year: 1815,
                genre_id: None,
                genre: None,
            },
        ];
        let mut out = Vec::new();
        Export::export(Export::new(&books, &genres), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Book Id,Title,Author,Publication Year,Genre\n\
             1,Dracula,Bram Stoker,1897,Horror\n\
             7,\"Emma, a novel\",Jane Austen,1815,\n"
        );
    }
}
