use anyhow::{bail, Result};
use inquire::{validator::StringValidator, Confirm, CustomType, Select, Text};

use shelfadmin::{
    types::{
        book::{Book, BookPayload},
        copy::CopyStatus,
        genre::{Genre, GenrePayload},
        id::Id,
    },
    view_model::detail::CopyDraft,
};

#[derive(Clone)]
struct ValidatorNonEmpty {}
impl StringValidator for ValidatorNonEmpty {
    fn validate(
        &self,
        input: &str,
    ) -> Result<inquire::validator::Validation, inquire::CustomUserError> {
        if input.trim().is_empty() {
            return Ok(inquire::validator::Validation::Invalid(
                "Empty string not allowed".into(),
            ));
        }
        Ok(inquire::validator::Validation::Valid)
    }
}

// Every prompt returns `None` when the user escapes, which cancels the form.

fn required_text(prompt: &str, initial_value: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new(prompt).with_validator(ValidatorNonEmpty {});
    if let Some(s) = initial_value {
        prompt = prompt.with_initial_value(s);
    }
    Ok(prompt.prompt_skippable()?)
}

fn optional_text(prompt: &str, initial_value: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new(prompt);
    if let Some(s) = initial_value {
        prompt = prompt.with_initial_value(s);
    }
    Ok(prompt.prompt_skippable()?)
}

fn year(prompt: &str, default: Option<i32>) -> Result<Option<i32>> {
    let mut prompt =
        CustomType::<i32>::new(prompt).with_error_message("Please type a year, e.g. 1897");
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    Ok(prompt.prompt_skippable()?)
}

fn genre(genres: &[Genre], current: Option<Id>) -> Result<Option<Id>> {
    if genres.is_empty() {
        bail!("There are no genres yet, add one with `genres add`");
    }
    let cursor = current
        .and_then(|id| genres.iter().position(|x| x.id == id))
        .unwrap_or(0);
    Ok(Select::new("Genre", genres.to_vec())
        .with_starting_cursor(cursor)
        .prompt_skippable()?
        .map(|x| x.id))
}

pub fn new_book(genres: &[Genre]) -> Result<Option<BookPayload>> {
    let Some(title) = required_text("Title", None)? else {
        return Ok(None);
    };
    let Some(author) = required_text("Author", None)? else {
        return Ok(None);
    };
    let Some(publication_year) = year("Publication year", None)? else {
        return Ok(None);
    };
    let Some(genre_id) = genre(genres, None)? else {
        return Ok(None);
    };
    Ok(Some(BookPayload {
        title,
        author,
        publication_year,
        genre_id: Some(genre_id),
    }))
}

/// Fills in an edit draft. Returns `false` if the user cancelled.
pub fn edit_book(book: &mut Book, genres: &[Genre]) -> Result<bool> {
    let Some(title) = required_text("Title", Some(&book.title))? else {
        return Ok(false);
    };
    let Some(author) = required_text("Author", Some(&book.author))? else {
        return Ok(false);
    };
    let Some(publication_year) = year("Publication year", Some(book.publication_year))? else {
        return Ok(false);
    };
    let current = book.genre_id.or(book.genre.as_ref().map(|x| x.id));
    let Some(genre_id) = genre(genres, current)? else {
        return Ok(false);
    };
    book.title = title;
    book.author = author;
    book.publication_year = publication_year;
    if Some(genre_id) != current {
        book.genre = None;
    }
    book.genre_id = Some(genre_id);
    Ok(true)
}

pub fn new_genre() -> Result<Option<GenrePayload>> {
    let Some(name) = required_text("Name", None)? else {
        return Ok(None);
    };
    let Some(description) = optional_text("Description", None)? else {
        return Ok(None);
    };
    Ok(Some(GenrePayload { name, description }))
}

pub fn edit_genre(genre: &mut Genre) -> Result<bool> {
    let Some(name) = required_text("Name", Some(&genre.name))? else {
        return Ok(false);
    };
    let Some(description) = optional_text("Description", Some(&genre.description))? else {
        return Ok(false);
    };
    genre.name = name;
    genre.description = description;
    Ok(true)
}

pub fn copy_draft(draft: &mut CopyDraft) -> Result<bool> {
    let cursor = CopyStatus::ALL
        .iter()
        .position(|x| *x == draft.status)
        .unwrap_or(0);
    let Some(status) = Select::new("Status", CopyStatus::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt_skippable()?
    else {
        return Ok(false);
    };
    let Some(location) = optional_text("Location", Some(&draft.location))? else {
        return Ok(false);
    };
    draft.status = status;
    draft.location = location;
    Ok(true)
}

pub fn confirm_delete(what: &str) -> Result<bool> {
    Ok(Confirm::new(&format!("Delete {what}? This cannot be undone"))
        .with_default(false)
        .prompt_skippable()?
        .unwrap_or(false))
}
