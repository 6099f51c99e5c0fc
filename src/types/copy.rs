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

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyStatus {
    #[default]
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "no disponible")]
    Unavailable,
}

impl CopyStatus {
    pub const ALL: [CopyStatus; 2] = [CopyStatus::Available, CopyStatus::Unavailable];
}

impl Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyStatus::Available => write!(f, "available"),
            CopyStatus::Unavailable => write!(f, "not available"),
        }
    }
}

/// A physical copy of a book.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Named)]
#[named(singular = "copy", plural = "copies")]
#[serde(rename_all = "camelCase")]
pub struct BookCopy {
    pub id:       Id,
    pub book_id:  Id,
    pub status:   CopyStatus,
    #[serde(default)]
    pub location: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPayload {
    pub book_id:  Option<Id>,
    pub status:   CopyStatus,
    pub location: String,
}

impl Validate for CopyPayload {
    fn validate(&self) -> Result<(), RequestFailure> {
        match self.book_id {
            Some(_) => Ok(()),
            None => Err(RequestFailure::invalid(
                BookCopy::NAME_SINGULAR,
                "a copy must belong to a book",
            )),
        }
    }
}

impl Resource for BookCopy {
    type Payload = CopyPayload;

    fn id(&self) -> Id {
        self.id
    }

    fn to_payload(&self) -> CopyPayload {
        CopyPayload {
            book_id:  Some(self.book_id),
            status:   self.status,
            location: self.location.clone(),
        }
    }

    /// Copies are only listed per book: `/api/copies/{bookId}`.
    fn list_path(parent: Option<Id>) -> Result<String, RequestFailure> {
        match parent {
            Some(book_id) => Ok(Self::member_path(book_id)),
            None => Err(RequestFailure::invalid(
                Self::NAME_SINGULAR,
                "copies can only be listed for a book",
            )),
        }
    }
}

impl DisplayTerminal for BookCopy {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()> {
        let status = match self.status {
            CopyStatus::Available => &config.output_copy_available,
            CopyStatus::Unavailable => &config.output_copy_unavailable,
        };
        write!(
            f,
            "{} {} {}",
            config.output_id.format_str(self.id),
            status.format_str(self.status),
            config.output_location.format_str(&self.location),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_uses_the_api_spelling() {
        assert_eq!(
            serde_json::to_string(&CopyStatus::Unavailable).unwrap(),
            r#""no disponible""#
        );
        let copy: BookCopy = serde_json::from_str(
            r#"{"id":9,"bookId":5,"status":"disponible","location":"Shelf A"}"#,
        )
        .unwrap();
        assert_eq!(copy.status, CopyStatus::Available);
        assert_eq!(copy.book_id, Id(5));
    }

    #[test]
    fn irregular_plural_drives_paths() {
        assert_eq!(BookCopy::NAME_SINGULAR, "copy");
        assert_eq!(BookCopy::collection_path(), "/api/copies");
        assert_eq!(BookCopy::list_path(Some(Id(5))).unwrap(), "/api/copies/5");
        assert!(BookCopy::list_path(None).is_err());
    }
}
