use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::{config::Config, error::RequestFailure, types::id::Id};

pub const API_PREFIX: &str = "/api";

pub trait Named {
    const NAME_SINGULAR: &'static str;
    const NAME_PLURAL: &'static str;
}

pub trait Validate {
    fn validate(&self) -> Result<(), RequestFailure>;
}

/// A remote-owned record with its own REST endpoints.
pub trait Resource: Named + Clone + Debug + Serialize + DeserializeOwned {
    /// Body sent on create and update.
    type Payload: Serialize + Debug + Validate;

    fn id(&self) -> Id;

    fn to_payload(&self) -> Self::Payload;

    fn collection_path() -> String {
        format!("{API_PREFIX}/{}", Self::NAME_PLURAL)
    }

    fn member_path(id: Id) -> String {
        format!("{}/{id}", Self::collection_path())
    }

    /// Path listed by `list`. Resources scoped to a parent override this.
    fn list_path(_parent: Option<Id>) -> Result<String, RequestFailure> {
        Ok(Self::collection_path())
    }
}

pub trait DisplayTerminal {
    fn fmt(&self, f: &mut String, config: &Config) -> anyhow::Result<()>;

    fn fmt_to_string(&self, config: &Config) -> anyhow::Result<String> {
        let mut s = String::new();
        DisplayTerminal::fmt(self, &mut s, config)?;
        Ok(s)
    }
}
