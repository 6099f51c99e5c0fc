use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearchStatus, PromptViMode};

use shelfadmin::config::ApiConfig;

fn host_of(url: &str) -> &str {
    url.split("://").last().unwrap_or(url).trim_end_matches('/')
}

/// Shows the API host on the right so it is clear which catalog is edited.
/// Resources served from another host are listed as `resource@host`.
pub struct ShelfPrompt {
    pub host: String,
}

impl ShelfPrompt {
    pub fn new(api: &ApiConfig) -> Self {
        let mut host = host_of(&api.base_url).to_string();
        for (resource, url) in &api.base_url_overrides {
            host.push_str(&format!(" {resource}@{}", host_of(url)));
        }
        Self { host }
    }
}

impl Prompt for ShelfPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<str> {
        Cow::Owned("shelfadmin ".into())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<str> {
        Cow::Borrowed(&self.host)
    }

    fn render_prompt_indicator(
        &self,
        prompt_mode: reedline::PromptEditMode,
    ) -> std::borrow::Cow<str> {
        match prompt_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                PromptViMode::Normal => "> ".into(),
                PromptViMode::Insert => "> ".into(),
            },
            PromptEditMode::Custom(str) => format!("({})", str).into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<str> {
        Cow::Borrowed(":> ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: reedline::PromptHistorySearch,
    ) -> std::borrow::Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}
