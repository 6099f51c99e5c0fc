use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Duration;
use const_format::concatcp;
use crossterm::style::Stylize;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    client::ClientConfig, default_colors::*, view_model::DEFAULT_NOTICE_TTL_SECONDS,
};

pub const APP_NAME: &str = "shelfadmin";
pub const ENV_PREFIX: &str = "SHELFADMIN_";
pub const DEFAULT_CONFIG_LOCATION: &str = concatcp!("~/.config/", APP_NAME, "/config.toml");
pub const DEFAULT_HISTORY_LOCATION: &str = concatcp!("~/.local/share/", APP_NAME, "/history.txt");
pub const DEFAULT_BASE_URL: &str = "https://examendesarrollofinal.onrender.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    bold:   bool,
    italic: bool,
    color:  crossterm::style::Color,
}

impl StyleConfig {
    fn style(&self, s: impl ToString) -> String {
        let mut s = s.to_string().with(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        s.to_string()
    }
}

pub trait Styleable {
    fn style(&self, c: &StyleConfig) -> String;
}

impl<T> Styleable for T
where
    T: ToString + std::fmt::Display,
{
    fn style(&self, c: &StyleConfig) -> String {
        c.style(self)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color:  COLOR_WHITE,
            bold:   false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub prefix:            String,
    pub suffix:            String,
    pub description:       String,
    pub style_prefix:      StyleConfig,
    pub style_suffix:      StyleConfig,
    pub style_description: StyleConfig,
    pub style_content:     StyleConfig,
}

impl OutputConfig {
    fn frame(&self) -> (String, String, String) {
        let prefix = self.prefix.style(&self.style_prefix);
        let suffix = self.suffix.style(&self.style_suffix);
        let description = if self.description.is_empty() {
            String::new()
        } else {
            format!("{} ", self.description.style(&self.style_description))
        };
        (prefix, description, suffix)
    }

    pub fn format_str(&self, content: impl ToString) -> String {
        let (prefix, description, suffix) = self.frame();
        let content = content.to_string().style(&self.style_content);
        format!("{prefix}{description}{content}{suffix}")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix:            "[".into(),
            suffix:            "]".into(),
            description:       "".into(),
            style_prefix:      StyleConfig::default(),
            style_suffix:      StyleConfig::default(),
            style_description: StyleConfig {
                italic: true,
                ..StyleConfig::default()
            },
            style_content:     StyleConfig::default(),
        }
    }
}

/// Where the catalog API lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url:           String,
    pub auth_token:         Option<String>,
    /// Base URL per resource (keyed by plural name, e.g. `genres`).
    #[serde(default)]
    pub base_url_overrides: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url:           DEFAULT_BASE_URL.into(),
            auth_token:         None,
            base_url_overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub history_location:        PathBuf,
    pub log_level:               String,
    pub notice_ttl_seconds:      u32,
    pub api:                     ApiConfig,
    pub output_id:               OutputConfig,
    pub output_book:             OutputConfig,
    pub output_author:           OutputConfig,
    pub output_year:             OutputConfig,
    pub output_genre:            OutputConfig,
    pub output_copy_available:   OutputConfig,
    pub output_copy_unavailable: OutputConfig,
    pub output_location:         OutputConfig,
    pub output_success:          OutputConfig,
    pub output_error:            OutputConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    /// Defaults, then the TOML file, then `SHELFADMIN_*` environment variables.
    pub fn read_config(location: Option<&Path>) -> Result<Self> {
        let location = match location {
            Some(location) => location.to_path_buf(),
            None => expand_path(Path::new(DEFAULT_CONFIG_LOCATION)),
        };
        Ok(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(location))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url:           self.api.base_url.clone(),
            auth_token:         self.api.auth_token.clone(),
            base_url_overrides: self.api.base_url_overrides.clone(),
        }
    }

    /// How long a notice stays visible.
    pub fn notice_ttl(&self) -> Duration {
        Duration::seconds(i64::from(self.notice_ttl_seconds))
    }

    pub fn history_location(&self) -> PathBuf {
        expand_path(&self.history_location)
    }
}

fn expand_path(path: &Path) -> PathBuf {
    shellexpand::path::tilde(path).into_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api:                     ApiConfig::default(),
            history_location:        PathBuf::from(DEFAULT_HISTORY_LOCATION),
            log_level:               "warn".into(),
            notice_ttl_seconds:      DEFAULT_NOTICE_TTL_SECONDS,
            output_id:               OutputConfig {
                prefix: "(#".into(),
                suffix: ")".into(),
                style_content: StyleConfig {
                    color: COLOR_DIMMED,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_book:             OutputConfig {
                prefix: "".into(),
                suffix: "".into(),
                style_content: StyleConfig {
                    color: COLOR_BOOK,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_author:           OutputConfig {
                description: "Written by:".into(),
                style_content: StyleConfig {
                    color: COLOR_AUTHOR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_year:             OutputConfig {
                description: "Published:".into(),
                style_content: StyleConfig {
                    color: COLOR_YEAR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_genre:            OutputConfig {
                description: "Genre:".into(),
                style_content: StyleConfig {
                    color: COLOR_GENRE,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_copy_available:   OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_AVAILABLE,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_copy_unavailable: OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_UNAVAILABLE,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_location:         OutputConfig {
                description: "Location:".into(),
                style_content: StyleConfig {
                    color: COLOR_LOCATION,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_success:          OutputConfig {
                prefix: "".into(),
                suffix: "".into(),
                style_content: StyleConfig {
                    color: COLOR_SUCCESS,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_error:            OutputConfig {
                description: "Error".into(),
                style_content: StyleConfig {
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
        }
    }
}
