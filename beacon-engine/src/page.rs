//! Immutable snapshot of the host page the engine is instrumenting.
//!
//! The host shell builds one `PageContext` per page load and hands it to
//! the engine; nothing here changes afterwards, so it can be shared
//! freely behind an `Arc`.

use url::Url;

use crate::util;
use beacon_types::UserInfo;

/// Agent facts reported by the host.
#[derive(Debug, Clone)]
pub struct AgentInfo {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
    pub cookie_enabled: bool,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for AgentInfo {
    fn default() -> Self {
        Self {
            user_agent: "beacon-engine".to_string(),
            language: "en-US".to_string(),
            platform: std::env::consts::OS.to_string(),
            cookie_enabled: true,
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageContext {
    url: Url,
    title: String,
    referrer: String,
    body_classes: Vec<String>,
    agent: AgentInfo,
}

impl PageContext {
    pub fn new(url: Url, title: impl Into<String>) -> Self {
        Self {
            url,
            title: title.into(),
            referrer: String::new(),
            body_classes: Vec::new(),
            agent: AgentInfo::default(),
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn with_body_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.body_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_agent(mut self, agent: AgentInfo) -> Self {
        self.agent = agent;
        self
    }

    /// Full page URL, as tracked on every event.
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.iter().any(|c| c == class)
    }

    /// Agent snapshot stamped with the current time.
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            user_agent: self.agent.user_agent.clone(),
            language: self.agent.language.clone(),
            platform: self.agent.platform.clone(),
            cookie_enabled: self.agent.cookie_enabled,
            screen_resolution: format!("{}x{}", self.agent.screen_width, self.agent.screen_height),
            timestamp: util::now_iso(),
        }
    }
}
