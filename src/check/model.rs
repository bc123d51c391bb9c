// src/check/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("check {0} has no success codes")]
    NoSuccessCodes(CheckId),

    #[error("check {id} lists invalid success code {code}")]
    InvalidSuccessCode { id: CheckId, code: u16 },

    #[error("check {id} timeout of {secs}s is outside 1..=60")]
    TimeoutOutOfRange { id: CheckId, secs: u64 },

    #[error("check {0} has an empty url")]
    EmptyUrl(CheckId),

    #[error("unsupported http method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Opaque identifier assigned by the registry that owns the check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(String);

impl CheckId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CheckId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(CheckError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = CheckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how a check probes. `url` is host plus path, without the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub protocol: Protocol,
    pub url: String,
    pub method: HttpMethod,
}

impl Endpoint {
    pub fn new(protocol: Protocol, url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            protocol,
            url: url.into(),
            method,
        }
    }

    pub fn full_url(&self) -> String {
        format!("{}://{}", self.protocol, self.url)
    }

    pub fn to_url(&self) -> Result<Url, CheckError> {
        let raw = self.full_url();
        Url::parse(&raw).map_err(|e| CheckError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.full_url())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The subject a check belongs to. Every kind resolves to a single [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Owner {
    Individual { contact: Contact },
    Organization { contact: Contact },
}

impl Owner {
    pub fn contact(&self) -> &Contact {
        match self {
            Owner::Individual { contact } | Owner::Organization { contact } => contact,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Owner::Individual { .. } => "individual",
            Owner::Organization { .. } => "organization",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    #[default]
    Unknown,
    Up,
    Down,
}

impl CheckState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckState::Unknown => "unknown",
            CheckState::Up => "up",
            CheckState::Down => "down",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub id: CheckId,
    pub name: String,
    pub endpoint: Endpoint,
    pub success_codes: Vec<u16>,
    pub timeout_seconds: u64,
    pub owner: Owner,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub state: CheckState,
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Check {
    pub fn validate(&self) -> Result<(), CheckError> {
        if self.success_codes.is_empty() {
            return Err(CheckError::NoSuccessCodes(self.id.clone()));
        }
        if let Some(&code) = self
            .success_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(CheckError::InvalidSuccessCode {
                id: self.id.clone(),
                code,
            });
        }
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_seconds) {
            return Err(CheckError::TimeoutOutOfRange {
                id: self.id.clone(),
                secs: self.timeout_seconds,
            });
        }
        if self.endpoint.url.trim().is_empty() {
            return Err(CheckError::EmptyUrl(self.id.clone()));
        }
        Ok(())
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.success_codes.contains(&status)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// A check that was never evaluated carries no timestamp.
    pub fn has_been_checked(&self) -> bool {
        self.last_checked_at.is_some()
    }

    pub fn contact(&self) -> &Contact {
        self.owner.contact()
    }
}
