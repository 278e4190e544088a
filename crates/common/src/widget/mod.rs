//! Widget domain authorization
//!
//! The public widget endpoint authorizes requests by where they come from,
//! not by who sends them: the embedding page's hostname (from `Origin`, or
//! `Referer` when the origin is opaque) must match the chatbot's configured
//! allowed domain exactly. Domain restriction is opt-in; an unset domain
//! serves every site.
//!
//! Matching is deliberately narrow: a single leading `www.` is stripped and
//! nothing else is normalized — no port handling, no scheme checks, no
//! wildcard or subdomain matching.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{AppError, Result};

/// The store columns the widget lookup reads.
///
/// `allowed_domain` is consumed by the authorization decision and never
/// serialized back out; everything else feeds the public projection.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetRecord {
    pub name: String,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub show_avatar: Option<bool>,
    #[serde(default)]
    pub enable_typing: Option<bool>,
    #[serde(default)]
    pub allowed_domain: Option<String>,
    #[serde(default)]
    pub initial_messages: Option<Vec<String>>,
}

/// The public widget configuration projection.
///
/// Contains exactly what the embeddable client needs to render itself —
/// no owner id, no analytics, no domain restriction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub name: String,
    pub greeting: Option<String>,
    pub placeholder: Option<String>,
    pub primary_color: Option<String>,
    pub position: Option<String>,
    pub size: Option<String>,
    pub show_avatar: Option<bool>,
    pub enable_typing: Option<bool>,
    pub initial_messages: Vec<String>,
}

impl WidgetRecord {
    pub fn into_config(self) -> WidgetConfig {
        WidgetConfig {
            name: self.name,
            greeting: self.greeting,
            placeholder: self.placeholder,
            primary_color: self.primary_color,
            position: self.position,
            size: self.size,
            show_avatar: self.show_avatar,
            enable_typing: self.enable_typing,
            initial_messages: self.initial_messages.unwrap_or_default(),
        }
    }
}

/// Resolve the requesting page's domain from the `Origin`/`Referer` headers.
///
/// `Origin` wins unless it is absent or the literal string `"null"` (opaque
/// origins, e.g. sandboxed iframes), in which case `Referer` is required.
/// Neither header present fails with `BadRequest`. An unparseable source URL
/// yields `Ok(None)`: an unusable domain, which only matters once a
/// restriction is configured.
pub fn request_domain(origin: Option<&str>, referer: Option<&str>) -> Result<Option<String>> {
    let source = match origin {
        Some(origin) if origin != "null" => origin,
        _ => referer.ok_or_else(|| AppError::BadRequest {
            message: "Origin or Referer header is required.".to_string(),
        })?,
    };

    let domain = Url::parse(source).ok().and_then(|url| {
        url.host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
    });

    Ok(domain)
}

/// Decide whether a request domain may load a chatbot's widget.
///
/// An empty or whitespace-only configured domain means the restriction is
/// off. Otherwise the request domain must be present and exactly equal to
/// the trimmed configured value.
pub fn domain_allowed(request_domain: Option<&str>, allowed_domain: Option<&str>) -> bool {
    match allowed_domain.map(str::trim) {
        None | Some("") => true,
        Some(allowed) => request_domain == Some(allowed),
    }
}
