//! Clients for the external platform collaborators
//!
//! The platform provides three capabilities this service builds on:
//! - an identity API that exchanges bearer tokens for identities,
//! - a relational store API with row filters expressed as query parameters,
//! - an object storage API for uploaded document files.
//!
//! All three share one pooled HTTP client. Authentication state is never
//! stored on a client: every call takes a [`Credential`] naming the caller,
//! so concurrent requests with different tokens cannot interfere.

pub mod identity;
pub mod storage;
pub mod store;

use crate::config::PlatformConfig;
use crate::errors::Result;

pub use identity::IdentityClient;
pub use storage::BlobClient;
pub use store::StoreClient;

/// Request-scoped credential attached to a platform call.
#[derive(Debug, Clone)]
pub enum Credential {
    /// The minimal-privilege anonymous key. Used by public code paths only.
    Anon,
    /// The caller's bearer token, forwarded verbatim.
    User(String),
}

impl Credential {
    /// The bearer value to send for this credential.
    pub(crate) fn bearer<'a>(&'a self, anon_key: &'a str) -> &'a str {
        match self {
            Credential::Anon => anon_key,
            Credential::User(token) => token.as_str(),
        }
    }
}

/// Shared handle to the platform's identity, store, and blob capabilities.
#[derive(Clone)]
pub struct Platform {
    pub identity: IdentityClient,
    pub store: StoreClient,
    pub blobs: BlobClient,
}

impl Platform {
    /// Build the platform clients from configuration.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            identity: IdentityClient::new(http.clone(), config),
            store: StoreClient::new(http.clone(), config),
            blobs: BlobClient::new(http, config),
        })
    }
}
