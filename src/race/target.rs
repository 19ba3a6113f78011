use std::sync::Arc;

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::TargetSpec;

/// Cookie jar scoped to a single target.
///
/// The jar is filled once while the attack is prepared. Cookies set by
/// responses are dropped so every execution of the burst presents the same
/// session state to the server.
#[derive(Debug, Default)]
pub struct TargetCookieStore {
    jar: Jar,
}

impl TargetCookieStore {
    pub(crate) fn from_pairs(url: Option<&Url>, pairs: &[(String, String)]) -> Self {
        let jar = Jar::default();
        if let Some(url) = url {
            for (name, value) in pairs {
                jar.add_cookie_str(&format!("{}={}", name, value), url);
            }
        }
        Self { jar }
    }

    /// The `Cookie` header value the jar would send to `url`.
    #[must_use]
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

impl CookieStore for TargetCookieStore {
    fn set_cookies(&self, _cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {}

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

/// A target ready to fire: the original descriptor plus everything derived
/// from it once, up front.
#[derive(Debug)]
pub struct PreparedTarget {
    pub spec: Arc<TargetSpec>,
    /// Parse failures surface per execution rather than aborting the run.
    pub url: Result<Url, url::ParseError>,
    /// Cookie, custom, and default content-type headers, in send order.
    pub headers: HeaderMap,
    pub cookie_store: Arc<TargetCookieStore>,
}
