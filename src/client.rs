//! HTTP client for the paywall backend.
//!
//! Fetches the plan price list and the session status. Provides both async
//! and blocking variants behind feature flags.

/// Plan list endpoint path.
const PLANS_PATH: &str = "/api/plans";

/// Session status endpoint path.
const SESSION_PATH: &str = "/api/session";

/// Generates a backend client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug, Default)]
        pub struct $builder {
            /// Backend base URL.
            base_url: Option<String>,
            /// Session token sent as a bearer token.
            session_token: Option<SecretString>,
        }

        impl $builder {
            /// Sets the backend base URL (e.g. `https://app.example.com`).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the session token used to authenticate requests.
            #[inline]
            #[must_use]
            pub fn session_token<T: Into<String>>(mut self, token: T) -> Self {
                self.session_token = Some(SecretString::from(token.into()));
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`PixError::Config`] if no base URL was provided.
            /// Returns [`PixError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| PixError::Config("backend base URL is required".to_owned()))?
                    .trim_end_matches('/')
                    .to_owned();
                tracing::debug!(base_url = %base_url, "building backend client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    base_url,
                    session_token: self.session_token,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Backend base URL without a trailing slash.
            base_url: String,
            /// Optional bearer session token.
            session_token: Option<SecretString>,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Fetches the paywall price list via `/api/plans`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn plans(&self) -> Result<Vec<Plan>> {
                tracing::debug!("fetching plan list");
                let list: PlanList = self.get_json(PLANS_PATH) $( .$await_ext )? ?;
                Ok(list.plans)
            }

            /// Fetches the logged-in user's status via `/api/session`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn session(&self) -> Result<SessionStatus> {
                tracing::debug!("fetching session status");
                self.get_json(SESSION_PATH) $( .$await_ext )?
            }

            /// Sends a GET request and deserializes the JSON response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn get_json<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending GET request");
                let mut request = self.http.get(&url).header(ACCEPT, "application/json");
                if let Some(token) = self.session_token.as_ref() {
                    request = request.bearer_auth(token.expose_secret());
                }
                let response: $resp_type = request.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(PixError::from)
                } else {
                    let message = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_else(|_| "unknown error".to_owned());
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(PixError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_requires_base_url() {
                let result = $client::builder().build();
                assert!(matches!(result, Err(PixError::Config(_))));
            }

            #[test]
            fn builder_rejects_blank_base_url() {
                let result = $client::builder().base_url("  ").build();
                assert!(matches!(result, Err(PixError::Config(_))));
            }

            #[test]
            fn builder_trims_trailing_slash() {
                let client = $client::builder()
                    .base_url("http://localhost:8080/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url, "http://localhost:8080");
                assert!(client.session_token.is_none());
            }

            #[test]
            fn builder_keeps_session_token() {
                let client = $client::builder()
                    .base_url("http://localhost:8080")
                    .session_token("s3cr3t")
                    .build()
                    .unwrap();
                let token = client.session_token.as_ref().unwrap();
                assert_eq!(token.expose_secret(), "s3cr3t");
                assert!(!format!("{client:?}").contains("s3cr3t"));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the paywall backend.

    use reqwest::header::ACCEPT;
    use secrecy::{ExposeSecret, SecretString};

    use super::{PLANS_PATH, SESSION_PATH};
    use crate::error::{PixError, Result};
    use crate::models::{Plan, PlanList, SessionStatus};

    define_client! {
        client_name: PixBackendClient,
        builder_name: PixBackendClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the paywall backend.\n\nUse [`PixBackendClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PixBackendClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the paywall backend.

    use reqwest::header::ACCEPT;
    use secrecy::{ExposeSecret, SecretString};

    use super::{PLANS_PATH, SESSION_PATH};
    use crate::error::{PixError, Result};
    use crate::models::{Plan, PlanList, SessionStatus};

    define_client! {
        client_name: PixBackendBlockingClient,
        builder_name: PixBackendBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the paywall backend.\n\nUse [`PixBackendBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PixBackendBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{PixBackendClient, PixBackendClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{PixBackendBlockingClient, PixBackendBlockingClientBuilder};
