//! Credential-injecting [`HttpClient`](super::HttpClient) decorators.

mod url_param;

pub use url_param::UrlParam;
