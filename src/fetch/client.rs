use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a single HTTP request.
///
/// Decorators such as [`super::Retry`] and [`super::auth::UrlParam`] wrap an
/// inner client and implement this trait themselves, so policies compose at
/// construction time.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
