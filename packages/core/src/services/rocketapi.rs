use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Source of current follower counts.
///
/// One call is one attempt; retrying is the caller's concern.
#[async_trait]
pub trait FollowerCountProvider {
    async fn fetch_follower_count(&self, username: &str) -> Result<i64, ProviderError>;

    /// Name of this provider for logging.
    fn provider_name(&self) -> &str;
}

#[derive(Clone)]
pub struct RocketApiClient {
    base_url: String,
    token: String,
    http: Client,
}

impl RocketApiClient {
    pub fn new(base_url: String, token: String, http: Client) -> Self {
        Self {
            base_url,
            token,
            http,
        }
    }
}

#[derive(Debug, Serialize)]
struct UserInfoRequest<'a> {
    username: &'a str,
}

// response.body.data.user.edge_followed_by.count
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    response: UserInfoEnvelope,
}

#[derive(Debug, Deserialize)]
struct UserInfoEnvelope {
    body: UserInfoBody,
}

#[derive(Debug, Deserialize)]
struct UserInfoBody {
    data: UserInfoData,
}

#[derive(Debug, Deserialize)]
struct UserInfoData {
    user: InstagramUser,
}

#[derive(Debug, Deserialize)]
struct InstagramUser {
    edge_followed_by: EdgeCount,
}

#[derive(Debug, Deserialize)]
struct EdgeCount {
    count: i64,
}

#[async_trait]
impl FollowerCountProvider for RocketApiClient {
    async fn fetch_follower_count(&self, username: &str) -> Result<i64, ProviderError> {
        let url = format!("{}/instagram/user/get_info", self.base_url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .json(&UserInfoRequest { username })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let info = response
            .json::<UserInfoResponse>()
            .await
            .map_err(|err| ProviderError::Format {
                message: format!("Unexpected user info for {}: {}", username, err.without_url()),
            })?;

        Ok(info.response.body.data.user.edge_followed_by.count)
    }

    fn provider_name(&self) -> &str {
        "RocketAPI"
    }
}
