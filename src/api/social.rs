use validator::Validate;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::social::AddCommentRequest;
use crate::models::{Comment, FlowAddress, Page};

impl ApiClient {
    /// Лайк / снятие лайка. `moment_id` - ID в базе, не on-chain.
    pub async fn toggle_like(&self, moment_id: i64, user: &FlowAddress) -> Result<serde_json::Value, ApiError> {
        self.post_params(&format!("/moments/{}/like", moment_id), &[("user", user.to_string())])
            .await
    }

    pub async fn add_comment(
        &self,
        moment_id: i64,
        user: &FlowAddress,
        content: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let request = AddCommentRequest {
            user_address: user.to_string(),
            content: content.trim().to_string(),
        };
        request.validate()?;

        self.post_json(&format!("/moments/{}/comments", moment_id), &request).await
    }

    pub async fn comments(&self, moment_id: i64) -> Result<Page<Comment>, ApiError> {
        self.get(&format!("/moments/{}/comments", moment_id), &[]).await
    }
}
