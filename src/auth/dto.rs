use serde::{Deserialize, Serialize};

/// Identity payload posted to `/jwt`. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// Response for token issue and logout.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
