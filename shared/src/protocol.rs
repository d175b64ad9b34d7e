use crate::{
    AuthResponse, CreateFeedbackRequest, Feedback, FeedbackReply, LoginRequest, ManagerDashboard,
    MessageResponse, RegisterRequest, UpdateFeedbackRequest, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether the request value is serialized into the body.
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters are carried as `#[serde(skip)]` fields so they never leak into the body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the API base.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/login".to_string()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/register".to_string()
    }
}

/// Exchange the stored token for a fresh one
#[derive(Debug, Default, Serialize)]
pub struct RefreshRequest {}

impl ApiRequest for RefreshRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/refresh".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct LogoutRequest {}

impl ApiRequest for LogoutRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/logout".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/auth/me".to_string()
    }
}

// =========================================================
// Users
// =========================================================

/// Employees reporting to the current manager
#[derive(Debug, Default, Serialize)]
pub struct TeamMembersRequest;

impl ApiRequest for TeamMembersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/team".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/users".to_string()
    }
}

/// Managers selectable during signup
#[derive(Debug, Default, Serialize)]
pub struct ListManagersRequest;

impl ApiRequest for ListManagersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/managers".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct GetUserRequest {
    #[serde(skip)]
    pub user_id: String,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/users/{}", self.user_id)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ManagerDashboardRequest;

impl ApiRequest for ManagerDashboardRequest {
    type Response = ManagerDashboard;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/dashboard".to_string()
    }
}

// =========================================================
// Feedback
// =========================================================

/// Feedback visible to the caller: received (employee) or written (manager)
#[derive(Debug, Default, Serialize)]
pub struct ListFeedbackRequest;

impl ApiRequest for ListFeedbackRequest {
    type Response = Vec<Feedback>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/feedback".to_string()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TeamFeedbackRequest;

impl ApiRequest for TeamFeedbackRequest {
    type Response = Vec<Feedback>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/feedback/team".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct GetFeedbackRequest {
    #[serde(skip)]
    pub feedback_id: String,
}

impl ApiRequest for GetFeedbackRequest {
    type Response = Feedback;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/feedback/{}", self.feedback_id)
    }
}

impl ApiRequest for CreateFeedbackRequest {
    type Response = FeedbackReply;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/feedback".to_string()
    }
}

/// PATCH wrapper pairing the target id with the partial update body
#[derive(Debug, Serialize)]
pub struct EditFeedbackRequest {
    #[serde(skip)]
    pub feedback_id: String,
    #[serde(flatten)]
    pub update: UpdateFeedbackRequest,
}

impl ApiRequest for EditFeedbackRequest {
    type Response = FeedbackReply;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/feedback/{}", self.feedback_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcknowledgeFeedbackRequest {
    pub feedback_id: String,
}

impl ApiRequest for AcknowledgeFeedbackRequest {
    type Response = FeedbackReply;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/feedback/ack".to_string()
    }
}
