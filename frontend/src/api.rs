//! API 网关
//!
//! 所有后端调用都经过 `ApiClient::request`：统一附加认证头、JSON 编解码和错误转换。
//! 各领域方法只是固定路径和动词的薄封装（端点定义见 `feedback_portal_shared::protocol`）。

use feedback_portal_shared::protocol::{
    AcknowledgeFeedbackRequest, ApiRequest, CurrentUserRequest, EditFeedbackRequest,
    GetFeedbackRequest, GetUserRequest, ListFeedbackRequest, ListManagersRequest,
    ListUsersRequest, LogoutRequest, ManagerDashboardRequest, RefreshRequest,
    TeamFeedbackRequest, TeamMembersRequest,
};
use feedback_portal_shared::{
    AuthResponse, CONTENT_TYPE_JSON, CreateFeedbackRequest, Feedback, FeedbackReply,
    HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, LoginRequest, ManagerDashboard, MessageResponse,
    RegisterRequest, UpdateFeedbackRequest, User,
};
use leptos::prelude::*;

use crate::config::{AppConfig, use_config};
use crate::error::{ApiError, ApiResult};
use crate::web::http::{FetchClient, HttpClient, HttpRequest};
use crate::web::route::{AppRoute, is_public_path};
use crate::web::router::{BrowserNavigator, Navigator, OnceNavigator};
use crate::web::storage::{KeyValueStore, LocalStorage};

/// 浏览器环境下的网关
pub type BrowserApi = ApiClient<FetchClient, LocalStorage, OnceNavigator<BrowserNavigator>>;

/// API 客户端
///
/// 通过泛型注入 HTTP 客户端、令牌存储和页面跳转，测试时替换为 Mock 实现。
#[derive(Clone, Debug)]
pub struct ApiClient<C = FetchClient, S = LocalStorage, N = OnceNavigator<BrowserNavigator>> {
    pub(crate) config: AppConfig,
    pub(crate) client: C,
    pub(crate) storage: S,
    pub(crate) navigator: N,
}

impl BrowserApi {
    pub fn browser(config: AppConfig) -> Self {
        Self::new(config, FetchClient, LocalStorage, BrowserNavigator::latched())
    }
}

impl<C: HttpClient, S: KeyValueStore, N: Navigator> ApiClient<C, S, N> {
    pub fn new(config: AppConfig, client: C, storage: S, navigator: N) -> Self {
        Self {
            config,
            client,
            storage,
            navigator,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.config.api_base_url, path)
        } else {
            format!("{}/{}", self.config.api_base_url, path)
        }
    }

    // =========================================================
    // 令牌与缓存用户
    // =========================================================

    pub fn token(&self) -> Option<String> {
        self.storage.get(&self.config.token_key)
    }

    /// 保存新令牌及缓存用户
    fn persist_session(&self, auth: &AuthResponse) {
        self.storage.set(&self.config.token_key, &auth.token);
        match serde_json::to_string(&auth.user) {
            Ok(json) => {
                self.storage.set(&self.config.user_key, &json);
            }
            Err(e) => log_warn!("[Api] Failed to cache user: {}", e),
        }
    }

    /// 清除令牌及缓存用户
    pub fn clear_session(&self) {
        self.storage.delete(&self.config.token_key);
        self.storage.delete(&self.config.user_key);
    }

    /// 读取缓存用户，内容损坏时视为不存在
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.storage.get(&self.config.user_key)?;
        serde_json::from_str(&raw).ok()
    }

    /// 401：清理会话并跳转登录页（已在登录 / 注册页时不跳转，避免循环）
    fn handle_unauthorized(&self) {
        self.clear_session();
        let path = self.navigator.current_path();
        if !is_public_path(&path) {
            self.navigator
                .redirect(&AppRoute::auth_failure_redirect().to_path());
        }
    }

    // =========================================================
    // 通用请求
    // =========================================================

    /// 发送请求并解码响应
    pub async fn request<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);

        if let Some(token) = self.token() {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ApiError::encode(e.to_string()))?;
            http = http.with_body(body);
        }

        let resp = self.client.send(http).await.map_err(|e| {
            log_error!("[Api] {} {} failed: {}", R::METHOD.as_str(), path, e);
            ApiError::from(e)
        })?;

        if resp.status == 401 {
            self.handle_unauthorized();
        }

        if !resp.ok() {
            let err = ApiError::from_response(resp.status, &resp.body);
            log_warn!(
                "[Api] {} {} -> {}: {}",
                R::METHOD.as_str(),
                path,
                resp.status,
                err
            );
            return Err(err);
        }

        resp.json::<R::Response>()
            .map_err(|e| ApiError::decode(format!("Unexpected response from {}: {}", path, e)))
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 登录成功后保存令牌与缓存用户
    pub async fn login(&self, email: String, password: String) -> ApiResult<AuthResponse> {
        let auth = self.request(&LoginRequest { email, password }).await?;
        self.persist_session(&auth);
        Ok(auth)
    }

    pub async fn signup(&self, req: RegisterRequest) -> ApiResult<MessageResponse> {
        self.request(&req).await
    }

    /// 用已保存的令牌换取新令牌
    pub async fn refresh(&self) -> ApiResult<AuthResponse> {
        let auth = self.request(&RefreshRequest::default()).await?;
        self.persist_session(&auth);
        Ok(auth)
    }

    /// 通知后端注销；无论成败都清除本地会话
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.request(&LogoutRequest::default()).await.map(|_| ());
        self.clear_session();
        result
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.request(&CurrentUserRequest).await
    }

    // =========================================================
    // 用户
    // =========================================================

    pub async fn team_members(&self) -> ApiResult<Vec<User>> {
        self.request(&TeamMembersRequest).await
    }

    pub async fn all_users(&self) -> ApiResult<Vec<User>> {
        self.request(&ListUsersRequest).await
    }

    pub async fn managers(&self) -> ApiResult<Vec<User>> {
        self.request(&ListManagersRequest).await
    }

    pub async fn user(&self, user_id: &str) -> ApiResult<User> {
        self.request(&GetUserRequest {
            user_id: user_id.to_string(),
        })
        .await
    }

    pub async fn manager_dashboard(&self) -> ApiResult<ManagerDashboard> {
        self.request(&ManagerDashboardRequest).await
    }

    // =========================================================
    // 反馈
    // =========================================================

    pub async fn my_feedback(&self) -> ApiResult<Vec<Feedback>> {
        self.request(&ListFeedbackRequest).await
    }

    pub async fn feedback_by_id(&self, feedback_id: &str) -> ApiResult<Feedback> {
        self.request(&GetFeedbackRequest {
            feedback_id: feedback_id.to_string(),
        })
        .await
    }

    pub async fn team_feedback(&self) -> ApiResult<Vec<Feedback>> {
        self.request(&TeamFeedbackRequest).await
    }

    pub async fn create_feedback(&self, req: CreateFeedbackRequest) -> ApiResult<FeedbackReply> {
        self.request(&req).await
    }

    pub async fn update_feedback(
        &self,
        feedback_id: &str,
        update: UpdateFeedbackRequest,
    ) -> ApiResult<FeedbackReply> {
        self.request(&EditFeedbackRequest {
            feedback_id: feedback_id.to_string(),
            update,
        })
        .await
    }

    pub async fn acknowledge_feedback(&self, feedback_id: &str) -> ApiResult<FeedbackReply> {
        self.request(&AcknowledgeFeedbackRequest {
            feedback_id: feedback_id.to_string(),
        })
        .await
    }
}

/// 获取浏览器网关（存放于 StoredValue，便于在多个闭包间共享）
pub fn use_api() -> StoredValue<BrowserApi> {
    StoredValue::new(BrowserApi::browser(use_config()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiErrorStatus;
    use crate::web::http::MockHttpClient;
    use crate::web::storage::MemoryStorage;
    use feedback_portal_shared::protocol::HttpMethod;
    use feedback_portal_shared::{Role, Sentiment};
    use serde_json::json;
    use std::cell::RefCell;
    use std::sync::atomic::AtomicBool;

    pub const BASE: &str = "http://api.test";

    /// 记录跳转；`at` 创建的导航器跳转后 current_path 随之改变
    pub struct MockNavigator {
        path: RefCell<String>,
        follow: bool,
        pub redirects: RefCell<Vec<String>>,
    }

    impl MockNavigator {
        pub fn at(path: &str) -> Self {
            Self {
                path: RefCell::new(path.to_string()),
                follow: true,
                redirects: RefCell::new(Vec::new()),
            }
        }

        /// 跳转提交前的浏览器：路径保持不变
        pub fn pinned(path: &str) -> Self {
            Self {
                follow: false,
                ..Self::at(path)
            }
        }
    }

    impl Navigator for MockNavigator {
        fn current_path(&self) -> String {
            self.path.borrow().clone()
        }

        fn redirect(&self, path: &str) {
            self.redirects.borrow_mut().push(path.to_string());
            if self.follow {
                *self.path.borrow_mut() = path.to_string();
            }
        }
    }

    pub type TestApi = ApiClient<MockHttpClient, MemoryStorage, MockNavigator>;

    pub fn test_api(path: &str, storage: MemoryStorage) -> TestApi {
        ApiClient::new(
            AppConfig::new(BASE),
            MockHttpClient::new(),
            storage,
            MockNavigator::at(path),
        )
    }

    pub fn user_json(id: &str, role: &str) -> serde_json::Value {
        json!({"id": id, "name": "Jane Doe", "email": "jane@corp.io", "role": role})
    }

    fn feedback_json(id: &str, ack: bool) -> serde_json::Value {
        json!({
            "id": id, "manager_id": "m1", "employee_id": "e1",
            "strengths": "clear writing", "improvements": "estimates",
            "sentiment": "positive", "created_at": "2024-05-01T08:00:00.000123",
            "acknowledged": ack
        })
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let api = test_api("/login", MemoryStorage::default());
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/login"),
            200,
            json!({"user": user_json("u1", "manager"), "token": "tok-1"}),
        );

        let auth = api.login("jane@corp.io".into(), "pw".into()).await.unwrap();

        assert_eq!(auth.user.role, Role::Manager);
        assert_eq!(api.storage.get("authToken").as_deref(), Some("tok-1"));
        assert_eq!(api.cached_user(), Some(auth.user));

        let sent = api.client.last_request().unwrap();
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        assert_eq!(sent.header("Authorization"), None);
        assert_eq!(
            sent.body.as_deref(),
            Some(r#"{"email":"jane@corp.io","password":"pw"}"#)
        );
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_omits_body_on_get() {
        let api = test_api("/", MemoryStorage::with("authToken", "tok-9"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/e1"),
            200,
            user_json("e1", "employee"),
        );

        let user = api.user("e1").await.unwrap();

        assert_eq!(user.id, "e1");
        let sent = api.client.last_request().unwrap();
        assert_eq!(sent.header("authorization"), Some("Bearer tok-9"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let api = test_api("/signup", MemoryStorage::default());
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/register"),
            400,
            json!({"detail": "Email already exists"}),
        );

        let err = api
            .signup(RegisterRequest {
                name: "Jane".into(),
                email: "jane@corp.io".into(),
                password: "secret1".into(),
                role: Role::Manager,
                manager_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already exists");
        assert!(api.navigator.redirects.borrow().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_redirects_once() {
        let storage = MemoryStorage::with("authToken", "stale");
        storage.set("currentUser", &user_json("u1", "employee").to_string());
        let api = test_api("/feedback/history/u1", storage);
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback"),
            401,
            json!({"detail": "Invalid token"}),
        );

        let first = api.my_feedback().await.unwrap_err();
        let second = api.my_feedback().await.unwrap_err();

        assert!(first.is_unauthorized());
        assert_eq!(second.status, ApiErrorStatus::Unauthorized);
        assert_eq!(api.token(), None);
        assert_eq!(api.cached_user(), None);
        assert_eq!(*api.navigator.redirects.borrow(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_unauthorized_requests_redirect_once() {
        static FIRED: AtomicBool = AtomicBool::new(false);
        let api = ApiClient::new(
            AppConfig::new(BASE),
            MockHttpClient::new(),
            MemoryStorage::with("authToken", "stale"),
            OnceNavigator::new(MockNavigator::pinned("/"), &FIRED),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback"),
            401,
            json!({"detail": "Invalid token"}),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/e1"),
            401,
            json!({"detail": "Invalid token"}),
        );

        let (feedback, user) = futures::join!(api.my_feedback(), api.user("e1"));

        assert!(feedback.unwrap_err().is_unauthorized());
        assert!(user.unwrap_err().is_unauthorized());
        assert_eq!(api.navigator.current_path(), "/");
        assert_eq!(
            *api.navigator.inner().redirects.borrow(),
            vec!["/login".to_string()]
        );
    }

    #[tokio::test]
    async fn unauthorized_on_public_pages_does_not_redirect() {
        for page in ["/login", "/signup"] {
            let api = test_api(page, MemoryStorage::default());
            api.client.mock_response(
                HttpMethod::Post,
                &format!("{BASE}/login"),
                401,
                json!({"detail": "Invalid credentials"}),
            );

            let err = api.login("a@b.co".into(), "nope".into()).await.unwrap_err();

            assert_eq!(err.message(), "Invalid credentials");
            assert!(api.navigator.redirects.borrow().is_empty(), "{page}");
        }
    }

    #[tokio::test]
    async fn user_directory_and_managers_are_listed() {
        let api = test_api("/signup", MemoryStorage::default());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users"),
            200,
            json!([user_json("m1", "manager"), user_json("e1", "employee")]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/managers"),
            200,
            json!([user_json("m1", "manager")]),
        );

        let users = api.all_users().await.unwrap();
        let managers = api.managers().await.unwrap();

        assert_eq!(users.len(), 2);
        assert!(managers.iter().all(User::is_manager));
        let sent = api.client.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, format!("{BASE}/managers"));
    }

    #[tokio::test]
    async fn logout_clears_storage_even_when_request_fails() {
        let storage = MemoryStorage::with("authToken", "tok");
        storage.set("currentUser", "{}");
        let api = test_api("/", storage);
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/auth/logout"),
            404,
            json!({"detail": "Not Found"}),
        );

        assert!(api.logout().await.is_err());
        assert_eq!(api.token(), None);
        assert_eq!(api.storage.get("currentUser"), None);
    }

    #[tokio::test]
    async fn network_failure_maps_to_network_error() {
        let api = test_api("/", MemoryStorage::default());
        let err = api.team_members().await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Network);
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let api = test_api("/", MemoryStorage::default());
        api.client
            .mock_raw(HttpMethod::Get, &format!("{BASE}/dashboard"), 200, "not json");

        let err = api.manager_dashboard().await.unwrap_err();
        assert_eq!(err.status, ApiErrorStatus::Decode);
    }

    #[tokio::test]
    async fn feedback_mutations_use_fixed_verbs_and_paths() {
        let api = test_api("/", MemoryStorage::with("authToken", "tok"));
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/feedback"),
            200,
            json!({"id": "f1"}),
        );
        api.client.mock_response(
            HttpMethod::Patch,
            &format!("{BASE}/feedback/f1"),
            200,
            json!({"msg": "Updated"}),
        );
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/feedback/ack"),
            200,
            feedback_json("f1", true),
        );

        let created = api
            .create_feedback(CreateFeedbackRequest {
                employee_id: "e1".into(),
                strengths: "s".into(),
                improvements: "i".into(),
                sentiment: Sentiment::Neutral,
            })
            .await
            .unwrap();
        assert_eq!(created, FeedbackReply::Created { id: "f1".into() });

        let updated = api
            .update_feedback(
                "f1",
                UpdateFeedbackRequest {
                    strengths: Some("better".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.into_feedback().is_none());
        let patch = api.client.last_request().unwrap();
        assert_eq!(patch.body.as_deref(), Some(r#"{"strengths":"better"}"#));

        let acked = api.acknowledge_feedback("f1").await.unwrap();
        assert!(acked.into_feedback().unwrap().acknowledged);
        let ack = api.client.last_request().unwrap();
        assert_eq!(ack.body.as_deref(), Some(r#"{"feedback_id":"f1"}"#));
    }
}
