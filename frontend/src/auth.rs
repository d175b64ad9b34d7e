//! 认证模块
//!
//! 管理当前用户（会话），与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。
//! Bearer 令牌与缓存用户保存在 LocalStorage，由 `ApiClient` 读写。

use feedback_portal_shared::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiClient, BrowserApi};
use crate::config::AppConfig;
use crate::web::http::HttpClient;
use crate::web::router::Navigator;
use crate::web::storage::{KeyValueStore, LocalStorage};

/// 认证状态
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    /// 当前用户（未登录时为 None）
    pub current_user: Option<User>,
    /// 是否正在恢复会话
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_manager(&self) -> bool {
        self.current_user.as_ref().is_some_and(User::is_manager)
    }

    /// 经理可查看任意历史，员工只能查看自己的
    pub fn can_view_history(&self, employee_id: &str) -> bool {
        match &self.current_user {
            Some(user) => user.is_manager() || user.id == employee_id,
            None => false,
        }
    }

    /// 设置当前用户
    pub fn login_user(&mut self, user: User) {
        self.current_user = Some(user);
    }

    /// 清除当前用户及持久化的令牌
    pub fn logout_user(&mut self, storage: &impl KeyValueStore, config: &AppConfig) {
        self.current_user = None;
        storage.delete(&config.token_key);
        storage.delete(&config.user_key);
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::is_authenticated))
    }

    /// 会话恢复完成信号（用于路由服务注入）
    pub fn is_ready_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || !state.with(|s| s.is_loading))
    }

    pub fn login_user(&self, user: User) {
        log_info!("[Auth] Signed in as {} ({}).", user.email, user.role.as_str());
        self.set_state.update(|state| state.login_user(user));
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的认证状态监听自动处理。
    pub fn logout_user(&self, config: &AppConfig) {
        self.set_state
            .update(|state| state.logout_user(&LocalStorage, config));
        log_info!("[Auth] Signed out.");
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 恢复会话
///
/// 有令牌时先尝试 `POST /refresh`；刷新失败（非 401）时改用 `GET /auth/me`，
/// 仍失败且令牌还在时，退回 LocalStorage 中缓存的用户。
pub async fn restore_session<C, S, N>(api: &ApiClient<C, S, N>) -> Option<User>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    api.token()?;

    match api.refresh().await {
        Ok(auth) => Some(auth.user),
        Err(e) if e.is_unauthorized() => {
            log_info!("[Auth] Stored session is no longer valid.");
            None
        }
        Err(e) => {
            log_warn!("[Auth] Token refresh failed: {}", e);
            match api.current_user().await {
                Ok(user) => Some(user),
                Err(e) if e.is_unauthorized() => None,
                Err(e) => {
                    log_warn!("[Auth] Cannot verify session: {}. Using cached user.", e);
                    api.token().and(api.cached_user())
                }
            }
        }
    }
}

/// 初始化认证状态
///
/// 在挂载时恢复会话，完成前路由不执行守卫。
pub fn init_auth(ctx: &AuthContext, config: AppConfig) {
    let set_state = ctx.set_state;
    let api = BrowserApi::browser(config);
    spawn_local(async move {
        let user = restore_session(&api).await;
        set_state.update(|state| {
            state.current_user = user;
            state.is_loading = false;
        });
    });
}

/// 通知后端注销后清除本地会话
pub fn sign_out(ctx: AuthContext, api: BrowserApi) {
    spawn_local(async move {
        if let Err(e) = api.logout().await {
            log_warn!("[Auth] Logout request failed: {}", e);
        }
        ctx.logout_user(&api.config);
    });
}
