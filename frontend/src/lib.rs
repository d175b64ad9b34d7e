//! 员工反馈门户前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api`: 后端网关（认证头、错误转换、401 处理）
//! - `auth`: 会话状态管理
//! - `components`: UI 组件层

#[macro_use]
mod logging;

mod api;
mod auth;
mod config;
mod error;
mod components {
    pub mod common;
    pub mod dashboard;
    pub mod employee_dashboard;
    pub mod feedback_form;
    pub mod feedback_history;
    pub mod icons;
    pub mod login;
    pub mod manager_dashboard;
    pub mod signup;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::common::{LoadingScreen, NoticePage};
use crate::components::dashboard::DashboardPage;
use crate::components::feedback_form::{FeedbackFormPage, FormMode};
use crate::components::feedback_history::FeedbackHistoryPage;
use crate::components::login::LoginPage;
use crate::components::signup::SignupPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch / localStorage / history），
// 不依赖 gloo-* 系列 crate。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::NewFeedback { employee_id } => {
            let mode = FormMode::New { employee_id };
            view! { <FeedbackFormPage mode=mode /> }.into_any()
        }
        AppRoute::EditFeedback { feedback_id } => {
            let mode = FormMode::Edit { feedback_id };
            view! { <FeedbackFormPage mode=mode /> }.into_any()
        }
        AppRoute::FeedbackHistory { employee_id } => {
            view! { <FeedbackHistoryPage employee_id=employee_id /> }.into_any()
        }
        AppRoute::NotFound => view! {
            <NoticePage title="404" detail="Page not found" />
        }
        .into_any(),
    }
}

/// 会话恢复期间的占位视图
fn pending_view() -> AnyView {
    view! { <LoadingScreen message="Loading..." /> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 提供运行配置
    let config = AppConfig::from_env();
    provide_context(config.clone());

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 3. 恢复会话（刷新令牌或读取缓存用户）
    init_auth(&auth_ctx, config);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let is_ready = auth_ctx.is_ready_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated is_ready=is_ready>
            <RouterOutlet matcher=route_matcher pending=pending_view />
        </Router>
    }
}
