//! 页面间复用的小组件

use feedback_portal_shared::Sentiment;
use leptos::prelude::*;

use crate::api::use_api;
use crate::auth::{sign_out, use_auth};
use crate::components::icons::{ArrowLeft, LogOut};
use crate::web::router::use_router;

/// 全屏加载占位
#[component]
pub fn LoadingScreen(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <div class="text-center">
                <div class="animate-spin rounded-full h-12 w-12 border-b-2 border-indigo-600 mx-auto"></div>
                <p class="mt-4 text-gray-600">{message}</p>
            </div>
        </div>
    }
}

/// 加载失败面板，带重试按钮
#[component]
pub fn ErrorPanel(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <div class="text-center">
                <div class="bg-red-50 border border-red-200 text-red-600 px-6 py-4 rounded-lg">
                    <p class="font-medium">{title}</p>
                    <p class="text-sm mt-1">{message}</p>
                    <button
                        on:click=move |_| on_retry.run(())
                        class="cursor-pointer mt-4 px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700"
                    >
                        "Retry"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// 居中提示页（未找到 / 无权限），带返回首页按钮
#[component]
pub fn NoticePage(
    #[prop(into)] title: String,
    #[prop(optional, into)] detail: Option<String>,
) -> impl IntoView {
    let router = use_router();

    view! {
        <div class="min-h-screen bg-gray-50 flex items-center justify-center">
            <div class="text-center">
                <h2 class="text-2xl font-bold text-gray-900">{title}</h2>
                {detail.map(|d| view! { <p class="mt-2 text-gray-600">{d}</p> })}
                <button
                    on:click=move |_| router.navigate("/")
                    class="cursor-pointer mt-4 inline-flex items-center px-4 py-2 border border-transparent rounded-md text-sm font-medium text-white bg-indigo-600 hover:bg-indigo-700"
                >
                    <ArrowLeft attr:class="h-4 w-4 mr-2" />
                    "Back to Dashboard"
                </button>
            </div>
        </div>
    }
}

/// 情感徽章
#[component]
pub fn SentimentBadge(sentiment: Sentiment) -> impl IntoView {
    view! {
        <span class=format!(
            "inline-flex items-center px-2 py-1 rounded-full text-xs font-medium {}",
            sentiment.badge_class(),
        )>{sentiment.as_str()}</span>
    }
}

/// 姓名首字母头像
#[component]
pub fn Avatar(
    #[prop(into)] name: String,
    /// 尺寸类，如 "h-10 w-10 text-sm"
    #[prop(into)]
    size: String,
) -> impl IntoView {
    let initials = feedback_portal_shared::stats::initials(&name);
    view! {
        <div class=format!(
            "{} rounded-full bg-indigo-100 flex items-center justify-center flex-shrink-0",
            size,
        )>
            <span class="font-medium text-indigo-600">{initials}</span>
        </div>
    }
}

/// 面板页头：标题、欢迎语和退出按钮
#[component]
pub fn DashboardHeader(#[prop(into)] title: String) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let user_name = move || {
        auth.state
            .with(|s| s.current_user.as_ref().map(|u| u.name.clone()))
            .unwrap_or_default()
    };

    view! {
        <header class="bg-white shadow-sm border-b border-gray-200">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center py-4">
                    <div>
                        <h1 class="text-2xl font-bold text-gray-900">{title}</h1>
                        <p class="text-sm text-gray-600">"Welcome back, " {user_name}</p>
                    </div>
                    <button
                        on:click=move |_| sign_out(auth, api.get_value())
                        class="cursor-pointer inline-flex items-center px-4 py-2 border border-gray-300 rounded-lg text-sm font-medium text-gray-700 bg-white hover:bg-gray-50 focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-indigo-500"
                    >
                        <LogOut attr:class="h-4 w-4 mr-2" />
                        "Sign out"
                    </button>
                </div>
            </div>
        </header>
    }
}
