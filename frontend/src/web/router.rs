//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History / Location API，实现高内聚：
//! 所有对 window.history 和 window.location 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision};

/// 获取当前浏览器路径
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

// ============================================================================
// 整页跳转（供 API 网关在会话失效时使用）
// ============================================================================

/// 页面位置抽象
pub trait Navigator {
    /// 当前路径
    fn current_path(&self) -> String;
    /// 跳转到指定路径
    fn redirect(&self, path: &str);
}

/// 已发起整页跳转，页面卸载前的后续请求不再重复跳转
static REDIRECT_PENDING: AtomicBool = AtomicBool::new(false);

/// 通过 `location.href` 整页跳转，顺带丢弃内存中的会话状态
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    /// 与页面生命周期共用同一个跳转锁
    pub fn latched() -> OnceNavigator<Self> {
        OnceNavigator::new(Self, &REDIRECT_PENDING)
    }
}

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        current_path()
    }

    fn redirect(&self, path: &str) {
        log_warn!("[Router] Session expired. Redirecting to {}.", path);
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}

/// 只放行第一次跳转
///
/// 整页跳转提交前 `pathname` 不会变化，并发的 401 仍会看到原路径，
/// 所以由锁而不是当前路径来保证只跳转一次。
#[derive(Debug, Clone, Copy)]
pub struct OnceNavigator<N> {
    inner: N,
    fired: &'static AtomicBool,
}

impl<N: Navigator> OnceNavigator<N> {
    pub const fn new(inner: N, fired: &'static AtomicBool) -> Self {
        Self { inner, fired }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: Navigator> Navigator for OnceNavigator<N> {
    fn current_path(&self) -> String {
        self.inner.current_path()
    }

    fn redirect(&self, path: &str) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.redirect(path);
    }
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 会话恢复是否已完成；完成前不执行守卫
    is_ready: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `is_authenticated` - 认证状态信号，由外部注入实现解耦
    /// * `is_ready` - 会话恢复完成信号
    fn new(is_authenticated: Signal<bool>, is_ready: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            is_ready,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn is_ready(&self) -> Signal<bool> {
        self.is_ready
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        self.navigate_to_route(target_route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();

        // --- Step 1: 验证目标路由 ---
        let route = match target_route.guard(is_auth) {
            GuardDecision::Allow => target_route,
            GuardDecision::Redirect(redirect) => {
                log_info!(
                    "[Router] {} is not reachable (authenticated: {}). Redirecting to {}.",
                    target_route,
                    is_auth,
                    redirect
                );
                redirect
            }
        };

        // --- Step 2: 加载页面 (更新状态) ---
        if use_push {
            push_history_state(&route.to_path());
        } else {
            replace_history_state(&route.to_path());
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑，重定向使用 replaceState
            let target_route = AppRoute::from_path(&current_path());
            router.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_ready = self.is_ready;

        // 使用 Effect 监听认证状态变化
        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            if !is_ready.get() {
                return;
            }
            let route = current_route.get_untracked();

            if let GuardDecision::Redirect(redirect) = route.guard(is_auth) {
                log_info!(
                    "[Router] Auth state changed (authenticated: {}). Redirecting to {}.",
                    is_auth,
                    redirect
                );
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, is_ready: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, is_ready);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 会话恢复完成信号
    is_ready: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, is_ready);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；会话恢复期间渲染 `pending`。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    /// 会话恢复期间的占位视图
    pending: fn() -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        if !router.is_ready().get() {
            return pending();
        }
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，拦截点击改为 History 导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
