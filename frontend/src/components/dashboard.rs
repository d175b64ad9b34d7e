use crate::auth::use_auth;
use crate::components::employee_dashboard::EmployeeDashboard;
use crate::components::manager_dashboard::ManagerDashboardPage;
use leptos::prelude::*;

/// 首页：按当前用户角色渲染面板
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let is_manager = move || auth.state.with(|s| s.is_manager());

    view! {
        <Show when=is_manager fallback=|| view! { <EmployeeDashboard /> }>
            <ManagerDashboardPage />
        </Show>
    }
}
