use crate::api::{ApiClient, use_api};
use crate::components::common::{Avatar, DashboardHeader, ErrorPanel, LoadingScreen, SentimentBadge};
use crate::components::icons::{Eye, MessageSquare, Plus, TrendingUp, Users};
use crate::error::ApiResult;
use crate::web::http::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::{Navigator, use_router};
use crate::web::storage::KeyValueStore;
use feedback_portal_shared::stats::{self, SentimentStats};
use feedback_portal_shared::{Feedback, ManagerDashboard, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 加载团队概览
///
/// 优先使用 `GET /dashboard`；后端没有该端点（404）时，
/// 改为并发请求 `GET /team` 与 `GET /feedback/team`。
pub(crate) async fn load_overview<C, S, N>(api: &ApiClient<C, S, N>) -> ApiResult<ManagerDashboard>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    match api.manager_dashboard().await {
        Err(e) if e.is_not_found() => {
            log_info!("[Dashboard] /dashboard unavailable ({}). Loading team and feedback separately.", e);
            let (employees, feedbacks) = futures::join!(api.team_members(), api.team_feedback());
            Ok(ManagerDashboard {
                employees: employees?,
                feedbacks: feedbacks?,
            })
        }
        other => other,
    }
}

#[component]
pub fn ManagerDashboardPage() -> impl IntoView {
    let api = use_api();

    let (employees, set_employees) = signal(Vec::<User>::new());
    let (feedbacks, set_feedbacks) = signal(Vec::<Feedback>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load_dashboard = move || {
        set_loading.set(true);
        set_error_msg.set(None);
        let api = api.get_value();
        spawn_local(async move {
            match load_overview(&api).await {
                Ok(data) => {
                    set_employees.set(data.employees);
                    set_feedbacks.set(data.feedbacks);
                }
                Err(e) => {
                    log_error!("[Dashboard] Failed to load team dashboard: {}", e);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load_dashboard();
    let on_retry = Callback::new(move |_: ()| load_dashboard());

    let stats = Memo::new(move |_| feedbacks.with(|list| SentimentStats::from_feedbacks(list)));

    move || {
        if loading.get() {
            return view! { <LoadingScreen message="Loading dashboard..." /> }.into_any();
        }
        if let Some(err) = error_msg.get() {
            return view! {
                <ErrorPanel title="Error loading dashboard" message=err on_retry=on_retry />
            }
            .into_any();
        }

        view! {
            <div class="min-h-screen bg-gray-50">
                <DashboardHeader title="Manager Dashboard" />

                <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                    // 统计卡片
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-6 mb-8">
                        <StatCard label="Team Members" value=Signal::derive(move || employees.with(Vec::len).to_string())>
                            <Users attr:class="h-8 w-8 text-blue-600" />
                        </StatCard>
                        <StatCard label="Total Feedback" value=Signal::derive(move || stats.get().total.to_string())>
                            <MessageSquare attr:class="h-8 w-8 text-green-600" />
                        </StatCard>
                        <StatCard label="Positive Feedback" value=Signal::derive(move || stats.get().positive.to_string())>
                            <TrendingUp attr:class="h-8 w-8 text-emerald-600" />
                        </StatCard>
                        <div class="bg-white rounded-lg shadow p-6">
                            <p class="text-sm font-medium text-gray-600">"Sentiment Breakdown"</p>
                            <div class="flex space-x-3 mt-2 text-sm font-semibold">
                                <span class="text-green-600">{move || format!("+{}", stats.get().positive)}</span>
                                <span class="text-yellow-600">{move || format!("={}", stats.get().neutral)}</span>
                                <span class="text-red-600">{move || format!("-{}", stats.get().negative)}</span>
                            </div>
                        </div>
                    </div>

                    // 团队列表
                    <div class="bg-white rounded-lg shadow">
                        <div class="px-6 py-4 border-b border-gray-200">
                            <h2 class="text-lg font-semibold text-gray-900">"Team Members"</h2>
                        </div>
                        <div class="divide-y divide-gray-200">
                            <Show
                                when=move || !employees.with(Vec::is_empty)
                                fallback=|| view! {
                                    <div class="px-6 py-12 text-center">
                                        <Users attr:class="h-12 w-12 text-gray-400 mx-auto" />
                                        <p class="mt-2 text-gray-500">"No team members yet"</p>
                                    </div>
                                }
                            >
                                <For
                                    each=move || employees.get()
                                    key=|e| e.id.clone()
                                    children=move |employee| view! { <TeamMemberRow employee=employee feedbacks=feedbacks /> }
                                />
                            </Show>
                        </div>
                    </div>
                </main>
            </div>
        }
        .into_any()
    }
}

#[component]
fn StatCard(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-6">
            <div class="flex items-center">
                {children()}
                <div class="ml-4">
                    <p class="text-sm font-medium text-gray-600">{label}</p>
                    <p class="text-2xl font-bold text-gray-900">{move || value.get()}</p>
                </div>
            </div>
        </div>
    }
}

/// 团队成员行：头像、反馈数、最近一次情感及操作按钮
#[component]
fn TeamMemberRow(employee: User, feedbacks: ReadSignal<Vec<Feedback>>) -> impl IntoView {
    let router = use_router();

    let count = {
        let id = employee.id.clone();
        Memo::new(move |_| feedbacks.with(|list| stats::count_for_employee(list, &id)))
    };
    let latest = {
        let id = employee.id.clone();
        Memo::new(move |_| {
            feedbacks.with(|list| stats::latest_for_employee(list, &id).map(|f| f.sentiment))
        })
    };

    let history_path = AppRoute::FeedbackHistory {
        employee_id: employee.id.clone(),
    }
    .to_path();
    let new_path = AppRoute::NewFeedback {
        employee_id: employee.id.clone(),
    }
    .to_path();

    view! {
        <div class="px-6 py-4 flex items-center justify-between">
            <div class="flex items-center">
                <Avatar name=employee.name.clone() size="h-10 w-10 text-sm" />
                <div class="ml-4">
                    <p class="text-sm font-medium text-gray-900">{employee.name.clone()}</p>
                    <p class="text-sm text-gray-500">{employee.email.clone()}</p>
                    <p class="text-xs text-gray-400">{move || stats::member_feedback_count_label(count.get())}</p>
                </div>
            </div>
            <div class="flex items-center space-x-3">
                {move || latest.get().map(|sentiment| view! { <SentimentBadge sentiment=sentiment /> })}
                <Show when=move || { count.get() > 0 }>
                    {
                        let path = history_path.clone();
                        view! {
                            <button
                                on:click=move |_| router.navigate(&path)
                                class="cursor-pointer inline-flex items-center px-3 py-1 border border-gray-300 rounded-md text-sm text-gray-700 bg-white hover:bg-gray-50"
                            >
                                <Eye attr:class="h-4 w-4 mr-1" />
                                "View"
                            </button>
                        }
                    }
                </Show>
                <button
                    on:click=move |_| router.navigate(&new_path)
                    class="cursor-pointer inline-flex items-center px-3 py-1 border border-transparent rounded-md text-sm text-white bg-indigo-600 hover:bg-indigo-700"
                >
                    <Plus attr:class="h-4 w-4 mr-1" />
                    "Add Feedback"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{BASE, test_api, user_json};
    use crate::web::storage::MemoryStorage;
    use feedback_portal_shared::protocol::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn dashboard_endpoint_is_preferred() {
        let api = test_api("/", MemoryStorage::with("authToken", "tok"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/dashboard"),
            200,
            json!({"employees": [user_json("e1", "employee")], "feedbacks": []}),
        );

        let overview = load_overview(&api).await.unwrap();

        assert_eq!(overview.employees.len(), 1);
        assert_eq!(api.client.requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_team_endpoints() {
        let api = test_api("/", MemoryStorage::with("authToken", "tok"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/dashboard"),
            404,
            json!({"detail": "Not Found"}),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/team"),
            200,
            json!([user_json("e1", "employee"), user_json("e2", "employee")]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback/team"),
            200,
            json!([{
                "id": "f1", "manager_id": "m1", "employee_id": "e2",
                "strengths": "s", "improvements": "i", "sentiment": "negative",
                "created_at": "2024-02-01T10:00:00", "acknowledged": true
            }]),
        );

        let overview = load_overview(&api).await.unwrap();

        assert_eq!(overview.employees.len(), 2);
        assert_eq!(SentimentStats::from_feedbacks(&overview.feedbacks).negative, 1);
    }

    #[tokio::test]
    async fn other_errors_are_not_masked() {
        let api = test_api("/", MemoryStorage::with("authToken", "tok"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/dashboard"),
            403,
            json!({"detail": "Managers only"}),
        );

        let err = load_overview(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Managers only");
        assert_eq!(api.client.requests.borrow().len(), 1);
    }
}
