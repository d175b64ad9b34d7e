use crate::api::{ApiClient, use_api};
use crate::auth::use_auth;
use crate::components::common::{Avatar, ErrorPanel, LoadingScreen, NoticePage, SentimentBadge};
use crate::components::icons::{ArrowLeft, CheckCircle, Clock, Edit, MessageSquare, Plus};
use crate::error::ApiResult;
use crate::web::http::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::{Navigator, use_router};
use crate::web::storage::KeyValueStore;
use feedback_portal_shared::stats;
use feedback_portal_shared::{Feedback, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 同时拉取反馈列表与员工信息，只保留该员工的反馈（最新在前）
pub(crate) async fn load_history<C, S, N>(
    api: &ApiClient<C, S, N>,
    employee_id: &str,
) -> ApiResult<(User, Vec<Feedback>)>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    let (feedbacks, employee) = futures::join!(api.my_feedback(), api.user(employee_id));
    let feedbacks = feedbacks?;
    let employee = employee?;
    Ok((employee, stats::for_employee(&feedbacks, employee_id)))
}

#[component]
pub fn FeedbackHistoryPage(employee_id: String) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();

    let allowed = auth
        .state
        .with_untracked(|s| s.can_view_history(&employee_id));
    let is_manager = auth.state.with_untracked(|s| s.is_manager());

    let (employee, set_employee) = signal(Option::<User>::None);
    let (feedbacks, set_feedbacks) = signal(Vec::<Feedback>::new());
    let (loading, set_loading) = signal(allowed);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = {
        let employee_id = employee_id.clone();
        move || {
            set_loading.set(true);
            set_error_msg.set(None);
            let api = api.get_value();
            let employee_id = employee_id.clone();
            spawn_local(async move {
                match load_history(&api, &employee_id).await {
                    Ok((user, list)) => {
                        set_employee.set(Some(user));
                        set_feedbacks.set(list);
                    }
                    Err(e) => {
                        log_error!("[History] Failed to load history of {}: {}", employee_id, e);
                        set_error_msg.set(Some(e.to_string()));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    if allowed {
        load();
    }
    let on_retry = Callback::new(move |_: ()| load());

    move || {
        if !allowed {
            return view! {
                <NoticePage title="Access Denied" detail="You don't have permission to view this feedback." />
            }
            .into_any();
        }
        if loading.get() {
            return view! { <LoadingScreen message="Loading feedback history..." /> }.into_any();
        }
        if let Some(err) = error_msg.get() {
            return view! {
                <ErrorPanel title="Error loading feedback history" message=err on_retry=on_retry />
            }
            .into_any();
        }
        let Some(emp) = employee.get() else {
            return view! { <NoticePage title="Employee not found" /> }.into_any();
        };

        let new_path = AppRoute::NewFeedback {
            employee_id: emp.id.clone(),
        }
        .to_path();

        view! {
            <div class="min-h-screen bg-gray-50">
                <header class="bg-white shadow-sm border-b border-gray-200">
                    <div class="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8">
                        <div class="flex items-center space-x-4 py-4">
                            <button
                                on:click=move |_| router.navigate("/")
                                class="cursor-pointer inline-flex items-center px-3 py-2 border border-gray-300 rounded-md text-sm font-medium text-gray-700 bg-white hover:bg-gray-50"
                            >
                                <ArrowLeft attr:class="h-4 w-4 mr-2" />
                                "Back"
                            </button>
                            <div>
                                <h1 class="text-2xl font-bold text-gray-900">"Feedback History"</h1>
                                <p class="text-sm text-gray-600">
                                    {move || stats::feedback_count_label(feedbacks.with(Vec::len))}
                                </p>
                            </div>
                        </div>
                    </div>
                </header>

                <main class="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                    <div class="bg-white rounded-lg shadow p-6 mb-8 flex items-center justify-between">
                        <div class="flex items-center space-x-4">
                            <Avatar name=emp.name.clone() size="h-12 w-12 text-lg" />
                            <div>
                                <h3 class="text-lg font-medium text-gray-900">{emp.name.clone()}</h3>
                                <p class="text-sm text-gray-500">{emp.email.clone()}</p>
                            </div>
                        </div>
                        {is_manager.then(|| {
                            let path = new_path.clone();
                            view! {
                                <button
                                    on:click=move |_| router.navigate(&path)
                                    class="cursor-pointer inline-flex items-center px-4 py-2 border border-transparent rounded-md text-sm font-medium text-white bg-indigo-600 hover:bg-indigo-700"
                                >
                                    <Plus attr:class="h-4 w-4 mr-2" />
                                    "Add New Feedback"
                                </button>
                            }
                        })}
                    </div>

                    <div class="bg-white rounded-lg shadow">
                        <div class="px-6 py-4 border-b border-gray-200">
                            <h2 class="text-lg font-medium text-gray-900">"Feedback Timeline"</h2>
                        </div>
                        <Show
                            when=move || !feedbacks.with(Vec::is_empty)
                            fallback=|| view! {
                                <div class="px-6 py-12 text-center">
                                    <MessageSquare attr:class="h-12 w-12 text-gray-400 mx-auto" />
                                    <h3 class="mt-2 text-sm font-medium text-gray-900">"No feedback yet"</h3>
                                    <p class="mt-1 text-sm text-gray-500">"No feedback has been provided for this employee yet."</p>
                                </div>
                            }
                        >
                            <div class="divide-y divide-gray-200">
                                <For
                                    each=move || feedbacks.get()
                                    key=|f| f.id.clone()
                                    children=move |feedback| view! { <HistoryEntry feedback=feedback can_edit=is_manager /> }
                                />
                            </div>
                        </Show>
                    </div>
                </main>
            </div>
        }
        .into_any()
    }
}

#[component]
fn HistoryEntry(feedback: Feedback, can_edit: bool) -> impl IntoView {
    let router = use_router();
    let edit_path = AppRoute::EditFeedback {
        feedback_id: feedback.id.clone(),
    }
    .to_path();
    let updated = feedback
        .updated_at
        .map(|ts| format!("Updated {}", ts.format_date()));

    view! {
        <div class="px-6 py-6">
            <div class="flex items-center justify-between mb-4">
                <div class="flex items-center space-x-3">
                    <span class="text-2xl">{feedback.sentiment.emoji()}</span>
                    <SentimentBadge sentiment=feedback.sentiment />
                    <span class="flex items-center text-sm text-gray-500">
                        <Clock attr:class="h-4 w-4 mr-1" />
                        {feedback.created_at.format_date()}
                    </span>
                    {updated.map(|text| view! { <span class="text-xs text-gray-400">{text}</span> })}
                    {feedback.acknowledged.then(|| view! {
                        <span class="inline-flex items-center text-xs text-green-700">
                            <CheckCircle attr:class="h-3 w-3 mr-1" />
                            "Acknowledged"
                        </span>
                    })}
                </div>
                {can_edit.then(|| view! {
                    <button
                        on:click=move |_| router.navigate(&edit_path)
                        class="cursor-pointer inline-flex items-center px-3 py-1 border border-gray-300 rounded-md text-sm text-gray-700 bg-white hover:bg-gray-50"
                    >
                        <Edit attr:class="h-4 w-4 mr-1" />
                        "Edit"
                    </button>
                })}
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="bg-green-50 rounded-lg p-4">
                    <h4 class="text-sm font-medium text-green-800 mb-2">"Strengths"</h4>
                    <p class="text-sm text-gray-700 leading-relaxed whitespace-pre-wrap">{feedback.strengths.clone()}</p>
                </div>
                <div class="bg-blue-50 rounded-lg p-4">
                    <h4 class="text-sm font-medium text-blue-800 mb-2">"Areas for Improvement"</h4>
                    <p class="text-sm text-gray-700 leading-relaxed whitespace-pre-wrap">{feedback.improvements.clone()}</p>
                </div>
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

    fn feedback(id: &str, employee: &str, created: &str) -> serde_json::Value {
        json!({
            "id": id, "manager_id": "m1", "employee_id": employee,
            "strengths": "s", "improvements": "i", "sentiment": "positive",
            "created_at": created, "acknowledged": false
        })
    }

    #[tokio::test]
    async fn history_is_filtered_and_newest_first() {
        let api = test_api("/feedback/history/e1", MemoryStorage::with("authToken", "tok"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback"),
            200,
            json!([
                feedback("old", "e1", "2024-01-01T09:00:00"),
                feedback("other", "e2", "2024-06-01T09:00:00"),
                feedback("new", "e1", "2024-05-01T09:00:00"),
            ]),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/e1"),
            200,
            user_json("e1", "employee"),
        );

        let (employee, list) = load_history(&api, "e1").await.unwrap();

        assert_eq!(employee.id, "e1");
        let ids: Vec<&str> = list.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
        assert_eq!(api.client.requests.borrow().len(), 2);
    }

    #[tokio::test]
    async fn either_failure_fails_the_page() {
        let api = test_api("/feedback/history/e1", MemoryStorage::with("authToken", "tok"));
        api.client
            .mock_response(HttpMethod::Get, &format!("{BASE}/feedback"), 200, json!([]));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/e1"),
            500,
            json!({"message": "database unavailable"}),
        );

        let err = load_history(&api, "e1").await.unwrap_err();
        assert_eq!(err.to_string(), "database unavailable");
    }
}
