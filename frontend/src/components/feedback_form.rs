mod form_state;

pub use form_state::FormMode;

use crate::api::{ApiClient, use_api};
use crate::auth::use_auth;
use crate::components::common::{Avatar, LoadingScreen, NoticePage};
use crate::components::icons::{ArrowLeft, Save};
use crate::error::ApiResult;
use crate::web::http::HttpClient;
use crate::web::router::{Navigator, use_router};
use crate::web::storage::KeyValueStore;
use feedback_portal_shared::{Feedback, Sentiment, User};
use form_state::FormState;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 表单所需的数据
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FormData {
    /// 反馈对象；找不到时为 None
    pub employee: Option<User>,
    /// 编辑模式下的原反馈
    pub existing: Option<Feedback>,
}

/// 加载表单数据
///
/// 新建：`GET /users/{id}`，失败视为员工不存在。
/// 编辑：先取反馈，再从 `GET /team` 中找到对应员工；
/// 员工已不在团队中时改查 `GET /users`，查询失败视为员工不存在。
pub(crate) async fn load_form<C, S, N>(api: &ApiClient<C, S, N>, mode: &FormMode) -> ApiResult<FormData>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    match mode {
        FormMode::New { employee_id } => {
            let employee = match api.user(employee_id).await {
                Ok(user) => Some(user),
                Err(e) => {
                    log_warn!("[FeedbackForm] Employee {} not available: {}", employee_id, e);
                    None
                }
            };
            Ok(FormData {
                employee,
                existing: None,
            })
        }
        FormMode::Edit { feedback_id } => {
            let feedback = api.feedback_by_id(feedback_id).await?;
            let team = api.team_members().await?;
            let mut employee = team.into_iter().find(|u| u.id == feedback.employee_id);
            if employee.is_none() {
                employee = match api.all_users().await {
                    Ok(users) => users.into_iter().find(|u| u.id == feedback.employee_id),
                    Err(e) => {
                        log_warn!("[FeedbackForm] User directory not available: {}", e);
                        None
                    }
                };
            }
            Ok(FormData {
                employee,
                existing: Some(feedback),
            })
        }
    }
}

#[component]
pub fn FeedbackFormPage(mode: FormMode) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();
    let form = FormState::new();

    let is_manager = auth.state.with_untracked(|s| s.is_manager());
    let is_edit = mode.is_edit();

    let (employee, set_employee) = signal(Option::<User>::None);
    let (existing, set_existing) = signal(Option::<Feedback>::None);
    let (loading, set_loading) = signal(is_manager);
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 仅经理可以填写反馈
    Effect::new(move |_| {
        if !auth.state.with(|s| s.is_manager()) {
            log_info!("[FeedbackForm] Only managers can write feedback.");
            router.navigate("/");
        }
    });

    if is_manager {
        let api = api.get_value();
        let mode = mode.clone();
        spawn_local(async move {
            match load_form(&api, &mode).await {
                Ok(data) => {
                    if let Some(feedback) = &data.existing {
                        form.fill(feedback);
                    }
                    set_existing.set(data.existing);
                    set_employee.set(data.employee);
                }
                Err(e) => {
                    log_error!("[FeedbackForm] Failed to load form data: {}", e);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let draft = form.draft();
        if let Err(msg) = draft.check() {
            set_error_msg.set(Some(msg));
            return;
        }

        let target_employee = employee.with_untracked(|e| e.as_ref().map(|u| u.id.clone()));
        let existing_id = existing.with_untracked(|f| f.as_ref().map(|f| f.id.clone()));

        set_submitting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = match (existing_id, target_employee) {
                (Some(feedback_id), _) => api.update_feedback(&feedback_id, draft.to_update()).await,
                (None, Some(employee_id)) => api.create_feedback(draft.to_create(&employee_id)).await,
                (None, None) => {
                    set_submitting.set(false);
                    return;
                }
            };
            match result {
                Ok(_) => router.navigate("/"),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_submitting.set(false);
        });
    };

    move || {
        if !auth.state.with(|s| s.is_manager()) {
            return ().into_any();
        }
        if loading.get() {
            return view! { <LoadingScreen message="Loading form..." /> }.into_any();
        }
        let Some(emp) = employee.get() else {
            return match error_msg.get() {
                Some(detail) => view! { <NoticePage title="Employee not found" detail=detail /> }.into_any(),
                None => view! { <NoticePage title="Employee not found" /> }.into_any(),
            };
        };

        let (title, verb) = if is_edit {
            ("Edit Feedback", "Update")
        } else {
            ("New Feedback", "Provide")
        };

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
                                <h1 class="text-2xl font-bold text-gray-900">{title}</h1>
                                <p class="text-sm text-gray-600">{format!("{} feedback for {}", verb, emp.name)}</p>
                            </div>
                        </div>
                    </div>
                </header>

                <main class="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                    <Show when=move || error_msg.with(Option::is_some)>
                        <div role="alert" class="bg-red-50 border border-red-200 text-red-600 px-4 py-3 rounded-lg mb-6">
                            {move || error_msg.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <div class="bg-white rounded-lg shadow p-6 mb-8">
                        <div class="flex items-center space-x-4">
                            <Avatar name=emp.name.clone() size="h-12 w-12 text-lg" />
                            <div>
                                <h3 class="text-lg font-medium text-gray-900">{emp.name.clone()}</h3>
                                <p class="text-sm text-gray-500">{emp.email.clone()}</p>
                            </div>
                        </div>
                    </div>

                    <div class="bg-white rounded-lg shadow">
                        <form on:submit=on_submit class="p-6 space-y-6">
                            <div>
                                <span class="block text-sm font-medium text-gray-700 mb-3">"Overall Sentiment"</span>
                                <div class="grid grid-cols-1 sm:grid-cols-3 gap-3">
                                    {Sentiment::ALL
                                        .into_iter()
                                        .map(|option| view! { <SentimentOption option=option form=form submitting=submitting /> })
                                        .collect_view()}
                                </div>
                            </div>

                            <div>
                                <label for="strengths" class="block text-sm font-medium text-gray-700 mb-2">
                                    "Strengths & Positive Contributions"
                                </label>
                                <textarea
                                    id="strengths"
                                    rows=4
                                    required
                                    disabled=move || submitting.get()
                                    placeholder="Highlight what this team member does well, their key contributions, and areas where they excel..."
                                    on:input=move |ev| form.strengths.set(event_target_value(&ev))
                                    prop:value=form.strengths
                                    class="block w-full border border-gray-300 rounded-lg px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                ></textarea>
                            </div>

                            <div>
                                <label for="improvements" class="block text-sm font-medium text-gray-700 mb-2">
                                    "Areas for Growth & Development"
                                </label>
                                <textarea
                                    id="improvements"
                                    rows=4
                                    required
                                    disabled=move || submitting.get()
                                    placeholder="Provide constructive feedback on areas where they can grow, develop new skills, or improve performance..."
                                    on:input=move |ev| form.improvements.set(event_target_value(&ev))
                                    prop:value=form.improvements
                                    class="block w-full border border-gray-300 rounded-lg px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-indigo-500"
                                ></textarea>
                            </div>

                            <div class="flex justify-end space-x-3 pt-6 border-t border-gray-200">
                                <button
                                    type="button"
                                    on:click=move |_| router.navigate("/")
                                    disabled=move || submitting.get()
                                    class="cursor-pointer px-4 py-2 border border-gray-300 rounded-lg text-sm font-medium text-gray-700 bg-white hover:bg-gray-50 disabled:opacity-50"
                                >
                                    "Cancel"
                                </button>
                                <button
                                    type="submit"
                                    disabled=move || submitting.get()
                                    class="cursor-pointer inline-flex items-center px-4 py-2 border border-transparent rounded-lg text-sm font-medium text-white bg-indigo-600 hover:bg-indigo-700 disabled:opacity-50"
                                >
                                    {move || match (submitting.get(), is_edit) {
                                        (true, true) => "Updating...".into_any(),
                                        (true, false) => "Submitting...".into_any(),
                                        (false, true) => view! { <Save attr:class="h-4 w-4 mr-2" /> "Update Feedback" }.into_any(),
                                        (false, false) => view! { <Save attr:class="h-4 w-4 mr-2" /> "Submit Feedback" }.into_any(),
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </main>
            </div>
        }
        .into_any()
    }
}

/// 情感单选卡片
#[component]
fn SentimentOption(option: Sentiment, form: FormState, submitting: ReadSignal<bool>) -> impl IntoView {
    let class = move || {
        let state = if form.sentiment.get() == option {
            option.selected_class()
        } else {
            "border-gray-300 hover:border-gray-400"
        };
        format!("relative flex cursor-pointer rounded-lg border p-4 {}", state)
    };

    view! {
        <label class=class>
            <input
                type="radio"
                name="sentiment"
                value=option.as_str()
                prop:checked=move || form.sentiment.get() == option
                on:change=move |_| form.sentiment.set(option)
                disabled=move || submitting.get()
                class="sr-only"
            />
            <div class="flex items-center space-x-3">
                <span class="text-2xl">{option.emoji()}</span>
                <p class="text-sm font-medium text-gray-900">{option.label()}</p>
            </div>
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{BASE, test_api, user_json};
    use crate::web::storage::MemoryStorage;
    use feedback_portal_shared::protocol::HttpMethod;
    use serde_json::json;

    fn manager_storage() -> MemoryStorage {
        MemoryStorage::with("authToken", "tok")
    }

    #[tokio::test]
    async fn new_feedback_loads_employee() {
        let api = test_api("/feedback/new/e1", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/e1"),
            200,
            user_json("e1", "employee"),
        );

        let data = load_form(
            &api,
            &FormMode::New {
                employee_id: "e1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(data.employee.map(|u| u.id).as_deref(), Some("e1"));
        assert!(data.existing.is_none());
    }

    #[tokio::test]
    async fn missing_employee_is_not_an_error() {
        let api = test_api("/feedback/new/ghost", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users/ghost"),
            404,
            json!({"detail": "User not found"}),
        );

        let data = load_form(
            &api,
            &FormMode::New {
                employee_id: "ghost".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(data, FormData::default());
    }

    #[tokio::test]
    async fn edit_resolves_employee_from_team() {
        let api = test_api("/feedback/edit/f1", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback/f1"),
            200,
            json!({
                "id": "f1", "manager_id": "m1", "employee_id": "e2",
                "strengths": "s", "improvements": "i", "sentiment": "neutral",
                "created_at": "2024-03-15T09:00:00", "acknowledged": false
            }),
        );
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/team"),
            200,
            json!([user_json("e1", "employee"), user_json("e2", "employee")]),
        );

        let data = load_form(
            &api,
            &FormMode::Edit {
                feedback_id: "f1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(data.employee.map(|u| u.id).as_deref(), Some("e2"));
        assert_eq!(data.existing.map(|f| f.sentiment), Some(Sentiment::Neutral));
    }

    #[tokio::test]
    async fn edit_falls_back_to_user_directory() {
        let api = test_api("/feedback/edit/f1", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback/f1"),
            200,
            json!({
                "id": "f1", "manager_id": "m1", "employee_id": "e9",
                "strengths": "s", "improvements": "i", "sentiment": "positive",
                "created_at": "2024-03-15T09:00:00", "acknowledged": true
            }),
        );
        api.client
            .mock_response(HttpMethod::Get, &format!("{BASE}/team"), 200, json!([]));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users"),
            200,
            json!([user_json("m1", "manager"), user_json("e9", "employee")]),
        );

        let data = load_form(
            &api,
            &FormMode::Edit {
                feedback_id: "f1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(data.employee.map(|u| u.id).as_deref(), Some("e9"));
    }

    #[tokio::test]
    async fn edit_without_directory_keeps_feedback() {
        let api = test_api("/feedback/edit/f1", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback/f1"),
            200,
            json!({
                "id": "f1", "manager_id": "m1", "employee_id": "e9",
                "strengths": "s", "improvements": "i", "sentiment": "positive",
                "created_at": "2024-03-15T09:00:00", "acknowledged": false
            }),
        );
        api.client
            .mock_response(HttpMethod::Get, &format!("{BASE}/team"), 200, json!([]));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/users"),
            404,
            json!({"detail": "Not Found"}),
        );

        let data = load_form(
            &api,
            &FormMode::Edit {
                feedback_id: "f1".into(),
            },
        )
        .await
        .unwrap();

        assert!(data.employee.is_none());
        assert_eq!(data.existing.map(|f| f.id).as_deref(), Some("f1"));
    }

    #[tokio::test]
    async fn edit_of_unknown_feedback_fails() {
        let api = test_api("/feedback/edit/nope", manager_storage());
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/feedback/nope"),
            404,
            json!({"detail": "Feedback not found"}),
        );

        let err = load_form(
            &api,
            &FormMode::Edit {
                feedback_id: "nope".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Feedback not found");
    }
}
