use crate::api::use_api;
use crate::components::common::{DashboardHeader, LoadingScreen, SentimentBadge};
use crate::components::icons::{AlertCircle, CheckCircle, Clock, MessageSquare};
use feedback_portal_shared::stats::{self, AcknowledgementStats};
use feedback_portal_shared::{Feedback, FeedbackReply};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;

/// 正在确认中的反馈 id
///
/// 每条反馈独立计入，完成时只移除自己。
#[derive(Debug, Clone, Default, PartialEq)]
struct PendingAcks(HashSet<String>);

impl PendingAcks {
    /// 已在确认中时返回 false
    fn start(&mut self, feedback_id: &str) -> bool {
        self.0.insert(feedback_id.to_string())
    }

    fn finish(&mut self, feedback_id: &str) {
        self.0.remove(feedback_id);
    }

    fn contains(&self, feedback_id: &str) -> bool {
        self.0.contains(feedback_id)
    }
}

/// 用确认接口的返回更新本地列表
///
/// 返回完整反馈时整体替换，否则只在本地置为已读。
fn apply_acknowledgement(list: &mut [Feedback], feedback_id: &str, reply: FeedbackReply) {
    let Some(item) = list.iter_mut().find(|f| f.id == feedback_id) else {
        return;
    };
    match reply.into_feedback() {
        Some(updated) if updated.id == feedback_id => *item = updated,
        _ => item.acknowledge(),
    }
}

#[component]
pub fn EmployeeDashboard() -> impl IntoView {
    let api = use_api();

    let (feedbacks, set_feedbacks) = signal(Vec::<Feedback>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (acknowledging, set_acknowledging) = signal(PendingAcks::default());

    let api_value = api.get_value();
    spawn_local(async move {
        match api_value.my_feedback().await {
            Ok(mut list) => {
                stats::sort_newest_first(&mut list);
                set_feedbacks.set(list);
            }
            Err(e) => {
                log_error!("[Dashboard] Failed to load feedback: {}", e);
                set_error_msg.set(Some(e.to_string()));
            }
        }
        set_loading.set(false);
    });

    let on_acknowledge = Callback::new(move |feedback_id: String| {
        let mut started = false;
        set_acknowledging.update(|pending| started = pending.start(&feedback_id));
        if !started {
            return;
        }
        let api = api.get_value();
        spawn_local(async move {
            match api.acknowledge_feedback(&feedback_id).await {
                Ok(reply) => {
                    set_feedbacks.update(|list| apply_acknowledgement(list, &feedback_id, reply));
                }
                Err(e) => {
                    log_warn!("[Dashboard] Acknowledge {} failed: {}", feedback_id, e);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
            set_acknowledging.update(|pending| pending.finish(&feedback_id));
        });
    });

    let ack_stats = Memo::new(move |_| feedbacks.with(|list| AcknowledgementStats::from_feedbacks(list)));

    move || {
        if loading.get() {
            return view! { <LoadingScreen message="Loading your feedback..." /> }.into_any();
        }

        view! {
            <div class="min-h-screen bg-gray-50">
                <DashboardHeader title="My Feedback" />

                <main class="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                    <Show when=move || error_msg.with(Option::is_some)>
                        <div role="alert" class="mb-6 flex items-center justify-between bg-red-50 border border-red-200 text-red-600 px-4 py-3 rounded-lg">
                            <div class="flex items-center">
                                <AlertCircle attr:class="h-4 w-4 mr-2" />
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                            <button
                                on:click=move |_| set_error_msg.set(None)
                                class="cursor-pointer text-red-400 hover:text-red-600"
                            >
                                "×"
                            </button>
                        </div>
                    </Show>

                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">
                        <div class="bg-white rounded-lg shadow p-6">
                            <p class="text-sm font-medium text-gray-600">"Total Feedback"</p>
                            <p class="text-2xl font-bold text-gray-900">{move || ack_stats.get().total}</p>
                        </div>
                        <div class="bg-white rounded-lg shadow p-6">
                            <p class="text-sm font-medium text-gray-600">"Pending Review"</p>
                            <p class="text-2xl font-bold text-yellow-600">{move || ack_stats.get().unacknowledged}</p>
                        </div>
                        <div class="bg-white rounded-lg shadow p-6">
                            <p class="text-sm font-medium text-gray-600">"Acknowledged"</p>
                            <p class="text-2xl font-bold text-green-600">{move || ack_stats.get().acknowledged}</p>
                        </div>
                    </div>

                    <div class="bg-white rounded-lg shadow">
                        <div class="px-6 py-4 border-b border-gray-200">
                            <h2 class="text-lg font-semibold text-gray-900">"Feedback Timeline"</h2>
                        </div>
                        <Show
                            when=move || !feedbacks.with(Vec::is_empty)
                            fallback=|| view! {
                                <div class="px-6 py-12 text-center">
                                    <MessageSquare attr:class="h-12 w-12 text-gray-400 mx-auto" />
                                    <p class="mt-2 text-gray-500">"No feedback yet"</p>
                                </div>
                            }
                        >
                            <div class="divide-y divide-gray-200">
                                // 以 (id, acknowledged) 为 key，确认后该条目重新渲染
                                <For
                                    each=move || feedbacks.get()
                                    key=|f| (f.id.clone(), f.acknowledged)
                                    children=move |feedback| view! {
                                        <FeedbackItem
                                            feedback=feedback
                                            acknowledging=acknowledging
                                            on_acknowledge=on_acknowledge
                                        />
                                    }
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
fn FeedbackItem(
    feedback: Feedback,
    acknowledging: ReadSignal<PendingAcks>,
    on_acknowledge: Callback<String>,
) -> impl IntoView {
    let id = feedback.id.clone();
    let is_busy = {
        let id = id.clone();
        move || acknowledging.with(|pending| pending.contains(&id))
    };

    view! {
        <div class="px-6 py-6">
            <div class="flex items-start justify-between">
                <div class="flex items-center space-x-3">
                    <span class="text-2xl">{feedback.sentiment.emoji()}</span>
                    <SentimentBadge sentiment=feedback.sentiment />
                    <span class="flex items-center text-sm text-gray-500">
                        <Clock attr:class="h-4 w-4 mr-1" />
                        {feedback.created_at.format_date()}
                        {feedback.is_updated().then_some(" (updated)")}
                    </span>
                </div>
                {if feedback.acknowledged {
                    view! {
                        <span class="inline-flex items-center px-2 py-1 rounded-full text-xs font-medium bg-green-100 text-green-800">
                            <CheckCircle attr:class="h-3 w-3 mr-1" />
                            "Acknowledged"
                        </span>
                    }
                    .into_any()
                } else {
                    let busy = is_busy.clone();
                    view! {
                        <button
                            on:click=move |_| on_acknowledge.run(id.clone())
                            disabled=is_busy
                            class="cursor-pointer inline-flex items-center px-3 py-1 border border-transparent rounded-md text-sm text-white bg-indigo-600 hover:bg-indigo-700 disabled:opacity-50"
                        >
                            {move || if busy() { "Acknowledging..." } else { "Acknowledge" }}
                        </button>
                    }
                    .into_any()
                }}
            </div>
            <div class="mt-4 grid grid-cols-1 md:grid-cols-2 gap-4">
                <div>
                    <h4 class="text-sm font-medium text-gray-900 mb-1">"Strengths"</h4>
                    <p class="text-sm text-gray-700 whitespace-pre-wrap">{feedback.strengths.clone()}</p>
                </div>
                <div>
                    <h4 class="text-sm font-medium text-gray-900 mb-1">"Areas for Improvement"</h4>
                    <p class="text-sm text-gray-700 whitespace-pre-wrap">{feedback.improvements.clone()}</p>
                </div>
            </div>
        </div>
    }
}
