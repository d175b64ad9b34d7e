mod form_state;

use crate::api::use_api;
use crate::components::icons::{AlertCircle, Eye, EyeOff, Lock, Mail, UserCheck, UserRound, Users};
use crate::web::router::{Link, use_router};
use feedback_portal_shared::{Role, User};
use form_state::FormState;
use leptos::prelude::*;
use leptos::task::spawn_local;

const INPUT_CLASS: &str = "block w-full pl-10 pr-3 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent";

#[component]
pub fn SignupPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let form = FormState::new();

    let (managers, set_managers) = signal(Vec::<User>::new());
    let (loading_managers, set_loading_managers) = signal(false);
    let (show_password, set_show_password) = signal(false);
    let (show_confirm, set_show_confirm) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 角色为员工时加载经理列表，失败只记录日志
    Effect::new(move |_| {
        if form.role.get() != Role::Employee {
            return;
        }
        set_loading_managers.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match api.managers().await {
                Ok(list) => set_managers.set(list),
                Err(e) => log_error!("[Signup] Failed to load managers: {}", e),
            }
            set_loading_managers.set(false);
        });
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let req = match form.draft().validate() {
            Ok(req) => req,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };

        set_is_submitting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            match api.signup(req).await {
                Ok(resp) => {
                    log_info!("[Signup] {}", resp.msg);
                    router.navigate("/login");
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let is_employee = move || form.role.get() == Role::Employee;

    view! {
        <div class="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100 flex items-center justify-center p-4">
            <div class="max-w-md w-full">
                <div class="text-center mb-8">
                    <div class="mx-auto h-16 w-16 bg-indigo-600 rounded-full flex items-center justify-center mb-4">
                        <UserCheck attr:class="h-8 w-8 text-white" />
                    </div>
                    <h2 class="text-3xl font-bold text-gray-900">"Create Account"</h2>
                    <p class="mt-2 text-gray-600">"Join your team's feedback portal"</p>
                </div>

                <div class="bg-white rounded-2xl shadow-xl p-8">
                    <form class="space-y-6" on:submit=on_submit>
                        <Show when=move || error_msg.with(Option::is_some)>
                            <div role="alert" class="flex items-center bg-red-50 border border-red-200 text-red-600 px-4 py-3 rounded-lg text-sm">
                                <AlertCircle attr:class="h-4 w-4 mr-2 flex-shrink-0" />
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div>
                            <label for="name" class="block text-sm font-medium text-gray-700 mb-2">"Full Name"</label>
                            <div class="relative">
                                <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                                    <UserRound attr:class="h-5 w-5 text-gray-400" />
                                </div>
                                <input
                                    id="name"
                                    type="text"
                                    required
                                    placeholder="Enter your full name"
                                    on:input=move |ev| form.name.set(event_target_value(&ev))
                                    prop:value=form.name
                                    class=INPUT_CLASS
                                />
                            </div>
                        </div>

                        <div>
                            <label for="email" class="block text-sm font-medium text-gray-700 mb-2">"Email Address"</label>
                            <div class="relative">
                                <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                                    <Mail attr:class="h-5 w-5 text-gray-400" />
                                </div>
                                <input
                                    id="email"
                                    type="email"
                                    required
                                    placeholder="Enter your email"
                                    on:input=move |ev| form.email.set(event_target_value(&ev))
                                    prop:value=form.email
                                    class=INPUT_CLASS
                                />
                            </div>
                        </div>

                        <div>
                            <label for="role" class="block text-sm font-medium text-gray-700 mb-2">"Role"</label>
                            <select
                                id="role"
                                on:change=move |ev| {
                                    if let Some(role) = Role::from_value(&event_target_value(&ev)) {
                                        form.set_role(role);
                                    }
                                }
                                prop:value=move || form.role.get().as_str()
                                class="block w-full px-3 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent"
                            >
                                <option value="employee">"Employee"</option>
                                <option value="manager">"Manager"</option>
                            </select>
                        </div>

                        <Show when=is_employee>
                            <div>
                                <label for="manager" class="block text-sm font-medium text-gray-700 mb-2">"Select Manager"</label>
                                <div class="relative">
                                    <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                                        <Users attr:class="h-5 w-5 text-gray-400" />
                                    </div>
                                    <select
                                        id="manager"
                                        disabled=move || loading_managers.get()
                                        on:change=move |ev| form.manager_id.set(event_target_value(&ev))
                                        prop:value=form.manager_id
                                        class="block w-full pl-10 pr-3 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent"
                                    >
                                        <option value="">
                                            {move || if loading_managers.get() { "Loading managers..." } else { "Choose your manager" }}
                                        </option>
                                        <For
                                            each=move || managers.get()
                                            key=|m| m.id.clone()
                                            children=move |manager| {
                                                view! {
                                                    <option value=manager.id.clone()>
                                                        {format!("{} ({})", manager.name, manager.email)}
                                                    </option>
                                                }
                                            }
                                        />
                                    </select>
                                </div>
                                <Show when=move || !loading_managers.get() && managers.with(Vec::is_empty)>
                                    <p class="mt-1 text-sm text-gray-500">
                                        "No managers available. Please contact your administrator."
                                    </p>
                                </Show>
                            </div>
                        </Show>

                        <PasswordField
                            id="password"
                            label="Password"
                            placeholder="Create a password"
                            value=form.password
                            visible=show_password
                            on_toggle=move |_| set_show_password.update(|v| *v = !*v)
                        />
                        <PasswordField
                            id="confirm_password"
                            label="Confirm Password"
                            placeholder="Confirm your password"
                            value=form.confirm_password
                            visible=show_confirm
                            on_toggle=move |_| set_show_confirm.update(|v| *v = !*v)
                        />

                        <button
                            type="submit"
                            disabled=move || is_submitting.get()
                            class="cursor-pointer w-full flex justify-center py-3 px-4 rounded-lg shadow-sm text-sm font-medium text-white bg-indigo-600 hover:bg-indigo-700 disabled:opacity-50 disabled:cursor-not-allowed"
                        >
                            {move || if is_submitting.get() {
                                view! {
                                    <span class="animate-spin rounded-full h-5 w-5 border-b-2 border-white"></span>
                                }.into_any()
                            } else {
                                "Create Account".into_any()
                            }}
                        </button>
                    </form>

                    <div class="mt-6 text-center">
                        <p class="text-sm text-gray-600">
                            "Already have an account? "
                            <Link to="/login" class="font-medium text-indigo-600 hover:text-indigo-500">
                                "Sign in here"
                            </Link>
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 带显示 / 隐藏切换的密码输入框
#[component]
fn PasswordField(
    id: &'static str,
    label: &'static str,
    placeholder: &'static str,
    value: RwSignal<String>,
    visible: ReadSignal<bool>,
    #[prop(into)] on_toggle: Callback<()>,
) -> impl IntoView {
    view! {
        <div>
            <label for=id class="block text-sm font-medium text-gray-700 mb-2">{label}</label>
            <div class="relative">
                <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                    <Lock attr:class="h-5 w-5 text-gray-400" />
                </div>
                <input
                    id=id
                    type=move || if visible.get() { "text" } else { "password" }
                    required
                    placeholder=placeholder
                    on:input=move |ev| value.set(event_target_value(&ev))
                    prop:value=value
                    class="block w-full pl-10 pr-10 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent"
                />
                <button
                    type="button"
                    on:click=move |_| on_toggle.run(())
                    class="cursor-pointer absolute inset-y-0 right-0 pr-3 flex items-center"
                >
                    {move || if visible.get() {
                        view! { <EyeOff attr:class="h-5 w-5 text-gray-400 hover:text-gray-600" /> }.into_any()
                    } else {
                        view! { <Eye attr:class="h-5 w-5 text-gray-400 hover:text-gray-600" /> }.into_any()
                    }}
                </button>
            </div>
        </div>
    }
}
