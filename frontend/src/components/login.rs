use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::{AlertCircle, Eye, EyeOff, Lock, Mail, UserRound};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.get_value();
        spawn_local(async move {
            match api.login(email.get_untracked(), password.get_untracked()).await {
                Ok(resp) => {
                    auth.login_user(resp.user);
                    router.navigate("/");
                }
                Err(e) => {
                    let msg = if e.message().is_empty() {
                        "Login failed. Please try again.".to_string()
                    } else {
                        e.message().to_string()
                    };
                    set_error_msg.set(Some(msg));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100 flex items-center justify-center p-4">
            <div class="max-w-md w-full">
                <div class="text-center mb-8">
                    <div class="mx-auto h-16 w-16 bg-indigo-600 rounded-full flex items-center justify-center mb-4">
                        <UserRound attr:class="h-8 w-8 text-white" />
                    </div>
                    <h2 class="text-3xl font-bold text-gray-900">"Welcome Back"</h2>
                    <p class="mt-2 text-gray-600">"Sign in to your feedback portal"</p>
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
                            <label for="email" class="block text-sm font-medium text-gray-700 mb-2">
                                "Email Address"
                            </label>
                            <div class="relative">
                                <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                                    <Mail attr:class="h-5 w-5 text-gray-400" />
                                </div>
                                <input
                                    id="email"
                                    type="email"
                                    required
                                    disabled=move || is_submitting.get()
                                    placeholder="Enter your email"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="block w-full pl-10 pr-3 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent"
                                />
                            </div>
                        </div>

                        <div>
                            <label for="password" class="block text-sm font-medium text-gray-700 mb-2">
                                "Password"
                            </label>
                            <div class="relative">
                                <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                                    <Lock attr:class="h-5 w-5 text-gray-400" />
                                </div>
                                <input
                                    id="password"
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    required
                                    disabled=move || is_submitting.get()
                                    placeholder="Enter your password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="block w-full pl-10 pr-10 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-transparent"
                                />
                                <button
                                    type="button"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                    class="cursor-pointer absolute inset-y-0 right-0 pr-3 flex items-center"
                                >
                                    {move || if show_password.get() {
                                        view! { <EyeOff attr:class="h-5 w-5 text-gray-400 hover:text-gray-600" /> }.into_any()
                                    } else {
                                        view! { <Eye attr:class="h-5 w-5 text-gray-400 hover:text-gray-600" /> }.into_any()
                                    }}
                                </button>
                            </div>
                        </div>

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
                                "Sign In".into_any()
                            }}
                        </button>
                    </form>

                    <div class="mt-6 text-center">
                        <p class="text-sm text-gray-600">
                            "Don't have an account? "
                            <Link to="/signup" class="font-medium text-indigo-600 hover:text-indigo-500">
                                "Sign up here"
                            </Link>
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}
