use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_client::ApiError;
use crate::system::auth::api;
use crate::system::auth::context::{use_api, use_session};

/// Text shown under the form for a failed login
pub fn login_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => "Invalid email or password".to_string(),
        ApiError::Validation(msg) => msg.clone(),
        other => format!("Login failed: {}", other),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let client = use_api();
    let session = use_session();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get_untracked().trim().to_string();
        let password_val = password.get_untracked();
        if email_val.is_empty() || password_val.is_empty() {
            set_error_message.set(Some("Enter email and password".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        let client = client.clone();
        let session = session.clone();
        spawn_local(async move {
            let result = match api::login(&client, email_val.clone(), password_val).await {
                Ok(token) => session.login_with_token(token),
                Err(e) => Err(login_error_message(&e)),
            };
            match result {
                // the session signal flips the shell over to the main layout
                Ok(()) => log::info!("Signed in as {}", email_val),
                Err(msg) => set_error_message.set(Some(msg)),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Store Admin"</h1>
                <h2>"Sign in"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            type="email"
                            id="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_message() {
        assert_eq!(
            login_error_message(&ApiError::Unauthorized),
            "Invalid email or password"
        );
        assert_eq!(
            login_error_message(&ApiError::Validation("email must be an email".into())),
            "email must be an email"
        );
        assert!(login_error_message(&ApiError::Network("offline".into())).starts_with("Login failed"));
    }
}
