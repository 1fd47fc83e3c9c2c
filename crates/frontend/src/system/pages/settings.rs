use contracts::shared::settings::{
    AppSettings, BATCH_STEP_DELAY_KEY, CONFIRM_DELETES_KEY, PAGE_SIZE_KEY,
};
use contracts::system::users::ChangePasswordDto;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::json;
use thaw::*;

use crate::shared::settings_store::use_settings;
use crate::system::auth::api;
use crate::system::auth::context::use_api;

/// Editable copy of the settings page fields
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsForm {
    pub page_size: String,
    pub batch_step_delay_ms: String,
    pub confirm_deletes: bool,
}

impl SettingsForm {
    pub fn from_settings(settings: &AppSettings, effective_delay_ms: u32) -> Self {
        Self {
            page_size: settings.page_size().to_string(),
            batch_step_delay_ms: effective_delay_ms.to_string(),
            confirm_deletes: settings.confirm_deletes(),
        }
    }

    /// Write the form into `settings`; nothing is touched on error
    pub fn apply(&self, settings: &mut AppSettings) -> Result<(), String> {
        let page_size: u32 = self
            .page_size
            .trim()
            .parse()
            .ok()
            .filter(|n| (1..=500).contains(n))
            .ok_or_else(|| "Page size must be between 1 and 500".to_string())?;
        let delay: u32 = self
            .batch_step_delay_ms
            .trim()
            .parse()
            .ok()
            .filter(|n| *n <= 10_000)
            .ok_or_else(|| "Batch delay must be between 0 and 10000 ms".to_string())?;

        settings.set(PAGE_SIZE_KEY, json!(page_size));
        settings.set(BATCH_STEP_DELAY_KEY, json!(delay));
        settings.set(CONFIRM_DELETES_KEY, json!(self.confirm_deletes));
        Ok(())
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    view! {
        <div class="page">
            <div class="header">
                <h1 class="header__title">"Settings"</h1>
            </div>
            <PreferencesForm />
            <ChangePasswordForm />
        </div>
    }
}

#[component]
fn PreferencesForm() -> impl IntoView {
    let settings = use_settings();
    let initial = SettingsForm::from_settings(&settings.snapshot(), settings.batch_step_delay_ms());

    let page_size = RwSignal::new(initial.page_size);
    let delay = RwSignal::new(initial.batch_step_delay_ms);
    let confirm_deletes = RwSignal::new(initial.confirm_deletes);
    let message = RwSignal::new(None::<Result<String, String>>);

    let save = move |_: leptos::ev::MouseEvent| {
        let form = SettingsForm {
            page_size: page_size.get_untracked(),
            batch_step_delay_ms: delay.get_untracked(),
            confirm_deletes: confirm_deletes.get_untracked(),
        };
        // validate on a copy so a bad field leaves the stored settings alone
        let mut next = settings.snapshot();
        match form.apply(&mut next) {
            Ok(()) => {
                settings.update(|s| *s = next);
                log::info!("Settings saved");
                message.set(Some(Ok("Settings saved".to_string())));
            }
            Err(e) => message.set(Some(Err(e))),
        }
    };

    view! {
        <div class="card">
            <h3 class="card__title">"Preferences"</h3>
            <Flex vertical=true gap=FlexGap::Small>
                <label>"Rows per page"</label>
                <Input value=page_size input_type=InputType::Number />
                <label>"Delay between bulk update steps (ms)"</label>
                <Input value=delay input_type=InputType::Number />
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || confirm_deletes.get()
                        on:change=move |ev| confirm_deletes.set(event_target_checked(&ev))
                    />
                    " Ask before deleting"
                </label>
                <Button appearance=ButtonAppearance::Primary on_click=save>
                    "Save"
                </Button>
                {move || message.get().map(|m| match m {
                    Ok(text) => view! { <div class="status-line">{text}</div> }.into_any(),
                    Err(text) => view! { <div class="error-message">{text}</div> }.into_any(),
                })}
            </Flex>
        </div>
    }
}

#[component]
fn ChangePasswordForm() -> impl IntoView {
    let client = use_api();

    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let message = RwSignal::new(None::<Result<String, String>>);

    let submit = move |_: leptos::ev::MouseEvent| {
        let dto = ChangePasswordDto {
            old_password: old_password.get_untracked(),
            new_password: new_password.get_untracked(),
        };
        if let Err(e) = dto.validate(&confirmation.get_untracked()) {
            message.set(Some(Err(e)));
            return;
        }
        saving.set(true);
        message.set(None);
        let client = client.clone();
        spawn_local(async move {
            match api::change_password(&client, &dto).await {
                Ok(()) => {
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirmation.set(String::new());
                    message.set(Some(Ok("Password changed".to_string())));
                }
                Err(e) => message.set(Some(Err(format!("Failed to change password: {}", e)))),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="card">
            <h3 class="card__title">"Change password"</h3>
            <Flex vertical=true gap=FlexGap::Small>
                <Input value=old_password input_type=InputType::Password placeholder="Current password" />
                <Input value=new_password input_type=InputType::Password placeholder="New password" />
                <Input value=confirmation input_type=InputType::Password placeholder="Repeat new password" />
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || saving.get())
                >
                    "Change password"
                </Button>
                {move || message.get().map(|m| match m {
                    Ok(text) => view! { <div class="status-line">{text}</div> }.into_any(),
                    Err(text) => view! { <div class="error-message">{text}</div> }.into_any(),
                })}
            </Flex>
        </div>
    }
}
