use contracts::system::users::{CreateUserDto, UpdateUserDto, User, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::list_utils::{get_sort_indicator, sort_list, Sortable};
use crate::shared::settings_store::use_settings;
use crate::system::auth::context::{use_api, use_session};
use crate::system::auth::guard::RequireAdmin;
use crate::system::users::api;

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "email" => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            "role" => self.role.as_str().cmp(other.role.as_str()),
            _ => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
        }
    }
}

/// Role a toggle switches to
pub fn toggled_role(role: UserRole) -> UserRole {
    match role {
        UserRole::Admin => UserRole::User,
        UserRole::User => UserRole::Admin,
    }
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <UsersList />
        </RequireAdmin>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let client = use_api();
    let session = use_session();
    let settings = use_settings();

    let users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let sort_field = RwSignal::new("name".to_string());
    let sort_ascending = RwSignal::new(true);

    let new_name = RwSignal::new(String::new());
    let new_email = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let new_address = RwSignal::new(String::new());
    let new_is_admin = RwSignal::new(false);

    let load_data = {
        let client = client.clone();
        move || {
            set_loading.set(true);
            set_error.set(None);
            let client = client.clone();
            spawn_local(async move {
                match api::fetch_users(&client).await {
                    Ok(data) => users.set(data),
                    Err(e) => set_error.set(Some(format!("Failed to load users: {}", e))),
                }
                set_loading.set(false);
            });
        }
    };

    load_data();

    let create = {
        let client = client.clone();
        let load_data = load_data.clone();
        Callback::new(move |_: leptos::ev::MouseEvent| {
            let address = new_address.get_untracked();
            let dto = CreateUserDto {
                name: new_name.get_untracked().trim().to_string(),
                email: new_email.get_untracked().trim().to_string(),
                password: new_password.get_untracked(),
                address: Some(address.trim().to_string()).filter(|a| !a.is_empty()),
                role: if new_is_admin.get_untracked() {
                    UserRole::Admin
                } else {
                    UserRole::User
                },
            };
            if let Err(e) = dto.validate() {
                set_error.set(Some(e));
                return;
            }
            set_error.set(None);
            let client = client.clone();
            let load_data = load_data.clone();
            spawn_local(async move {
                match api::create_user(&client, &dto).await {
                    Ok(()) => {
                        log::info!("Created user {}", dto.email);
                        new_name.set(String::new());
                        new_email.set(String::new());
                        new_password.set(String::new());
                        new_address.set(String::new());
                        new_is_admin.set(false);
                        set_show_create_form.set(false);
                        load_data();
                    }
                    Err(e) => set_error.set(Some(format!("Failed to create user: {}", e))),
                }
            });
        })
    };

    let toggle_role = {
        let client = client.clone();
        move |user: User| {
            let role = toggled_role(user.role);
            let dto = UpdateUserDto {
                role: Some(role),
                ..Default::default()
            };
            let client = client.clone();
            spawn_local(async move {
                match api::update_user(&client, &user.id, &dto).await {
                    Ok(()) => users.update(|list| {
                        if let Some(u) = list.iter_mut().find(|u| u.id == user.id) {
                            u.role = role;
                        }
                    }),
                    Err(e) => set_error.set(Some(format!("Failed to update {}: {}", user.email, e))),
                }
            });
        }
    };

    let delete = {
        let client = client.clone();
        move |user: User| {
            if settings.confirm_deletes() {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message(&format!("Delete {}?", user.email)).ok())
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
            }
            let client = client.clone();
            spawn_local(async move {
                match api::delete_user(&client, &user.id).await {
                    Ok(()) => {
                        log::info!("Deleted user {}", user.id);
                        users.update(|list| list.retain(|u| u.id != user.id));
                    }
                    Err(e) => set_error.set(Some(format!("Failed to delete {}: {}", user.email, e))),
                }
            });
        }
    };

    let toggle_sort = move |field: &'static str| {
        move |_| {
            if sort_field.get_untracked() == field {
                sort_ascending.update(|a| *a = !*a);
            } else {
                sort_field.set(field.to_string());
                sort_ascending.set(true);
            }
        }
    };

    let sorted = Memo::new(move |_| {
        let mut list = users.get();
        sort_list(&mut list, &sort_field.get(), sort_ascending.get());
        list
    });

    let header = move |field: &'static str, title: &'static str| {
        view! {
            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort(field)>
                {title}
                {move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())}
            </th>
        }
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Users"</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| set_show_create_form.update(|v| *v = !*v)
                    >
                        "New user"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click={
                            let load_data = load_data.clone();
                            move |_| load_data()
                        }
                        disabled=Signal::derive(move || loading.get())
                    >
                        "Refresh"
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            <Show when=move || show_create_form.get()>
                <div class="card">
                    <Flex vertical=true gap=FlexGap::Small>
                        <Input value=new_name placeholder="Name" />
                        <Input value=new_email placeholder="Email" />
                        <Input value=new_password input_type=InputType::Password placeholder="Password" />
                        <Input value=new_address placeholder="Address (optional)" />
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || new_is_admin.get()
                                on:change=move |ev| new_is_admin.set(event_target_checked(&ev))
                            />
                            " Administrator"
                        </label>
                        <Button appearance=ButtonAppearance::Primary on_click=move |ev| create.run(ev)>
                            "Create"
                        </Button>
                    </Flex>
                </div>
            </Show>

            <Show when=move || loading.get()>
                <Spinner />
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {header("name", "Name")}
                            {header("email", "Email")}
                            <th class="table__header-cell">"Address"</th>
                            {header("role", "Role")}
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || sorted.get().into_iter().map(|user| {
                            let toggle_role = toggle_role.clone();
                            let delete = delete.clone();
                            let for_toggle = user.clone();
                            let for_delete = user.clone();
                            // the signed-in admin cannot demote or delete themselves
                            let is_self = session.user_id().as_deref() == Some(user.id.as_str());
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{user.name.clone()}</td>
                                    <td class="table__cell">{user.email.clone()}</td>
                                    <td class="table__cell">{user.address.clone().unwrap_or_default()}</td>
                                    <td class="table__cell">{user.role.as_str()}</td>
                                    <td class="table__cell">
                                        <button
                                            class="button button--secondary"
                                            disabled=is_self
                                            on:click=move |_| toggle_role(for_toggle.clone())
                                        >
                                            {if user.role.is_admin() { "Make user" } else { "Make admin" }}
                                        </button>
                                        <button
                                            class="button button--subtle"
                                            disabled=is_self
                                            on:click=move |_| delete(for_delete.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_role() {
        assert_eq!(toggled_role(UserRole::User), UserRole::Admin);
        assert_eq!(toggled_role(UserRole::Admin), UserRole::User);
    }
}
