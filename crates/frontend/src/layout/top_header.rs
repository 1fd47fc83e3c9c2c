//! Application top bar: title, signed-in user and logout

use leptos::prelude::*;

use crate::system::auth::context::{do_logout, use_session};

#[component]
pub fn TopHeader() -> impl IntoView {
    let session = use_session();

    let user_label = {
        let session = session.clone();
        move || {
            let name = session.display_name();
            if session.is_admin() {
                format!("{} (admin)", name)
            } else {
                name
            }
        }
    };

    let logout = move |_| do_logout(&session);

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">"Store Admin"</span>
            </div>
            <div class="top-header__actions">
                <span class="top-header__user">{user_label}</span>
                <button class="top-header__icon-btn" on:click=logout>
                    "Log out"
                </button>
            </div>
        </div>
    }
}
