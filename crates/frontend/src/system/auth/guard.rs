use leptos::prelude::*;

use super::context::use_session;

/// Renders children for admins only, a notice for everyone else
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    view! {
        <Show
            when=move || session.is_authenticated() && session.is_admin()
            fallback=|| view! { <div class="warning-box">"Access denied. Admin privileges required."</div> }
        >
            {children()}
        </Show>
    }
}
