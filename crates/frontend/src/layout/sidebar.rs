//! Sidebar navigation

use leptos::prelude::*;
use leptos_router::components::A;

use crate::system::auth::context::use_session;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuItem {
    pub href: &'static str,
    pub label: &'static str,
    pub admin_only: bool,
}

pub const MENU_ITEMS: [MenuItem; 4] = [
    MenuItem { href: "/products", label: "Products", admin_only: false },
    MenuItem { href: "/orders", label: "Orders", admin_only: false },
    MenuItem { href: "/users", label: "Users", admin_only: true },
    MenuItem { href: "/settings", label: "Settings", admin_only: false },
];

/// Entries the current user may see
pub fn visible_items(is_admin: bool) -> Vec<MenuItem> {
    MENU_ITEMS
        .into_iter()
        .filter(|item| is_admin || !item.admin_only)
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = use_session();

    view! {
        <nav class="sidebar">
            <ul class="sidebar__menu">
                {move || visible_items(session.is_admin()).into_iter().map(|item| view! {
                    <li class="sidebar__item">
                        <A href=item.href>{item.label}</A>
                    </li>
                }).collect_view()}
            </ul>
        </nav>
    }
}
