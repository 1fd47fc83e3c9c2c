use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::domain::a001_product::ui::details::ProductDetails;
use crate::domain::a001_product::ui::list::ProductList;
use crate::domain::a002_order::ui::details::OrderDetails;
use crate::domain::a002_order::ui::list::OrderList;
use crate::layout::Shell;
use crate::system::auth::context::use_session;
use crate::system::pages::login::LoginPage;
use crate::system::pages::settings::SettingsPage;
use crate::system::users::ui::list::UsersListPage;

#[component]
fn MainLayout() -> impl IntoView {
    view! {
        <Shell>
            <Routes fallback=|| view! { <div class="warning-box">"Page not found"</div> }>
                <Route path=path!("/") view=|| view! { <Redirect path="/products" /> } />
                <Route path=path!("/products") view=ProductList />
                <Route path=path!("/products/new") view=ProductDetails />
                <Route path=path!("/products/:id") view=ProductDetails />
                <Route path=path!("/orders") view=OrderList />
                <Route path=path!("/orders/:id") view=OrderDetails />
                <Route path=path!("/users") view=UsersListPage />
                <Route path=path!("/settings") view=SettingsPage />
            </Routes>
        </Shell>
    }
}

/// Login page until a session exists, the routed shell afterwards
#[component]
pub fn AppRoutes() -> impl IntoView {
    let session = use_session();

    view! {
        <Router>
            <Show
                when=move || session.is_authenticated()
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Router>
    }
}
