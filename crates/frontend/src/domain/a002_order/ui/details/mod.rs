use contracts::domain::a002_order::Order;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::domain::a002_order::api;
use crate::shared::date_utils::format_timestamp;
use crate::system::auth::context::use_api;

/// `/orders/:id`: order header and line items
#[component]
pub fn OrderDetails() -> impl IntoView {
    let client = use_api();
    let params = use_params_map();

    let order = RwSignal::new(None::<Order>);
    let error = RwSignal::new(None::<String>);

    let id = params.read_untracked().get("id").unwrap_or_default();
    spawn_local(async move {
        match api::fetch_order(&client, &id).await {
            Ok(data) => order.set(Some(data)),
            Err(e) => error.set(Some(format!("Failed to load order {}: {}", id, e))),
        }
    });

    view! {
        <div class="page">
            <div class="header">
                <h1 class="header__title">"Order"</h1>
                <A href="/orders">"Back to orders"</A>
            </div>

            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}

            {move || order.get().map(|o| {
                let item_count = o.item_count();
                let items = o.items.clone();
                view! {
                    <div class="details">
                        <div class="details__row"><span>"Id"</span><span>{o.id.clone()}</span></div>
                        <div class="details__row"><span>"Email"</span><span>{o.email.clone()}</span></div>
                        <div class="details__row"><span>"Address"</span><span>{o.address.clone()}</span></div>
                        <div class="details__row"><span>"Status"</span><span>{o.status.to_string()}</span></div>
                        <div class="details__row"><span>"Created"</span><span>{format_timestamp(&o.created_at)}</span></div>
                        <div class="details__row">
                            <span>"Total"</span><span>{format!("{:.2}", o.total_price)}</span>
                        </div>
                    </div>

                    <table class="table__data">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Product"</th>
                                <th class="table__header-cell">"Quantity"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {items.into_iter().map(|item| {
                                let href = format!("/products/{}", item.product_id);
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">
                                            <A href=href>{item.product_id}</A>
                                        </td>
                                        <td class="table__cell">{item.quantity}</td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                        <tfoot>
                            <tr>
                                <td class="table__cell">"Items"</td>
                                <td class="table__cell">{item_count}</td>
                            </tr>
                        </tfoot>
                    </table>
                }
            })}
        </div>
    }
}
