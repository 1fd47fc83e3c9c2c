use contracts::domain::a001_product::{Product, ProductCategory};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use thaw::*;

use crate::domain::a001_product::api;
use crate::shared::list_utils::{page_count, page_slice};
use crate::shared::settings_store::use_settings;
use crate::system::auth::context::use_api;
use crate::usecases::u501_bulk_price_update::BulkPriceUpdatePanel;

/// Products matching the category filter and search text
pub fn filter_products(
    products: &[Product],
    category: Option<ProductCategory>,
    query: &str,
) -> Vec<Product> {
    products
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| p.matches_query(query))
        .cloned()
        .collect()
}

#[component]
pub fn ProductList() -> impl IntoView {
    let client = use_api();
    let settings = use_settings();

    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let category = RwSignal::new(None::<ProductCategory>);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(0usize);

    let load_data = {
        let client = client.clone();
        move || {
            set_loading.set(true);
            set_error.set(None);
            let client = client.clone();
            spawn_local(async move {
                match api::fetch_products(&client).await {
                    Ok(data) => products.set(data),
                    Err(e) => set_error.set(Some(format!("Failed to load products: {}", e))),
                }
                set_loading.set(false);
            });
        }
    };

    load_data();

    let visible = Memo::new(move |_| {
        products.with(|p| filter_products(p, category.get(), &search.get()))
    });

    let page_size = {
        let settings = settings.clone();
        Signal::derive(move || settings.page_size())
    };

    let delete = {
        let client = client.clone();
        let load_data = load_data.clone();
        move |product: Product| {
            if settings.confirm_deletes() {
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message(&format!("Delete {}?", product.name))
                            .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return;
                }
            }
            let client = client.clone();
            let load_data = load_data.clone();
            spawn_local(async move {
                match api::delete_product(&client, &product.id).await {
                    Ok(()) => {
                        log::info!("Deleted product {}", product.id);
                        load_data();
                    }
                    Err(e) => set_error.set(Some(format!("Failed to delete {}: {}", product.name, e))),
                }
            });
        }
    };

    let on_batch_finished = {
        let load_data = load_data.clone();
        Callback::new(move |_: ()| load_data())
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Products"</h1>
                </div>
                <div class="header__actions">
                    <A href="/products/new">"New product"</A>
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

            <BulkPriceUpdatePanel products=Signal::derive(move || products.get()) on_finished=on_batch_finished />

            <Flex gap=FlexGap::Small align=FlexAlign::End>
                <select on:change=move |ev| {
                    category.set(ProductCategory::from_code(&event_target_value(&ev)));
                    page.set(0);
                }>
                    <option value="">"All categories"</option>
                    {ProductCategory::ALL.into_iter().map(|c| view! {
                        <option value=c.code()>{c.display_name()}</option>
                    }).collect_view()}
                </select>
                <div style="flex: 1; max-width: 320px;">
                    <Input value=search placeholder="Name or manufacturer..." />
                </div>
            </Flex>

            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            <Show when=move || loading.get()>
                <Spinner />
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Name"</th>
                            <th class="table__header-cell">"Manufacturer"</th>
                            <th class="table__header-cell">"Category"</th>
                            <th class="table__header-cell">"Price"</th>
                            <th class="table__header-cell">"Stock"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = page_slice(&visible.get(), page.get(), page_size.get());
                            rows.into_iter().map(|product| {
                                let delete = delete.clone();
                                let for_delete = product.clone();
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">
                                            <A href=format!("/products/{}", product.id)>{product.name.clone()}</A>
                                        </td>
                                        <td class="table__cell">{product.manufacturer.clone()}</td>
                                        <td class="table__cell">{product.category.display_name()}</td>
                                        <td class="table__cell">{format!("{:.2}", product.price)}</td>
                                        <td class="table__cell">{product.quantity}</td>
                                        <td class="table__cell">
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| delete(for_delete.clone())
                                            >
                                                "Delete"
                                            </Button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()
                        }}
                    </tbody>
                </table>
            </div>

            <div class="pagination">
                <button
                    disabled=move || page.get() == 0
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1))
                >
                    "Previous"
                </button>
                <span>
                    {move || format!(
                        "Page {} of {}",
                        page.get() + 1,
                        page_count(visible.with(|v| v.len()), page_size.get())
                    )}
                </span>
                <button
                    disabled=move || page.get() + 1 >= page_count(visible.with(|v| v.len()), page_size.get())
                    on:click=move |_| page.update(|p| *p += 1)
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, name: &str, category: &str) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "manufacturer": "Acme",
            "category": category,
            "price": 10.0,
            "quantity": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_products() {
        let items = vec![
            product("1", "Fast CPU", "cpu"),
            product("2", "Big GPU", "gpu"),
            product("3", "Slow CPU", "cpu"),
        ];
        assert_eq!(filter_products(&items, None, "").len(), 3);
        assert_eq!(filter_products(&items, Some(ProductCategory::Cpu), "").len(), 2);
        let found = filter_products(&items, Some(ProductCategory::Cpu), "slow");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");
        assert!(filter_products(&items, Some(ProductCategory::Ram), "").is_empty());
    }
}
