use contracts::domain::a002_order::{CreateOrderDto, Order, OrderItem, OrderStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use thaw::*;

use crate::domain::a002_order::api;
use crate::shared::date_utils::format_timestamp;
use crate::shared::list_utils::{get_sort_indicator, sort_list, Sortable};
use crate::system::auth::context::use_api;

impl Sortable for Order {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "email" => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            "status" => self.status.as_str().cmp(other.status.as_str()),
            "total_price" => self.total_price.total_cmp(&other.total_price),
            _ => self.created_at.cmp(&other.created_at),
        }
    }
}

/// Options for the status picker; an unknown current status stays selectable
pub fn status_options(current: &OrderStatus) -> Vec<OrderStatus> {
    let mut options = OrderStatus::KNOWN.to_vec();
    if !options.contains(current) {
        options.push(current.clone());
    }
    options
}

/// Parse `productId: quantity` lines; blank lines are skipped
pub fn parse_order_lines(raw: &str) -> Result<Vec<OrderItem>, String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (id, qty) = line
                .split_once(':')
                .ok_or_else(|| format!("Expected `product: quantity`, got `{}`", line))?;
            let quantity = qty
                .trim()
                .parse()
                .map_err(|_| format!("Bad quantity in `{}`", line))?;
            Ok(OrderItem {
                product_id: id.trim().to_string(),
                quantity,
            })
        })
        .collect()
}

#[component]
pub fn OrderList() -> impl IntoView {
    let client = use_api();

    let orders: RwSignal<Vec<Order>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let sort_field = RwSignal::new("created_at".to_string());
    let sort_ascending = RwSignal::new(false);

    let load_data = {
        let client = client.clone();
        move || {
            set_loading.set(true);
            set_error.set(None);
            let client = client.clone();
            spawn_local(async move {
                match api::fetch_orders(&client).await {
                    Ok(data) => orders.set(data),
                    Err(e) => set_error.set(Some(format!("Failed to load orders: {}", e))),
                }
                set_loading.set(false);
            });
        }
    };

    load_data();

    let change_status = {
        let client = client.clone();
        move |id: String, status: OrderStatus| {
            let client = client.clone();
            spawn_local(async move {
                match api::update_status(&client, &id, status.clone()).await {
                    Ok(()) => {
                        log::info!("Order {} set to {}", id, status);
                        orders.update(|list| {
                            if let Some(order) = list.iter_mut().find(|o| o.id == id) {
                                order.status = status;
                            }
                        });
                    }
                    Err(e) => set_error.set(Some(format!("Failed to update order {}: {}", id, e))),
                }
            });
        }
    };

    let show_create_form = RwSignal::new(false);
    let new_email = RwSignal::new(String::new());
    let new_address = RwSignal::new(String::new());
    let new_lines = RwSignal::new(String::new());

    let create = {
        let client = client.clone();
        let load_data = load_data.clone();
        Callback::new(move |_: leptos::ev::MouseEvent| {
            let dto = parse_order_lines(&new_lines.get_untracked()).and_then(|items| {
                let dto = CreateOrderDto {
                    email: new_email.get_untracked().trim().to_string(),
                    address: new_address.get_untracked().trim().to_string(),
                    items,
                };
                dto.validate().map(|_| dto)
            });
            let dto = match dto {
                Ok(dto) => dto,
                Err(e) => {
                    set_error.set(Some(e));
                    return;
                }
            };
            set_error.set(None);
            let client = client.clone();
            let load_data = load_data.clone();
            spawn_local(async move {
                match api::create_order(&client, &dto).await {
                    Ok(()) => {
                        log::info!("Created order for {}", dto.email);
                        new_email.set(String::new());
                        new_address.set(String::new());
                        new_lines.set(String::new());
                        show_create_form.set(false);
                        load_data();
                    }
                    Err(e) => set_error.set(Some(format!("Failed to create order: {}", e))),
                }
            });
        })
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
        let mut list = orders.get();
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
                    <h1 class="header__title">"Orders"</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| show_create_form.update(|v| *v = !*v)
                    >
                        "New order"
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
                        <Input value=new_email placeholder="Customer email" />
                        <Input value=new_address placeholder="Delivery address" />
                        <textarea
                            rows="4"
                            placeholder="One line per item: productId: quantity"
                            prop:value=move || new_lines.get()
                            on:input=move |ev| new_lines.set(event_target_value(&ev))
                        ></textarea>
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
                            <th class="table__header-cell">"Order"</th>
                            {header("email", "Email")}
                            {header("created_at", "Created")}
                            {header("total_price", "Total")}
                            {header("status", "Status")}
                        </tr>
                    </thead>
                    <tbody>
                        {move || sorted.get().into_iter().map(|order| {
                            let change_status = change_status.clone();
                            let id = order.id.clone();
                            let current = order.status.clone();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">
                                        <A href=format!("/orders/{}", order.id)>{order.id.clone()}</A>
                                    </td>
                                    <td class="table__cell">{order.email.clone()}</td>
                                    <td class="table__cell">{format_timestamp(&order.created_at)}</td>
                                    <td class="table__cell">{format!("{:.2}", order.total_price)}</td>
                                    <td class="table__cell">
                                        <select on:change=move |ev| {
                                            let status = OrderStatus::from(event_target_value(&ev));
                                            change_status(id.clone(), status);
                                        }>
                                            {status_options(&current).into_iter().map(|s| {
                                                let selected = s == current;
                                                view! {
                                                    <option value=s.as_str().to_string() selected=selected>
                                                        {s.as_str().to_string()}
                                                    </option>
                                                }
                                            }).collect_view()}
                                        </select>
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
