use contracts::domain::a001_product::{Product, ProductCategory, ProductDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use leptos_router::NavigateOptions;

use crate::domain::a001_product::api;
use crate::system::auth::context::use_api;

/// Raw form fields, as typed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub image: String,
    pub attributes: String,
}

impl ProductForm {
    pub fn from_product(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            manufacturer: p.manufacturer.clone(),
            category: p.category.code().to_string(),
            price: format!("{:.2}", p.price),
            quantity: p.quantity.to_string(),
            image: p.image.clone().unwrap_or_default(),
            attributes: serde_json::to_string_pretty(&p.attributes).unwrap_or_default(),
        }
    }

    pub fn to_dto(&self) -> Result<ProductDto, String> {
        let category = ProductCategory::from_code(self.category.trim())
            .ok_or_else(|| "Choose a category".to_string())?;
        let price: f64 = self
            .price
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        let quantity: u32 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| "Stock must be a whole non-negative number".to_string())?;
        let attributes = if self.attributes.trim().is_empty() {
            serde_json::Map::new()
        } else {
            serde_json::from_str(&self.attributes)
                .map_err(|e| format!("Attributes must be a JSON object: {}", e))?
        };
        let image = Some(self.image.trim().to_string()).filter(|s| !s.is_empty());

        let dto = ProductDto {
            name: self.name.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            category,
            price,
            quantity,
            image,
            attributes,
        };
        dto.validate()?;
        Ok(dto)
    }
}

/// `/products/:id` (edit) and `/products/new` (create)
#[component]
pub fn ProductDetails() -> impl IntoView {
    let client = use_api();
    let params = use_params_map();
    let navigate = use_navigate();

    let id = move || params.read().get("id").filter(|id| id != "new");
    let form = RwSignal::new(ProductForm {
        category: ProductCategory::Cpu.code().to_string(),
        ..Default::default()
    });
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    if let Some(existing) = id() {
        let client = client.clone();
        spawn_local(async move {
            match api::fetch_product(&client, &existing).await {
                Ok(product) => form.set(ProductForm::from_product(&product)),
                Err(e) => error.set(Some(format!("Failed to load product: {}", e))),
            }
        });
    }

    let save = move |_: leptos::ev::MouseEvent| {
        let dto = match form.get_untracked().to_dto() {
            Ok(dto) => dto,
            Err(e) => {
                error.set(Some(e));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        let client = client.clone();
        let navigate = navigate.clone();
        let existing = id();
        spawn_local(async move {
            let result = match &existing {
                Some(id) => api::update_product(&client, id, &dto).await,
                None => api::create_product(&client, &dto).await.map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => navigate("/products", NavigateOptions::default()),
                Err(e) => error.set(Some(format!("Failed to save product: {}", e))),
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <h1 class="header__title">
                    {move || if id().is_some() { "Edit product" } else { "New product" }}
                </h1>
            </div>

            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}

            <div class="form">
                <div class="form__group">
                    <label>"Name"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.name = text);
                        }
                    />
                </div>
                <div class="form__group">
                    <label>"Manufacturer"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.manufacturer.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.manufacturer = text);
                        }
                    />
                </div>
                <div class="form__group">
                    <label>"Category"</label>
                    <select
                        prop:value=move || form.with(|f| f.category.clone())
                        on:change=move |ev| {
                            let code = event_target_value(&ev);
                            form.update(|f| f.category = code);
                        }
                    >
                        {ProductCategory::ALL.into_iter().map(|c| view! {
                            <option value=c.code()>{c.display_name()}</option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form__group">
                    <label>"Price"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.price.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.price = text);
                        }
                    />
                </div>
                <div class="form__group">
                    <label>"Stock"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.quantity.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.quantity = text);
                        }
                    />
                </div>
                <div class="form__group">
                    <label>"Image URL"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.image.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.image = text);
                        }
                    />
                </div>
                <div class="form__group">
                    <label>"Attributes (JSON)"</label>
                    <textarea
                        rows="8"
                        prop:value=move || form.with(|f| f.attributes.clone())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            form.update(|f| f.attributes = text);
                        }
                    ></textarea>
                </div>

                <button
                    class="button button--primary"
                    on:click=save
                    disabled=move || saving.get()
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
                <A href="/products">"Back to products"</A>
            </div>
        </div>
    }
}
