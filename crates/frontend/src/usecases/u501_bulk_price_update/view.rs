use contracts::domain::a001_product::Product;
use contracts::usecases::u501_bulk_price_update::{
    parse_percent_input, BatchProgress, BatchSummary, BulkPriceUpdate, PriceBatchJob, PERCENT_MAX,
    PERCENT_MIN,
};
use contracts::usecases::common::UseCaseMetadata;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::runner::{run_price_batch, BatchSink, CancelToken};
use crate::shared::settings_store::use_settings;
use crate::system::auth::context::use_api;

/// Pushes runner progress into the panel's signals
struct PanelSink {
    status: RwSignal<Option<String>>,
    progress: RwSignal<Option<BatchProgress>>,
    on_finished: Callback<()>,
}

impl BatchSink for PanelSink {
    fn progress(&mut self, progress: &BatchProgress) {
        self.status.set(Some(progress.message.clone()));
        self.progress.set(Some(progress.clone()));
    }

    fn finished(&mut self, summary: &BatchSummary) {
        self.status.set(Some(summary.message.clone()));
        self.progress.set(None);
        self.on_finished.run(());
    }
}

/// Bulk percentage price change over the products currently loaded.
///
/// `on_finished` fires once per run; the owner refetches the list there.
#[component]
pub fn BulkPriceUpdatePanel(
    #[prop(into)] products: Signal<Vec<Product>>,
    #[prop(into)] on_finished: Callback<()>,
) -> impl IntoView {
    let client = use_api();
    let settings = use_settings();

    let percent_input = RwSignal::new(String::new());
    let pending_percent = RwSignal::new(None::<f64>);
    let running = RwSignal::new(false);
    let status = RwSignal::new(None::<String>);
    let error = RwSignal::new(None::<String>);
    let progress = RwSignal::new(None::<BatchProgress>);
    let cancel = CancelToken::new();

    let request_confirm = move |_: leptos::ev::MouseEvent| {
        error.set(None);
        match parse_percent_input(&percent_input.get_untracked()) {
            Ok(percent) => pending_percent.set(Some(percent)),
            Err(e) => error.set(Some(e)),
        }
    };

    // Dropping the pending percent discards the job before anything is sent
    let discard = move |_: leptos::ev::MouseEvent| pending_percent.set(None);

    let start = {
        let cancel = cancel.clone();
        move |_: leptos::ev::MouseEvent| {
            let Some(percent) = pending_percent.get_untracked() else {
                return;
            };
            pending_percent.set(None);

            let job = match PriceBatchJob::new(&products.get_untracked(), percent) {
                Ok(job) => job,
                Err(e) => {
                    error.set(Some(e));
                    return;
                }
            };

            cancel.reset();
            running.set(true);
            status.set(Some(job.message().to_string()));

            let client = client.clone();
            let cancel = cancel.clone();
            let delay = settings.batch_step_delay_ms();
            spawn_local(async move {
                let mut sink = PanelSink {
                    status,
                    progress,
                    on_finished,
                };
                run_price_batch(job, &client, &cancel, &mut sink, || TimeoutFuture::new(delay))
                    .await;
                running.set(false);
            });
        }
    };

    let stop = Callback::new(move |_: leptos::ev::MouseEvent| cancel.cancel());

    view! {
        <div class="card" id=BulkPriceUpdate::full_name()>
            <h3 class="card__title">{BulkPriceUpdate::display_name()}</h3>
            <p class="card__description">{BulkPriceUpdate::description()}</p>

            <Flex gap=FlexGap::Small align=FlexAlign::End>
                <div style="max-width: 160px;">
                    <Input
                        value=percent_input
                        placeholder=format!("% ({} .. {})", PERCENT_MIN, PERCENT_MAX)
                        disabled=Signal::derive(move || running.get() || pending_percent.get().is_some())
                    />
                </div>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=request_confirm
                    disabled=Signal::derive(move || running.get() || pending_percent.get().is_some())
                >
                    "Apply"
                </Button>
                <Show when=move || running.get()>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |ev| stop.run(ev)>
                        "Stop"
                    </Button>
                </Show>
            </Flex>

            {move || pending_percent.get().map(|percent| {
                let count = products.with(|p| p.len());
                view! {
                    <div class="warning-box">
                        <span class="warning-box__text">
                            {format!("Change the price of {} products by {}%?", count, percent)}
                        </span>
                        <Button appearance=ButtonAppearance::Primary on_click=start.clone()>
                            "Confirm"
                        </Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=discard>
                            "Cancel"
                        </Button>
                    </div>
                }
            })}

            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            {move || progress.get().map(|p| view! {
                <progress max="100" value=p.percent_done().to_string()></progress>
            })}

            {move || status.get().map(|s| view! {
                <div class="status-line">{s}</div>
            })}
        </div>
    }
}
