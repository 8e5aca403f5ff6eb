use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};

use crate::components::force_graph::{ForceGraphCanvas, ForceGraphHandle, GraphData};
use crate::config::{CurvaturePolicy, FIT_MS, FIT_PADDING, GraphConfig, PipelineConfig};
use crate::error::Error;
use crate::services::clipboard::copy_canvas_image;
use crate::services::generation::GenerationTracker;
use crate::services::key_storage::{ApiKeyStorage, KeyVisibility};
use crate::services::pipeline::KnowledgeGraphPipeline;

type PipelineSlot = Rc<RefCell<Option<KnowledgeGraphPipeline>>>;

/// Rebuild the pipeline for `key`; an empty key leaves it uninitialised.
fn init_pipeline(slot: &PipelineSlot, key: &str) {
	*slot.borrow_mut() =
		KnowledgeGraphPipeline::initialize(key, PipelineConfig::default(), CurvaturePolicy::default()).ok();
}

/// Text in, knowledge graph out.
#[component]
pub fn KnowledgeGraphPage() -> impl IntoView {
	let key_storage: ApiKeyStorage = ApiKeyStorage::default();
	let api_key = RwSignal::new(key_storage.load());
	let key_visibility = RwSignal::new(KeyVisibility::default());
	let loading = RwSignal::new(false);
	let error_message = RwSignal::new(None::<String>);
	let graph_data = RwSignal::new(GraphData::default());
	let graph_config = RwSignal::new(None::<GraphConfig>);

	let pipeline: PipelineSlot = Rc::new(RefCell::new(None));
	let tracker = GenerationTracker::default();
	let handle = ForceGraphHandle::default();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let input_ref = NodeRef::<leptos::html::Textarea>::new();

	// Size the canvas once the card body is mounted.
	let pipeline_init = pipeline.clone();
	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if graph_config.get_untracked().is_some() {
			return;
		}
		init_pipeline(&pipeline_init, &api_key.get_untracked());
		graph_config.set(Some(GraphConfig::from_container(
			container.offset_width() as f64,
			container.offset_height() as f64,
		)));
	});

	let pipeline_save = pipeline.clone();
	let on_save_key = move |_| {
		let key = api_key.get_untracked();
		key_storage.save(&key);
		init_pipeline(&pipeline_save, &key);
		error_message.set(None);
	};

	let on_toggle_key = move |_| key_visibility.update(|v| *v = v.toggled());

	let (pipeline_gen, tracker_gen) = (pipeline.clone(), tracker.clone());
	let on_generate = move |_| {
		let Some(textarea) = input_ref.get() else {
			return;
		};
		let text = textarea.value().trim().to_owned();
		if text.is_empty() {
			return;
		}
		let Some(pipeline) = pipeline_gen.borrow().clone() else {
			error_message.set(Some(Error::MissingApiKey.to_string()));
			return;
		};

		graph_data.set(GraphData::default());
		error_message.set(None);
		loading.set(true);
		let (tracker, seq) = (tracker_gen.clone(), tracker_gen.begin());
		spawn_local(async move {
			let result = pipeline.generate_graph(&text).await;
			if !tracker.is_current(seq) {
				debug!("Discarding stale generation #{seq}");
				return;
			}
			loading.set(false);
			match result {
				Ok(data) => graph_data.set(data),
				Err(err) => {
					error!("Graph generation failed: {err}");
					error_message.set(Some(err.to_string()));
				}
			}
		});
	};

	let on_clear = move |_| {
		if let Some(textarea) = input_ref.get() {
			textarea.set_value("");
		}
		tracker.cancel_all();
		loading.set(false);
		error_message.set(None);
		graph_data.set(GraphData::default());
	};

	let handle_fit = handle.clone();
	let on_fit = move |_| handle_fit.zoom_to_fit(FIT_MS, FIT_PADDING);

	let handle_shot = handle.clone();
	let on_screenshot = move |_| {
		let Some(canvas) = handle_shot.canvas() else {
			return;
		};
		spawn_local(async move {
			match copy_canvas_image(&canvas).await {
				Ok(()) => info!("Graph image copied to clipboard"),
				Err(err) => error!("oops, something went wrong! {err}"),
			}
		});
	};

	view! {
		<div class="knowledge-graph">
			<div class="key-row">
				<input
					class="api-key"
					placeholder="OpenAI API key"
					type=move || key_visibility.get().input_type()
					prop:value=move || api_key.get()
					on:input=move |ev| api_key.set(event_target_value(&ev))
				/>
				<button on:click=on_toggle_key>
					{move || match key_visibility.get() {
						KeyVisibility::Masked => "Show",
						KeyVisibility::Plain => "Hide",
					}}
				</button>
				<button on:click=on_save_key>"Save key"</button>
			</div>

			<textarea
				node_ref=input_ref
				class="input-text"
				rows="6"
				placeholder="Paste or type the text to turn into a knowledge graph"
			/>

			<div class="actions">
				<button on:click=on_generate disabled=move || loading.get()>"Generate"</button>
				<button on:click=on_clear>"Clear"</button>
				<button on:click=on_fit>"Fit to canvas"</button>
				<button on:click=on_screenshot>"Screenshot"</button>
				<Show when=move || loading.get()>
					<span class="loading">"Generating graph..."</span>
				</Show>
			</div>

			{move || error_message.get().map(|msg| view! { <p class="error">{msg}</p> })}

			<div class="graph-card-body" node_ref=container_ref>
				<ForceGraphCanvas data=graph_data config=graph_config handle=handle />
			</div>
		</div>
	}
}
