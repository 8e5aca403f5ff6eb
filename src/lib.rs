//! Leptos client-side app that turns free text into a knowledge graph and
//! draws it on a force-directed canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

// Modules
mod components;
pub mod config;
pub mod error;
mod pages;
pub mod services;

pub use components::force_graph;

// Top-Level pages
use crate::pages::knowledge_graph::KnowledgeGraphPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the knowledge graph page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Knowledge Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=KnowledgeGraphPage />
				</Routes>
			</Router>
		</ErrorBoundary>
	}
}
