//! Copy the rendered graph to the system clipboard as a PNG.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, HtmlCanvasElement};

use crate::error::{Error, Result};

async fn canvas_to_blob(canvas: &HtmlCanvasElement) -> Result<Blob> {
	let promise = Promise::new(&mut |resolve, reject| {
		let on_blob = Closure::once_into_js(move |blob: JsValue| {
			let _ = resolve.call1(&JsValue::NULL, &blob);
		});
		if let Err(err) = canvas.to_blob(on_blob.unchecked_ref()) {
			let _ = reject.call1(&JsValue::NULL, &err);
		}
	});
	let value = JsFuture::from(promise).await?;
	if value.is_null() {
		return Err(Error::Browser("canvas produced no image".into()));
	}
	Ok(value.dyn_into()?)
}

/// Rasterise `canvas` to PNG and write it to the clipboard.
pub async fn copy_canvas_image(canvas: &HtmlCanvasElement) -> Result<()> {
	let blob = canvas_to_blob(canvas).await?;
	let window = web_sys::window().ok_or_else(|| Error::Browser("no window".into()))?;

	let item_ctor: Function = Reflect::get(&window, &"ClipboardItem".into())?.dyn_into()?;
	let record = Object::new();
	Reflect::set(&record, &"image/png".into(), &blob)?;
	let item = Reflect::construct(&item_ctor, &Array::of1(&record))?;

	let clipboard = Reflect::get(&window.navigator(), &"clipboard".into())?;
	let write: Function = Reflect::get(&clipboard, &"write".into())?.dyn_into()?;
	let pending: Promise = write.call1(&clipboard, &Array::of1(&item))?.dyn_into()?;
	JsFuture::from(pending).await?;
	Ok(())
}
