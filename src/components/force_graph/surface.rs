use web_sys::CanvasRenderingContext2d;

/// The slice of the 2D canvas API the painters draw through.
pub trait DrawingSurface {
	fn set_font(&self, font: &str);
	fn measure_text_width(&self, text: &str) -> f64;
	fn set_fill_style(&self, style: &str);
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn set_text_align(&self, align: &str);
	fn set_text_baseline(&self, baseline: &str);
	fn fill_text(&self, text: &str, x: f64, y: f64);
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn rotate(&self, angle: f64);
}

impl DrawingSurface for CanvasRenderingContext2d {
	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn measure_text_width(&self, text: &str) -> f64 {
		self.measure_text(text).map_or(0.0, |m| m.width())
	}

	fn set_fill_style(&self, style: &str) {
		self.set_fill_style_str(style);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn set_text_align(&self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}
}
