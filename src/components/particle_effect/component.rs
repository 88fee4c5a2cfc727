//! Leptos component hosting one particle engine on an overlay canvas.
//!
//! The canvas is three times the viewport in each direction so particles can
//! travel past the logo without clipping. Frames run via
//! `requestAnimationFrame`; a 200 ms interval re-rolls the spawn rate; the
//! anchor is re-measured on resize, once fonts are ready, and once more
//! shortly after. Unmounting the component stops all of it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, Window};

use super::config::EffectConfig;
use super::engine::ParticleEngine;
use super::error::EffectError;
use super::layout::DomLayout;
use super::lifecycle::{RenderLoop, Scheduler};
use super::render::CanvasSurface;
use super::types::EffectMode;

/// Default glyph offset, in `em`.
pub const DEFAULT_HORIZONTAL_SHIFT: f64 = -0.075;

const CANVAS_STYLE: &str = "position: fixed; width: 300%; height: 300%; top: -100%; left: -100%; \
	pointer-events: none; z-index: 0; overflow: visible;";

type Callback<T> = Rc<RefCell<Option<Closure<T>>>>;

/// JS closures owned by one mounted effect.
#[derive(Clone, Default)]
struct Callbacks {
	frame: Callback<dyn FnMut(f64)>,
	resample: Callback<dyn FnMut()>,
	relayout: Callback<dyn FnMut()>,
	resize: Callback<dyn FnMut()>,
}

impl Callbacks {
	fn release(&self) {
		self.frame.borrow_mut().take();
		self.resample.borrow_mut().take();
		self.relayout.borrow_mut().take();
		self.resize.borrow_mut().take();
	}
}

fn function<T: ?Sized + WasmClosure>(
	slot: &Callback<T>,
	name: &'static str,
) -> Result<js_sys::Function, EffectError> {
	slot.borrow()
		.as_ref()
		.map(|cb| cb.as_ref().unchecked_ref::<js_sys::Function>().clone())
		.ok_or(EffectError::Released(name))
}

/// Browser timers bound to the effect's callbacks.
struct WindowScheduler {
	window: Window,
	callbacks: Callbacks,
}

impl Scheduler for WindowScheduler {
	fn request_frame(&self) -> Result<i32, EffectError> {
		let f = function(&self.callbacks.frame, "frame")?;
		self.window
			.request_animation_frame(&f)
			.map_err(|e| EffectError::js("request_animation_frame", e))
	}

	fn cancel_frame(&self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}

	fn start_interval(&self, period_ms: i32) -> Result<i32, EffectError> {
		let f = function(&self.callbacks.resample, "resample")?;
		self.window
			.set_interval_with_callback_and_timeout_and_arguments_0(&f, period_ms)
			.map_err(|e| EffectError::js("set_interval", e))
	}

	fn clear_interval(&self, handle: i32) {
		self.window.clear_interval_with_handle(handle);
	}

	fn start_timeout(&self, delay_ms: i32) -> Result<i32, EffectError> {
		let f = function(&self.callbacks.relayout, "relayout")?;
		self.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(&f, delay_ms)
			.map_err(|e| EffectError::js("set_timeout", e))
	}

	fn clear_timeout(&self, handle: i32) {
		self.window.clear_timeout_with_handle(handle);
	}
}

/// Everything a running effect owns.
struct EffectContext {
	engine: ParticleEngine,
	layout: DomLayout,
	surface: CanvasSurface,
	render_loop: RenderLoop,
	scheduler: WindowScheduler,
}

type SharedContext = Rc<RefCell<Option<EffectContext>>>;

#[derive(Clone)]
struct Settings {
	mode: EffectMode,
	horizontal_shift: f64,
	anchor_selector: String,
	perimeter_selector: String,
	config: EffectConfig,
}

/// Renders the particle halo around the tracked glyph.
///
/// `mode = EffectMode::None` renders nothing and starts no timers. The
/// component does not react to prop changes; remount it (for example by
/// keying on the mode) to switch modes with a fresh particle set.
#[component]
pub fn ParticleCanvas(
	#[prop(default = EffectMode::Spiral)] mode: EffectMode,
	#[prop(default = DEFAULT_HORIZONTAL_SHIFT)] horizontal_shift: f64,
	#[prop(into, default = ".letter-o".to_string())] anchor_selector: String,
	#[prop(into, default = ".band-name".to_string())] perimeter_selector: String,
	#[prop(optional)] config: EffectConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let callbacks = Callbacks::default();
	let settings = Settings {
		mode,
		horizontal_shift,
		anchor_selector,
		perimeter_selector,
		config,
	};
	let (context_init, callbacks_init) = (context.clone(), callbacks.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		match mount(canvas.into(), settings.clone(), &context_init, &callbacks_init) {
			Ok(()) => info!("particle effect started ({})", settings.mode),
			Err(e) => {
				warn!("particle effect disabled: {e}");
				callbacks_init.release();
			}
		}
	});

	let teardown = SendWrapper::new((context, callbacks));
	on_cleanup(move || {
		let (context, callbacks) = teardown.take();
		if let Some(mut c) = context.borrow_mut().take() {
			c.render_loop.stop(&c.scheduler);
			if let Ok(f) = function(&callbacks.resize, "resize") {
				let _ = c
					.scheduler
					.window
					.remove_event_listener_with_callback("resize", &f);
			}
			debug!("particle effect stopped ({})", c.engine.mode());
		}
		callbacks.release();
	});

	mode.is_active().then(|| {
		view! {
			<canvas node_ref=canvas_ref class="particle-canvas" style=CANVAS_STYLE />
		}
	})
}

/// Builds the engine, binds the callbacks and starts the loop.
fn mount(
	canvas: HtmlCanvasElement,
	settings: Settings,
	context: &SharedContext,
	callbacks: &Callbacks,
) -> Result<(), EffectError> {
	let window = web_sys::window().ok_or(EffectError::NoWindow)?;
	let layout = DomLayout::new(
		canvas.clone(),
		settings.anchor_selector,
		settings.perimeter_selector,
	)?;
	layout.fit_surface();
	if let Err(e) = layout.apply_horizontal_shift(settings.horizontal_shift) {
		warn!("horizontal shift not applied: {e}");
	}
	let surface = CanvasSurface::new(canvas, settings.config.texture.clone())?;

	let resample_period = settings.config.spawn.resample_period;
	let mut engine = ParticleEngine::new(settings.mode, settings.config, settings.horizontal_shift);
	if engine.relayout(&layout).is_none() {
		debug!("anchor glyph not found yet");
	}

	let ctx = context.clone();
	*callbacks.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
		let mut guard = ctx.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		if !c.render_loop.begin_frame() {
			return;
		}
		c.engine.frame(now, &c.layout, &mut c.surface);
		if let Err(e) = c.render_loop.end_frame(&c.scheduler) {
			warn!("particle frame not rescheduled: {e}");
		}
	}));

	let ctx = context.clone();
	*callbacks.resample.borrow_mut() = Some(Closure::new(move || {
		if let Some(c) = ctx.borrow_mut().as_mut() {
			c.engine.resample_interval();
		}
	}));

	let ctx = context.clone();
	*callbacks.relayout.borrow_mut() = Some(Closure::new(move || {
		if let Some(c) = ctx.borrow_mut().as_mut() {
			if c.render_loop.relayout_fired() {
				c.engine.relayout(&c.layout);
			}
		}
	}));

	let ctx = context.clone();
	*callbacks.resize.borrow_mut() = Some(Closure::new(move || {
		if let Some(c) = ctx.borrow_mut().as_mut() {
			c.layout.fit_surface();
			c.engine.relayout(&c.layout);
		}
	}));
	window
		.add_event_listener_with_callback("resize", &function(&callbacks.resize, "resize")?)
		.map_err(|e| EffectError::js("add_event_listener", e))?;

	let fonts_ready = layout.document().fonts().ready();

	let mut render_loop = RenderLoop::new();
	let scheduler = WindowScheduler {
		window: window.clone(),
		callbacks: callbacks.clone(),
	};
	if let Err(e) = render_loop.start(engine.mode(), resample_period, &scheduler) {
		let resize = function(&callbacks.resize, "resize")?;
		let _ = window.remove_event_listener_with_callback("resize", &resize);
		return Err(e);
	}
	*context.borrow_mut() = Some(EffectContext {
		engine,
		layout,
		surface,
		render_loop,
		scheduler,
	});

	match fonts_ready {
		Ok(ready) => {
			let ctx = context.clone();
			wasm_bindgen_futures::spawn_local(async move {
				if JsFuture::from(ready).await.is_err() {
					return;
				}
				let mut guard = ctx.borrow_mut();
				let Some(c) = guard.as_mut() else {
					return;
				};
				c.engine.relayout(&c.layout);
				let delay = c.engine.config().anchor.relayout_delay;
				if let Err(e) = c.render_loop.schedule_relayout(delay, &c.scheduler) {
					warn!("delayed relayout not scheduled: {e}");
				}
			});
		}
		Err(e) => warn!("font readiness unavailable: {}", EffectError::js("fonts.ready", e)),
	}

	Ok(())
}
