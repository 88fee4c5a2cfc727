//! glyph-particles: canvas particle halos anchored to page glyphs.
//!
//! This crate provides a WASM particle effect component for the band site
//! logo, plus a small host page that lets visitors cycle the effect mode by
//! clicking the tracked letter.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Selects the browser entropy source for `rand` on wasm.
use getrandom as _;

pub mod components;

pub use components::particle_effect::{EffectConfig, EffectMode, ModeCycle, ParticleCanvas};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("glyph-particles: logging initialized");
}

/// Page-level effect settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageSettings {
	/// Mode shown on load.
	pub mode: EffectMode,
	/// Effect configuration, defaults plus any override.
	pub config: EffectConfig,
}

/// Parses an effect config override, falling back to defaults when the JSON
/// is malformed.
pub fn parse_config(json: &str) -> EffectConfig {
	if json.trim().is_empty() {
		return EffectConfig::default();
	}
	match EffectConfig::from_json(json) {
		Ok(config) => {
			info!("glyph-particles: loaded effect config override");
			config
		}
		Err(e) => {
			warn!("glyph-particles: failed to parse effect config: {}", e);
			EffectConfig::default()
		}
	}
}

/// Parses the initial mode attribute; unknown names fall back to the default.
pub fn parse_mode(value: Option<&str>) -> EffectMode {
	let Some(value) = value else {
		return EffectMode::default();
	};
	value.parse().unwrap_or_else(|e| {
		warn!("glyph-particles: {}", e);
		EffectMode::default()
	})
}

/// Load settings from a script element with id="particle-config".
/// The body is an optional JSON `EffectConfig` override and the optional
/// `data-mode` attribute names the initial mode.
fn load_settings() -> PageSettings {
	let script = (|| -> Option<HtmlScriptElement> {
		let window: Window = web_sys::window()?;
		let document = window.document()?;
		document.get_element_by_id("particle-config")?.dyn_into().ok()
	})();
	let Some(script) = script else {
		return PageSettings::default();
	};

	PageSettings {
		mode: parse_mode(script.get_attribute("data-mode").as_deref()),
		config: script.text().map(|json| parse_config(&json)).unwrap_or_default(),
	}
}

/// Main application component.
/// Renders the band logo with its particle halo. Clicking the "o" cycles
/// spiral, pull and push; the eye button switches the effect off and on.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let settings = load_settings();
	let modes = RwSignal::new(ModeCycle::new(settings.mode));
	let config = settings.config;

	let cycle = move |_| {
		modes.update(|m| {
			m.cycle();
		})
	};
	let toggle = move |_| {
		modes.update(|m| {
			m.toggle();
		})
	};
	let is_on = move || modes.get().current().is_active();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Wõen" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="hero-content">
			<div class="band-logo">
				// a fresh component per mode so each mode starts from an empty particle set
				{move || {
					let mode = modes.get().current();
					view! { <ParticleCanvas mode=mode config=config.clone() /> }
				}}
				<h1 class="band-name">
					<span class="regular-letters">"W"</span>
					<span
						class=move || if is_on() { "letter-o" } else { "letter-o no-dot" }
						on:click=cycle
					>
						<span class="letter-o-text">"o"</span>
					</span>
					<span class="regular-letters">"en"</span>
				</h1>
				<p class="band-tagline">"Dark Metal"</p>
			</div>
			<button
				class="particle-mode-toggle"
				on:click=toggle
				title=move || if is_on() { "Effect: on" } else { "Effect: off" }
			>
				"👁"
			</button>
		</div>
	}
}
