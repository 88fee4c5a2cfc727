//! Render loop state machine.
//!
//! The loop owns three browser timer handles: the pending animation frame,
//! the spawn-interval resampler, and an optional one-shot relayout timeout.
//! All of them are released on [`RenderLoop::stop`]; nothing is rescheduled
//! afterwards, even if a callback that was already queued still fires.

use super::error::EffectError;
use super::types::EffectMode;

/// Timer facilities of the host environment.
///
/// Callbacks are bound by the implementor; the loop only decides when to
/// schedule and cancel them.
pub trait Scheduler {
	/// Queues the frame callback for the next animation frame.
	fn request_frame(&self) -> Result<i32, EffectError>;
	/// Cancels a queued frame.
	fn cancel_frame(&self, handle: i32);
	/// Starts the repeating spawn-interval resampler.
	fn start_interval(&self, period_ms: i32) -> Result<i32, EffectError>;
	/// Stops the resampler.
	fn clear_interval(&self, handle: i32);
	/// Starts the one-shot relayout callback.
	fn start_timeout(&self, delay_ms: i32) -> Result<i32, EffectError>;
	/// Cancels a pending relayout.
	fn clear_timeout(&self, handle: i32);
}

/// Handles held while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timers {
	/// Queued animation frame.
	pub frame: Option<i32>,
	/// Spawn-interval resampler.
	pub resample: Option<i32>,
	/// Pending delayed relayout.
	pub relayout: Option<i32>,
}

/// Loop state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	/// No frame or timer is scheduled.
	Stopped,
	/// Frames are being scheduled.
	Running(Timers),
}

/// Drives the Stopped/Running transitions.
#[derive(Debug, Default)]
pub struct RenderLoop {
	state: LoopState,
}

impl RenderLoop {
	/// Creates a stopped loop.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current state.
	pub fn state(&self) -> LoopState {
		self.state
	}

	/// Whether frames are being scheduled.
	pub fn is_running(&self) -> bool {
		matches!(self.state, LoopState::Running(_))
	}

	/// Stopped → Running. Refuses the disabled mode and is a no-op when
	/// already running. A failure to schedule leaves the loop stopped.
	pub fn start<S: Scheduler + ?Sized>(
		&mut self,
		mode: EffectMode,
		resample_period_ms: i32,
		scheduler: &S,
	) -> Result<bool, EffectError> {
		if !mode.is_active() || self.is_running() {
			return Ok(false);
		}

		let resample = scheduler.start_interval(resample_period_ms)?;
		let frame = match scheduler.request_frame() {
			Ok(handle) => handle,
			Err(e) => {
				scheduler.clear_interval(resample);
				return Err(e);
			}
		};

		self.state = LoopState::Running(Timers {
			frame: Some(frame),
			resample: Some(resample),
			relayout: None,
		});
		Ok(true)
	}

	/// Call at the start of a frame callback. Returns `false` when the loop
	/// has been stopped and the frame must not render.
	pub fn begin_frame(&mut self) -> bool {
		match &mut self.state {
			LoopState::Running(timers) => {
				timers.frame = None;
				true
			}
			LoopState::Stopped => false,
		}
	}

	/// Call at the end of a frame callback to queue the next one.
	pub fn end_frame<S: Scheduler + ?Sized>(&mut self, scheduler: &S) -> Result<(), EffectError> {
		if let LoopState::Running(timers) = &mut self.state {
			if timers.frame.is_none() {
				timers.frame = Some(scheduler.request_frame()?);
			}
		}
		Ok(())
	}

	/// Arms the delayed relayout, replacing any pending one.
	pub fn schedule_relayout<S: Scheduler + ?Sized>(
		&mut self,
		delay_ms: i32,
		scheduler: &S,
	) -> Result<(), EffectError> {
		if let LoopState::Running(timers) = &mut self.state {
			if let Some(pending) = timers.relayout.take() {
				scheduler.clear_timeout(pending);
			}
			timers.relayout = Some(scheduler.start_timeout(delay_ms)?);
		}
		Ok(())
	}

	/// Call from the relayout callback. Returns `false` once stopped.
	pub fn relayout_fired(&mut self) -> bool {
		match &mut self.state {
			LoopState::Running(timers) => {
				timers.relayout = None;
				true
			}
			LoopState::Stopped => false,
		}
	}

	/// Running → Stopped, cancelling every outstanding handle.
	pub fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &S) {
		if let LoopState::Running(timers) = std::mem::take(&mut self.state) {
			if let Some(handle) = timers.frame {
				scheduler.cancel_frame(handle);
			}
			if let Some(handle) = timers.resample {
				scheduler.clear_interval(handle);
			}
			if let Some(handle) = timers.relayout {
				scheduler.clear_timeout(handle);
			}
		}
	}
}
