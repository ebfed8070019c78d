use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

/// Something that calls back once before the next repaint.
pub trait FrameScheduler {
	/// Schedules `frame` and returns a handle for cancelling it.
	fn request(&self, frame: &Rc<dyn Fn()>) -> Option<i32>;
	fn cancel(&self, handle: i32);
}

/// `requestAnimationFrame` on the browser window.
#[derive(Default)]
pub struct BrowserFrames {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameScheduler for BrowserFrames {
	fn request(&self, frame: &Rc<dyn Fn()>) -> Option<i32> {
		let window = web_sys::window()?;
		let mut callback = self.callback.borrow_mut();
		let callback = callback.get_or_insert_with(|| {
			let frame = frame.clone();
			Closure::new(move || frame())
		});
		window
			.request_animation_frame(callback.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel(&self, handle: i32) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

struct LoopState<S> {
	scheduler: S,
	running: Cell<bool>,
	pending: Cell<Option<i32>>,
	tick: RefCell<Box<dyn FnMut()>>,
	frame: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<S: FrameScheduler> LoopState<S> {
	fn schedule(&self) {
		let frame = self.frame.borrow().clone();
		if let Some(frame) = frame {
			self.pending.set(self.scheduler.request(&frame));
		}
	}

	fn on_frame(&self) {
		self.pending.set(None);
		if !self.running.get() {
			return;
		}
		(*self.tick.borrow_mut())();
		if self.running.get() && self.pending.get().is_none() {
			self.schedule();
		}
	}
}

/// A repaint loop that runs `tick` once per frame until stopped.
pub struct AnimationLoop<S: FrameScheduler + 'static> {
	state: Rc<LoopState<S>>,
}

impl<S: FrameScheduler + 'static> AnimationLoop<S> {
	pub fn new(scheduler: S, tick: impl FnMut() + 'static) -> Self {
		let state = Rc::new(LoopState {
			scheduler,
			running: Cell::new(false),
			pending: Cell::new(None),
			tick: RefCell::new(Box::new(tick)),
			frame: RefCell::new(None),
		});
		let weak: Weak<LoopState<S>> = Rc::downgrade(&state);
		let frame: Rc<dyn Fn()> = Rc::new(move || {
			if let Some(state) = weak.upgrade() {
				state.on_frame();
			}
		});
		*state.frame.borrow_mut() = Some(frame);
		Self { state }
	}

	pub fn is_running(&self) -> bool {
		self.state.running.get()
	}

	/// Starts ticking. Does nothing when already running.
	pub fn start(&self) {
		if self.state.running.replace(true) {
			return;
		}
		self.state.schedule();
	}

	/// Stops ticking and cancels the pending frame. Safe to call repeatedly.
	pub fn stop(&self) {
		self.state.running.set(false);
		if let Some(handle) = self.state.pending.take() {
			self.state.scheduler.cancel(handle);
		}
	}
}

impl<S: FrameScheduler + 'static> Drop for AnimationLoop<S> {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Queue of scheduled frames, run by hand.
	#[derive(Clone, Default)]
	struct ManualFrames {
		queue: Rc<RefCell<Vec<(i32, Rc<dyn Fn()>)>>>,
		next: Rc<Cell<i32>>,
	}

	impl ManualFrames {
		fn pending(&self) -> usize {
			self.queue.borrow().len()
		}

		fn run(&self) {
			let frames: Vec<_> = self.queue.borrow_mut().drain(..).collect();
			for (_, frame) in frames {
				frame();
			}
		}
	}

	impl FrameScheduler for ManualFrames {
		fn request(&self, frame: &Rc<dyn Fn()>) -> Option<i32> {
			let handle = self.next.get() + 1;
			self.next.set(handle);
			self.queue.borrow_mut().push((handle, frame.clone()));
			Some(handle)
		}

		fn cancel(&self, handle: i32) {
			self.queue.borrow_mut().retain(|(h, _)| *h != handle);
		}
	}

	fn counting_loop() -> (AnimationLoop<ManualFrames>, ManualFrames, Rc<Cell<u32>>) {
		let frames = ManualFrames::default();
		let ticks = Rc::new(Cell::new(0));
		let counter = ticks.clone();
		let anim = AnimationLoop::new(frames.clone(), move || counter.set(counter.get() + 1));
		(anim, frames, ticks)
	}

	#[test]
	fn ticks_once_per_frame() {
		let (anim, frames, ticks) = counting_loop();
		assert_eq!(frames.pending(), 0);

		anim.start();
		anim.start();
		assert_eq!(frames.pending(), 1);

		frames.run();
		frames.run();
		assert_eq!(ticks.get(), 2);
		assert_eq!(frames.pending(), 1);
	}

	#[test]
	fn stop_cancels_and_is_idempotent() {
		let (anim, frames, ticks) = counting_loop();
		anim.start();
		anim.stop();
		anim.stop();
		assert!(!anim.is_running());
		assert_eq!(frames.pending(), 0);
		frames.run();
		assert_eq!(ticks.get(), 0);
	}

	#[test]
	fn restarts_after_stop() {
		let (anim, frames, ticks) = counting_loop();
		anim.start();
		frames.run();
		anim.stop();
		anim.start();
		assert_eq!(frames.pending(), 1);
		frames.run();
		assert_eq!(ticks.get(), 2);
	}

	#[test]
	fn stop_from_inside_tick_ends_the_loop() {
		let frames = ManualFrames::default();
		let slot: Rc<RefCell<Option<AnimationLoop<ManualFrames>>>> = Rc::default();
		let inner = slot.clone();
		let anim = AnimationLoop::new(frames.clone(), move || {
			if let Some(anim) = inner.borrow().as_ref() {
				anim.stop();
			}
		});
		anim.start();
		*slot.borrow_mut() = Some(anim);

		frames.run();
		assert_eq!(frames.pending(), 0);
		assert!(!slot.borrow().as_ref().unwrap().is_running());
	}

	#[test]
	fn dropping_the_loop_cancels_its_frame() {
		let (anim, frames, _) = counting_loop();
		anim.start();
		drop(anim);
		assert_eq!(frames.pending(), 0);
	}

	#[test]
	fn taking_the_loop_out_of_its_slot_stops_ticking() {
		let (anim, frames, ticks) = counting_loop();
		let slot = Rc::new(RefCell::new(Some(anim)));
		slot.borrow().as_ref().unwrap().start();
		frames.run();

		if let Some(anim) = slot.borrow_mut().take() {
			anim.stop();
		}
		frames.run();
		assert_eq!(ticks.get(), 1);
		assert_eq!(frames.pending(), 0);
		assert!(slot.borrow().is_none());
	}
}
