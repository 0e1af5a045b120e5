//! The registry + scheduler that ties a [`TimeScale`], an [`FxCompositor`],
//! and a bounded `id -> effect` map together behind one `draw(now, out)`
//! call, the single integration point a host needs.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::compositor::FxCompositor;
use crate::effect::{DrawContext, Effect};
use crate::interpolate::FrameInterpolator;
use crate::pixel::Pixel;
use crate::time::TimeScale;

/// A shared, interior-mutable handle to an effect. The registry and the
/// compositor's layers both hold clones of the same handle rather than
/// competing for exclusive ownership, mirroring the reference-counted `Fx`
/// pointers (`FASTLED_SMART_PTR`) of the original engine.
pub type EffectHandle = Rc<RefCell<dyn Effect>>;

pub fn new_effect_handle<E: Effect + 'static>(effect: E) -> EffectHandle {
    Rc::new(RefCell::new(effect))
}

/// Default capacity of [`FxEngine`]'s registry when constructed with
/// [`FxEngine::new`]. Use [`FxEngine::with_capacity`] for a different bound.
pub const MAX_FX: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The registry is already at its configured capacity.
    CapacityExceeded,
    /// No effect is registered under the given id.
    NotFound,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::CapacityExceeded => write!(f, "effect registry is full"),
            EngineError::NotFound => write!(f, "no effect registered with that id"),
        }
    }
}

struct PendingTransition {
    id: u32,
    duration_ms: u32,
}

/// Bounded `id -> effect` registry driving a two-layer compositor under a
/// time-warped clock. `draw(now, out)` is the one method a host calls once
/// per frame.
pub struct FxEngine {
    registry: BTreeMap<u32, EffectHandle>,
    capacity: usize,
    next_id: u32,
    current_id: Option<u32>,
    pending: Option<PendingTransition>,
    time_scale: TimeScale,
    compositor: FxCompositor,
    interpolate: bool,
    interpolator: Option<(u32, FrameInterpolator)>,
    num_leds: u16,
}

impl FxEngine {
    pub fn new(num_leds: u16, interpolate: bool) -> Self {
        Self::with_capacity(num_leds, interpolate, MAX_FX)
    }

    pub fn with_capacity(num_leds: u16, interpolate: bool, capacity: usize) -> Self {
        Self {
            registry: BTreeMap::new(),
            capacity,
            next_id: 0,
            current_id: None,
            pending: None,
            time_scale: TimeScale::new(0),
            compositor: FxCompositor::new(num_leds),
            interpolate,
            interpolator: None,
            num_leds,
        }
    }

    /// Register a new effect. The first successful `add` auto-activates it
    /// with a zero-length transition.
    pub fn add<E: Effect + 'static>(&mut self, effect: E) -> Result<u32, EngineError> {
        if self.registry.len() >= self.capacity {
            return Err(EngineError::CapacityExceeded);
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let handle = new_effect_handle(effect);
        let first = self.registry.is_empty();
        self.registry.insert(id, handle.clone());
        if first {
            self.current_id = Some(id);
            self.compositor.set_current(handle, 0);
        }
        log::debug!("FxEngine::add: registered id={id}, first={first}");
        Ok(id)
    }

    /// Remove an effect. If it was active, advance to the next entry (same
    /// ascending-with-wraparound rule as [`FxEngine::next`]) with a
    /// zero-length transition.
    pub fn remove(&mut self, id: u32) -> Option<EffectHandle> {
        let removed = self.registry.remove(&id)?;
        if self.current_id == Some(id) {
            self.current_id = self
                .registry
                .range((core::ops::Bound::Excluded(id), core::ops::Bound::Unbounded))
                .next()
                .map(|(next_id, _)| *next_id)
                .or_else(|| self.registry.keys().next().copied());
            match self.current_id {
                Some(next_id) => {
                    let handle = self.registry.get(&next_id).unwrap().clone();
                    self.compositor.set_current(handle, 0);
                }
                None => {
                    self.compositor = FxCompositor::new(self.num_leds);
                }
            }
            self.interpolator = None;
        }
        log::debug!("FxEngine::remove: id={id}");
        Some(removed)
    }

    pub fn get(&self, id: u32) -> Option<EffectHandle> {
        self.registry.get(&id).cloned()
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current_id
    }

    /// Arm a transition to the next id in ascending order, wrapping to the
    /// first. Returns `false` if the registry is empty.
    pub fn next(&mut self, duration_ms: u32) -> bool {
        let Some(current) = self.current_id else {
            return false;
        };
        let next_id = self
            .registry
            .range((core::ops::Bound::Excluded(current), core::ops::Bound::Unbounded))
            .next()
            .map(|(id, _)| *id)
            .or_else(|| self.registry.keys().next().copied());
        match next_id {
            Some(id) => {
                self.pending = Some(PendingTransition { id, duration_ms });
                true
            }
            None => false,
        }
    }

    /// Arm a transition to a specific id. Fails if `id` isn't registered.
    pub fn set_next(&mut self, id: u32, duration_ms: u32) -> Result<(), EngineError> {
        if !self.registry.contains_key(&id) {
            return Err(EngineError::NotFound);
        }
        self.pending = Some(PendingTransition { id, duration_ms });
        Ok(())
    }

    pub fn set_speed(&mut self, scale: f32, now_ms: u32) {
        self.time_scale.set_scale(now_ms, scale);
    }

    pub fn set_interpolate(&mut self, on: bool) {
        self.interpolate = on;
        if !on {
            self.interpolator = None;
        }
    }

    /// Render one frame into `out`. Returns `false` (and leaves `out`
    /// untouched) if the registry is empty.
    pub fn draw(&mut self, now_ms: u32, out: &mut [Pixel]) -> bool {
        let warped = self.time_scale.logical(now_ms);

        if self.registry.is_empty() {
            return false;
        }

        if let Some(pending) = self.pending.take() {
            if let Some(handle) = self.registry.get(&pending.id).cloned() {
                self.compositor
                    .start_transition(warped, pending.duration_ms, handle);
                self.current_id = Some(pending.id);
                self.interpolator = None;
                log::trace!(
                    "FxEngine::draw: started transition to id={} over {}ms",
                    pending.id,
                    pending.duration_ms
                );
            }
        }

        let fixed_fps = self
            .current_id
            .and_then(|id| self.registry.get(&id))
            .and_then(|handle| handle.borrow().has_fixed_fps());

        match (fixed_fps, self.interpolate) {
            (Some(fps), true) => {
                let Some(id) = self.current_id else {
                    return false;
                };
                let handle = self.registry.get(&id).cloned().unwrap();
                let num_leds = self.num_leds;
                let needs_new = !matches!(&self.interpolator, Some((cached_id, _)) if *cached_id == id);
                if needs_new {
                    self.interpolator = Some((id, FrameInterpolator::new(fps, num_leds as usize)));
                }
                let interpolator = &mut self.interpolator.as_mut().unwrap().1;
                interpolator.draw(warped, out, |t, leds| {
                    handle.borrow_mut().draw(DrawContext::new(t, leds));
                });
            }
            _ => {
                self.compositor.draw(now_ms, warped, out);
            }
        }

        true
    }
}
