//! Scene state machine: callback tables, back-stack and per-scene state.
//!
//! The `SceneManager` owns the bookkeeping half of navigation: which scene
//! is active, which scenes were active before, and the opaque per-scene state
//! words. Transitions that have to run scene callbacks live on
//! [`Application`](crate::app::Application), which lends itself to the
//! callbacks; the manager only records what happened.

use log::debug;

/// Event delivered to a scene's event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// Application-defined event, usually emitted by a widget.
    Custom(u32),
    /// Back navigation request the active scene may intercept.
    Back,
    /// Periodic tick, delivered at the configured tick period.
    Tick,
}

/// Scene enter callback: scene `i` became active.
pub type SceneEnterFn<C> = fn(&mut crate::app::Application<C>);

/// Scene event callback. Returning `true` consumes the event; an unconsumed
/// back event falls through to the default back-stack pop.
pub type SceneEventFn<C> = fn(&mut crate::app::Application<C>, SceneEvent) -> bool;

/// Scene exit callback: scene `i` is about to stop being active.
pub type SceneExitFn<C> = fn(&mut crate::app::Application<C>);

/// Back-stack state machine over scene indices `0..N`.
pub struct SceneManager<C> {
    on_enter: Vec<SceneEnterFn<C>>,
    on_event: Vec<SceneEventFn<C>>,
    on_exit: Vec<SceneExitFn<C>>,
    /// Active scene. `None` before startup enters scene 0 and after teardown.
    current: Option<usize>,
    /// Previously active scenes, oldest first. The active scene is not on it.
    history: Vec<usize>,
    states: Vec<u32>,
}

impl<C> SceneManager<C> {
    /// An empty manager; callback tables arrive via [`SceneManager::alloc`].
    pub(crate) fn empty() -> Self {
        Self {
            on_enter: Vec::new(),
            on_event: Vec::new(),
            on_exit: Vec::new(),
            current: None,
            history: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Install the callback tables. The three tables must line up one slot
    /// per scene; a mismatch is a programming error caught here.
    pub(crate) fn alloc(
        &mut self,
        on_enter: Vec<SceneEnterFn<C>>,
        on_event: Vec<SceneEventFn<C>>,
        on_exit: Vec<SceneExitFn<C>>,
    ) {
        assert_eq!(on_enter.len(), on_event.len(), "scene callback tables must line up");
        assert_eq!(on_enter.len(), on_exit.len(), "scene callback tables must line up");
        self.states = vec![0; on_enter.len()];
        self.on_enter = on_enter;
        self.on_event = on_event;
        self.on_exit = on_exit;
        debug!("scene manager allocated with {} scenes", self.scene_count());
    }

    /// Drop tables, history and state. Part of application teardown.
    pub(crate) fn free(&mut self) {
        self.on_enter.clear();
        self.on_event.clear();
        self.on_exit.clear();
        self.history.clear();
        self.states.clear();
        self.current = None;
    }

    pub fn scene_count(&self) -> usize {
        self.on_enter.len()
    }

    /// The active scene, if any.
    pub fn current_scene(&self) -> Option<usize> {
        self.current
    }

    /// Whether `id` appears anywhere in the back history.
    pub fn has_previous_scene(&self, id: usize) -> bool {
        self.history.contains(&id)
    }

    /// Store an opaque state word for scene `id`. Survives navigation and
    /// re-entry; independent of the back-stack.
    pub fn set_scene_state(&mut self, id: usize, state: u32) {
        assert!(id < self.states.len(), "scene state set for unknown scene {id}");
        self.states[id] = state;
    }

    /// Read back the state word for scene `id` (0 until set).
    pub fn scene_state(&self, id: usize) -> u32 {
        assert!(id < self.states.len(), "scene state read for unknown scene {id}");
        self.states[id]
    }

    pub(crate) fn enter_fn(&self, id: usize) -> SceneEnterFn<C> {
        self.on_enter[id]
    }

    pub(crate) fn event_fn(&self, id: usize) -> SceneEventFn<C> {
        self.on_event[id]
    }

    pub(crate) fn exit_fn(&self, id: usize) -> SceneExitFn<C> {
        self.on_exit[id]
    }

    /// Push the departing scene onto the history and make `next` current.
    pub(crate) fn record_advance(&mut self, next: usize) {
        if let Some(current) = self.current {
            self.history.push(current);
        }
        self.current = Some(next);
    }

    /// The scene a retreat would land on, without popping it.
    pub(crate) fn peek_history(&self) -> Option<usize> {
        self.history.last().copied()
    }

    /// Pop the most recent history entry and make it current. `None` leaves
    /// everything untouched.
    pub(crate) fn record_retreat(&mut self) -> Option<usize> {
        let previous = self.history.pop()?;
        self.current = Some(previous);
        Some(previous)
    }

    /// Pop history entries until one matches any of `ids` and make it
    /// current; `None` (nothing matched) leaves the stack untouched.
    pub(crate) fn record_retreat_to(&mut self, ids: &[usize]) -> Option<usize> {
        let position = self.history.iter().rposition(|entry| ids.contains(entry))?;
        let target = self.history[position];
        self.history.truncate(position);
        self.current = Some(target);
        Some(target)
    }

    /// Drop all history and make `next` the sole current scene.
    pub(crate) fn record_reset_to(&mut self, next: usize) {
        self.history.clear();
        self.current = Some(next);
    }
}
