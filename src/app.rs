//! Top-level owner: wires widgets to scenes, drives the run loop, and
//! enforces init/teardown ordering.

use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use crate::dispatcher::ViewDispatcher;
use crate::gui::{InputEvent, SurfaceKind, Toolkit};
use crate::scene::{SceneEnterFn, SceneEvent, SceneEventFn, SceneExitFn, SceneManager};
use crate::storage::Storage;
use crate::widget::{InputResponse, Widget};

/// The application orchestrator, generic over a caller-supplied context `C`
/// shared by every scene callback.
///
/// Construction runs the full init sequence and leaves the application
/// sitting in scene 0; [`Application::run`] then blocks until something calls
/// [`Application::stop`]. Teardown is guarded and also runs on drop.
pub struct Application<C> {
    ctx: C,
    gui: Box<dyn Toolkit>,
    storage: Storage,
    scenes: SceneManager<C>,
    dispatcher: ViewDispatcher,
    widgets: Vec<Box<dyn Widget<C>>>,
    tick_period: Duration,
    destroyed: bool,
}

impl<C> Application<C> {
    /// Initialize the application: build the scene callback tables from the
    /// registered widgets (ids are positional), bring up storage, run
    /// `on_begin`, allocate every widget and its view stack, register the
    /// views with the dispatcher, attach to the surface and enter scene 0.
    ///
    /// Panics when a widget has no scene callbacks; the scene machine has no
    /// default behavior to fall back on.
    pub fn new(
        gui: Box<dyn Toolkit>,
        widgets: Vec<Box<dyn Widget<C>>>,
        ctx: C,
        on_begin: impl FnOnce(&mut Self),
        tick_period: Duration,
    ) -> Result<Self> {
        assert!(!widgets.is_empty(), "at least one widget must be registered");
        info!("initializing application with {} widgets", widgets.len());

        let mut enter_table: Vec<SceneEnterFn<C>> = Vec::with_capacity(widgets.len());
        let mut event_table: Vec<SceneEventFn<C>> = Vec::with_capacity(widgets.len());
        let mut exit_table: Vec<SceneExitFn<C>> = Vec::with_capacity(widgets.len());
        for (id, widget) in widgets.iter().enumerate() {
            let (enter, event, exit) = widget.base().scene_callbacks();
            enter_table
                .push(enter.unwrap_or_else(|| panic!("widget {id} has no enter callback")));
            event_table
                .push(event.unwrap_or_else(|| panic!("widget {id} has no event callback")));
            exit_table
                .push(exit.unwrap_or_else(|| panic!("widget {id} has no exit callback")));
        }

        let mut app = Self {
            ctx,
            gui,
            storage: Storage::new(),
            scenes: SceneManager::empty(),
            dispatcher: ViewDispatcher::new(),
            widgets,
            tick_period,
            destroyed: false,
        };

        app.storage.init()?;
        on_begin(&mut app);

        app.scenes.alloc(enter_table, event_table, exit_table);

        for id in 0..app.widgets.len() {
            let gui = app.gui.as_mut();
            let widget = &mut app.widgets[id];
            widget.base_mut().set_id(id);
            widget.allocate(gui)?;
            widget.allocate_view_stack(gui);
            let stack = widget.base().stack().expect("view stack just allocated");
            app.dispatcher.add_view(id, gui.stack_view(stack));
        }

        app.gui.attach(SurfaceKind::Fullscreen);
        app.next_scene(0);
        Ok(app)
    }

    /// Block inside the event loop until [`Application::stop`] takes effect.
    ///
    /// Each iteration: the stop flag first, then one queued custom event,
    /// otherwise toolkit input. Input goes to the active widget's input hook;
    /// an unconsumed short back press goes through the back-navigation path,
    /// and an unhandled back event requests stop. With a positive tick
    /// period, an input poll timeout delivers a tick to the active scene.
    pub fn run(&mut self) -> Result<()> {
        info!("entering run loop");
        let timeout = (!self.tick_period.is_zero()).then_some(self.tick_period);
        loop {
            if self.dispatcher.stop_requested() {
                break;
            }
            if let Some(event) = self.dispatcher.pop_custom_event() {
                self.handle_custom_event(event);
                continue;
            }
            match self.gui.poll_input(timeout) {
                Some(input) => self.dispatch_input(input),
                None if timeout.is_some() => self.handle_tick_event(),
                None => {}
            }
        }
        debug!("run loop stopped");
        Ok(())
    }

    fn dispatch_input(&mut self, input: InputEvent) {
        let response = match self.dispatcher.current_view() {
            Some(id) => {
                let gui = self.gui.as_mut();
                self.widgets[id].on_input(gui, &input)
            }
            None => InputResponse::Ignored,
        };
        match response {
            InputResponse::Emit(event) => self.dispatcher.send_custom_event(event),
            InputResponse::Consumed => {}
            InputResponse::Ignored if input.is_back() => {
                if !self.handle_back_event() {
                    self.dispatcher.stop();
                }
            }
            InputResponse::Ignored => {}
        }
    }

    // ------------------------------------------------------------------
    // Scene navigation
    // ------------------------------------------------------------------

    /// Leave the current scene on the back-stack and enter scene `id`.
    pub fn next_scene(&mut self, id: usize) {
        assert!(id < self.scenes.scene_count(), "next_scene to unknown scene {id}");
        if let Some(current) = self.scenes.current_scene() {
            let exit = self.scenes.exit_fn(current);
            exit(self);
        }
        self.scenes.record_advance(id);
        debug!("entered scene {id}");
        let enter = self.scenes.enter_fn(id);
        enter(self);
    }

    /// Return to the most recent scene on the back-stack. `false` with the
    /// stack empty; the active scene is left unchanged then.
    pub fn previous_scene(&mut self) -> bool {
        let Some(current) = self.scenes.current_scene() else {
            return false;
        };
        if self.scenes.peek_history().is_none() {
            return false;
        }
        let exit = self.scenes.exit_fn(current);
        exit(self);
        let Some(target) = self.scenes.record_retreat() else {
            return false;
        };
        debug!("returned to scene {target}");
        let enter = self.scenes.enter_fn(target);
        enter(self);
        true
    }

    /// Pop back-stack entries until scene `id`, entering it. `false` when
    /// `id` is not in the history; nothing changes then.
    pub fn search_and_switch_to_previous_scene(&mut self, id: usize) -> bool {
        self.search_and_switch_to_previous_scene_one_of(&[id])
    }

    /// Like [`Application::search_and_switch_to_previous_scene`], landing on
    /// the most recent history entry matching any of `ids`.
    pub fn search_and_switch_to_previous_scene_one_of(&mut self, ids: &[usize]) -> bool {
        let Some(current) = self.scenes.current_scene() else {
            return false;
        };
        if !ids.iter().any(|&id| self.scenes.has_previous_scene(id)) {
            return false;
        }
        let exit = self.scenes.exit_fn(current);
        exit(self);
        let Some(target) = self.scenes.record_retreat_to(ids) else {
            return false;
        };
        debug!("returned to scene {target} (searched)");
        let enter = self.scenes.enter_fn(target);
        enter(self);
        true
    }

    /// Make scene `id` the new top with an empty back-stack. `false` when no
    /// such scene exists.
    pub fn search_and_switch_to_another_scene(&mut self, id: usize) -> bool {
        if id >= self.scenes.scene_count() {
            return false;
        }
        let Some(current) = self.scenes.current_scene() else {
            return false;
        };
        let exit = self.scenes.exit_fn(current);
        exit(self);
        self.scenes.record_reset_to(id);
        debug!("reset to scene {id}");
        let enter = self.scenes.enter_fn(id);
        enter(self);
        true
    }

    // ------------------------------------------------------------------
    // Event routing into the active scene
    // ------------------------------------------------------------------

    /// Offer `event` to the active scene. Unconsumed custom events are
    /// dropped; there is no default policy for them.
    pub fn handle_custom_event(&mut self, event: u32) -> bool {
        let Some(current) = self.scenes.current_scene() else {
            return false;
        };
        let handler = self.scenes.event_fn(current);
        handler(self, SceneEvent::Custom(event))
    }

    /// Offer a back event to the active scene; unconsumed, it falls back to
    /// popping the back-stack. `false` means nothing handled it and the
    /// caller should exit the application.
    pub fn handle_back_event(&mut self) -> bool {
        let Some(current) = self.scenes.current_scene() else {
            return false;
        };
        let handler = self.scenes.event_fn(current);
        if handler(self, SceneEvent::Back) {
            true
        } else {
            self.previous_scene()
        }
    }

    /// Deliver a tick to the active scene, unconditionally.
    pub fn handle_tick_event(&mut self) {
        let Some(current) = self.scenes.current_scene() else {
            return;
        };
        let handler = self.scenes.event_fn(current);
        handler(self, SceneEvent::Tick);
    }

    // ------------------------------------------------------------------
    // Dispatcher pass-throughs
    // ------------------------------------------------------------------

    /// Render the view registered for widget `id`.
    pub fn switch_to_view(&mut self, id: usize) {
        self.dispatcher.switch_to_view(self.gui.as_mut(), id);
    }

    /// Queue a custom event, delivered after the current handler returns.
    pub fn send_custom_event(&mut self, event: u32) {
        self.dispatcher.send_custom_event(event);
    }

    pub fn send_to_front(&mut self) {
        self.dispatcher.send_to_front(self.gui.as_mut());
    }

    pub fn send_to_back(&mut self) {
        self.dispatcher.send_to_back(self.gui.as_mut());
    }

    /// Request a cooperative stop of the run loop.
    pub fn stop(&mut self) {
        self.dispatcher.stop();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn scene_manager(&self) -> &SceneManager<C> {
        &self.scenes
    }

    pub fn scene_manager_mut(&mut self) -> &mut SceneManager<C> {
        &mut self.scenes
    }

    pub fn dispatcher(&self) -> &ViewDispatcher {
        &self.dispatcher
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn toolkit_mut(&mut self) -> &mut dyn Toolkit {
        self.gui.as_mut()
    }

    /// Typed access to widget `id`. Panics when `id` is out of range or the
    /// widget is of a different concrete type.
    pub fn widget_mut<W: 'static>(&mut self, id: usize) -> &mut W {
        let count = self.widgets.len();
        self.widgets
            .get_mut(id)
            .unwrap_or_else(|| panic!("widget id {id} out of range (have {count})"))
            .as_any_mut()
            .downcast_mut::<W>()
            .unwrap_or_else(|| panic!("widget {id} has a different concrete type"))
    }

    /// Typed access to widget `id` together with the toolkit, for parameter
    /// setters that publish state to their view.
    pub fn with_widget<W: 'static, R>(
        &mut self,
        id: usize,
        f: impl FnOnce(&mut W, &mut dyn Toolkit) -> R,
    ) -> R {
        let count = self.widgets.len();
        let gui = self.gui.as_mut();
        let widget = self
            .widgets
            .get_mut(id)
            .unwrap_or_else(|| panic!("widget id {id} out of range (have {count})"))
            .as_any_mut()
            .downcast_mut::<W>()
            .unwrap_or_else(|| panic!("widget {id} has a different concrete type"));
        f(widget, gui)
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Tear everything down, once: scene manager, then per widget the
    /// dispatcher mapping followed by the widget itself, then the dispatcher
    /// state, the surface attachment, and storage last. Safe to call again
    /// and safe to call on a partially initialized application.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("destroying application");
        self.scenes.free();
        for id in 0..self.widgets.len() {
            let gui = self.gui.as_mut();
            self.dispatcher.remove_view(id);
            self.widgets[id].destroy(gui);
        }
        self.dispatcher.clear();
        self.gui.detach();
        self.storage.destroy();
        self.destroyed = true;
    }
}

impl<C> Drop for Application<C> {
    fn drop(&mut self) {
        self.destroy();
    }
}
