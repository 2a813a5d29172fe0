//! Widget-id → view registry plus the custom-event queue and stop flag.
//!
//! The dispatcher is the only authority the run loop consults for view
//! handles, which is why teardown removes a widget's mapping before the
//! widget itself is destroyed. Custom events requested while a handler runs
//! are queued here and drained by the run loop afterwards; handlers are
//! never reentered.

use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::gui::{Toolkit, ViewHandle};

pub struct ViewDispatcher {
    views: HashMap<usize, ViewHandle>,
    queue: VecDeque<u32>,
    current: Option<usize>,
    stop_requested: bool,
}

impl ViewDispatcher {
    pub(crate) fn new() -> Self {
        Self {
            views: HashMap::new(),
            queue: VecDeque::new(),
            current: None,
            stop_requested: false,
        }
    }

    /// Register `view` under widget id `id`. Ids are registered once, at
    /// init, in increasing order.
    pub(crate) fn add_view(&mut self, id: usize, view: ViewHandle) {
        let previous = self.views.insert(id, view);
        assert!(previous.is_none(), "view id {id} registered twice");
    }

    /// Remove the mapping for `id`; must precede the widget's destruction.
    pub(crate) fn remove_view(&mut self, id: usize) -> Option<ViewHandle> {
        if self.current == Some(id) {
            self.current = None;
        }
        self.views.remove(&id)
    }

    pub fn view(&self, id: usize) -> Option<ViewHandle> {
        self.views.get(&id).copied()
    }

    /// The widget id whose view is currently shown.
    pub fn current_view(&self) -> Option<usize> {
        self.current
    }

    /// Ask the run loop to render the view registered under `id`.
    pub fn switch_to_view(&mut self, gui: &mut dyn Toolkit, id: usize) {
        let Some(view) = self.view(id) else {
            panic!("switch to unregistered view id {id}");
        };
        debug!("switching to view {id}");
        gui.show_view(view);
        self.current = Some(id);
    }

    /// Queue a custom event; delivered after the current handler returns.
    pub fn send_custom_event(&mut self, event: u32) {
        self.queue.push_back(event);
    }

    pub(crate) fn pop_custom_event(&mut self) -> Option<u32> {
        self.queue.pop_front()
    }

    pub fn send_to_front(&mut self, gui: &mut dyn Toolkit) {
        gui.send_to_front();
    }

    pub fn send_to_back(&mut self, gui: &mut dyn Toolkit) {
        gui.send_to_back();
    }

    /// Cooperative stop: takes effect the next time the run loop would wait.
    pub fn stop(&mut self) {
        debug!("stop requested");
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Drop queued events and whatever view was current. Teardown only;
    /// view mappings must already have been removed one by one.
    pub(crate) fn clear(&mut self) {
        assert!(self.views.is_empty(), "dispatcher cleared with views still registered");
        self.queue.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::Toolkit;
    use crate::gui::headless::HeadlessToolkit;

    #[test]
    fn test_events_are_fifo() {
        let mut dispatcher = ViewDispatcher::new();
        dispatcher.send_custom_event(3);
        dispatcher.send_custom_event(1);
        dispatcher.send_custom_event(2);
        assert_eq!(dispatcher.pop_custom_event(), Some(3));
        assert_eq!(dispatcher.pop_custom_event(), Some(1));
        assert_eq!(dispatcher.pop_custom_event(), Some(2));
        assert_eq!(dispatcher.pop_custom_event(), None);
    }

    #[test]
    fn test_remove_view_clears_current() {
        let mut gui = HeadlessToolkit::new();
        let view = gui.create_view();
        let mut dispatcher = ViewDispatcher::new();
        dispatcher.add_view(0, view);
        dispatcher.switch_to_view(&mut gui, 0);
        assert_eq!(dispatcher.current_view(), Some(0));
        dispatcher.remove_view(0);
        assert_eq!(dispatcher.current_view(), None);
    }

    #[test]
    fn test_duplicate_registration_panics() {
        let mut gui = HeadlessToolkit::new();
        let view = gui.create_view();
        let mut dispatcher = ViewDispatcher::new();
        dispatcher.add_view(0, view);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dispatcher.add_view(0, view);
        }));
        assert!(result.is_err());
    }
}
