//! Ownership wrapper around one native view handle.

use crate::gui::{Toolkit, ViewHandle};

/// Closure run once the wrapped view has a live handle, used to finish
/// configuration that needs the allocated view.
pub type DeferredSetupFn = Box<dyn Fn(&mut dyn Toolkit, ViewHandle)>;

/// A native view handle together with the knowledge of who owns it.
///
/// Owned views are allocated through [`View::allocate`] and released through
/// [`View::free`]. Borrowed views wrap a handle some widget's native object
/// owns; `free` never releases those, which is what keeps the generic
/// teardown path free of double releases.
pub struct View {
    handle: Option<ViewHandle>,
    owned: bool,
    deferred_setup: Option<DeferredSetupFn>,
}

impl View {
    /// An unallocated view that will own its handle once allocated.
    pub fn new() -> Self {
        Self { handle: None, owned: false, deferred_setup: None }
    }

    /// Wrap a handle owned elsewhere.
    pub fn borrowed(handle: ViewHandle) -> Self {
        Self { handle: Some(handle), owned: false, deferred_setup: None }
    }

    pub fn with_deferred_setup(
        mut self,
        setup: impl Fn(&mut dyn Toolkit, ViewHandle) + 'static,
    ) -> Self {
        self.deferred_setup = Some(Box::new(setup));
        self
    }

    pub fn handle(&self) -> Option<ViewHandle> {
        self.handle
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Allocate the native view. Panics if the view already has a handle.
    pub fn allocate(&mut self, gui: &mut dyn Toolkit) -> ViewHandle {
        assert!(self.handle.is_none(), "view allocated twice");
        let handle = gui.create_view();
        self.handle = Some(handle);
        self.owned = true;
        handle
    }

    /// Run the deferred-setup closure against the live handle, if both exist.
    pub fn run_deferred_setup(&self, gui: &mut dyn Toolkit) {
        if let (Some(setup), Some(handle)) = (self.deferred_setup.as_ref(), self.handle) {
            setup(gui, handle);
        }
    }

    /// Release the handle if and only if this wrapper owns it. No-op for
    /// borrowed or already freed views.
    pub fn free(&mut self, gui: &mut dyn Toolkit) {
        if self.owned {
            if let Some(handle) = self.handle.take() {
                gui.release_view(handle);
            }
        }
        self.handle = None;
        self.owned = false;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::headless::HeadlessToolkit;

    #[test]
    fn test_owned_view_released_once() {
        let mut gui = HeadlessToolkit::new();
        let mut view = View::new();
        view.allocate(&mut gui);
        assert!(view.is_owned());
        view.free(&mut gui);
        assert_eq!(gui.live_views(), 0);
        // Second free is a no-op, not a double release.
        view.free(&mut gui);
    }

    #[test]
    fn test_borrowed_view_never_released() {
        let mut gui = HeadlessToolkit::new();
        let handle = gui.create_view();
        let mut view = View::borrowed(handle);
        view.free(&mut gui);
        assert_eq!(gui.live_views(), 1, "borrowed handle must stay alive");
    }

    #[test]
    fn test_deferred_setup_sees_live_handle() {
        let mut gui = HeadlessToolkit::new();
        let mut view = View::new().with_deferred_setup(|gui, handle| {
            let mut content = crate::gui::ViewContent::default();
            content.title = Some("aux".into());
            gui.set_view_content(handle, content);
        });
        let handle = view.allocate(&mut gui);
        view.run_deferred_setup(&mut gui);
        assert_eq!(gui.content(handle).unwrap().title.as_deref(), Some("aux"));
    }
}
