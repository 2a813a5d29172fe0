//! The widget capability set and the state every widget shares.
//!
//! A widget is one registered UI component: it owns a native view stack (its
//! primary view plus any auxiliary views), carries the scene callbacks for
//! the scene it backs, and optionally turns raw input into custom events.
//! Concrete variants implement [`Widget`]; the framework only ever sees
//! `Box<dyn Widget<C>>`.

use std::any::Any;

use anyhow::Result;
use log::debug;

use crate::gui::{InputEvent, StackHandle, Toolkit, ViewHandle};
use crate::scene::{SceneEnterFn, SceneEventFn, SceneExitFn};
use crate::view::View;

/// What a widget did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// Not interested; the dispatcher applies its default policy.
    Ignored,
    /// Swallowed; nothing else sees the event.
    Consumed,
    /// Swallowed, and this custom event should be queued on the dispatcher.
    Emit(u32),
}

/// State common to every widget, embedded by each concrete variant.
pub struct WidgetBase<C> {
    id: usize,
    aux_views: Vec<View>,
    stack: Option<StackHandle>,
    destroyed: bool,
    on_enter: Option<SceneEnterFn<C>>,
    on_event: Option<SceneEventFn<C>>,
    on_exit: Option<SceneExitFn<C>>,
}

impl<C> WidgetBase<C> {
    pub fn new() -> Self {
        Self {
            id: 0,
            aux_views: Vec::new(),
            stack: None,
            destroyed: false,
            on_enter: None,
            on_event: None,
            on_exit: None,
        }
    }

    /// Attach the scene callback triplet this widget's scene runs on.
    pub fn with_scene(
        mut self,
        on_enter: SceneEnterFn<C>,
        on_event: SceneEventFn<C>,
        on_exit: SceneExitFn<C>,
    ) -> Self {
        self.on_enter = Some(on_enter);
        self.on_event = Some(on_event);
        self.on_exit = Some(on_exit);
        self
    }

    /// Declare an auxiliary view, composed above the primary view in
    /// declaration order.
    pub fn with_aux_view(mut self, view: View) -> Self {
        self.aux_views.push(view);
        self
    }

    /// This widget's registration index, equal to its scene id.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub(crate) fn stack(&self) -> Option<StackHandle> {
        self.stack
    }

    /// Whether [`Widget::destroy`] already ran for this widget.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn scene_callbacks(
        &self,
    ) -> (Option<SceneEnterFn<C>>, Option<SceneEventFn<C>>, Option<SceneExitFn<C>>) {
        (self.on_enter, self.on_event, self.on_exit)
    }
}

impl<C> Default for WidgetBase<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// The capability set every widget variant implements.
///
/// Variant-specific methods cover the native object (`allocate`, `release`,
/// `widget_view`, `reset`); the view-stack composition and the guarded
/// teardown are provided and shared by all variants.
pub trait Widget<C> {
    fn base(&self) -> &WidgetBase<C>;

    fn base_mut(&mut self) -> &mut WidgetBase<C>;

    /// Construct the native widget object. Called exactly once, before
    /// [`Widget::allocate_view_stack`].
    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()>;

    /// Release the native widget object. Must tolerate being called on a
    /// never-allocated widget.
    fn release(&mut self, gui: &mut dyn Toolkit);

    /// The primary view, obtained from the variant's native object.
    fn widget_view(&self) -> ViewHandle;

    /// Restore the native widget to a clean state without reallocation,
    /// for scene re-entry.
    fn reset(&mut self, gui: &mut dyn Toolkit);

    /// Input hook, consulted before the dispatcher's default routing.
    fn on_input(&mut self, gui: &mut dyn Toolkit, event: &InputEvent) -> InputResponse {
        let _ = (gui, event);
        InputResponse::Ignored
    }

    /// Downcast support for
    /// [`Application::widget_mut`](crate::app::Application::widget_mut).
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Build the view stack: primary view first, then each auxiliary view in
    /// declaration order, running its deferred setup on the live handle.
    fn allocate_view_stack(&mut self, gui: &mut dyn Toolkit) {
        assert!(self.base().stack.is_none(), "view stack allocated twice");
        let stack = gui.create_stack();
        gui.stack_add_view(stack, self.widget_view());

        let mut aux = std::mem::take(&mut self.base_mut().aux_views);
        for view in &mut aux {
            let handle = view.allocate(gui);
            gui.stack_add_view(stack, handle);
            view.run_deferred_setup(gui);
        }
        let base = self.base_mut();
        base.aux_views = aux;
        base.stack = Some(stack);
    }

    /// Tear everything down, once. Auxiliary views are removed from the stack
    /// and released in declaration order, then the primary view is removed,
    /// then the stack container goes, then the native widget object.
    fn destroy(&mut self, gui: &mut dyn Toolkit) {
        if self.base().destroyed {
            return;
        }
        if let Some(stack) = self.base().stack {
            let mut aux = std::mem::take(&mut self.base_mut().aux_views);
            for view in &mut aux {
                if let Some(handle) = view.handle() {
                    gui.stack_remove_view(stack, handle);
                }
                view.free(gui);
            }
            gui.stack_remove_view(stack, self.widget_view());
            gui.release_stack(stack);
            self.base_mut().stack = None;
        }
        self.release(gui);
        debug!("widget {} destroyed", self.base().id);
        self.base_mut().destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::ViewContent;
    use crate::gui::headless::{HeadlessToolkit, ToolkitOp};

    /// Minimal variant used to exercise the provided methods.
    struct Probe {
        base: WidgetBase<()>,
        view: Option<ViewHandle>,
    }

    impl Probe {
        fn new(base: WidgetBase<()>) -> Self {
            Self { base, view: None }
        }
    }

    impl Widget<()> for Probe {
        fn base(&self) -> &WidgetBase<()> {
            &self.base
        }

        fn base_mut(&mut self) -> &mut WidgetBase<()> {
            &mut self.base
        }

        fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
            self.view = Some(gui.create_view());
            Ok(())
        }

        fn release(&mut self, gui: &mut dyn Toolkit) {
            if let Some(view) = self.view.take() {
                gui.release_view(view);
            }
        }

        fn widget_view(&self) -> ViewHandle {
            self.view.expect("probe widget not allocated")
        }

        fn reset(&mut self, _gui: &mut dyn Toolkit) {}

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut gui = HeadlessToolkit::new();
        let mut widget = Probe::new(WidgetBase::new());
        widget.allocate(&mut gui).unwrap();
        widget.allocate_view_stack(&mut gui);
        widget.destroy(&mut gui);
        let ops_after_first = gui.ops().len();
        widget.destroy(&mut gui);
        assert_eq!(gui.ops().len(), ops_after_first, "second destroy must be a no-op");
        assert_eq!(gui.live_views(), 0);
        assert_eq!(gui.live_stacks(), 0);
    }

    #[test]
    fn test_primary_view_added_first() {
        let mut gui = HeadlessToolkit::new();
        let mut widget = Probe::new(WidgetBase::new().with_aux_view(View::new()));
        widget.allocate(&mut gui).unwrap();
        widget.allocate_view_stack(&mut gui);

        let primary = widget.widget_view();
        let adds: Vec<_> = gui
            .ops()
            .iter()
            .filter_map(|op| match op {
                ToolkitOp::StackAdd(_, view) => Some(*view),
                _ => None,
            })
            .collect();
        assert_eq!(adds.len(), 2);
        assert_eq!(adds[0], primary);
    }

    #[test]
    fn test_aux_view_deferred_setup_runs() {
        let mut gui = HeadlessToolkit::new();
        let aux = View::new().with_deferred_setup(|gui, handle| {
            let mut content = ViewContent::default();
            content.lines.push("overlay".into());
            gui.set_view_content(handle, content);
        });
        let mut widget = Probe::new(WidgetBase::new().with_aux_view(aux));
        widget.allocate(&mut gui).unwrap();
        widget.allocate_view_stack(&mut gui);

        let configured = gui
            .ops()
            .iter()
            .filter_map(|op| match op {
                ToolkitOp::StackAdd(_, view) => Some(*view),
                _ => None,
            })
            .nth(1)
            .unwrap();
        assert_eq!(gui.content(configured).unwrap().lines, vec!["overlay".to_string()]);
    }
}
