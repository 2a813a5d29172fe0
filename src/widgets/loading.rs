//! Busy indicator. Swallows all input, including Back, while shown.

use std::any::Any;

use anyhow::Result;

use crate::gui::{InputEvent, Toolkit, ViewContent, ViewHandle};
use crate::widget::{InputResponse, Widget, WidgetBase};

pub struct Loading<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
}

impl<C> Loading<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self { base, view: None }
    }
}

impl<C: 'static> Widget<C> for Loading<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "loading allocated twice");
        let view = gui.create_view();
        gui.set_view_content(
            view,
            ViewContent { title: Some("Loading...".into()), lines: Vec::new(), selected: None },
        );
        self.view = Some(view);
        Ok(())
    }

    fn release(&mut self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view.take() {
            gui.release_view(view);
        }
    }

    fn widget_view(&self) -> ViewHandle {
        self.view.expect("loading not allocated")
    }

    fn reset(&mut self, _gui: &mut dyn Toolkit) {}

    fn on_input(&mut self, _gui: &mut dyn Toolkit, _event: &InputEvent) -> InputResponse {
        InputResponse::Consumed
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
