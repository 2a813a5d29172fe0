//! Blank placeholder view.

use std::any::Any;

use anyhow::Result;

use crate::gui::{Toolkit, ViewHandle};
use crate::widget::{Widget, WidgetBase};

pub struct EmptyScreen<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
}

impl<C> EmptyScreen<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self { base, view: None }
    }
}

impl<C: 'static> Widget<C> for EmptyScreen<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "empty screen allocated twice");
        self.view = Some(gui.create_view());
        Ok(())
    }

    fn release(&mut self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view.take() {
            gui.release_view(view);
        }
    }

    fn widget_view(&self) -> ViewHandle {
        self.view.expect("empty screen not allocated")
    }

    fn reset(&mut self, _gui: &mut dyn Toolkit) {}

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
