//! Scrollable text display.

use std::any::Any;

use anyhow::Result;

use crate::gui::{InputEvent, InputKey, InputType, Toolkit, ViewContent, ViewHandle};
use crate::widget::{InputResponse, Widget, WidgetBase};

pub struct TextBox<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
    text: String,
    scroll: usize,
}

impl<C> TextBox<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self { base, view: None, text: String::new(), scroll: 0 }
    }

    pub fn set_text(&mut self, gui: &mut dyn Toolkit, text: impl Into<String>) {
        self.text = text.into();
        self.scroll = 0;
        self.publish(gui);
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll
    }

    fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    fn publish(&self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view {
            gui.set_view_content(
                view,
                ViewContent {
                    title: None,
                    lines: self.text.lines().map(str::to_owned).collect(),
                    selected: Some(self.scroll),
                },
            );
        }
    }
}

impl<C: 'static> Widget<C> for TextBox<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "text box allocated twice");
        self.view = Some(gui.create_view());
        self.publish(gui);
        Ok(())
    }

    fn release(&mut self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view.take() {
            gui.release_view(view);
        }
    }

    fn widget_view(&self) -> ViewHandle {
        self.view.expect("text box not allocated")
    }

    fn reset(&mut self, gui: &mut dyn Toolkit) {
        self.text.clear();
        self.scroll = 0;
        self.publish(gui);
    }

    fn on_input(&mut self, gui: &mut dyn Toolkit, event: &InputEvent) -> InputResponse {
        match (event.key, event.kind) {
            (InputKey::Up, InputType::Short | InputType::Repeat) => {
                self.scroll = self.scroll.saturating_sub(1);
                self.publish(gui);
                InputResponse::Consumed
            }
            (InputKey::Down, InputType::Short | InputType::Repeat) => {
                self.scroll = (self.scroll + 1).min(self.line_count().saturating_sub(1));
                self.publish(gui);
                InputResponse::Consumed
            }
            _ => InputResponse::Ignored,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
