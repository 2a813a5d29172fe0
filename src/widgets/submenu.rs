//! Vertical item list; selecting an item emits its configured custom event.

use std::any::Any;

use anyhow::Result;

use crate::gui::{InputEvent, InputKey, InputType, Toolkit, ViewContent, ViewHandle};
use crate::widget::{InputResponse, Widget, WidgetBase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuItem {
    pub label: String,
    pub event: u32,
}

pub struct Submenu<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
    header: Option<String>,
    items: Vec<SubmenuItem>,
    selected: usize,
}

impl<C> Submenu<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self { base, view: None, header: None, items: Vec::new(), selected: 0 }
    }

    pub fn set_header(&mut self, gui: &mut dyn Toolkit, header: impl Into<String>) {
        self.header = Some(header.into());
        self.publish(gui);
    }

    /// Append an item; `event` is emitted when the item is selected.
    pub fn add_item(&mut self, gui: &mut dyn Toolkit, label: impl Into<String>, event: u32) {
        self.items.push(SubmenuItem { label: label.into(), event });
        self.publish(gui);
    }

    pub fn set_selected_item(&mut self, gui: &mut dyn Toolkit, index: usize) {
        assert!(index < self.items.len(), "selected item {index} out of range");
        self.selected = index;
        self.publish(gui);
    }

    pub fn selected_item(&self) -> usize {
        self.selected
    }

    pub fn items(&self) -> &[SubmenuItem] {
        &self.items
    }

    fn publish(&self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view {
            gui.set_view_content(
                view,
                ViewContent {
                    title: self.header.clone(),
                    lines: self.items.iter().map(|item| item.label.clone()).collect(),
                    selected: (!self.items.is_empty()).then_some(self.selected),
                },
            );
        }
    }
}

impl<C: 'static> Widget<C> for Submenu<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "submenu allocated twice");
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
        self.view.expect("submenu not allocated")
    }

    fn reset(&mut self, gui: &mut dyn Toolkit) {
        self.header = None;
        self.items.clear();
        self.selected = 0;
        self.publish(gui);
    }

    fn on_input(&mut self, gui: &mut dyn Toolkit, event: &InputEvent) -> InputResponse {
        match (event.key, event.kind) {
            (InputKey::Up, InputType::Short | InputType::Repeat) => {
                if !self.items.is_empty() {
                    self.selected =
                        self.selected.checked_sub(1).unwrap_or(self.items.len() - 1);
                    self.publish(gui);
                }
                InputResponse::Consumed
            }
            (InputKey::Down, InputType::Short | InputType::Repeat) => {
                if !self.items.is_empty() {
                    self.selected = (self.selected + 1) % self.items.len();
                    self.publish(gui);
                }
                InputResponse::Consumed
            }
            (InputKey::Ok, InputType::Short) => match self.items.get(self.selected) {
                Some(item) => InputResponse::Emit(item.event),
                None => InputResponse::Consumed,
            },
            _ => InputResponse::Ignored,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
