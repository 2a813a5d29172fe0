//! Transient message screen, dismissed through a single custom event.

use std::any::Any;

use anyhow::Result;

use crate::gui::{InputEvent, InputKey, InputType, Toolkit, ViewContent, ViewHandle};
use crate::widget::{InputResponse, Widget, WidgetBase};

pub struct Popup<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
    header: Option<String>,
    text: Option<String>,
    timeout_ms: Option<u32>,
    dismiss_event: Option<u32>,
}

impl<C> Popup<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self {
            base,
            view: None,
            header: None,
            text: None,
            timeout_ms: None,
            dismiss_event: None,
        }
    }

    pub fn set_header(&mut self, gui: &mut dyn Toolkit, header: impl Into<String>) {
        self.header = Some(header.into());
        self.publish(gui);
    }

    pub fn set_text(&mut self, gui: &mut dyn Toolkit, text: impl Into<String>) {
        self.text = Some(text.into());
        self.publish(gui);
    }

    /// Advisory display duration. The framework runs no hidden timer for it;
    /// a scene tick handler that wants auto-dismiss reads it back.
    pub fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout_ms = Some(timeout_ms);
    }

    pub fn timeout(&self) -> Option<u32> {
        self.timeout_ms
    }

    /// Event emitted when the user dismisses the popup with Ok or Back.
    pub fn set_dismiss_event(&mut self, event: u32) {
        self.dismiss_event = Some(event);
    }

    fn publish(&self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view {
            gui.set_view_content(
                view,
                ViewContent {
                    title: self.header.clone(),
                    lines: self
                        .text
                        .as_deref()
                        .map(|text| text.lines().map(str::to_owned).collect())
                        .unwrap_or_default(),
                    selected: None,
                },
            );
        }
    }
}

impl<C: 'static> Widget<C> for Popup<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "popup allocated twice");
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
        self.view.expect("popup not allocated")
    }

    fn reset(&mut self, gui: &mut dyn Toolkit) {
        self.header = None;
        self.text = None;
        self.timeout_ms = None;
        self.dismiss_event = None;
        self.publish(gui);
    }

    fn on_input(&mut self, _gui: &mut dyn Toolkit, event: &InputEvent) -> InputResponse {
        let dismiss = matches!(event.key, InputKey::Ok | InputKey::Back)
            && event.kind == InputType::Short;
        match (dismiss, self.dismiss_event) {
            (true, Some(event)) => InputResponse::Emit(event),
            _ => InputResponse::Ignored,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::headless::HeadlessToolkit;

    #[test]
    fn test_dismiss_emits_configured_event() {
        let mut gui = HeadlessToolkit::new();
        let mut popup: Popup<()> = Popup::new(WidgetBase::new());
        popup.allocate(&mut gui).unwrap();
        popup.set_dismiss_event(42);

        let ok = InputEvent::new(InputKey::Ok, InputType::Short);
        let back = InputEvent::new(InputKey::Back, InputType::Short);
        assert_eq!(popup.on_input(&mut gui, &ok), InputResponse::Emit(42));
        assert_eq!(popup.on_input(&mut gui, &back), InputResponse::Emit(42));
    }

    #[test]
    fn test_without_dismiss_event_input_falls_through() {
        let mut gui = HeadlessToolkit::new();
        let mut popup: Popup<()> = Popup::new(WidgetBase::new());
        popup.allocate(&mut gui).unwrap();
        let back = InputEvent::new(InputKey::Back, InputType::Short);
        assert_eq!(popup.on_input(&mut gui, &back), InputResponse::Ignored);
    }
}
