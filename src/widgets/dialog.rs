//! Three-button dialog; each configured button emits its own custom event.

use std::any::Any;

use anyhow::Result;

use crate::gui::{InputEvent, InputKey, InputType, Toolkit, ViewContent, ViewHandle};
use crate::widget::{InputResponse, Widget, WidgetBase};

#[derive(Debug, Clone)]
struct DialogButton {
    label: String,
    event: u32,
}

pub struct Dialog<C> {
    base: WidgetBase<C>,
    view: Option<ViewHandle>,
    header: Option<String>,
    text: Option<String>,
    left: Option<DialogButton>,
    center: Option<DialogButton>,
    right: Option<DialogButton>,
}

impl<C> Dialog<C> {
    pub fn new(base: WidgetBase<C>) -> Self {
        Self {
            base,
            view: None,
            header: None,
            text: None,
            left: None,
            center: None,
            right: None,
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

    /// Left button, triggered by a short Left press.
    pub fn set_left_button(&mut self, gui: &mut dyn Toolkit, label: impl Into<String>, event: u32) {
        self.left = Some(DialogButton { label: label.into(), event });
        self.publish(gui);
    }

    /// Center button, triggered by a short Ok press.
    pub fn set_center_button(
        &mut self,
        gui: &mut dyn Toolkit,
        label: impl Into<String>,
        event: u32,
    ) {
        self.center = Some(DialogButton { label: label.into(), event });
        self.publish(gui);
    }

    /// Right button, triggered by a short Right press.
    pub fn set_right_button(
        &mut self,
        gui: &mut dyn Toolkit,
        label: impl Into<String>,
        event: u32,
    ) {
        self.right = Some(DialogButton { label: label.into(), event });
        self.publish(gui);
    }

    fn publish(&self, gui: &mut dyn Toolkit) {
        if let Some(view) = self.view {
            let mut lines: Vec<String> = Vec::new();
            if let Some(text) = &self.text {
                lines.extend(text.lines().map(str::to_owned));
            }
            let buttons: Vec<&str> = [&self.left, &self.center, &self.right]
                .into_iter()
                .flatten()
                .map(|button| button.label.as_str())
                .collect();
            if !buttons.is_empty() {
                lines.push(buttons.join(" | "));
            }
            gui.set_view_content(
                view,
                ViewContent { title: self.header.clone(), lines, selected: None },
            );
        }
    }
}

impl<C: 'static> Widget<C> for Dialog<C> {
    fn base(&self) -> &WidgetBase<C> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<C> {
        &mut self.base
    }

    fn allocate(&mut self, gui: &mut dyn Toolkit) -> Result<()> {
        assert!(self.view.is_none(), "dialog allocated twice");
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
        self.view.expect("dialog not allocated")
    }

    fn reset(&mut self, gui: &mut dyn Toolkit) {
        self.header = None;
        self.text = None;
        self.left = None;
        self.center = None;
        self.right = None;
        self.publish(gui);
    }

    fn on_input(&mut self, _gui: &mut dyn Toolkit, event: &InputEvent) -> InputResponse {
        if event.kind != InputType::Short {
            return InputResponse::Ignored;
        }
        let button = match event.key {
            InputKey::Left => self.left.as_ref(),
            InputKey::Ok => self.center.as_ref(),
            InputKey::Right => self.right.as_ref(),
            _ => None,
        };
        match button {
            Some(button) => InputResponse::Emit(button.event),
            None => InputResponse::Ignored,
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
    fn test_buttons_emit_their_events() {
        let mut gui = HeadlessToolkit::new();
        let mut dialog: Dialog<()> = Dialog::new(WidgetBase::new());
        dialog.allocate(&mut gui).unwrap();
        dialog.set_left_button(&mut gui, "No", 1);
        dialog.set_right_button(&mut gui, "Yes", 2);

        let left = InputEvent::new(InputKey::Left, InputType::Short);
        let ok = InputEvent::new(InputKey::Ok, InputType::Short);
        let right = InputEvent::new(InputKey::Right, InputType::Short);
        assert_eq!(dialog.on_input(&mut gui, &left), InputResponse::Emit(1));
        assert_eq!(dialog.on_input(&mut gui, &ok), InputResponse::Ignored);
        assert_eq!(dialog.on_input(&mut gui, &right), InputResponse::Emit(2));
    }

    #[test]
    fn test_content_carries_text_and_buttons() {
        let mut gui = HeadlessToolkit::new();
        let mut dialog: Dialog<()> = Dialog::new(WidgetBase::new());
        dialog.allocate(&mut gui).unwrap();
        dialog.set_header(&mut gui, "Confirm");
        dialog.set_text(&mut gui, "Erase everything?");
        dialog.set_left_button(&mut gui, "No", 1);
        dialog.set_right_button(&mut gui, "Yes", 2);

        let content = gui.content(dialog.widget_view()).unwrap();
        assert_eq!(content.title.as_deref(), Some("Confirm"));
        assert_eq!(content.lines, vec!["Erase everything?".to_string(), "No | Yes".to_string()]);
    }
}
