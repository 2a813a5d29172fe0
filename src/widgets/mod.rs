//! Built-in widget variants.
//!
//! Thin parameter-setter wrappers: each stores plain state, publishes it to
//! the toolkit as an opaque [`ViewContent`](crate::gui::ViewContent) block,
//! and maps keys to the custom events it was configured with. The set is
//! open: anything implementing [`Widget`](crate::widget::Widget) registers
//! the same way.

mod dialog;
mod empty_screen;
mod loading;
mod popup;
mod submenu;
mod text_box;

pub use dialog::Dialog;
pub use empty_screen::EmptyScreen;
pub use loading::Loading;
pub use popup::Popup;
pub use submenu::{Submenu, SubmenuItem};
pub use text_box::TextBox;
