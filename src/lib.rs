//! # stagehand
//!
//! An application-lifecycle framework for single-threaded, event-driven UIs:
//! a fixed set of scenes bound 1:1 to a fixed set of widgets, a back-stack
//! scene state machine, and strict allocation/teardown ordering for every
//! native view object involved.
//!
//! The [`Application`] owns everything: it builds the scene callback tables
//! from the registered widgets (widget `i` backs scene `i`), drives the
//! blocking run loop, and tears the world down in the reverse of the order
//! it was built. The rendering/input runtime stays behind the
//! [`Toolkit`](gui::Toolkit) trait; `gui::headless` ships a deterministic
//! implementation and the `terminal` feature adds a crossterm one.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use stagehand::gui::headless::HeadlessToolkit;
//! use stagehand::widget::WidgetBase;
//! use stagehand::widgets::Submenu;
//! use stagehand::{Application, SceneEvent};
//!
//! const EVENT_QUIT: u32 = 1;
//!
//! fn menu_enter(app: &mut Application<()>) {
//!     app.switch_to_view(0);
//! }
//!
//! fn menu_event(app: &mut Application<()>, event: SceneEvent) -> bool {
//!     match event {
//!         SceneEvent::Custom(EVENT_QUIT) => {
//!             app.stop();
//!             true
//!         }
//!         _ => false,
//!     }
//! }
//!
//! fn menu_exit(_app: &mut Application<()>) {}
//!
//! fn main() -> anyhow::Result<()> {
//!     let menu = Submenu::new(WidgetBase::new().with_scene(menu_enter, menu_event, menu_exit));
//!     let mut app = Application::new(
//!         Box::new(HeadlessToolkit::new()),
//!         vec![Box::new(menu)],
//!         (),
//!         |app| {
//!             app.with_widget::<Submenu<()>, _>(0, |menu, gui| {
//!                 menu.add_item(gui, "Quit", EVENT_QUIT);
//!             });
//!         },
//!         Duration::ZERO,
//!     )?;
//!     app.run()
//! }
//! ```

pub mod app;
pub mod dispatcher;
pub mod gui;
pub mod scene;
pub mod storage;
pub mod view;
pub mod widget;
pub mod widgets;

pub use app::Application;
pub use dispatcher::ViewDispatcher;
pub use gui::{InputEvent, InputKey, InputType, SurfaceKind, Toolkit, ViewContent, ViewHandle};
pub use scene::{SceneEvent, SceneManager};
pub use storage::{AccessMode, OpenMode, Storage, StorageError};
pub use view::View;
pub use widget::{InputResponse, Widget, WidgetBase};
