//! Interactive demo: a menu scene, an about scene and a confirmation dialog,
//! driven from a terminal.
//!
//! Run with `cargo run --features terminal --bin stagehand-demo`. Arrow keys
//! move, Enter selects, Esc goes back.

use std::time::Duration;

use anyhow::Result;
use log::info;

use stagehand::gui::terminal::TerminalToolkit;
use stagehand::widget::WidgetBase;
use stagehand::widgets::{Dialog, Submenu, TextBox};
use stagehand::{Application, SceneEvent};

const SCENE_MENU: usize = 0;
const SCENE_ABOUT: usize = 1;
const SCENE_QUIT: usize = 2;

const EVENT_OPEN_ABOUT: u32 = 1;
const EVENT_OPEN_QUIT: u32 = 2;
const EVENT_QUIT_YES: u32 = 3;
const EVENT_QUIT_NO: u32 = 4;

struct DemoCtx {
    visits: u32,
}

fn menu_enter(app: &mut Application<DemoCtx>) {
    app.ctx_mut().visits += 1;
    let visits = app.ctx().visits;
    app.with_widget::<Submenu<DemoCtx>, _>(SCENE_MENU, |menu, gui| {
        menu.set_header(gui, format!("stagehand demo (visit {visits})"));
    });
    app.switch_to_view(SCENE_MENU);
}

fn menu_event(app: &mut Application<DemoCtx>, event: SceneEvent) -> bool {
    match event {
        SceneEvent::Custom(EVENT_OPEN_ABOUT) => {
            app.next_scene(SCENE_ABOUT);
            true
        }
        SceneEvent::Custom(EVENT_OPEN_QUIT) => {
            app.next_scene(SCENE_QUIT);
            true
        }
        _ => false,
    }
}

fn menu_exit(_app: &mut Application<DemoCtx>) {}

fn about_enter(app: &mut Application<DemoCtx>) {
    app.switch_to_view(SCENE_ABOUT);
}

fn about_event(_app: &mut Application<DemoCtx>, _event: SceneEvent) -> bool {
    false
}

fn about_exit(_app: &mut Application<DemoCtx>) {}

fn quit_enter(app: &mut Application<DemoCtx>) {
    app.switch_to_view(SCENE_QUIT);
}

fn quit_event(app: &mut Application<DemoCtx>, event: SceneEvent) -> bool {
    match event {
        SceneEvent::Custom(EVENT_QUIT_YES) => {
            app.stop();
            true
        }
        SceneEvent::Custom(EVENT_QUIT_NO) => app.previous_scene(),
        _ => false,
    }
}

fn quit_exit(_app: &mut Application<DemoCtx>) {}

fn main() -> Result<()> {
    env_logger::init();
    info!("starting stagehand demo");

    let menu = Submenu::new(WidgetBase::new().with_scene(menu_enter, menu_event, menu_exit));
    let about = TextBox::new(WidgetBase::new().with_scene(about_enter, about_event, about_exit));
    let quit = Dialog::new(WidgetBase::new().with_scene(quit_enter, quit_event, quit_exit));

    let mut app = Application::new(
        Box::new(TerminalToolkit::new()),
        vec![Box::new(menu), Box::new(about), Box::new(quit)],
        DemoCtx { visits: 0 },
        |app| {
            app.with_widget::<Submenu<DemoCtx>, _>(SCENE_MENU, |menu, gui| {
                menu.add_item(gui, "About", EVENT_OPEN_ABOUT);
                menu.add_item(gui, "Quit", EVENT_OPEN_QUIT);
            });
            app.with_widget::<TextBox<DemoCtx>, _>(SCENE_ABOUT, |about, gui| {
                about.set_text(
                    gui,
                    "stagehand demo\nScenes map 1:1 to widgets.\nEsc returns to the menu.",
                );
            });
            app.with_widget::<Dialog<DemoCtx>, _>(SCENE_QUIT, |dialog, gui| {
                dialog.set_header(gui, "Quit?");
                dialog.set_text(gui, "Leave the demo?");
                dialog.set_left_button(gui, "No", EVENT_QUIT_NO);
                dialog.set_right_button(gui, "Yes", EVENT_QUIT_YES);
            });
        },
        Duration::ZERO,
    )?;

    app.run()?;
    app.destroy();
    Ok(())
}
