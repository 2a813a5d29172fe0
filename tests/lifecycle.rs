//! Run-loop behavior and resource lifecycle, observed through the headless
//! toolkit's operation log.

use std::time::Duration;

use stagehand::gui::headless::{HeadlessToolkit, ToolkitOp};
use stagehand::gui::{InputEvent, InputKey, InputType};
use stagehand::view::View;
use stagehand::widget::WidgetBase;
use stagehand::widgets::{EmptyScreen, Submenu};
use stagehand::{Application, SceneEvent, ViewContent, Widget};

const EVENT_PICKED: u32 = 7;
const EVENT_FOLLOWUP: u32 = 8;

#[derive(Default)]
struct LoopCtx {
    log: Vec<String>,
    ticks: u32,
}

type App = Application<LoopCtx>;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn headless(app: &mut App) -> &mut HeadlessToolkit {
    app.toolkit_mut().as_any_mut().downcast_mut().expect("headless toolkit")
}

fn enter_and_show(app: &mut App) {
    let id = app.scene_manager().current_scene().unwrap();
    app.switch_to_view(id);
}

fn exit_noop(_app: &mut App) {}

fn event_unhandled(_app: &mut App, _event: SceneEvent) -> bool {
    false
}

/// Consumes the submenu's event, queues a follow-up from inside the handler
/// and stops on the follow-up; logs handler entry/return order.
fn event_chaining(app: &mut App, event: SceneEvent) -> bool {
    match event {
        SceneEvent::Custom(id) => {
            app.ctx_mut().log.push(format!("begin:{id}"));
            match id {
                EVENT_PICKED => app.send_custom_event(EVENT_FOLLOWUP),
                EVENT_FOLLOWUP => app.stop(),
                _ => {}
            }
            app.ctx_mut().log.push(format!("end:{id}"));
            true
        }
        _ => false,
    }
}

fn event_ticking(app: &mut App, event: SceneEvent) -> bool {
    if event == SceneEvent::Tick {
        app.ctx_mut().ticks += 1;
        if app.ctx().ticks >= 3 {
            app.stop();
        }
    }
    false
}

fn single_widget_app(
    widget: Box<dyn Widget<LoopCtx>>,
    gui: HeadlessToolkit,
    tick_period: Duration,
) -> App {
    init_logs();
    Application::new(Box::new(gui), vec![widget], LoopCtx::default(), |_app| {}, tick_period)
        .unwrap()
}

#[test]
fn test_widget_input_drives_scene_through_the_queue() {
    let menu = Submenu::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_chaining,
        exit_noop,
    ));
    let mut gui = HeadlessToolkit::new();
    gui.push_input(InputEvent::new(InputKey::Down, InputType::Short));
    gui.push_input(InputEvent::new(InputKey::Ok, InputType::Short));

    let mut app = single_widget_app(Box::new(menu), gui, Duration::ZERO);
    app.with_widget::<Submenu<LoopCtx>, _>(0, |menu, gui| {
        menu.add_item(gui, "first", 99);
        menu.add_item(gui, "picked", EVENT_PICKED);
    });

    app.run().unwrap();
    // The follow-up queued inside the first handler ran only after that
    // handler returned.
    assert_eq!(
        app.ctx().log,
        vec![
            format!("begin:{EVENT_PICKED}"),
            format!("end:{EVENT_PICKED}"),
            format!("begin:{EVENT_FOLLOWUP}"),
            format!("end:{EVENT_FOLLOWUP}"),
        ]
    );
    app.destroy();
}

#[test]
fn test_tick_period_zero_never_ticks() {
    let screen = EmptyScreen::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_ticking,
        exit_noop,
    ));
    let mut gui = HeadlessToolkit::new();
    // Root-scene back press: nothing consumes it, the stack is empty, the
    // loop stops.
    gui.push_input(InputEvent::new(InputKey::Back, InputType::Short));

    let mut app = single_widget_app(Box::new(screen), gui, Duration::ZERO);
    app.run().unwrap();
    assert_eq!(app.ctx().ticks, 0);
    app.destroy();
}

#[test]
fn test_positive_tick_period_delivers_ticks() {
    let screen = EmptyScreen::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_ticking,
        exit_noop,
    ));
    let mut app =
        single_widget_app(Box::new(screen), HeadlessToolkit::new(), Duration::from_millis(100));
    app.run().unwrap();
    assert_eq!(app.ctx().ticks, 3, "handler stops the loop on the third tick");
    app.destroy();
}

#[test]
fn test_loading_style_widget_blocks_back_navigation() {
    use stagehand::widgets::Loading;

    let loading = Loading::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_ticking,
        exit_noop,
    ));
    let mut gui = HeadlessToolkit::new();
    gui.push_input(InputEvent::new(InputKey::Back, InputType::Short));

    // The widget consumes Back, so only the tick counter can stop the loop;
    // reaching 3 ticks proves the back press never reached the scene manager.
    let mut app =
        single_widget_app(Box::new(loading), gui, Duration::from_millis(50));
    app.run().unwrap();
    assert_eq!(app.ctx().ticks, 3);
    assert_eq!(app.scene_manager().current_scene(), Some(0));
    app.destroy();
}

#[test]
fn test_on_begin_runs_after_storage_and_before_views() {
    init_logs();
    let screen = EmptyScreen::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_unhandled,
        exit_noop,
    ));
    let mut observed = false;
    let mut app = Application::new(
        Box::new(HeadlessToolkit::new()),
        vec![Box::new(screen) as Box<dyn Widget<LoopCtx>>],
        LoopCtx::default(),
        |app| {
            let storage_up = app.storage().is_initialized();
            let no_views_yet = headless(app)
                .ops()
                .iter()
                .all(|op| !matches!(op, ToolkitOp::CreateView(_) | ToolkitOp::CreateStack(_)));
            observed = storage_up && no_views_yet;
        },
        Duration::ZERO,
    )
    .unwrap();
    assert!(observed, "on_begin must see storage up and no views allocated");
    app.destroy();
}

#[test]
fn test_teardown_order_and_idempotence() {
    let screen = EmptyScreen::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_unhandled,
        exit_noop,
    ));
    let mut app = single_widget_app(Box::new(screen), HeadlessToolkit::new(), Duration::ZERO);
    app.destroy();

    {
        let gui = headless(&mut app);
        assert_eq!(gui.live_views(), 0, "every view released");
        assert_eq!(gui.live_stacks(), 0, "every stack released");
        assert!(!gui.is_attached());

        let ops = gui.ops();
        let remove_primary = ops
            .iter()
            .position(|op| matches!(op, ToolkitOp::StackRemove(_, _)))
            .expect("primary view removed from its stack");
        let release_stack = ops
            .iter()
            .position(|op| matches!(op, ToolkitOp::ReleaseStack(_)))
            .expect("stack released");
        let release_view = ops
            .iter()
            .position(|op| matches!(op, ToolkitOp::ReleaseView(_)))
            .expect("widget view released");
        let detach = ops.iter().position(|op| matches!(op, ToolkitOp::Detach)).expect("detached");
        assert!(remove_primary < release_stack, "views leave the stack before it is released");
        assert!(release_stack < release_view, "stack container goes before the native widget");
        assert!(release_view < detach, "surface detaches last");
    }
    assert!(!app.storage().is_initialized(), "storage torn down in destroy");

    let ops_after_first = headless(&mut app).ops().len();
    app.destroy();
    assert_eq!(headless(&mut app).ops().len(), ops_after_first, "destroy is idempotent");
}

#[test]
fn test_aux_views_allocated_and_released_around_primary() {
    init_logs();
    let aux = View::new().with_deferred_setup(|gui, handle| {
        let mut content = ViewContent::default();
        content.title = Some("status overlay".into());
        gui.set_view_content(handle, content);
    });
    let screen = EmptyScreen::new(
        WidgetBase::new()
            .with_scene(enter_and_show, event_unhandled, exit_noop)
            .with_aux_view(aux),
    );
    let mut app = single_widget_app(Box::new(screen), HeadlessToolkit::new(), Duration::ZERO);

    let (primary, aux_view) = {
        let gui = headless(&mut app);
        let adds: Vec<_> = gui
            .ops()
            .iter()
            .filter_map(|op| match op {
                ToolkitOp::StackAdd(_, view) => Some(*view),
                _ => None,
            })
            .collect();
        assert_eq!(adds.len(), 2, "primary plus one aux view");
        assert_eq!(
            gui.content(adds[1]).unwrap().title.as_deref(),
            Some("status overlay"),
            "deferred setup ran against the live aux handle"
        );
        (adds[0], adds[1])
    };

    app.destroy();
    let gui = headless(&mut app);
    let removes: Vec<_> = gui
        .ops()
        .iter()
        .filter_map(|op| match op {
            ToolkitOp::StackRemove(_, view) => Some(*view),
            _ => None,
        })
        .collect();
    assert_eq!(removes, vec![aux_view, primary], "aux views leave the stack first");
    assert_eq!(gui.live_views(), 0);
}

#[test]
fn test_send_to_front_and_back_pass_through() {
    let screen = EmptyScreen::new(WidgetBase::new().with_scene(
        enter_and_show,
        event_unhandled,
        exit_noop,
    ));
    let mut app = single_widget_app(Box::new(screen), HeadlessToolkit::new(), Duration::ZERO);
    app.send_to_front();
    app.send_to_back();
    let gui = headless(&mut app);
    assert!(gui.ops().iter().any(|op| matches!(op, ToolkitOp::SendToFront)));
    assert!(gui.ops().iter().any(|op| matches!(op, ToolkitOp::SendToBack)));
    app.destroy();
}
