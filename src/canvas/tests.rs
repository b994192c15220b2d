use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::animate::AnimateConfig;
use crate::config::ColorSpec;
use crate::draw::FrameKind;
use crate::draw::attrs::{AttrKey, Attrs};
use crate::draw::color::{BLUE, RED};
use crate::event::{GraphEvent, ListenerHost, PointerInput, PointerKind};
use crate::frame::{ManualClock, ManualScheduler};
use crate::scene::ElementConfig;
use crate::shape::ShapeType;

fn rect(x: f64, y: f64, size: f64) -> ElementConfig {
    ElementConfig::shape(ShapeType::Rect)
        .attr(AttrKey::X, x)
        .attr(AttrKey::Y, y)
        .attr(AttrKey::Width, size)
        .attr(AttrKey::Height, size)
        .attr(AttrKey::Fill, RED)
}

fn create_test_canvas(auto_draw: bool) -> (Canvas, ManualScheduler, ManualClock) {
    let scheduler = ManualScheduler::new();
    let clock = ManualClock::new();
    let canvas = Canvas::builder(100, 100)
        .auto_draw(auto_draw)
        .scheduler(scheduler.clone())
        .clock(clock.clone())
        .build()
        .unwrap();
    (canvas, scheduler, clock)
}

fn alpha_at(canvas: &Canvas, x: usize, y: usize) -> u8 {
    let mut snapshot = canvas.snapshot().unwrap();
    let stride = snapshot.stride() as usize;
    let data = snapshot.data().unwrap();
    data[y * stride + x * 4 + 3]
}

#[test]
fn test_mutations_coalesce_into_one_frame() {
    let (mut canvas, scheduler, _clock) = create_test_canvas(true);
    canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    canvas.add_shape(rect(50.0, 50.0, 20.0)).unwrap();
    assert_eq!(scheduler.requested(), 1);

    let report = canvas.poll().unwrap().unwrap();
    assert_eq!(report.kind, FrameKind::Full);
    assert_eq!(report.painted, 2);
    assert_eq!(scheduler.ran(), 1);
    assert!(!canvas.has_pending_frame());
    assert_eq!(canvas.poll().unwrap(), None);
    assert_eq!(alpha_at(&canvas, 15, 15), 255);
    assert_eq!(alpha_at(&canvas, 40, 40), 0);
}

#[test]
fn test_attribute_change_repaints_region() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    canvas.add_shape(rect(70.0, 70.0, 20.0)).unwrap();
    canvas.poll().unwrap();

    canvas.set_attr(shape, AttrKey::Fill, BLUE);
    let report = canvas.poll().unwrap().unwrap();
    assert_eq!(
        report.kind,
        FrameKind::Region(BBox::from_min_max(10.0, 10.0, 30.0, 30.0))
    );
    assert_eq!(report.painted, 1);
}

#[test]
fn test_manual_draw_without_auto_draw() {
    let (mut canvas, scheduler, _clock) = create_test_canvas(false);
    canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    assert_eq!(scheduler.requested(), 0);
    assert_eq!(canvas.poll().unwrap(), None);

    canvas.draw();
    canvas.draw();
    assert_eq!(scheduler.requested(), 1);
    let report = canvas.poll().unwrap().unwrap();
    assert_eq!(report.kind, FrameKind::Full);
}

#[test]
fn test_disabled_local_refresh_always_repaints_everything() {
    let scheduler = ManualScheduler::new();
    let mut canvas = Canvas::builder(100, 100)
        .local_refresh(false)
        .scheduler(scheduler)
        .clock(ManualClock::new())
        .build()
        .unwrap();
    let shape = canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    canvas.add_shape(rect(70.0, 70.0, 20.0)).unwrap();
    canvas.poll().unwrap();

    canvas.translate(shape, 5.0, 0.0);
    let report = canvas.poll().unwrap().unwrap();
    assert_eq!(report.kind, FrameKind::Full);
    assert_eq!(report.painted, 2);
}

#[test]
fn test_animation_drives_frames_until_done() {
    let (mut canvas, _scheduler, clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(50.0, 10.0, 10.0)).unwrap();
    canvas.poll().unwrap();

    let finished = Rc::new(Cell::new(0));
    let counter = Rc::clone(&finished);
    canvas.animate(
        shape,
        Attrs::new().with(AttrKey::X, 100.0),
        AnimateConfig::new(500.0).on_finish(move || counter.set(counter.get() + 1)),
    );
    assert!(canvas.is_animating(shape));

    clock.advance(250.0);
    canvas.poll().unwrap();
    assert_eq!(canvas.attrs(shape).unwrap().number(AttrKey::X), Some(75.0));
    assert!(canvas.has_pending_frame());

    clock.advance(300.0);
    canvas.poll().unwrap();
    assert_eq!(canvas.attrs(shape).unwrap().number(AttrKey::X), Some(100.0));
    assert_eq!(finished.get(), 1);
    assert!(!canvas.is_animating(shape));
    assert!(!canvas.has_pending_frame());
}

#[test]
fn test_canvas_default_easing_applies() {
    let scheduler = ManualScheduler::new();
    let clock = ManualClock::new();
    let mut canvas = Canvas::builder(100, 100)
        .default_easing(Easing::QuadIn)
        .scheduler(scheduler)
        .clock(clock.clone())
        .build()
        .unwrap();
    let shape = canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.animate(shape, Attrs::new().with(AttrKey::X, 100.0), 100.0);
    assert_eq!(canvas.timeline().animations(shape)[0].easing(), Easing::QuadIn);

    clock.advance(50.0);
    canvas.poll().unwrap();
    assert_eq!(canvas.attrs(shape).unwrap().number(AttrKey::X), Some(25.0));
}

#[test]
fn test_pause_holds_animation() {
    let (mut canvas, _scheduler, clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.animate(shape, Attrs::new().with(AttrKey::X, 100.0), 100.0);

    clock.advance(50.0);
    canvas.poll().unwrap();
    canvas.pause_animate(shape);
    assert!(canvas.is_animation_paused(shape));
    clock.advance(500.0);
    canvas.poll().unwrap();
    assert_eq!(canvas.attrs(shape).unwrap().number(AttrKey::X), Some(50.0));

    canvas.resume_animate(shape);
    clock.advance(25.0);
    canvas.poll().unwrap();
    assert_eq!(canvas.attrs(shape).unwrap().number(AttrKey::X), Some(75.0));
}

#[test]
fn test_listener_mutation_schedules_frame() {
    let (mut canvas, scheduler, _clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    canvas.poll().unwrap();
    canvas
        .on(shape, "click", |event, canvas: &mut Canvas| {
            if let Some(target) = event.target {
                canvas.scene_mut().set_attr(target, AttrKey::Fill, BLUE);
            }
        })
        .unwrap();
    let before = scheduler.requested();

    canvas.handle_pointer(&PointerInput::new(PointerKind::Down, 15.0, 15.0).with_client(15.0, 15.0));
    canvas.handle_pointer(&PointerInput::new(PointerKind::Up, 15.0, 15.0).with_client(15.0, 15.0));
    assert_eq!(scheduler.requested(), before + 1);
    let report = canvas.poll().unwrap().unwrap();
    assert!(matches!(report.kind, FrameKind::Region(_)));
}

#[test]
fn test_emit_does_not_bubble() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let root = canvas.root();
    let group = canvas.add_group(root).unwrap();
    let shape = canvas.add_child(group, rect(0.0, 0.0, 10.0)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for (node, label) in [(group, "group"), (shape, "shape")] {
        let seen = Rc::clone(&seen);
        canvas
            .on(node, "custom", move |event, _: &mut Canvas| {
                seen.borrow_mut().push(format!("{label}:{}", event.name));
            })
            .unwrap();
    }

    canvas.emit(shape, "custom", &mut GraphEvent::new("custom"));
    assert_eq!(*seen.borrow(), vec!["shape:custom"]);
}

#[test]
fn test_invalid_listener_name_fails_fast() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let root = canvas.root();
    let result = canvas.on(root, "shape:", |_, _: &mut Canvas| {});
    assert!(matches!(result, Err(SceneError::InvalidListener(_))));
}

#[test]
fn test_destroy_node_drops_listeners_animations_and_meta() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let root = canvas.root();
    let group = canvas.add_group(root).unwrap();
    let shape = canvas.add_child(group, rect(0.0, 0.0, 10.0)).unwrap();
    canvas.on(shape, "click", |_, _: &mut Canvas| {}).unwrap();
    canvas.set_meta(shape, "kind", serde_json::json!("marker"));
    canvas.animate(shape, Attrs::new().with(AttrKey::X, 10.0), 100.0);
    assert_eq!(canvas.meta(shape).and_then(|m| m.get("kind")), Some(&serde_json::json!("marker")));

    canvas.destroy_node(group);
    assert_eq!(canvas.emitter().count(shape), 0);
    assert!(canvas.meta(shape).is_none());
    assert!(!canvas.is_animating(shape));
    canvas.destroy_node(group);
}

#[test]
fn test_scene_edits_are_swept_on_next_frame() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.on(shape, "click", |_, _: &mut Canvas| {}).unwrap();
    canvas.set_meta(shape, "k", serde_json::json!(1));

    canvas.scene_mut().destroy(shape);
    canvas.run_frame().unwrap();
    assert_eq!(canvas.emitter().count(shape), 0);
    assert!(canvas.meta(shape).is_none());
}

#[test]
fn test_change_size_forces_full_frame() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.poll().unwrap();

    canvas.change_size(50, 40).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (50, 40));
    let report = canvas.poll().unwrap().unwrap();
    assert_eq!(report.kind, FrameKind::Full);
    assert_eq!(canvas.snapshot().unwrap().width(), 50);
}

#[test]
fn test_destroy_cancels_pending_frame_and_clears_tree() {
    let (mut canvas, scheduler, _clock) = create_test_canvas(true);
    let shape = canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.animate(shape, Attrs::new().with(AttrKey::X, 10.0), 100.0);
    assert!(canvas.has_pending_frame());

    canvas.destroy();
    assert!(canvas.is_destroyed());
    assert_eq!(scheduler.cancelled(), 1);
    assert!(!canvas.has_pending_frame());
    assert!(canvas.scene().is_empty());
    assert!(!canvas.timeline().is_active());

    canvas.draw();
    assert!(!canvas.has_pending_frame());
    assert_eq!(canvas.poll().unwrap(), None);
    canvas.destroy();
}

#[test]
fn test_frame_callback_sees_every_frame() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(false);
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    canvas.on_frame_drawn(move |report| sink.borrow_mut().push(report.kind));

    canvas.add_shape(rect(0.0, 0.0, 10.0)).unwrap();
    canvas.run_frame().unwrap();
    canvas.run_frame().unwrap();
    assert_eq!(*kinds.borrow(), vec![FrameKind::Full, FrameKind::Skipped]);
}

#[test]
fn test_config_sets_background_and_pixel_ratio() {
    let mut config = Config::default();
    config.canvas.width = 40;
    config.canvas.height = 30;
    config.canvas.pixel_ratio = 2.0;
    config.canvas.background = Some(ColorSpec::Name("white".into()));
    let mut canvas = CanvasBuilder::from_config(&config)
        .scheduler(ManualScheduler::new())
        .clock(ManualClock::new())
        .build()
        .unwrap();
    assert_eq!(canvas.view(), BBox::new(0.0, 0.0, 40.0, 30.0));

    canvas.run_frame().unwrap();
    let snapshot = canvas.snapshot().unwrap();
    assert_eq!((snapshot.width(), snapshot.height()), (80, 60));
    assert_eq!(alpha_at(&canvas, 79, 59), 255);
}

#[test]
fn test_write_png() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    canvas.add_shape(rect(10.0, 10.0, 20.0)).unwrap();
    canvas.run_frame().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.png");
    canvas.write_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_get_shape_uses_canvas_coordinates() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let root = canvas.root();
    let group = canvas.add_group(root).unwrap();
    canvas.translate(group, 30.0, 0.0);
    let shape = canvas.add_child(group, rect(0.0, 0.0, 10.0)).unwrap();
    assert_eq!(canvas.get_shape(35.0, 5.0), Some(shape));
    assert_eq!(canvas.get_shape(5.0, 5.0), None);
}

#[test]
fn test_moving_arrowed_line_clears_old_head() {
    let (mut canvas, _scheduler, _clock) = create_test_canvas(true);
    let line = canvas
        .add_shape(
            ElementConfig::shape(ShapeType::Line)
                .attr(AttrKey::X1, 10.0)
                .attr(AttrKey::Y1, 50.0)
                .attr(AttrKey::X2, 80.0)
                .attr(AttrKey::Y2, 50.0)
                .attr(AttrKey::LineWidth, 2.0)
                .attr(AttrKey::Stroke, BLUE)
                .attr(AttrKey::EndArrow, crate::shape::ArrowSpec::Default),
        )
        .unwrap();
    canvas.poll().unwrap();
    assert!(alpha_at(&canvas, 71, 54) > 0);

    canvas.translate(line, 0.0, 20.0);
    let report = canvas.poll().unwrap().unwrap();
    let FrameKind::Region(region) = report.kind else {
        panic!("expected a region frame, got {:?}", report.kind);
    };
    assert!(region.contains_point(71.34, 45.0));
    assert!(region.contains_point(71.34, 55.0));
    assert_eq!(alpha_at(&canvas, 71, 54), 0);
    assert!(alpha_at(&canvas, 71, 74) > 0);
}
