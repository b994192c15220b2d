use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::draw::attrs::AttrValue;
use crate::scene::ElementConfig;
use crate::shape::{ShapeRegistry, ShapeType};

fn create_test_scene() -> (Scene, NodeId) {
    let mut scene = Scene::new(Rc::new(ShapeRegistry::with_builtin()));
    let root = scene.root();
    let node = scene
        .add_child(
            root,
            ElementConfig::shape(ShapeType::Circle)
                .attr(AttrKey::X, 50.0)
                .attr(AttrKey::Y, 0.0)
                .attr(AttrKey::R, 5.0),
        )
        .unwrap();
    (scene, node)
}

fn x_of(scene: &Scene, node: NodeId) -> f64 {
    scene.attr(node, AttrKey::X).and_then(AttrValue::as_number).unwrap()
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move || handle.set(handle.get() + 1))
}

#[test]
fn test_linear_sample_and_exact_end() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    let (finished, on_finish) = counter();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 100.0),
        AnimateConfig::new(500.0).on_finish(on_finish),
        0.0,
    );

    assert!(timeline.tick(&mut scene, 250.0));
    assert!((x_of(&scene, node) - 75.0).abs() < 1e-9);

    assert!(!timeline.tick(&mut scene, 520.0));
    assert_eq!(x_of(&scene, node), 100.0);
    assert_eq!(finished.get(), 1);

    timeline.tick(&mut scene, 900.0);
    assert_eq!(finished.get(), 1);
    assert!(!timeline.is_animating(node));
}

#[test]
fn test_newer_animation_wins_contested_keys() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::X, 100.0), 500.0, 0.0);
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::X, 200.0), 500.0, 0.0);

    let queued = timeline.animations(node);
    assert_eq!(queued.len(), 2);
    assert!(!queued[0].to_attrs().contains(AttrKey::X));
    assert!(!queued[0].from_attrs().contains(AttrKey::X));

    timeline.tick(&mut scene, 250.0);
    assert!((x_of(&scene, node) - 125.0).abs() < 1e-9);
    timeline.tick(&mut scene, 500.0);
    assert_eq!(x_of(&scene, node), 200.0);
    timeline.tick(&mut scene, 1000.0);
    assert_eq!(x_of(&scene, node), 200.0);
}

#[test]
fn test_disjoint_windows_keep_their_keys() {
    let (scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::X, 100.0), 100.0, 0.0);
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 0.0),
        (100.0, Easing::Linear, 200.0),
        0.0,
    );
    assert!(timeline.animations(node)[0].to_attrs().contains(AttrKey::X));
}

#[test]
fn test_node_registers_once() {
    let (scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::X, 1.0), 100.0, 0.0);
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::Y, 1.0), 100.0, 0.0);
    assert_eq!(timeline.active_nodes(), &[node]);
    assert_eq!(timeline.len(), 2);
}

#[test]
fn test_delay_holds_start_value() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 150.0),
        (100.0, Easing::Linear, 100.0),
        0.0,
    );
    timeline.tick(&mut scene, 50.0);
    assert_eq!(x_of(&scene, node), 50.0);
    timeline.tick(&mut scene, 150.0);
    assert!((x_of(&scene, node) - 100.0).abs() < 1e-9);
}

#[test]
fn test_pause_and_resume_continue_from_paused_state() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    let pauses = Rc::new(Cell::new(0));
    let resumes = Rc::new(Cell::new(0));
    let (p, r) = (Rc::clone(&pauses), Rc::clone(&resumes));
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 150.0),
        AnimateConfig::new(100.0)
            .on_pause(move || p.set(p.get() + 1))
            .on_resume(move || r.set(r.get() + 1)),
        0.0,
    );

    timeline.tick(&mut scene, 50.0);
    assert!((x_of(&scene, node) - 100.0).abs() < 1e-9);
    timeline.pause(node, 50.0);
    timeline.pause(node, 60.0);
    assert!(timeline.is_paused(node));
    timeline.tick(&mut scene, 200.0);
    assert!((x_of(&scene, node) - 100.0).abs() < 1e-9);

    timeline.resume(node, 250.0);
    assert_eq!(timeline.animations(node)[0].start_time(), 200.0);
    timeline.tick(&mut scene, 275.0);
    assert!((x_of(&scene, node) - 125.0).abs() < 1e-9);
    timeline.tick(&mut scene, 300.0);
    assert_eq!(x_of(&scene, node), 150.0);
    assert_eq!((pauses.get(), resumes.get()), (1, 1));
}

#[test]
fn test_stop_to_end_writes_final_values() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    let (finished, on_finish) = counter();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 100.0),
        AnimateConfig::new(500.0).on_finish(on_finish),
        0.0,
    );
    timeline.tick(&mut scene, 100.0);
    timeline.stop_animate(&mut scene, node, true);
    assert_eq!(x_of(&scene, node), 100.0);
    assert_eq!(finished.get(), 1);
    assert!(!timeline.is_active());

    timeline.stop_animate(&mut scene, node, true);
    assert_eq!(finished.get(), 1);
}

#[test]
fn test_stop_in_place_keeps_last_value() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    let (finished, on_finish) = counter();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 100.0),
        (500.0, Easing::Linear, on_finish, 0.0),
        0.0,
    );
    timeline.tick(&mut scene, 250.0);
    timeline.stop_all(&mut scene, false);
    assert!((x_of(&scene, node) - 75.0).abs() < 1e-9);
    assert_eq!(finished.get(), 1);
    assert!(timeline.is_empty());
}

#[test]
fn test_repeat_wraps_and_never_finishes() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 150.0),
        AnimateConfig::new(100.0).repeat(true),
        0.0,
    );
    assert!(timeline.tick(&mut scene, 1050.0));
    assert!((x_of(&scene, node) - 100.0).abs() < 1e-9);
    assert!(timeline.is_animating(node));
}

#[test]
fn test_frame_function_drives_attrs() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(
        &scene,
        node,
        AnimationTarget::frame(|ratio| Attrs::new().with(AttrKey::R, 5.0 + 10.0 * ratio)),
        (200.0, Easing::QuadIn),
        0.0,
    );
    timeline.tick(&mut scene, 100.0);
    assert_eq!(scene.attrs(node).unwrap().number(AttrKey::R), Some(7.5));
    timeline.tick(&mut scene, 200.0);
    assert_eq!(scene.attrs(node).unwrap().number(AttrKey::R), Some(15.0));
}

#[test]
fn test_missing_matrix_animates_from_identity() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::Matrix, Matrix::translation(10.0, 0.0)),
        100.0,
        0.0,
    );
    timeline.tick(&mut scene, 50.0);
    assert_eq!(
        scene.node(node).unwrap().matrix(),
        Some(&Matrix::translation(5.0, 0.0))
    );
}

#[test]
fn test_destroyed_node_is_dropped_silently() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    let (finished, on_finish) = counter();
    timeline.animate(
        &scene,
        node,
        Attrs::new().with(AttrKey::X, 100.0),
        AnimateConfig::new(100.0).on_finish(on_finish),
        0.0,
    );
    scene.destroy(node);
    assert!(!timeline.tick(&mut scene, 200.0));
    assert_eq!(finished.get(), 0);
    assert!(timeline.animate(&scene, node, Attrs::new(), 100.0, 0.0).is_none());
}

#[test]
fn test_animation_added_while_paused_waits_for_resume() {
    let (mut scene, node) = create_test_scene();
    let mut timeline = Timeline::new();
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::X, 60.0), 1000.0, 0.0);
    timeline.pause(node, 0.0);
    timeline.animate(&scene, node, Attrs::new().with(AttrKey::Y, 100.0), 100.0, 50.0);
    timeline.tick(&mut scene, 500.0);
    assert_eq!(scene.attrs(node).unwrap().number(AttrKey::Y), Some(0.0));

    timeline.resume(node, 500.0);
    timeline.tick(&mut scene, 550.0);
    assert!((scene.attrs(node).unwrap().number(AttrKey::Y).unwrap() - 50.0).abs() < 1e-9);
}
