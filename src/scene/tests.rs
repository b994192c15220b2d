use super::*;
use crate::draw::color::{BLUE, RED};
use crate::shape::ShapeType;

fn create_test_scene() -> Scene {
    Scene::new(Rc::new(ShapeRegistry::with_builtin()))
}

fn circle(x: f64, y: f64, r: f64) -> ElementConfig {
    ElementConfig::shape(ShapeType::Circle)
        .attr(AttrKey::X, x)
        .attr(AttrKey::Y, y)
        .attr(AttrKey::R, r)
        .attr(AttrKey::Fill, RED)
}

#[test]
fn test_add_child_sets_parent_and_order() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let a = scene.add_child(root, circle(0.0, 0.0, 5.0)).unwrap();
    let b = scene.add_child(root, circle(10.0, 0.0, 5.0)).unwrap();
    assert_eq!(scene.node(root).unwrap().children(), &[a, b]);
    assert_eq!(scene.node(a).unwrap().parent(), Some(root));
}

#[test]
fn test_add_detaches_from_previous_parent() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let g1 = scene.add_child(root, ElementConfig::group()).unwrap();
    let g2 = scene.add_child(root, ElementConfig::group()).unwrap();
    let shape = scene.add_child(g1, circle(0.0, 0.0, 5.0)).unwrap();

    scene.add(g2, shape).unwrap();
    assert!(scene.node(g1).unwrap().children().is_empty());
    assert_eq!(scene.node(g2).unwrap().children(), &[shape]);
    assert_eq!(scene.node(shape).unwrap().parent(), Some(g2));
}

#[test]
fn test_add_rejects_invalid_parents() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let inner = scene.add_child(group, ElementConfig::group()).unwrap();
    let shape = scene.add_child(root, circle(0.0, 0.0, 5.0)).unwrap();

    assert!(matches!(scene.add(inner, group), Err(SceneError::Cycle)));
    assert!(matches!(scene.add(group, group), Err(SceneError::Cycle)));
    assert!(matches!(scene.add(shape, inner), Err(SceneError::NotAContainer)));
    assert!(matches!(scene.add(group, root), Err(SceneError::CanvasRoot)));

    scene.destroy(inner);
    assert!(matches!(
        scene.add_child(inner, ElementConfig::group()),
        Err(SceneError::DestroyedParent)
    ));
}

#[test]
fn test_unregistered_shape_fails_fast() {
    let mut scene = Scene::new(Rc::new(ShapeRegistry::empty()));
    let root = scene.root();
    let err = scene.add_child(root, circle(0.0, 0.0, 5.0)).err();
    assert!(matches!(err, Some(SceneError::MissingCapability(_))));
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_destroy_is_idempotent() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let shape = scene.add_child(group, circle(0.0, 0.0, 5.0)).unwrap();

    let destroyed = scene.destroy(group);
    assert_eq!(destroyed.len(), 2);
    assert!(!scene.contains(shape));
    assert!(scene.node(root).unwrap().children().is_empty());

    assert!(scene.destroy(group).is_empty());
    assert_eq!(scene.len(), 1);
}

#[test]
fn test_clear_on_empty_container_is_noop() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    assert!(scene.clear(group).is_empty());
    assert!(scene.contains(group));
}

#[test]
fn test_destroy_root_only_clears_children() {
    let mut scene = create_test_scene();
    let root = scene.root();
    scene.add_child(root, circle(0.0, 0.0, 5.0)).unwrap();
    scene.destroy(root);
    assert!(scene.contains(root));
    assert!(scene.is_empty());
}

#[test]
fn test_remove_without_destroy_keeps_node() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(0.0, 0.0, 5.0)).unwrap();
    assert!(scene.remove(shape, false).is_empty());
    assert!(scene.contains(shape));
    assert_eq!(scene.node(shape).unwrap().parent(), None);
    // A second remove of a non-child does nothing.
    assert!(scene.remove(shape, false).is_empty());
}

#[test]
fn test_null_matrices_compose_to_null() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let shape = scene.add_child(group, circle(0.0, 0.0, 5.0)).unwrap();
    assert_eq!(scene.total_matrix(group), None);
    assert_eq!(scene.total_matrix(shape), None);
}

#[test]
fn test_total_matrix_is_parent_times_local() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let shape = scene.add_child(group, circle(0.0, 0.0, 5.0)).unwrap();

    scene.set_matrix(group, Some(Matrix::translation(10.0, 0.0)));
    scene.set_matrix(shape, Some(Matrix::scaling(2.0, 2.0)));
    let total = scene.total_matrix(shape).unwrap();
    assert_eq!(total.apply(1.0, 1.0), (12.0, 2.0));

    scene.reset_matrix(group);
    assert_eq!(scene.total_matrix(shape), Some(Matrix::scaling(2.0, 2.0)));
}

#[test]
fn test_group_scale_doubles_child_canvas_bbox() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let a = scene.add_child(group, circle(10.0, 10.0, 5.0)).unwrap();
    let b = scene.add_child(group, circle(30.0, 10.0, 5.0)).unwrap();
    let before_a = scene.canvas_bbox(a).unwrap();
    let before_b = scene.canvas_bbox(b).unwrap();

    scene.scale(group, 2.0, 2.0);

    let after_a = scene.canvas_bbox(a).unwrap();
    let after_b = scene.canvas_bbox(b).unwrap();
    assert_eq!(after_a.width(), before_a.width() * 2.0);
    assert_eq!(after_b.height(), before_b.height() * 2.0);
    assert_eq!(after_a, BBox::from_min_max(10.0, 10.0, 30.0, 30.0));
    assert_eq!(scene.attrs(a).unwrap().number(AttrKey::R), Some(5.0));
}

#[test]
fn test_adding_to_transformed_group_applies_its_matrix() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    scene.translate(group, 100.0, 0.0);
    let shape = scene.add_child(group, circle(0.0, 0.0, 5.0)).unwrap();
    assert_eq!(
        scene.canvas_bbox(shape),
        Some(BBox::from_min_max(95.0, -5.0, 105.0, 5.0))
    );
}

#[test]
fn test_stroke_widens_shape_bbox() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene
        .add_child(
            root,
            circle(0.0, 0.0, 10.0)
                .attr(AttrKey::Stroke, BLUE)
                .attr(AttrKey::LineWidth, 4.0),
        )
        .unwrap();
    assert_eq!(
        scene.bbox(shape),
        Some(BBox::from_min_max(-12.0, -12.0, 12.0, 12.0))
    );

    scene.set_attr(shape, AttrKey::R, 20.0);
    assert_eq!(
        scene.bbox(shape),
        Some(BBox::from_min_max(-22.0, -22.0, 22.0, 22.0))
    );
}

#[test]
fn test_container_bbox_skips_hidden_children() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    scene.add_child(group, circle(0.0, 0.0, 5.0)).unwrap();
    let far = scene.add_child(group, circle(100.0, 0.0, 5.0)).unwrap();
    assert_eq!(scene.bbox(group).unwrap().max_x, 105.0);
    scene.hide(far);
    assert_eq!(scene.bbox(group).unwrap().max_x, 5.0);
}

#[test]
fn test_clip_limits_canvas_bbox() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let clip = Clip::new(
        ShapeType::Rect,
        Attrs::new()
            .with(AttrKey::X, 0.0)
            .with(AttrKey::Y, 0.0)
            .with(AttrKey::Width, 5.0)
            .with(AttrKey::Height, 5.0),
    );
    let shape = scene.add_child(root, circle(0.0, 0.0, 10.0).clip(clip)).unwrap();
    assert_eq!(
        scene.canvas_bbox(shape),
        Some(BBox::from_min_max(0.0, 0.0, 5.0, 5.0))
    );
}

#[test]
fn test_sort_is_stable_by_z_index() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let a = scene.add_child(root, circle(0.0, 0.0, 1.0).z_index(2.0)).unwrap();
    let b = scene.add_child(root, circle(0.0, 0.0, 1.0)).unwrap();
    let c = scene.add_child(root, circle(0.0, 0.0, 1.0).z_index(2.0)).unwrap();
    let d = scene.add_child(root, circle(0.0, 0.0, 1.0)).unwrap();
    scene.sort(root);
    assert_eq!(scene.node(root).unwrap().children(), &[b, d, a, c]);
    assert!(scene.refresh().is_full());
}

#[test]
fn test_to_front_and_back() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let a = scene.add_child(root, circle(0.0, 0.0, 1.0)).unwrap();
    let b = scene.add_child(root, circle(0.0, 0.0, 1.0)).unwrap();
    scene.to_front(a);
    assert_eq!(scene.node(root).unwrap().children(), &[b, a]);
    scene.to_back(a);
    assert_eq!(scene.node(root).unwrap().children(), &[a, b]);
}

#[test]
fn test_set_z_index_resorts_parent() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene.add_child(root, ElementConfig::group()).unwrap();
    let a = scene.add_child(group, circle(0.0, 0.0, 1.0)).unwrap();
    let b = scene.add_child(group, circle(0.0, 0.0, 1.0)).unwrap();
    scene.set_z_index(a, 5.0);
    assert_eq!(scene.node(group).unwrap().children(), &[b, a]);
}

#[test]
fn test_change_marks_node_once() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(0.0, 0.0, 5.0)).unwrap();
    scene.set_attr(shape, AttrKey::X, 3.0);
    scene.set_attr(shape, AttrKey::Y, 4.0);
    match scene.take_refresh() {
        Refresh::Partial(entries) => assert_eq!(entries, vec![RefreshEntry::Node(shape)]),
        other => panic!("unexpected refresh {other:?}"),
    }
}

#[test]
fn test_detached_changes_are_not_queued() {
    let mut scene = create_test_scene();
    let shape = scene.create(circle(0.0, 0.0, 5.0)).unwrap();
    scene.set_attr(shape, AttrKey::X, 3.0);
    assert_eq!(scene.take_refresh(), Refresh::Idle);
    assert!(!scene.node(shape).unwrap().has_changed());
}

#[test]
fn test_root_attr_change_forces_full() {
    let mut scene = create_test_scene();
    let root = scene.root();
    scene.set_attr(root, AttrKey::Opacity, 0.5);
    assert_eq!(scene.take_refresh(), Refresh::Full);
}

#[test]
fn test_destroy_records_last_drawn_bbox() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(10.0, 10.0, 5.0)).unwrap();
    let drawn = scene.canvas_bbox(shape);
    scene.mark_drawn(shape, drawn);
    scene.clear_refresh();

    scene.destroy(shape);
    assert_eq!(
        scene.take_refresh(),
        Refresh::Partial(vec![RefreshEntry::Removed(drawn)])
    );
}

#[test]
fn test_moved_node_region_covers_both_positions() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(10.0, 10.0, 5.0)).unwrap();
    let drawn = scene.canvas_bbox(shape);
    scene.mark_drawn(shape, drawn);
    scene.clear_refresh();

    scene.translate(shape, 50.0, 0.0);
    let region = scene.entry_region(&RefreshEntry::Node(shape));
    assert_eq!(region, Some(BBox::from_min_max(5.0, 5.0, 65.0, 15.0)));
}

#[test]
fn test_move_to_places_anchor() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(10.0, 10.0, 5.0)).unwrap();
    scene.move_to(shape, 40.0, 30.0);
    let total = scene.total_matrix(shape).unwrap();
    assert_eq!(total.apply(10.0, 10.0), (40.0, 30.0));
}

#[test]
fn test_rotate_at_keeps_pivot_fixed() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let shape = scene.add_child(root, circle(10.0, 10.0, 5.0)).unwrap();
    scene.rotate_at(shape, 10.0, 10.0, std::f64::consts::FRAC_PI_2);
    let (x, y) = scene.total_matrix(shape).unwrap().apply(10.0, 10.0);
    assert!((x - 10.0).abs() < 1e-9 && (y - 10.0).abs() < 1e-9);
}

#[test]
fn test_find_by_id_and_name() {
    let mut scene = create_test_scene();
    let root = scene.root();
    let group = scene
        .add_child(root, ElementConfig::group().id("layer").name("layers"))
        .unwrap();
    let a = scene.add_child(group, circle(0.0, 0.0, 1.0).name("dot")).unwrap();
    let b = scene
        .add_child(root, circle(0.0, 0.0, 1.0).name("dot").name("big"))
        .unwrap();
    assert_eq!(scene.find_by_id(root, "layer"), Some(group));
    assert_eq!(scene.find_all_by_name(root, "dot"), vec![a, b]);
    assert_eq!(scene.find_all_by_name(group, "dot"), vec![a]);
    assert_eq!(scene.ancestors(a), vec![group, root]);
}
