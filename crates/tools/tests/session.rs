//! End-to-end session scenarios: full frames from input snapshot to
//! committed batches, against a plane surface and an in-memory sink.

use glam::Vec3;
use placement::math::Aabb;
use placement::probe::{PlaneProbe, Ray};
use placement::settings::{ShapeKind, WallSettings};
use placement::types::{PaintMode, PrefabDescriptor, PrefabId};
use tools::commit::MemorySink;
use tools::input::FrameInput;
use tools::select::{SelectMode, SelectTool};
use tools::session::{ActiveTool, ToolSession};
use tools::shape::ShapeTool;
use tools::wall::WallTool;

const EPSILON: f32 = 1e-4;

fn down_ray(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
}

fn session_with_unit_prefab() -> ToolSession {
    let mut session = ToolSession::new();
    session.register_prefab(PrefabDescriptor::new(
        PrefabId(0),
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
    ));
    session
}

#[test]
fn test_wall_run_commits_five_modules() {
    let mut session = session_with_unit_prefab();
    session.set_tool(ActiveTool::Wall(WallTool::default()));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(5.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::click(down_ray(5.0, 0.0)), &probe, &mut sink);
    let out = session.update(&FrameInput::press_enter(), &probe, &mut sink);

    assert!(out.committed.is_some());
    assert_eq!(sink.batches.len(), 1);
    let batch = &sink.batches[0];
    assert_eq!(batch.transforms.len(), 5);
    for (i, transform) in batch.transforms.iter().enumerate() {
        let expected = Vec3::new(i as f32 + 0.5, 0.0, 0.0);
        assert!(
            (transform.position - expected).length() < EPSILON,
            "module {i} at {:?}",
            transform.position
        );
    }
    // Committed objects are indexed for later overlap checks
    assert_eq!(session.index().len(), 5);
    assert_eq!(session.committed_items().len(), 1);
}

#[test]
fn test_overlapping_wall_skips_occupied_cells() {
    let mut session = session_with_unit_prefab();
    session.set_tool(ActiveTool::Wall(WallTool::default()));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    // First run fills x = 0..5
    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(5.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::click(down_ray(5.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::press_enter(), &probe, &mut sink);

    // Second run overlaps the first three cells
    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(8.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::click(down_ray(8.0, 0.0)), &probe, &mut sink);
    let out = session.update(&FrameInput::press_enter(), &probe, &mut sink);

    assert!(out.committed.is_some());
    assert_eq!(sink.batches.len(), 2);
    // Only the three unoccupied cells at 5.5, 6.5, 7.5 survive
    let batch = &sink.batches[1];
    assert_eq!(batch.transforms.len(), 3);
    assert!((batch.transforms[0].position.x - 5.5).abs() < EPSILON);
}

#[test]
fn test_shape_preview_matches_commit() {
    let mut session = session_with_unit_prefab();
    let mut tool = ShapeTool::default();
    tool.settings_mut().kind = ShapeKind::Polygon;
    tool.settings_mut().sides = 5;
    session.set_tool(ActiveTool::Shape(tool));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(2.0, 0.0)), &probe, &mut sink);
    let preview = session.update(&FrameInput::click(down_ray(2.0, 0.0)), &probe, &mut sink);
    assert!(!preview.preview.is_empty());

    let out = session.update(&FrameInput::press_enter(), &probe, &mut sink);
    assert!(out.committed.is_some());
    assert_eq!(sink.batches.len(), 1);
    // The committed batch is exactly what the last preview showed
    assert_eq!(sink.batches[0].transforms, preview.preview);

    // Every placement sits on the perimeter circle of radius 2
    for transform in &sink.batches[0].transforms {
        let r = transform.position.length();
        assert!(r <= 2.0 + EPSILON, "placement off perimeter at {r}");
    }
}

#[test]
fn test_identical_frames_identical_previews() {
    let mut session = session_with_unit_prefab();
    session.set_tool(ActiveTool::Shape(ShapeTool::default()));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(3.0, 0.0)), &probe, &mut sink);

    // The pointer holds still: the preview must not flicker
    let a = session.update(&FrameInput::hover(down_ray(3.0, 0.0)), &probe, &mut sink);
    let b = session.update(&FrameInput::hover(down_ray(3.0, 0.0)), &probe, &mut sink);
    assert!(!a.preview.is_empty());
    assert_eq!(a.preview, b.preview);
}

#[test]
fn test_pin_places_single_object() {
    let mut session = session_with_unit_prefab();
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    let ray = down_ray(4.0, -2.0);
    session.update(&FrameInput::click(ray), &probe, &mut sink);
    let out = session.update(&FrameInput::release(ray), &probe, &mut sink);

    assert!(out.committed.is_some());
    assert_eq!(sink.total_placements(), 1);
    assert!((sink.batches[0].transforms[0].position - Vec3::new(4.0, 0.0, -2.0)).length() < EPSILON);
    assert_eq!(session.index().len(), 1);
}

#[test]
fn test_erase_removes_painted_objects() {
    let mut session = session_with_unit_prefab();
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    // Paint one object with the pin tool
    let ray = down_ray(1.0, 1.0);
    session.update(&FrameInput::click(ray), &probe, &mut sink);
    session.update(&FrameInput::release(ray), &probe, &mut sink);
    assert_eq!(session.index().len(), 1);

    // Erase it with the circle tool
    session.set_tool(ActiveTool::Select(SelectTool::with_mode(SelectMode::Erase)));
    session.update(&FrameInput::hover(ray), &probe, &mut sink);
    let out = session.update(&FrameInput::click(ray), &probe, &mut sink);

    assert_eq!(out.erased.len(), 1);
    assert_eq!(session.index().len(), 0);
}

#[test]
fn test_replace_swaps_objects_under_circle() {
    let mut session = session_with_unit_prefab();
    session.register_prefab(PrefabDescriptor::new(
        PrefabId(1),
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.4)),
    ));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    let ray = down_ray(0.0, 0.0);
    session.update(&FrameInput::click(ray), &probe, &mut sink);
    session.update(&FrameInput::release(ray), &probe, &mut sink);
    assert_eq!(sink.batches.len(), 1);

    session.set_active_prefab(PrefabId(1));
    session.set_tool(ActiveTool::Select(SelectTool::with_mode(
        SelectMode::Replace,
    )));
    session.update(&FrameInput::hover(ray), &probe, &mut sink);
    let out = session.update(&FrameInput::click(ray), &probe, &mut sink);

    assert!(out.committed.is_some());
    assert_eq!(out.erased.len(), 1);
    // Replacement batch carries the new prefab at the old position
    let batch = sink.batches.last().unwrap();
    assert_eq!(batch.prefab, PrefabId(1));
    assert_eq!(batch.transforms.len(), 1);
    assert_eq!(session.index().len(), 1);
}

#[test]
fn test_escape_discards_without_commit() {
    let mut session = session_with_unit_prefab();
    session.set_tool(ActiveTool::Wall(WallTool::default()));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(5.0, 0.0)), &probe, &mut sink);
    let out = session.update(&FrameInput::press_escape(), &probe, &mut sink);

    assert!(out.committed.is_none());
    assert!(out.preview.is_empty());
    assert!(sink.batches.is_empty());
    assert_eq!(session.index().len(), 0);
}

#[test]
fn test_on_surface_mode_drops_unsupported_slots() {
    let mut session = session_with_unit_prefab();
    session.settings.paint_mode = PaintMode::OnSurface;
    session.set_tool(ActiveTool::Wall(WallTool::default()));
    // The surface only exists where the plane is; a vertical plane never
    // answers the downward probes, so nothing can be placed
    let vertical = PlaneProbe::new(Vec3::ZERO, Vec3::X);
    let mut sink = MemorySink::new();

    let side_ray = Ray::new(Vec3::new(10.0, 0.5, 0.0), Vec3::NEG_X);
    session.update(&FrameInput::click(side_ray), &vertical, &mut sink);
    session.update(&FrameInput::hover(Ray::new(Vec3::new(10.0, 0.5, 5.0), Vec3::NEG_X)), &vertical, &mut sink);
    let out = session.update(
        &FrameInput::hover(Ray::new(Vec3::new(10.0, 0.5, 5.0), Vec3::NEG_X)),
        &vertical,
        &mut sink,
    );

    // The wall run exists, but every downward probe misses the vertical
    // surface, so the preview stays empty
    assert!(out.preview.is_empty());
}

#[test]
fn test_forget_object_clears_index_and_records() {
    let mut session = session_with_unit_prefab();
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    let ray = down_ray(0.0, 0.0);
    session.update(&FrameInput::click(ray), &probe, &mut sink);
    session.update(&FrameInput::release(ray), &probe, &mut sink);
    assert_eq!(session.index().len(), 1);

    let id = session.committed_items()[0].objects[0];
    assert!(session.forget_object(id));
    assert!(!session.forget_object(id));
    assert_eq!(session.index().len(), 0);
    assert!(session.committed_items()[0].objects.is_empty());
}

#[test]
fn test_wall_settings_spacing_changes_module_count() {
    let mut session = session_with_unit_prefab();
    let mut tool = WallTool::default();
    *tool.settings_mut() = WallSettings {
        module_length: 1.0,
        spacing: 1.0,
        ..Default::default()
    };
    session.set_tool(ActiveTool::Wall(tool));
    let probe = PlaneProbe::ground();
    let mut sink = MemorySink::new();

    session.update(&FrameInput::click(down_ray(0.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::hover(down_ray(6.0, 0.0)), &probe, &mut sink);
    session.update(&FrameInput::click(down_ray(6.0, 0.0)), &probe, &mut sink);
    let out = session.update(&FrameInput::press_enter(), &probe, &mut sink);

    assert!(out.committed.is_some());
    // 6 units / (1 module + 1 gap) = 3 modules
    assert_eq!(sink.batches[0].transforms.len(), 3);
}
