use std::path::Path;
use std::rc::Rc;

use instagrid::color::{GRID_CENTER_LINE, GRID_LINE};
use instagrid::config::DemoConfig;
use instagrid::glamx::Vec3;
use instagrid::loader::{load_model, load_model_or_cuboid};
use instagrid::renderer::{FrameStats, IndexedDraw, RenderStats};
use instagrid::resource::IndexedMesh;
use instagrid::scene::{grid_points, GridHelper, GridPoints, Objects, RenderMode};
use instagrid::ui::count_label;

fn cooler_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("media/cooler_uv.obj")
}

#[test]
fn default_grid_layout() {
    let config = DemoConfig::default();
    let points = grid_points(config.count, config.step);

    assert_eq!(points.len(), 100);
    assert_eq!(points[0], Vec3::new(-25.0, 0.0, -25.0));
    assert_eq!(points[1], Vec3::new(-25.0, 0.0, -20.0));
    assert_eq!(points[99], Vec3::new(20.0, 0.0, 20.0));
    assert_eq!(count_label(config.count), "10x10=100");
}

#[test]
fn odd_dimensions_use_half_steps() {
    let points = grid_points(3, 5.0);
    let xs: Vec<f32> = points.iter().step_by(3).map(|p| p.x).collect();
    assert_eq!(xs, vec![-7.5, -2.5, 2.5]);
}

#[test]
fn grid_points_are_memoized() {
    let mut grid = GridPoints::new(10, 5.0);
    let before = grid.points().as_ptr();

    assert!(!grid.set_dim(10));
    assert_eq!(grid.points().as_ptr(), before);
    assert!(grid.set_dim(0));
    assert!(grid.points().is_empty());
}

#[test]
fn ground_grid_spans_the_objects() {
    let grid = GridHelper::under_objects(10, 5.0);
    let segments = grid.segments();

    assert_eq!(grid.size, 55.0);
    assert_eq!(segments.len(), 22);
    assert_eq!(segments.iter().filter(|s| s.color == GRID_CENTER_LINE).count(), 2);
    assert_eq!(segments.iter().filter(|s| s.color == GRID_LINE).count(), 20);

    let min_x = segments
        .iter()
        .flat_map(|s| [s.a.x, s.b.x])
        .fold(f32::INFINITY, f32::min);
    assert_eq!(min_x, -30.0);

    let single = GridHelper::under_objects(0, 5.0).segments();
    assert_eq!(single.len(), 2);
    assert!(single.iter().all(|s| s.color == GRID_CENTER_LINE));
}

/// A cube: 12 triangles.
struct Cube;

impl IndexedMesh for Cube {
    fn num_indices(&self) -> u32 {
        36
    }
}

fn record_frame(stats: &mut RenderStats, grid: &GridHelper, objects: &Objects<Cube>) -> FrameStats {
    stats.begin_frame();
    stats.record_lines(grid.num_segments() as u32);
    for draw in objects.draws() {
        stats.record_draw(draw);
    }
    stats.end_frame();
    *stats.last_frame()
}

#[test]
fn statistics_of_a_naive_and_an_instanced_frame() {
    let grid = GridHelper::under_objects(10, 5.0);
    let mut stats = RenderStats::new();

    let mut objects = Objects::new(Rc::new(Cube), RenderMode::Naive, 10, 5.0);
    let naive = record_frame(&mut stats, &grid, &objects);
    assert_eq!(naive.calls, 101);
    assert_eq!(naive.lines, 22);
    assert_eq!(naive.triangles, 1200);
    assert_eq!(naive.frame, 1);

    objects.set_mode(RenderMode::Instanced);
    assert_eq!(
        objects.draws(),
        vec![IndexedDraw {
            index_count: 36,
            instances: 100
        }]
    );
    let instanced = record_frame(&mut stats, &grid, &objects);
    assert_eq!(instanced.calls, 2);
    assert_eq!(instanced.triangles, 1200);
    assert_eq!(instanced.frame, 2);
}

#[test]
fn hidden_instances_are_still_drawn() {
    let mut stats = RenderStats::new();
    let mut objects = Objects::new(Rc::new(Cube), RenderMode::Instanced, 10, 5.0);
    objects.set_dim(5);

    let grid = GridHelper::under_objects(5, 5.0);
    let frame = record_frame(&mut stats, &grid, &objects);
    assert_eq!(frame.calls, 2);
    assert_eq!(frame.triangles, 1200);

    objects.set_mode(RenderMode::Naive);
    let frame = record_frame(&mut stats, &grid, &objects);
    assert_eq!(frame.calls, 26);
    assert_eq!(frame.triangles, 300);
}

#[test]
fn empty_grid_draws_no_object() {
    let objects = Objects::new(Rc::new(Cube), RenderMode::Instanced, 0, 5.0);
    assert!(objects.draws().is_empty());

    let objects = Objects::new(Rc::new(Cube), RenderMode::Naive, 0, 5.0);
    assert!(objects.draws().is_empty());
}

#[test]
fn bundled_model_loads() {
    let mesh = load_model(&cooler_path()).unwrap();

    assert_eq!(mesh.num_triangles(), 108);
    assert!(mesh.has_normals());

    let (min, max) = mesh.aabb().unwrap();
    assert!((min - Vec3::new(-1.2, 0.0, -1.2)).length() < 1.0e-5);
    assert!((max - Vec3::new(1.2, 2.6, 1.6)).length() < 1.0e-5);
}

#[test]
fn missing_model_falls_back_to_a_cuboid() {
    let mesh = load_model_or_cuboid(Path::new("does/not/exist.obj"));
    assert_eq!(mesh.num_triangles(), 12);
}
