use std::rc::Rc;

use instagrid::glamx::{Mat4, Vec3};
use instagrid::resource::{hidden_transform, InstanceBuffer, InstanceSlots};
use instagrid::scene::{grid_points, ObjectRenderer, Objects, RenderMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn check_slots(slots: &InstanceSlots, points: &[Vec3], previous_capacity: usize) {
    assert_eq!(slots.live_count(), points.len());
    assert_eq!(slots.capacity(), previous_capacity.max(points.len()));

    for (i, p) in points.iter().enumerate() {
        assert_eq!(slots.transforms()[i], Mat4::from_translation(*p));
    }

    for i in points.len()..slots.capacity() {
        assert_eq!(slots.transforms()[i], hidden_transform());
    }
}

#[test]
fn shrinking_then_growing_the_grid() {
    let mut slots = InstanceSlots::new();

    let first = grid_points(10, 5.0);
    let update = slots.update(&first);
    assert_eq!(update.previous_capacity, 0);
    assert_eq!(update.capacity, 100);
    check_slots(&slots, &first, 100);

    let smaller = grid_points(4, 5.0);
    let update = slots.update(&smaller);
    assert!(!update.grew());
    assert_eq!(update.hidden(), 84);
    check_slots(&slots, &smaller, 100);

    let larger = grid_points(11, 5.0);
    let update = slots.update(&larger);
    assert!(update.grew());
    assert_eq!(update.hidden(), 0);
    check_slots(&slots, &larger, 100);
}

#[test]
fn random_dimension_sequences_keep_the_invariants() {
    let mut rng = StdRng::seed_from_u64(0x1257);
    let mut buffer = InstanceBuffer::new();
    let mut max_live = 0;

    for _ in 0..200 {
        let dim: u32 = rng.random_range(0..40);
        let points = grid_points(dim, 5.0);
        let previous_capacity = buffer.slots().capacity();

        let update = buffer.update(&points);
        max_live = max_live.max(points.len());

        assert_eq!(update.grew(), points.len() > previous_capacity);
        assert_eq!(buffer.num_instances() as usize, max_live);
        check_slots(buffer.slots(), &points, previous_capacity);
    }
}

#[test]
fn only_the_instanced_renderer_keeps_stale_slots() {
    let mut objects = Objects::new(Rc::new(()), RenderMode::Instanced, 20, 5.0);
    objects.set_dim(5);

    match objects.renderer() {
        ObjectRenderer::Instanced(instanced) => {
            assert_eq!(instanced.instances().num_instances(), 400);
            assert_eq!(instanced.instances().slots().live_count(), 25);
        }
        ObjectRenderer::Naive(_) => panic!("expected instanced rendering"),
    }

    objects.set_mode(RenderMode::Naive);
    match objects.renderer() {
        ObjectRenderer::Naive(naive) => assert_eq!(naive.objects().len(), 25),
        ObjectRenderer::Instanced(_) => panic!("expected naive rendering"),
    }
}
