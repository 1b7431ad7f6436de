use approx::assert_abs_diff_eq;
use softbody2d::{Edge, Simulation, SimulationConfig, SoftBody, SoftBodyOptions, Topology, Vec2};

fn hanging_config() -> SimulationConfig<f64> {
    SimulationConfig::new()
        .with_gravity(Vec2::new(0.0, -10.0))
        .with_damping(0.95)
        .with_iterations(8)
}

#[test]
fn chain_correct_particle_count() {
    let chain = Topology::chain(Vec2::new(0.0f64, 0.0), Vec2::new(10.0, 0.0), 10);
    let body = SoftBody::from_topology(&chain, &SoftBodyOptions::new()).unwrap();
    assert_eq!(body.particle_count(), 11); // segments + 1
    assert_eq!(body.constraint_count(), 10);
}

#[test]
fn three_particle_chain_hangs_straight() {
    let mut sim = Simulation::new(hanging_config()).unwrap();
    let positions = [Vec2::new(0.0, 0.0), Vec2::new(0.0, -1.0), Vec2::new(0.01, -2.0)];
    let edges = [Edge::new(0, 1), Edge::new(1, 2)];
    let chain = sim.add_soft_body(&positions, &edges, 1.0).unwrap();
    sim.pin(chain, 0).unwrap();

    for _ in 0..100 {
        sim.step(1.0 / 60.0);
    }

    let a = sim.position(chain, 0).unwrap();
    let b = sim.position(chain, 1).unwrap();
    let c = sim.position(chain, 2).unwrap();
    assert_eq!(a, Vec2::new(0.0, 0.0));
    let ab = b - a;
    let bc = c - b;
    assert_abs_diff_eq!(ab.x, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(ab.y, -1.0, epsilon = 0.05);
    assert_abs_diff_eq!(bc.x, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(bc.y, -1.0, epsilon = 0.05);
}

#[test]
fn chain_swings_under_gravity() {
    let config = hanging_config().with_sub_steps(2);
    let mut sim = Simulation::new(config).unwrap();
    let rope = Topology::chain(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), 10);
    let h = sim.insert_soft_body(SoftBody::from_topology(&rope, &SoftBodyOptions::new()).unwrap());
    sim.pin(h, 0).unwrap();

    for _ in 0..120 {
        sim.step(1.0 / 60.0);
    }

    let body = sim.soft_body(h).unwrap();
    let start_y = body.position(0).unwrap().y;
    let end_y = body.position(body.particle_count() - 1).unwrap().y;
    assert!(end_y < start_y, "End should drop below pinned start");
}

#[test]
fn chain_segments_stay_near_rest_length() {
    let mut sim = Simulation::new(hanging_config().with_iterations(20)).unwrap();
    let rope = Topology::chain(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), 5);
    let h = sim.insert_soft_body(SoftBody::from_topology(&rope, &SoftBodyOptions::new()).unwrap());
    sim.pin(h, 0).unwrap();

    for _ in 0..300 {
        sim.step(1.0 / 60.0);
    }

    let body = sim.soft_body(h).unwrap();
    for (_, c) in body.constraints() {
        let err = c.error(body.particles()).abs();
        assert!(err < 0.05, "segment {}-{} off by {}", c.a, c.b, err);
    }
}

#[test]
fn torn_chain_falls_away() {
    let mut sim = Simulation::new(hanging_config()).unwrap();
    let rope = Topology::chain(Vec2::new(0.0, 0.0), Vec2::new(0.0, -4.0), 4);
    let h = sim.insert_soft_body(SoftBody::from_topology(&rope, &SoftBodyOptions::new()).unwrap());
    sim.pin(h, 0).unwrap();

    for _ in 0..30 {
        sim.step(1.0 / 60.0);
    }
    let before = sim.position(h, 4).unwrap().y;

    // Cut the link below the pin; the rest of the rope drops.
    let torn = sim.soft_body_mut(h).unwrap().tear_at(0).unwrap();
    assert_eq!(torn, 1);
    for _ in 0..60 {
        sim.step(1.0 / 60.0);
    }
    assert!(sim.position(h, 4).unwrap().y < before - 1.0);
    assert_eq!(sim.position(h, 0).unwrap(), Vec2::new(0.0, 0.0));
}

#[test]
fn drag_moves_pinned_end() {
    let mut sim = Simulation::new(hanging_config()).unwrap();
    let rope = Topology::chain(Vec2::new(0.0, 0.0), Vec2::new(0.0, -2.0), 2);
    let h = sim.insert_soft_body(SoftBody::from_topology(&rope, &SoftBodyOptions::new()).unwrap());
    sim.pin(h, 0).unwrap();

    for i in 1..=60 {
        sim.drag(h, 0, Vec2::new(i as f64 / 20.0, 0.0)).unwrap();
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.position(h, 0).unwrap(), Vec2::new(3.0, 0.0));
    assert!(sim.position(h, 2).unwrap().x > 0.5, "rope should follow the drag");
}
