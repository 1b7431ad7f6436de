use approx::assert_abs_diff_eq;
use softbody2d::{DistanceConstraint, Edge, Particle, Simulation, SimulationConfig, SoftBody, SoftBodyOptions, Vec2};

#[test]
fn free_fall_gravity() {
    let mut p: Particle<f64> = Particle::new(Vec2::new(0.0, 100.0), 1.0).unwrap();
    let g = Vec2::new(0.0, -9.81);
    let dt = 1.0 / 60.0;
    let steps = 60;

    for _ in 0..steps {
        p.apply_acceleration(g);
        p.integrate(dt, 1.0);
    }

    // Verlet from rest: y_n = y_0 - g dt² n(n + 1) / 2
    let n = steps as f64;
    let expected_y = 100.0 - 9.81 * dt * dt * n * (n + 1.0) / 2.0;
    assert_abs_diff_eq!(p.pos.y, expected_y, epsilon = 1e-9);
    assert_eq!(p.pos.x, 0.0);
}

#[test]
fn free_fall_velocity_matches_gravity() {
    let mut p: Particle<f64> = Particle::new(Vec2::new(0.0, 0.0), 1.0).unwrap();
    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        p.apply_acceleration(Vec2::new(0.0, -9.81));
        p.integrate(dt, 1.0);
    }
    // One second of fall from rest.
    assert_abs_diff_eq!(p.velocity(dt).y, -9.81, epsilon = 1e-9);
    assert_eq!(p.velocity(dt).x, 0.0);
}

#[test]
fn heavy_chain_still_relaxes() {
    let options = SoftBodyOptions::new().with_mass(1e11);
    let mut body: SoftBody<f64> =
        SoftBody::with_options(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)], &[Edge::new(0, 1)], &options).unwrap();
    {
        let p = body.particle_mut(1).unwrap();
        p.pos = Vec2::new(3.0, 0.0);
        p.prev_pos = p.pos;
    }
    let mut sim: Simulation<f64> = Simulation::new(SimulationConfig::new().with_damping(1.0)).unwrap();
    let h = sim.insert_soft_body(body);
    sim.step(1.0 / 60.0);

    let gap = sim.position(h, 0).unwrap().distance(sim.position(h, 1).unwrap());
    assert_abs_diff_eq!(gap, 1.0, epsilon = 1e-9);
}

#[test]
fn particle_at_rest_stays_put() {
    let mut sim: Simulation<f64> = Simulation::new(SimulationConfig::new()).unwrap();
    let body = sim
        .add_soft_body(&[Vec2::new(1.0, 2.0), Vec2::new(3.0, 2.0)], &[Edge::new(0, 1)], 1.0)
        .unwrap();

    for _ in 0..100 {
        sim.step(1.0 / 60.0);
    }

    assert_eq!(sim.position(body, 0).unwrap(), Vec2::new(1.0, 2.0));
    assert_eq!(sim.position(body, 1).unwrap(), Vec2::new(3.0, 2.0));
}

#[test]
fn pinned_particle_stays_fixed() {
    let mut p: Particle<f32> = Particle::pinned(Vec2::new(5.0, 5.0));
    p.apply_force(Vec2::new(1000.0, 1000.0));
    p.integrate(1.0 / 60.0, 1.0);
    assert_eq!(p.pos, Vec2::new(5.0, 5.0));
}

#[test]
fn pinned_particle_ignores_gravity_and_constraints() {
    let config = SimulationConfig::new().with_gravity(Vec2::new(0.0, -10.0)).with_iterations(10);
    let mut sim: Simulation<f64> = Simulation::new(config).unwrap();
    let body = sim
        .add_soft_body(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)], &[Edge::new(0, 1)], 1.0)
        .unwrap();
    sim.pin(body, 0).unwrap();

    for _ in 0..600 {
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.position(body, 0).unwrap(), Vec2::new(0.0, 0.0));
    let tip = sim.position(body, 1).unwrap();
    assert!(tip.y < -0.9, "free end should hang below the pin, got {:?}", tip);
}

#[test]
fn damping_bleeds_velocity() {
    let mut p: Particle<f64> = Particle::new(Vec2::new(0.0, 0.0), 1.0).unwrap();
    p.prev_pos = Vec2::new(-1.0, 0.0);
    p.integrate(1.0, 0.5);
    assert_abs_diff_eq!(p.velocity_raw().x, 0.5, epsilon = 1e-12);
}

#[test]
fn mass_weighting_heavier_moves_less() {
    // Rest length 5 from the build-time positions, then stretched to 10.
    let mut particles = [
        Particle::new(Vec2::new(0.0, 0.0), 10.0).unwrap(), // heavy
        Particle::new(Vec2::new(5.0, 0.0), 1.0).unwrap(),  // light
    ];
    let constraint = DistanceConstraint::from_particles(0, 1, &particles, 1.0).unwrap();
    particles[1].pos = Vec2::new(10.0, 0.0);

    let initial_heavy = particles[0].pos;
    let initial_light = particles[1].pos;
    constraint.solve(&mut particles);

    let heavy_displacement = particles[0].pos.distance(initial_heavy);
    let light_displacement = particles[1].pos.distance(initial_light);
    assert!(
        heavy_displacement < light_displacement,
        "Heavier particle should move less: heavy moved {}, light moved {}",
        heavy_displacement, light_displacement
    );
    assert_abs_diff_eq!(particles[0].pos.distance(particles[1].pos), 5.0, epsilon = 1e-9);
}

#[test]
fn soft_constraint_converges_geometrically() {
    let mut particles: [Particle<f64>; 2] = [
        Particle::new(Vec2::new(0.0, 0.0), 1.0).unwrap(),
        Particle::new(Vec2::new(1.0, 0.0), 1.0).unwrap(),
    ];
    let constraint = DistanceConstraint::from_particles(0, 1, &particles, 0.5).unwrap();
    particles[1].pos = Vec2::new(2.0, 0.0);

    let mut last = constraint.error(&particles).abs();
    for _ in 0..20 {
        constraint.solve(&mut particles);
        let err = constraint.error(&particles).abs();
        assert!(err < last, "error should shrink every pass: {} -> {}", last, err);
        last = err;
    }
    assert!(last < 1e-5, "error after 20 passes = {}", last);
}

#[test]
fn relaxation_reduces_stretch_in_simulation() {
    let mut body: SoftBody<f64> =
        SoftBody::new(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)], &[Edge::new(0, 1)], 1.0).unwrap();
    {
        // Stretch without injecting velocity.
        let p = body.particle_mut(1).unwrap();
        p.pos = Vec2::new(3.0, 0.0);
        p.prev_pos = p.pos;
    }
    let mut sim: Simulation<f64> =
        Simulation::new(SimulationConfig::new().with_damping(1.0)).unwrap();
    let h = sim.insert_soft_body(body);
    sim.step(1.0 / 60.0);

    let a = sim.position(h, 0).unwrap();
    let b = sim.position(h, 1).unwrap();
    assert_abs_diff_eq!(a.distance(b), 1.0, epsilon = 1e-9);
}
