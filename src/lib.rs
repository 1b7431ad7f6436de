//! Position-based 2D soft-body physics.
//!
//! `softbody2d` simulates deformable bodies as particle meshes joined by
//! distance constraints. Particles move under Verlet integration, the mesh
//! is held together by iterative constraint relaxation, and static world
//! colliders (planes and circles) clamp particles back into the playfield.
//!
//! # Features
//!
//! - **Verlet integration**: velocity is implicit in `pos - prev_pos`
//! - **Constraint relaxation**: mass-weighted, with per-constraint stiffness
//! - **World colliders**: half-planes plus inward and outward facing circles
//! - **Mesh builders**: chains, rings, grids and meshed polygons
//! - **Stable handles**: generation-tagged handles for bodies, colliders and
//!   constraints
//! - **Body contacts**: optional particle contacts between bodies with
//!   friction and restitution
//! - **Observable**: monitor solver phases via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! # Example
//!
//! ```
//! use softbody2d::{Edge, Simulation, SimulationConfig, Vec2, WorldCollider};
//!
//! let config = SimulationConfig::new()
//!     .with_gravity(Vec2::new(0.0, -10.0))
//!     .with_iterations(8);
//! let mut sim: Simulation<f64> = Simulation::new(config).unwrap();
//!
//! let rope = sim
//!     .add_soft_body(
//!         &[Vec2::new(0.0, 0.0), Vec2::new(0.0, -1.0)],
//!         &[Edge::new(0, 1)],
//!         1.0,
//!     )
//!     .unwrap();
//! sim.pin(rope, 0).unwrap();
//! sim.add_collider(WorldCollider::plane(Vec2::new(0.0, 1.0), -5.0).unwrap());
//!
//! for _ in 0..60 {
//!     sim.step(1.0 / 60.0);
//! }
//! assert_eq!(sim.position(rope, 0).unwrap(), Vec2::new(0.0, 0.0));
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod collider;
pub mod edge;
pub mod mesh;
pub mod softbody;
pub mod contact;
pub mod veclist;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use particle::Particle;
pub use constraint::DistanceConstraint;
pub use collider::WorldCollider;
pub use edge::{Edge, EdgeSet};
pub use mesh::Topology;
pub use softbody::{ConstraintHandle, SoftBody, SoftBodyOptions};
pub use veclist::{Handle, VecList};
pub use simulation::{ColliderHandle, Simulation, SoftBodyHandle};
pub use config::SimulationConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::{PhysicsError, Result};

/// Double-precision vector, the default for hosts that don't care.
pub type Vector2 = Vec2<f64>;
