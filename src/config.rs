//! Configuration types for the simulation.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration consumed when a [`Simulation`](crate::simulation::Simulation)
/// is built.
///
/// # Builder Pattern
/// ```
/// use softbody2d::config::SimulationConfig;
/// use softbody2d::vec::Vec2;
///
/// let config: SimulationConfig<f64> = SimulationConfig::new()
///     .with_iterations(8)
///     .with_gravity(Vec2::new(0.0, -9.81))
///     .with_damping(0.99)
///     .with_sub_steps(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// Number of constraint relaxation passes per sub-step.
    /// More passes = stiffer mesh at linear cost. Default: 4.
    pub iterations: usize,
    /// Gravity acceleration vector. Default: zero (no gravity).
    pub gravity: Vec2<F>,
    /// Velocity retained per step, in (0, 1]. 1.0 = no damping. Default: 0.99.
    pub damping: F,
    /// Number of sub-steps per `step` call. Default: 1.
    pub sub_steps: usize,
    /// Resolve particle contacts between different soft bodies. Default: off.
    pub body_collisions: bool,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            iterations: 4,
            gravity: Vec2::zero(),
            damping: F::from_f32(0.99),
            sub_steps: 1,
            body_collisions: false,
        }
    }

    /// Set the number of relaxation passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    /// Set the number of sub-steps.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    /// Enable or disable body-vs-body contacts.
    pub fn with_body_collisions(mut self, enabled: bool) -> Self {
        self.body_collisions = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.damping > F::zero() && self.damping <= F::one()) {
            return Err(PhysicsError::InvalidDamping);
        }
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidIterations);
        }
        Ok(())
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
