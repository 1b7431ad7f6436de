//! Error types for physics operations.

use thiserror::Error;

/// Errors that can occur while building or editing a simulation.
///
/// The per-step solver never produces these; they are raised by the
/// call that received bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A zero-length vector was normalized.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
    /// A handle is stale (its slot was freed) or was never issued.
    #[error("handle (index {index}, generation {generation}) does not refer to a live element")]
    InvalidHandle { index: usize, generation: u32 },
    /// Particle index is out of bounds for the owning soft body.
    #[error("particle index {index} out of bounds (count: {count})")]
    InvalidIndex { index: usize, count: usize },
    /// A constraint cannot join a particle to itself.
    #[error("constraint joins particle {index} to itself")]
    DegenerateEdge { index: usize },
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Stiffness must be in (0, 1].
    #[error("stiffness must be in (0, 1]")]
    InvalidStiffness,
    /// Damping must be in (0, 1].
    #[error("damping must be in (0, 1]")]
    InvalidDamping,
    /// At least one relaxation pass is required.
    #[error("relaxation pass count must be at least 1")]
    InvalidIterations,
    /// Radii must be non-negative and finite.
    #[error("radius must be non-negative and finite")]
    InvalidRadius,
    /// Mesh spacing must be positive and finite.
    #[error("spacing must be positive and finite")]
    InvalidSpacing,
    /// A polygon outline needs at least three vertices.
    #[error("polygon needs at least 3 vertices (got {count})")]
    InsufficientVertices { count: usize },
}

/// Result type for physics operations.
pub type Result<T> = core::result::Result<T, PhysicsError>;
