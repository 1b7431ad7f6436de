//! Step observer trait for monitoring simulation progress.

/// Trait for observing simulation steps.
///
/// Implement this trait to watch the solver phases (debug drawing,
/// profiling, convergence plots). All methods default to no-ops. With
/// sub-stepping, the phase hooks fire once per sub-step.
pub trait StepObserver {
    /// Called after every particle has been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each relaxation pass over all constraints.
    fn on_constraint_iteration(&mut self, _pass: usize) {}

    /// Called after world (and, if enabled, body-vs-body) collisions.
    fn on_collisions_resolved(&mut self) {}

    /// Called when a `step` call is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer. Used by [`Simulation::step`](crate::simulation::Simulation::step).
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
