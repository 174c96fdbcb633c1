//! The particle set and the per-tick pairwise interaction loop.

use crate::error::{Error, Result};
use crate::physics::charged::{ChargeSign, ChargedParticle, SpawnDefaults, StepOptions};
use crate::physics::integrators::{Integrator, RungeKuttaFourthOrder};
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::{Bounds, validate_restitution, validate_time_step};
use bevy::log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How pairwise Coulomb forces are combined within one tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PairwiseModel {
    /// Sum every pairwise force against a snapshot of the tick's starting
    /// state, then integrate each particle once with its net force.
    #[default]
    Simultaneous,
    /// Update each particle once per neighbour, in index order, against the
    /// neighbour's current state. Every particle is therefore integrated
    /// `n - 1` times per tick.
    Serial,
}

/// Stable index of a particle inside a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle(usize);

impl ParticleHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergySnapshot {
    pub kinetic: Scalar,
    /// Summed over unordered pairs, each pair counted once.
    pub potential: Scalar,
    pub total: Scalar,
    /// Unordered pairs left out of `potential` because their centres coincide.
    pub degenerate_pairs: usize,
}

/// What happened during one call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub tick: u64,
    /// Ordered pair interactions skipped because the two centres coincided.
    pub degenerate_pairs: usize,
    /// Particle updates rolled back because they produced non-finite state.
    pub rejected_updates: usize,
    pub particle_collisions: usize,
}

impl StepReport {
    pub fn is_clean(&self) -> bool {
        self.degenerate_pairs == 0 && self.rejected_updates == 0
    }
}

/// Owns every charged particle and advances them together, one tick at a time.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<ChargedParticle>,
    integrator: Box<dyn Integrator>,
    model: PairwiseModel,
    particle_restitution: Option<Scalar>,
    bounds: Bounds,
    spawn_defaults: SpawnDefaults,
    time: Scalar,
    tick: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Bounds::default())
    }
}

impl Simulation {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            particles: Vec::new(),
            integrator: Box::new(RungeKuttaFourthOrder),
            model: PairwiseModel::default(),
            particle_restitution: None,
            bounds,
            spawn_defaults: SpawnDefaults::default(),
            time: 0.0,
            tick: 0,
        }
    }

    pub fn with_model(mut self, model: PairwiseModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Enables particle-particle contact response after each tick.
    pub fn with_particle_collisions(mut self, restitution: Scalar) -> Result<Self> {
        validate_restitution(restitution)?;
        self.particle_restitution = Some(restitution);
        Ok(self)
    }

    pub fn with_spawn_defaults(mut self, spawn_defaults: SpawnDefaults) -> Self {
        self.spawn_defaults = spawn_defaults;
        self
    }

    pub fn model(&self) -> PairwiseModel {
        self.model
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn spawn_defaults(&self) -> SpawnDefaults {
        self.spawn_defaults
    }

    /// Simulation time at the end of the last tick.
    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[ChargedParticle] {
        &self.particles
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&ChargedParticle> {
        self.particles.get(handle.0)
    }

    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut ChargedParticle> {
        self.particles.get_mut(handle.0)
    }

    pub fn handles(&self) -> impl Iterator<Item = ParticleHandle> + '_ {
        (0..self.particles.len()).map(ParticleHandle)
    }

    /// Adds a particle confined to the simulation's bounds.
    pub fn create_particle(
        &mut self,
        mass: Scalar,
        radius: Scalar,
        charge: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> Result<ParticleHandle> {
        let particle = ChargedParticle::new(mass, radius, charge, position, velocity)?
            .with_bounds(self.bounds);
        Ok(self.insert(particle))
    }

    /// Adds a particle at rest using the spawn defaults.
    pub fn spawn(&mut self, sign: ChargeSign, position: Vector) -> Result<ParticleHandle> {
        let particle = ChargedParticle::with_sign(sign, &self.spawn_defaults, position)?
            .with_bounds(self.bounds);
        Ok(self.insert(particle))
    }

    fn insert(&mut self, particle: ChargedParticle) -> ParticleHandle {
        let handle = ParticleHandle(self.particles.len());
        debug!(
            "Created {} particle {} at {}",
            particle.sign(),
            handle.0,
            particle.position()
        );
        self.particles.push(particle);
        handle
    }

    pub fn set_bounds(
        &mut self,
        handle: ParticleHandle,
        left: Scalar,
        right: Scalar,
        top: Scalar,
        bottom: Scalar,
    ) -> Result<()> {
        self.particles
            .get_mut(handle.0)
            .ok_or(Error::UnknownParticle(handle.0))?
            .body_mut()
            .set_bounds(left, right, top, bottom)
    }

    /// Replaces the default bounds and applies them to every existing particle.
    pub fn set_all_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for particle in &mut self.particles {
            *particle.body_mut() = particle.body().clone().with_bounds(bounds);
        }
    }

    /// Removes every particle and rewinds the clock.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.time = 0.0;
        self.tick = 0;
    }

    /// Number of positive and negative particles.
    pub fn charge_counts(&self) -> (usize, usize) {
        self.particles
            .iter()
            .fold((0, 0), |(positive, negative), particle| match particle.sign() {
                ChargeSign::Positive => (positive + 1, negative),
                ChargeSign::Negative => (positive, negative + 1),
            })
    }

    /// Total kinetic energy plus pairwise potential energy. Coincident pairs
    /// contribute nothing and are counted in
    /// [`EnergySnapshot::degenerate_pairs`].
    pub fn energy(&self) -> EnergySnapshot {
        let kinetic: Scalar = self
            .particles
            .iter()
            .map(ChargedParticle::kinetic_energy)
            .sum();

        let mut potential = 0.0;
        let mut degenerate_pairs = 0;
        for (index, particle) in self.particles.iter().enumerate() {
            for other in &self.particles[index + 1..] {
                match particle.resolve_potential_energy(other) {
                    Ok(energy) => potential += energy,
                    Err(_) => degenerate_pairs += 1,
                }
            }
        }

        if degenerate_pairs > 0 {
            warn!("Potential energy omits {degenerate_pairs} coincident pairs");
        }

        EnergySnapshot {
            kinetic,
            potential,
            total: kinetic + potential,
            degenerate_pairs,
        }
    }

    /// Advances every particle by one tick.
    ///
    /// `t` is the caller's simulation time at the start of the tick and `dt`
    /// the fixed tick length. Arguments are validated before any particle is
    /// touched. Inside the tick, coincident pairs are skipped and updates
    /// that would produce NaN or infinity are rolled back; both are counted
    /// in the returned report instead of aborting the tick.
    pub fn step(&mut self, t: Scalar, dt: Scalar, options: &StepOptions) -> Result<StepReport> {
        if !t.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "simulation time must be finite, got {t}"
            )));
        }
        validate_time_step(dt)?;
        options.validate()?;

        let mut report = StepReport {
            tick: self.tick + 1,
            ..StepReport::default()
        };

        match self.model {
            PairwiseModel::Simultaneous => self.step_simultaneous(dt, options, &mut report)?,
            PairwiseModel::Serial => self.step_serial(dt, options, &mut report)?,
        }

        if let Some(restitution) = self.particle_restitution {
            report.particle_collisions = self.resolve_particle_collisions(restitution);
        }

        self.time = t + dt;
        self.tick += 1;
        Ok(report)
    }

    fn step_simultaneous(
        &mut self,
        dt: Scalar,
        options: &StepOptions,
        report: &mut StepReport,
    ) -> Result<()> {
        let snapshot = self.particles.clone();

        for (index, particle) in self.particles.iter_mut().enumerate() {
            let current = &snapshot[index];
            let mut force = Vector::ZERO;
            let mut potential_energy = 0.0;

            for (other_index, other) in snapshot.iter().enumerate() {
                if other_index == index {
                    continue;
                }

                let interaction = current
                    .coulomb_force_limited(other, options.max_force)
                    .and_then(|pair_force| {
                        current
                            .resolve_potential_energy(other)
                            .map(|pair_energy| (pair_force, pair_energy))
                    });

                match interaction {
                    Ok((pair_force, pair_energy)) => {
                        force += pair_force;
                        potential_energy += pair_energy;
                    }
                    Err(Error::DivisionByZero(reason)) => {
                        report.degenerate_pairs += 1;
                        warn!("Skipping interaction {index} <- {other_index}: {reason}");
                    }
                    Err(error) => return Err(error),
                }
            }

            let result = particle.apply_net_force(
                self.integrator.as_ref(),
                dt,
                force,
                potential_energy,
                options,
            );
            Self::absorb(result, index, report)?;
        }

        Ok(())
    }

    fn step_serial(
        &mut self,
        dt: Scalar,
        options: &StepOptions,
        report: &mut StepReport,
    ) -> Result<()> {
        for index in 0..self.particles.len() {
            for other_index in 0..self.particles.len() {
                if other_index == index {
                    continue;
                }

                let neighbor = self.particles[other_index].clone();
                let result = self.particles[index].update(
                    self.integrator.as_ref(),
                    dt,
                    &neighbor,
                    options,
                );

                match result {
                    Err(Error::DivisionByZero(reason)) => {
                        report.degenerate_pairs += 1;
                        warn!("Skipping interaction {index} <- {other_index}: {reason}");
                    }
                    other => Self::absorb(other, index, report)?,
                }
            }
        }

        Ok(())
    }

    fn absorb(result: Result<()>, index: usize, report: &mut StepReport) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Error::NonFiniteState(reason)) => {
                report.rejected_updates += 1;
                warn!("Rejected update of particle {index}: {reason}");
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn resolve_particle_collisions(&mut self, restitution: Scalar) -> usize {
        let mut collisions = 0;
        for second in 1..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(second);
            for first in head.iter_mut() {
                if first
                    .body_mut()
                    .resolve_collision_with(tail[0].body_mut(), restitution)
                {
                    collisions += 1;
                }
            }
        }
        collisions
    }
}
