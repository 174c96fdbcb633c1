//! Point charges: Coulomb interaction and electrostatic potential energy.

use crate::error::{Error, Result};
use crate::physics::integrators::Integrator;
use crate::physics::math::{COULOMB_CONSTANT, Scalar, Vector, VectorExt};
use crate::physics::particle::{Bounds, Particle, validate_damping, validate_restitution};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Charge magnitude of the `+`/`-` shorthand, in coulombs.
pub const UNIT_CHARGE: Scalar = 5e-5;

/// Mass given to particles created from the `+`/`-` shorthand.
pub const UNIT_MASS: Scalar = 1e-6;

/// Radius of spawned particles, in pixels.
pub const UNIT_RADIUS: Scalar = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeSign {
    Positive,
    Negative,
}

impl ChargeSign {
    pub fn signum(self) -> Scalar {
        match self {
            ChargeSign::Positive => 1.0,
            ChargeSign::Negative => -1.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ChargeSign::Positive => "+",
            ChargeSign::Negative => "-",
        }
    }

    /// Sign of a numeric charge; `None` for zero or NaN.
    pub fn of(charge: Scalar) -> Option<Self> {
        if charge > 0.0 {
            Some(ChargeSign::Positive)
        } else if charge < 0.0 {
            Some(ChargeSign::Negative)
        } else {
            None
        }
    }
}

impl FromStr for ChargeSign {
    type Err = Error;

    fn from_str(symbol: &str) -> Result<Self> {
        match symbol {
            "+" => Ok(ChargeSign::Positive),
            "-" => Ok(ChargeSign::Negative),
            other => Err(Error::InvalidChargeSign(other.to_string())),
        }
    }
}

impl fmt::Display for ChargeSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Physical properties given to particles spawned from a bare sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDefaults {
    pub mass: Scalar,
    pub radius: Scalar,
    pub unit_charge: Scalar,
}

impl Default for SpawnDefaults {
    fn default() -> Self {
        Self {
            mass: UNIT_MASS,
            radius: UNIT_RADIUS,
            unit_charge: UNIT_CHARGE,
        }
    }
}

/// Per-tick parameters shared by every particle update.
///
/// `None` disables the corresponding effect: no damping, perfectly elastic
/// walls, no force clamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOptions {
    pub damping: Option<Scalar>,
    pub restitution: Option<Scalar>,
    pub max_force: Option<Scalar>,
}

impl StepOptions {
    pub fn with_damping(mut self, damping: Scalar) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn with_restitution(mut self, restitution: Scalar) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn with_max_force(mut self, max_force: Scalar) -> Self {
        self.max_force = Some(max_force);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_damping(self.damping)?;
        if let Some(restitution) = self.restitution {
            validate_restitution(restitution)?;
        }
        match self.max_force {
            Some(max_force) if !(max_force > 0.0) => Err(Error::InvalidParameter(format!(
                "max force must be positive, got {max_force}"
            ))),
            _ => Ok(()),
        }
    }
}

/// A particle carrying a non-zero electric charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargedParticle {
    body: Particle,
    charge: Scalar,
    potential_energy: Scalar,
}

impl ChargedParticle {
    pub fn new(
        mass: Scalar,
        radius: Scalar,
        charge: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> Result<Self> {
        if !charge.is_finite() || charge == 0.0 {
            return Err(Error::InvalidParameter(format!(
                "charge must be finite and non-zero, got {charge}"
            )));
        }

        Ok(Self {
            body: Particle::new(mass, radius, position, velocity)?,
            charge,
            potential_energy: 0.0,
        })
    }

    /// Unit-mass particle carrying `±UNIT_CHARGE`.
    pub fn unit(
        sign: ChargeSign,
        radius: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> Result<Self> {
        Self::new(UNIT_MASS, radius, sign.signum() * UNIT_CHARGE, position, velocity)
    }

    /// Like [`ChargedParticle::unit`] but parses the `"+"`/`"-"` shorthand.
    pub fn from_symbol(
        symbol: &str,
        radius: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> Result<Self> {
        Self::unit(symbol.parse()?, radius, position, velocity)
    }

    /// Particle at rest built from spawn defaults.
    pub fn with_sign(sign: ChargeSign, defaults: &SpawnDefaults, position: Vector) -> Result<Self> {
        Self::new(
            defaults.mass,
            defaults.radius,
            sign.signum() * defaults.unit_charge.abs(),
            position,
            Vector::ZERO,
        )
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.body = self.body.with_bounds(bounds);
        self
    }

    pub fn body(&self) -> &Particle {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Particle {
        &mut self.body
    }

    pub fn charge(&self) -> Scalar {
        self.charge
    }

    pub fn sign(&self) -> ChargeSign {
        if self.charge > 0.0 {
            ChargeSign::Positive
        } else {
            ChargeSign::Negative
        }
    }

    /// Potential energy recorded by the last update; pairwise or summed
    /// over partners depending on which update path produced it.
    pub fn potential_energy(&self) -> Scalar {
        self.potential_energy
    }

    pub fn position(&self) -> Vector {
        self.body.position()
    }

    pub fn velocity(&self) -> Vector {
        self.body.velocity()
    }

    pub fn mass(&self) -> Scalar {
        self.body.mass()
    }

    pub fn radius(&self) -> Scalar {
        self.body.radius()
    }

    pub fn kinetic_energy(&self) -> Scalar {
        self.body.kinetic_energy()
    }

    /// Coulomb force exerted on this particle by `other`.
    ///
    /// Magnitude `k·|q₁q₂|/r²`, pointing away from `other` for like charges
    /// and towards it for unlike ones.
    pub fn coulomb_force(&self, other: &ChargedParticle) -> Result<Vector> {
        self.coulomb_force_limited(other, None)
    }

    /// [`ChargedParticle::coulomb_force`] with its magnitude capped at `max_force`.
    pub fn coulomb_force_clamped(
        &self,
        other: &ChargedParticle,
        max_force: Scalar,
    ) -> Result<Vector> {
        self.coulomb_force_limited(other, Some(max_force))
    }

    pub fn coulomb_force_limited(
        &self,
        other: &ChargedParticle,
        max_force: Option<Scalar>,
    ) -> Result<Vector> {
        let separation = other.position() - self.position();
        let distance_squared = separation.length_squared();
        if distance_squared == 0.0 {
            return Err(Error::DivisionByZero(format!(
                "coincident charges at {}",
                self.position()
            )));
        }

        let direction = separation.unit()?;
        let product = self.charge * other.charge;
        let magnitude = COULOMB_CONSTANT * product.abs() / distance_squared;
        let magnitude = match max_force {
            Some(max_force) => magnitude.min(max_force),
            None => magnitude,
        };

        if product > 0.0 {
            Ok(-direction * magnitude)
        } else {
            Ok(direction * magnitude)
        }
    }

    /// Signed electrostatic potential energy `k·q₁q₂/r` of the pair.
    pub fn resolve_potential_energy(&self, other: &ChargedParticle) -> Result<Scalar> {
        let distance = self.body.distance_to(&other.body);
        if distance == 0.0 {
            return Err(Error::DivisionByZero(format!(
                "potential energy of coincident charges at {}",
                self.position()
            )));
        }
        Ok(COULOMB_CONSTANT * self.charge * other.charge / distance)
    }

    /// Advances this particle one tick under the force of a single `neighbor`,
    /// then records the pairwise potential energy with it.
    ///
    /// Fails with [`Error::DivisionByZero`] if the centres coincide before or
    /// after the step; in both cases the particle is left untouched.
    pub fn update(
        &mut self,
        integrator: &dyn Integrator,
        dt: Scalar,
        neighbor: &ChargedParticle,
        options: &StepOptions,
    ) -> Result<()> {
        options.validate()?;
        let force = self.coulomb_force_limited(neighbor, options.max_force)?;
        let previous = self.body.clone();
        self.body
            .update(integrator, dt, force, options.damping, options.restitution)?;

        match self.resolve_potential_energy(neighbor) {
            Ok(potential_energy) => {
                self.potential_energy = potential_energy;
                Ok(())
            }
            Err(error) => {
                // Landed on the neighbour's centre; the pair is skipped as a whole
                self.body = previous;
                Err(error)
            }
        }
    }

    /// Advances this particle one tick under an already-summed `force` and
    /// stores a potential energy accumulated by the caller.
    pub fn apply_net_force(
        &mut self,
        integrator: &dyn Integrator,
        dt: Scalar,
        force: Vector,
        potential_energy: Scalar,
        options: &StepOptions,
    ) -> Result<()> {
        options.validate()?;
        self.body
            .update(integrator, dt, force, options.damping, options.restitution)?;
        self.potential_energy = potential_energy;
        Ok(())
    }
}
