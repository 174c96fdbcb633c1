//! End-to-end behaviour of the electrostatics core

use chargedrift::physics::charged::{UNIT_CHARGE, UNIT_MASS, UNIT_RADIUS};
use chargedrift::physics::integrators::RungeKuttaFourthOrder;
use chargedrift::physics::math::{Scalar, Vector, VectorExt};
use chargedrift::physics::{
    Bounds, ChargeSign, ChargedParticle, PairwiseModel, Particle, Simulation, StepOptions,
};

const DT: Scalar = 1.0 / 120.0;

fn unit(sign: ChargeSign, x: Scalar, y: Scalar) -> ChargedParticle {
    ChargedParticle::unit(sign, UNIT_RADIUS, Vector::new(x, y), Vector::ZERO).unwrap()
}

fn run(simulation: &mut Simulation, ticks: usize, options: &StepOptions) {
    for _ in 0..ticks {
        let report = simulation.step(simulation.time(), DT, options).unwrap();
        assert!(report.is_clean(), "unexpected report {report:?}");
    }
}

#[test]
fn test_newtons_third_law_for_opposite_unit_charges() {
    let a = unit(ChargeSign::Positive, 400.0, 300.0);
    let b = unit(ChargeSign::Negative, 800.0, 600.0);

    let on_a = a.coulomb_force(&b).unwrap();
    let on_b = b.coulomb_force(&a).unwrap();

    assert_eq!(on_a, -on_b);
    assert!(on_a.dot(b.position() - a.position()) > 0.0);
}

#[test]
fn test_isolated_particle_moves_uniformly() {
    let mut simulation = Simulation::new(Bounds::unbounded());
    let velocity = Vector::new(3.0, -2.0);
    let start = Vector::new(100.0, 100.0);
    simulation
        .create_particle(UNIT_MASS, UNIT_RADIUS, UNIT_CHARGE, start, velocity)
        .unwrap();

    run(&mut simulation, 240, &StepOptions::default());

    let particle = &simulation.particles()[0];
    assert_eq!(particle.velocity(), velocity);
    let expected = start + velocity * (240.0 * DT);
    assert!((particle.position() - expected).length() < 1e-9);
    assert_eq!(particle.potential_energy(), 0.0);
}

#[test]
fn test_wall_restitution_extremes() {
    let bounds = Bounds::from_size(100.0, 100.0).unwrap();
    let integrator = RungeKuttaFourthOrder;

    for (restitution, expected_vx) in [(1.0, -240.0), (0.0, 0.0)] {
        let mut particle = Particle::new(1.0, 5.0, Vector::new(94.0, 50.0), Vector::new(240.0, 3.0))
            .unwrap()
            .with_bounds(bounds);

        particle
            .update(&integrator, DT, Vector::ZERO, None, Some(restitution))
            .unwrap();

        assert_eq!(particle.position().x, 95.0);
        assert_eq!(particle.velocity().x, expected_vx);
        assert_eq!(particle.velocity().y, 3.0);
    }
}

#[test]
fn test_unlike_charges_conserve_energy() {
    let mut simulation = Simulation::new(Bounds::unbounded());
    simulation
        .create_particle(UNIT_MASS, UNIT_RADIUS, UNIT_CHARGE, Vector::ZERO, Vector::ZERO)
        .unwrap();
    simulation
        .create_particle(
            UNIT_MASS,
            UNIT_RADIUS,
            -UNIT_CHARGE,
            Vector::new(2000.0, 0.0),
            Vector::ZERO,
        )
        .unwrap();

    let initial = simulation.energy();
    run(&mut simulation, 1000, &StepOptions::default());
    let last = simulation.energy();

    assert!(last.kinetic > 0.1 * initial.total.abs());
    let drift = (last.total - initial.total).abs() / initial.total.abs();
    assert!(drift < 0.05, "energy drifted by {drift}");
}

#[test]
fn test_head_on_collision_is_elastic() {
    let direction = Vector::new(3.0, 4.0).unit().unwrap();
    let mut a = Particle::new(
        UNIT_MASS,
        UNIT_RADIUS,
        Vector::new(100.0, 100.0),
        direction * 10.0,
    )
    .unwrap();
    let mut b = Particle::new(
        UNIT_MASS,
        UNIT_RADIUS,
        Vector::new(100.0, 100.0) + direction * 8.0,
        direction * -10.0,
    )
    .unwrap();
    let kinetic_before = a.kinetic_energy() + b.kinetic_energy();
    let normal = (b.position() - a.position()).unit().unwrap();
    let closing_before = (a.velocity() - b.velocity()).dot(normal);

    assert!(a.resolve_collision_with(&mut b, 1.0));

    let closing_after = (a.velocity() - b.velocity()).dot(normal);
    assert!(closing_before > 0.0 && closing_after < 0.0);
    assert!((closing_after + closing_before).abs() < 1e-9);

    let kinetic_after = a.kinetic_energy() + b.kinetic_energy();
    assert!((kinetic_after - kinetic_before).abs() <= 1e-9 * kinetic_before);

    // Already separating: a second call changes nothing
    assert!(!a.resolve_collision_with(&mut b, 1.0));
}

#[test]
fn test_opposite_charges_approach_after_one_tick() {
    let mut simulation = Simulation::default();
    let a = simulation
        .create_particle(1e-6, UNIT_RADIUS, 5e-5, Vector::new(500.0, 400.0), Vector::ZERO)
        .unwrap();
    let b = simulation
        .create_particle(1e-6, UNIT_RADIUS, -5e-5, Vector::new(700.0, 500.0), Vector::ZERO)
        .unwrap();
    let options = StepOptions::default()
        .with_damping(0.999)
        .with_max_force(0.001);

    run(&mut simulation, 1, &options);

    let a = simulation.particle(a).unwrap();
    let b = simulation.particle(b).unwrap();
    let a_to_b = Vector::new(200.0, 100.0);

    assert!(a.velocity().x > 0.0 && a.velocity().y > 0.0);
    assert!(b.velocity().x < 0.0 && b.velocity().y < 0.0);
    assert!((a.position() - Vector::new(500.0, 400.0)).dot(a_to_b) > 0.0);
    assert!((b.position() - Vector::new(700.0, 500.0)).dot(a_to_b) < 0.0);
    assert!(a.velocity().perp_dot(a_to_b).abs() < 1e-9 * a.velocity().length() * a_to_b.length());
    assert!(a.potential_energy() < 0.0);
}

#[test]
fn test_pairwise_models_differ_for_three_bodies() {
    fn collinear(model: PairwiseModel) -> Simulation {
        let mut simulation = Simulation::new(Bounds::unbounded()).with_model(model);
        for (charge, x) in [(UNIT_CHARGE, 0.0), (-UNIT_CHARGE, 100.0), (UNIT_CHARGE, 200.0)] {
            simulation
                .create_particle(UNIT_MASS, UNIT_RADIUS, charge, Vector::new(x, 0.0), Vector::ZERO)
                .unwrap();
        }
        simulation
    }

    let mut simultaneous = collinear(PairwiseModel::Simultaneous);
    let mut serial = collinear(PairwiseModel::Serial);
    run(&mut simultaneous, 1, &StepOptions::default());
    run(&mut serial, 1, &StepOptions::default());

    // Net force on the middle charge cancels only when forces are summed first
    let middle = &simultaneous.particles()[1];
    assert_eq!(middle.position(), Vector::new(100.0, 0.0));
    assert_eq!(middle.velocity(), Vector::ZERO);

    let middle = &serial.particles()[1];
    assert_ne!(middle.position(), Vector::new(100.0, 0.0));
    assert!(middle.velocity().x < 0.0);

    let outer = simultaneous.particles();
    assert_eq!(outer[0].velocity().x, -outer[2].velocity().x);
}
