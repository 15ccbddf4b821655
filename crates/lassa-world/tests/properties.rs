use lassa_core::{AgentId, ModelConfig, Position, RodentState};
use lassa_world::{Agent, Checkpoint, Grid, Simulation};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

fn arb_config() -> impl Strategy<Value = ModelConfig> {
    (
        any::<u64>(),
        0u32..40,
        0u32..40,
        1i32..8,
        1i32..8,
        0.0f64..=1.0,
        0.0f64..=1.0,
        0.5f64..20.0,
        0u32..=100,
        0u32..=100,
        0u32..=30,
    )
        .prop_map(
            |(
                seed,
                humans,
                rodents,
                width,
                height,
                initial_infection,
                movement,
                mean,
                treatment,
                stillness,
                pesticide,
            )| ModelConfig {
                seed,
                human_population: humans,
                rodent_population: rodents,
                width,
                height,
                initial_infection,
                transmissibility: 0.8,
                movement_probability: movement,
                mean_disease_duration: mean,
                treatment_chance: treatment,
                treatment_length: 5,
                isolation_chance: 50,
                environmental_stillness: stillness,
                pesticide_kill: pesticide,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn populations_are_conserved(config in arb_config()) {
        let humans = config.human_population as u64;
        let rodents = config.rodent_population as u64;
        let mut sim = Simulation::new(config).unwrap();

        for _ in 0..15 {
            sim.advance_tick().unwrap();
        }

        prop_assert_eq!(sim.statistics_series().len(), 16);
        for record in sim.statistics_series().iter() {
            prop_assert_eq!(record.total_humans(), humans);
            prop_assert_eq!(record.total_rodents(), rodents);
        }
    }

    #[test]
    fn agents_stay_on_the_grid(config in arb_config()) {
        let (width, height) = (config.width, config.height);
        let mut sim = Simulation::new(config).unwrap();

        for _ in 0..10 {
            sim.advance_tick().unwrap();
            for agent in sim.snapshot() {
                prop_assert!(agent.position.in_bounds(width, height));
                prop_assert_eq!(sim.grid().position_of(agent.id), Some(agent.position));
            }
        }
    }

    #[test]
    fn dead_rodents_are_frozen(config in arb_config()) {
        let mut sim = Simulation::new(config).unwrap();
        let mut dead: HashMap<AgentId, Agent> = HashMap::new();

        for _ in 0..15 {
            sim.advance_tick().unwrap();

            for (id, frozen) in &dead {
                prop_assert_eq!(sim.agent(*id), Some(frozen));
            }

            for agent in sim.agents() {
                if let Some(rodent) = agent.as_rodent() {
                    if rodent.state == RodentState::Dead {
                        dead.entry(rodent.id).or_insert_with(|| agent.clone());
                    }
                }
            }
        }
    }

    #[test]
    fn random_moves_stay_in_bounds(
        width in 1i32..12,
        height in 1i32..12,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(width, height);
        let id = AgentId(0);
        let mut position = grid.random_unoccupied_cell(&mut rng);
        grid.place(id, position).unwrap();

        for _ in 0..50 {
            let neighbors = grid.neighbors(position);
            prop_assert!(!neighbors.is_empty() && neighbors.len() <= 8);
            let next = neighbors[rng.gen_range(0..neighbors.len())];
            grid.move_agent(id, next).unwrap();
            position = next;
            prop_assert!(position.in_bounds(width, height));
            prop_assert_eq!(grid.occupants(position).collect::<Vec<_>>(), vec![id]);
        }
    }
}

#[test]
fn same_seed_same_run() {
    let config = ModelConfig {
        seed: 77,
        human_population: 60,
        rodent_population: 60,
        width: 10,
        height: 10,
        ..Default::default()
    };

    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    a.run(25, 0).unwrap();
    b.run(25, 0).unwrap();

    assert_eq!(a.statistics_series(), b.statistics_series());
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn different_seeds_diverge() {
    let base = ModelConfig {
        human_population: 60,
        rodent_population: 60,
        width: 10,
        height: 10,
        ..Default::default()
    };

    let a = Simulation::new(ModelConfig { seed: 1, ..base.clone() }).unwrap();
    let b = Simulation::new(ModelConfig { seed: 2, ..base }).unwrap();
    assert_ne!(a.snapshot(), b.snapshot());
}

#[test]
fn restored_checkpoint_continues_identically() {
    let config = ModelConfig {
        seed: 4242,
        human_population: 50,
        rodent_population: 50,
        width: 8,
        height: 8,
        ..Default::default()
    };

    let mut uninterrupted = Simulation::new(config.clone()).unwrap();
    uninterrupted.run(20, 0).unwrap();

    let mut first_half = Simulation::new(config).unwrap();
    first_half.run(10, 0).unwrap();
    let bytes = first_half.checkpoint().to_bytes().unwrap();

    let mut resumed = Simulation::restore(Checkpoint::from_bytes(&bytes).unwrap()).unwrap();
    assert_eq!(resumed.tick(), 10);
    resumed.run(10, 0).unwrap();

    assert_eq!(resumed.statistics_series(), uninterrupted.statistics_series());
    assert_eq!(resumed.snapshot(), uninterrupted.snapshot());
    assert_eq!(resumed.agents(), uninterrupted.agents());
}

#[test]
fn snapshot_positions_match_grid() {
    let mut sim = Simulation::new(ModelConfig::default()).unwrap();
    sim.advance_tick().unwrap();

    let mut per_cell: HashMap<Position, usize> = HashMap::new();
    for agent in sim.snapshot() {
        *per_cell.entry(agent.position).or_default() += 1;
    }

    for (pos, count) in per_cell {
        assert_eq!(sim.grid().occupants(pos).count(), count);
    }
}
