/*
 * Flock Module
 *
 * This module owns the boids and drives the simulation tick:
 * 1. Decide: every boid computes its new velocity from the flock as it was
 *    at the start of the tick. Nothing is mutated during this phase, so it
 *    may run on the rayon pool.
 * 2. Act: every boid moves by its committed velocity.
 * 3. Cull/replace: any boid outside the bounds is swapped for a fresh,
 *    randomly placed one, keeping the population constant.
 *
 * Neighbor lookup is a plain O(n²) scan over the snapshot. A spatial grid
 * could narrow it later as long as every decision still sees one consistent
 * snapshot.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::boid::{Boid, Decision};
use crate::debug::FlockStats;
use crate::error::ConfigurationError;
use crate::params::{Bounds, FlockConfig};
use crate::rules::SteeringImpulses;
use crate::vector::Vector2;

// Read-only view of one boid, handed to renderers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentView {
    pub id: u64,
    pub position: (f64, f64),
    pub heading: f64,
    pub size: f64,
}

pub struct Flock {
    boids: Vec<Boid>,
    bounds: Bounds,
    config: FlockConfig,
    // Index-aligned with `boids`; zero for boids spawned since the last decide
    impulses: Vec<SteeringImpulses>,
    stats: FlockStats,
    rng: StdRng,
    next_id: u64,
}

impl Flock {
    // Build `config.population_size` boids at random positions and headings
    pub fn new(bounds: Bounds, config: FlockConfig) -> Result<Self, ConfigurationError> {
        bounds.validate()?;
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let boids: Vec<Boid> = (0..config.population_size as u64)
            .map(|id| Boid::random(id, &bounds, &config, &mut rng))
            .collect();

        debug!(
            population = boids.len(),
            width = bounds.width,
            height = bounds.height,
            seed = ?config.seed,
            "flock created"
        );

        Ok(Self::assemble(bounds, config, boids, rng))
    }

    // Default configuration with only the population chosen
    pub fn with_population(bounds: Bounds, population_size: usize) -> Result<Self, ConfigurationError> {
        Self::new(
            bounds,
            FlockConfig {
                population_size,
                ..FlockConfig::default()
            },
        )
    }

    // Build a flock from explicit (position, velocity) pairs. The population
    // is the number of placements and overwrites `config.population_size`.
    pub fn with_agents<I>(
        bounds: Bounds,
        mut config: FlockConfig,
        placements: I,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (Vector2, Vector2)>,
    {
        bounds.validate()?;
        config.validate_agent()?;

        let boids: Vec<Boid> = placements
            .into_iter()
            .enumerate()
            .map(|(id, (position, velocity))| Boid::new(id as u64, position, velocity, &config))
            .collect();

        if boids.is_empty() {
            return Err(ConfigurationError::EmptyPopulation);
        }
        config.population_size = boids.len();

        debug!(population = boids.len(), "flock created from placements");

        let rng = seeded_rng(config.seed);
        Ok(Self::assemble(bounds, config, boids, rng))
    }

    fn assemble(bounds: Bounds, config: FlockConfig, boids: Vec<Boid>, rng: StdRng) -> Self {
        let next_id = boids.len() as u64;
        let impulses = vec![SteeringImpulses::default(); boids.len()];

        Self {
            boids,
            bounds,
            config,
            impulses,
            stats: FlockStats::default(),
            rng,
            next_id,
        }
    }

    // Advance the simulation by one unit of time
    pub fn tick(&mut self) {
        let decisions = self.decide();

        for (boid, decision) in self.boids.iter_mut().zip(&decisions) {
            boid.commit(decision);
        }
        self.impulses = decisions.into_iter().map(|d| d.impulses).collect();

        for boid in &mut self.boids {
            boid.update_position();
        }

        let replaced = self.replace_escaped();
        let mean_speed = self.mean_speed();
        self.stats.record_tick(replaced, mean_speed);

        if replaced > 0 {
            debug!(tick = self.stats.tick, replaced, "replaced boids that left the bounds");
        }
    }

    fn decide(&self) -> Vec<Decision> {
        let flock = &self.boids[..];
        let bounds = &self.bounds;
        let obstacles = &self.config.obstacles[..];

        if self.config.parallel {
            flock
                .par_iter()
                .map(|boid| boid.decide(flock, bounds, obstacles))
                .collect()
        } else {
            flock
                .iter()
                .map(|boid| boid.decide(flock, bounds, obstacles))
                .collect()
        }
    }

    // Swap every boid outside the bounds for a fresh one; order is not kept
    fn replace_escaped(&mut self) -> usize {
        let mut replaced = 0;

        for index in 0..self.boids.len() {
            if self.bounds.contains(self.boids[index].position()) {
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;

            let fresh = Boid::random(id, &self.bounds, &self.config, &mut self.rng);
            let escaped = std::mem::replace(&mut self.boids[index], fresh);
            self.impulses[index] = SteeringImpulses::default();

            trace!(
                escaped = escaped.id(),
                x = escaped.position().x,
                y = escaped.position().y,
                replacement = id,
                "boid left the bounds"
            );
            replaced += 1;
        }

        replaced
    }

    fn mean_speed(&self) -> f64 {
        if self.boids.is_empty() {
            return 0.0;
        }
        self.boids.iter().map(Boid::speed).sum::<f64>() / self.boids.len() as f64
    }

    // Snapshot for rendering
    pub fn agents(&self) -> Vec<AgentView> {
        self.boids
            .iter()
            .map(|boid| AgentView {
                id: boid.id(),
                position: boid.position().into(),
                heading: boid.heading(),
                size: boid.size(),
            })
            .collect()
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    // Raw impulses from the last decide phase, for debug overlays only
    pub fn impulses(&self) -> &[SteeringImpulses] {
        &self.impulses
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn stats(&self) -> FlockStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
