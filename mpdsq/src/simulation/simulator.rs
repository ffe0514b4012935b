//! Main simulator harness for deterministic simulation testing.
//!
//! Each round generates a result set, serves it from a `SimulatedApi` with a
//! random page size, runs every query operation against it and checks the
//! invariants.

// Simulation code legitimately needs cloning for test data
#![allow(clippy::disallowed_methods)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::api::{FaultConfig, SimulatedApi};
use super::data_gen::{DatasetConfig, DatasetGenerator, SimulatedEntry};
use super::invariants::{InvariantChecker, InvariantViolation};
use crate::config::ClientConfig;
use crate::error::QueryError;
use crate::query::QueryEngine;
use crate::types::{Format, Query, Record};

const SIMULATED_KEY: &str = "simulated-key";

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Largest page size to draw (inclusive).
    pub max_page_size: u32,
    /// Probability a round fails one of its pages (0.0 - 1.0).
    pub page_fault_rate: f64,
    /// Result-set generation configuration.
    pub dataset_config: DatasetConfig,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_page_size: 7,
            page_fault_rate: 0.0,
            dataset_config: DatasetConfig::default(),
        }
    }

    /// Set the page fault rate.
    #[must_use]
    pub const fn with_page_fault_rate(mut self, rate: f64) -> Self {
        self.page_fault_rate = rate;
        self
    }

    /// Set the largest page size.
    #[must_use]
    pub const fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Set the result-set configuration.
    #[must_use]
    pub fn with_dataset_config(mut self, config: DatasetConfig) -> Self {
        self.dataset_config = config;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of rounds run.
    pub rounds: usize,
    /// Total entries served across all rounds.
    pub entries_served: usize,
    /// Number of rounds with an injected page failure.
    pub faults_injected: usize,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// One round's randomly drawn parameters.
struct Round {
    index: usize,
    entries: Vec<SimulatedEntry>,
    page_size: u32,
    format: Format,
    failing_page: Option<u64>,
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    rng: StdRng,
    generator: DatasetGenerator,
    checker: InvariantChecker,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = DatasetGenerator::with_config(config.seed, config.dataset_config.clone());
        Self {
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            generator,
            checker: InvariantChecker::new(),
            config,
        }
    }

    /// Run the given number of rounds.
    pub fn run(&mut self, rounds: usize) -> SimulationResult {
        let mut entries_served = 0;
        let mut faults_injected = 0;

        for index in 0..rounds {
            let round = self.next_round(index);
            entries_served += round.entries.len();
            if round.failing_page.is_some() {
                faults_injected += 1;
            }
            self.run_round(&round);
        }

        SimulationResult {
            seed: self.config.seed,
            rounds,
            entries_served,
            faults_injected,
            invariant_violations: self.checker.violations().to_vec(),
        }
    }

    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }

    fn next_round(&mut self, index: usize) -> Round {
        let entries = self.generator.generate();
        let page_size = self.rng.random_range(1..=self.config.max_page_size.max(1));
        let format = if self.rng.random_bool(0.5) {
            Format::Json
        } else {
            Format::Cif
        };

        let npages = (entries.len() as u64).div_ceil(u64::from(page_size));
        let failing_page = (npages > 0 && self.rng.random::<f64>() < self.config.page_fault_rate)
            .then(|| self.rng.random_range(0..npages));

        Round {
            index,
            entries,
            page_size,
            format,
            failing_page,
        }
    }

    fn client_config(page_size: u32) -> Result<ClientConfig, QueryError> {
        let config = ClientConfig::new(Some(SIMULATED_KEY.to_string()))?
            .with_url("http://mpds.simulated/facet")?
            .with_page_size(page_size)?;
        Ok(config)
    }

    fn run_round(&mut self, round: &Round) {
        let faults = match round.failing_page {
            Some(page) => FaultConfig::realistic().with_failing_page(page),
            None => FaultConfig::realistic(),
        };
        let api = SimulatedApi::new(SIMULATED_KEY, round.entries.clone(), faults);

        if let Err(e) = self.query_round(&api, round) {
            self.checker_violation(round.index, "Unexpected error", &e);
        }
    }

    fn query_round(&mut self, api: &SimulatedApi, round: &Round) -> Result<(), QueryError> {
        let engine = QueryEngine::with_transport(Self::client_config(round.page_size)?, api);
        let query = Query::new().with("elements", "Ti-O").with("sgs", 136);

        let first = engine.count_and_pages(&query)?;
        let second = engine.count_and_pages(&query)?;
        self.checker
            .check_counts(&round.entries, round.page_size, first, round.index);
        self.checker.check_counts_stable(first, second, round.index);

        if let Some(failing_page) = round.failing_page {
            let mut yielded = 0;
            let mut error = None;
            for item in engine.find(&query, round.format)? {
                match item {
                    Ok(_) => yielded += 1,
                    Err(e) => error = Some(e),
                }
            }
            self.checker.check_fault(
                api,
                round.page_size,
                failing_page,
                yielded,
                error.as_ref(),
                round.index,
            );

            if engine.fetch_all(&query, round.format).is_ok() {
                self.checker_violation(
                    round.index,
                    "fetch_all succeeded despite a failing page",
                    &failing_page,
                );
            }
            return Ok(());
        }

        let records: Vec<Record> = engine
            .find(&query, round.format)?
            .collect::<Result<_, _>>()?;
        self.checker
            .check_records(&round.entries, round.format, &records, round.index);

        let structures: Vec<Record> = engine
            .structures()
            .find(&query, Some(round.format))?
            .collect::<Result<_, _>>()?;
        self.checker
            .check_structures(&round.entries, round.format, &structures, round.index);

        let properties: Vec<Record> = engine
            .properties()
            .find(&query)?
            .collect::<Result<_, _>>()?;
        self.checker
            .check_properties(&round.entries, &properties, round.index);

        let aggregate = engine.fetch_all(&query, round.format)?;
        self.checker
            .check_aggregate(&round.entries, &aggregate, round.index);

        Ok(())
    }

    fn checker_violation(&mut self, round: usize, description: &str, context: &dyn std::fmt::Debug) {
        self.checker.add_violation(InvariantViolation {
            description: description.to_string(),
            round,
            context: format!("{context:?}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_basic() {
        let mut simulator = Simulator::new(SimulatorConfig::new(12345));
        let result = simulator.run(50);

        assert_eq!(result.seed, 12345);
        assert_eq!(result.rounds, 50);
        assert_eq!(result.faults_injected, 0);
        assert!(result.passed(), "{:?}", result.invariant_violations);
        assert!(!simulator.checker().has_violations());
    }

    #[test]
    fn test_simulator_deterministic() {
        let result1 = Simulator::new(SimulatorConfig::new(777).with_page_fault_rate(0.3)).run(40);
        let result2 = Simulator::new(SimulatorConfig::new(777).with_page_fault_rate(0.3)).run(40);

        assert_eq!(result1.entries_served, result2.entries_served);
        assert_eq!(result1.faults_injected, result2.faults_injected);
    }

    #[test]
    fn test_simulator_with_faults() {
        let config = SimulatorConfig::new(54321).with_page_fault_rate(0.5);
        let result = Simulator::new(config).run(100);

        assert!(result.faults_injected > 0);
        assert!(result.passed(), "{:?}", result.invariant_violations);
    }

    #[test]
    fn test_simulator_page_size_one() {
        let config = SimulatorConfig::new(9).with_max_page_size(1);
        let result = Simulator::new(config).run(20);

        assert!(result.passed(), "{:?}", result.invariant_violations);
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let config = SimulatorConfig::new(99999)
            .with_page_fault_rate(0.1)
            .with_max_page_size(50)
            .with_dataset_config(DatasetConfig {
                max_entries: 500,
                ..DatasetConfig::default()
            });
        let result = Simulator::new(config).run(2_000);

        assert!(result.passed(), "{:?}", result.invariant_violations);
    }
}
