//! Random fleet generation.
//!
//! Lives entirely outside the placement engine: randomness here produces
//! ordinary robot records (including the cosmetic `defective` flag), and
//! the engine treats them like any other input.

use rand::Rng;

use crate::model::Robot;

/// Configuration for the fleet generator.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// Smallest fleet a generation run may produce
    pub min_count: usize,
    /// Largest fleet a generation run may produce
    pub max_count: usize,
    /// Upper bound for generated widths and heights, in cells
    pub max_dimension: usize,
    /// Probability that a generated robot is flagged defective (0.0 to 1.0)
    pub defect_rate: f64,
}

impl GeneratorConfig {
    pub const DEFAULT_MIN_COUNT: usize = 3;
    pub const DEFAULT_MAX_COUNT: usize = 10;
    pub const DEFAULT_MAX_DIMENSION: usize = 4;
    pub const DEFAULT_DEFECT_RATE: f64 = 0.3;
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_count: Self::DEFAULT_MIN_COUNT,
            max_count: Self::DEFAULT_MAX_COUNT,
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
            defect_rate: Self::DEFAULT_DEFECT_RATE,
        }
    }
}

/// Generates a random robot fleet.
///
/// Ids follow the `robot_01` pattern in generation order, so a generated
/// fleet never contains duplicates. Dimensions are uniform in
/// `1..=max_dimension`; the defective flag is drawn once per robot at the
/// configured rate.
pub fn random_fleet(config: &GeneratorConfig, rng: &mut impl Rng) -> Vec<Robot> {
    let count = rng.random_range(config.min_count..=config.max_count);

    (1..=count)
        .map(|i| Robot {
            id: format!("robot_{:02}", i),
            width: rng.random_range(1..=config.max_dimension),
            height: rng.random_range(1..=config.max_dimension),
            position: None,
            defective: rng.random_bool(config.defect_rate),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::types::Footprinted;

    #[test]
    fn fleet_respects_config_bounds() {
        let config = GeneratorConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            let fleet = random_fleet(&config, &mut rng);
            assert!(fleet.len() >= config.min_count);
            assert!(fleet.len() <= config.max_count);
            for robot in &fleet {
                let (w, h) = robot.footprint();
                assert!((1..=config.max_dimension).contains(&w));
                assert!((1..=config.max_dimension).contains(&h));
                assert!(robot.position.is_none());
            }
        }
    }

    #[test]
    fn fleet_ids_are_unique_and_sequential() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fleet = random_fleet(&GeneratorConfig::default(), &mut rng);

        for (i, robot) in fleet.iter().enumerate() {
            assert_eq!(robot.id, format!("robot_{:02}", i + 1));
        }
    }

    #[test]
    fn defect_rate_zero_means_no_defects() {
        let config = GeneratorConfig {
            defect_rate: 0.0,
            ..GeneratorConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..20 {
            assert!(random_fleet(&config, &mut rng).iter().all(|r| !r.defective));
        }
    }
}
