//! Agents playing the jump game through a network.
use crate::genomics::{GenomeError, Individual};
use crate::networks::{FeedForwardNetwork, NetworkError, Structure};

use neurojump::{Fitness, Genome};
use rand::Rng;

/// Pixel measurements are divided by this
/// before being fed to a network.
pub const SCREEN_SCALE: f32 = 1024.0;
/// Number of obstacles an agent can see ahead.
pub const VISIBLE_OBSTACLES: usize = 3;
/// Number of values in an observation.
pub const OBSERVATION_LEN: usize = 3 * VISIBLE_OBSTACLES + 1;

/// Axis-aligned box of a scene object, in pixels,
/// positioned by its center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn lower(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn upper(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// What an agent sees of the game at one step.
///
/// Values are, in order: the gap between the player and the
/// first obstacle, the first obstacle's lower and upper edges,
/// the gap between the first and second obstacles, the second
/// obstacle's upper and lower edges, the gap between the second
/// and third obstacles, the third obstacle's upper and lower
/// edges, and the player's height. Every value is scaled by
/// [`SCREEN_SCALE`]; values involving a missing obstacle are 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation([f32; OBSERVATION_LEN]);

impl Observation {
    /// Observes `player` facing the upcoming `obstacles`,
    /// nearest first. Obstacles beyond [`VISIBLE_OBSTACLES`]
    /// are ignored.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::agent::{Bounds, Observation};
    ///
    /// let player = Bounds { x: 0.0, y: 51.2, width: 24.0, height: 24.0 };
    /// let observation = Observation::from_scene(&player, &[]);
    ///
    /// assert_eq!(observation.values()[..9], [0.0; 9]);
    /// assert_eq!(observation.values()[9], 0.05);
    /// ```
    pub fn from_scene(player: &Bounds, obstacles: &[Bounds]) -> Observation {
        let nearest = |i: usize| obstacles.get(i);
        let (first, second, third) = (nearest(0), nearest(1), nearest(2));
        Observation([
            gap(Some(player), first),
            edge(first, Bounds::lower),
            edge(first, Bounds::upper),
            gap(second, first),
            edge(second, Bounds::upper),
            edge(second, Bounds::lower),
            gap(third, second),
            edge(third, Bounds::upper),
            edge(third, Bounds::lower),
            player.y / SCREEN_SCALE,
        ])
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }
}

/// Horizontal distance between the left edge of `later`
/// and the right edge of `earlier`.
fn gap(later: Option<&Bounds>, earlier: Option<&Bounds>) -> f32 {
    match (later, earlier) {
        (Some(later), Some(earlier)) => (later.left() - earlier.right()).abs() / SCREEN_SCALE,
        _ => 0.0,
    }
}

fn edge(obstacle: Option<&Bounds>, side: fn(&Bounds) -> f32) -> f32 {
    obstacle.map_or(0.0, |o| side(o) / SCREEN_SCALE)
}

/// A decision taken by an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Jump,
    Idle,
}

impl Action {
    /// Picks the action of the largest network output:
    /// output 0 is [`Jump`], any other is [`Idle`]. Ties
    /// go to the earliest output.
    ///
    /// # Examples
    /// ```
    /// use neurojump_nn::agent::Action;
    ///
    /// assert_eq!(Action::from_output(&[0.7, 0.3]), Action::Jump);
    /// assert_eq!(Action::from_output(&[0.2, 0.8]), Action::Idle);
    /// assert_eq!(Action::from_output(&[0.5, 0.5]), Action::Jump);
    /// ```
    ///
    /// [`Jump`]: Action::Jump
    /// [`Idle`]: Action::Idle
    pub fn from_output(output: &[f32]) -> Action {
        let mut best: Option<(usize, f32)> = None;
        for (i, value) in output.iter().copied().enumerate() {
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
        }
        match best {
            Some((0, _)) => Action::Jump,
            _ => Action::Idle,
        }
    }
}

/// A player controlled by its own network.
#[derive(Clone, Debug)]
pub struct JumpAgent {
    network: FeedForwardNetwork,
}

impl JumpAgent {
    /// Creates an agent with a freshly initialized
    /// jump network.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Result<JumpAgent, NetworkError> {
        Self::with_structure(Structure::jump(), rng)
    }

    /// Creates an agent with a freshly initialized network
    /// of any structure taking [`OBSERVATION_LEN`] inputs.
    pub fn with_structure<R: Rng + ?Sized>(
        structure: Structure,
        rng: &mut R,
    ) -> Result<JumpAgent, NetworkError> {
        Ok(JumpAgent {
            network: FeedForwardNetwork::with_rng(structure, rng)?,
        })
    }

    /// Creates an agent playing with an individual's weights.
    pub fn from_individual(individual: &Individual) -> Result<JumpAgent, NetworkError> {
        Ok(JumpAgent {
            network: FeedForwardNetwork::try_from(individual)?,
        })
    }

    /// Creates an agent playing with an individual's weights
    /// in a network of the given structure, e.g. one using
    /// other activations than the standard jump network.
    ///
    /// # Errors
    /// Returns an error if the structure is inconsistent, or
    /// if its layers do not match the individual's weights.
    pub fn with_genome(
        structure: Structure,
        individual: &Individual,
    ) -> Result<JumpAgent, NetworkError> {
        Ok(JumpAgent {
            network: FeedForwardNetwork::with_weights(structure, &individual.to_weights())?,
        })
    }

    /// Decides what to do given the current observation.
    ///
    /// # Errors
    /// Returns an error if the agent's network does not
    /// take a single observation per inference.
    pub fn decide(&mut self, observation: &Observation) -> Result<Action, NetworkError> {
        let output = self.network.infer_single(observation.values())?;
        Ok(Action::from_output(&output))
    }

    /// Returns the network's current weights.
    pub fn weights(&self) -> Vec<Vec<f32>> {
        self.network.all_weights()
    }

    /// Packages the agent's weights with the score
    /// it reached into an individual.
    ///
    /// # Errors
    /// Returns an error if the agent's network is
    /// not shaped like a jump network.
    pub fn to_individual(&self, score: Fitness) -> Result<Individual, GenomeError> {
        Individual::from_weights(&self.weights(), score)
    }

    pub fn network(&self) -> &FeedForwardNetwork {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn obstacle(x: f32, y: f32) -> Bounds {
        Bounds {
            x,
            y,
            width: 40.0,
            height: 100.0,
        }
    }

    #[test]
    fn observation_layout() {
        let player = Bounds {
            x: -400.0,
            y: 102.4,
            width: 24.0,
            height: 24.0,
        };
        let obstacles = [obstacle(100.0, 50.0), obstacle(400.0, 200.0), obstacle(700.0, -50.0)];
        let values = Observation::from_scene(&player, &obstacles).0;

        // player left = -412, first right = 120
        assert_abs_diff_eq!(values[0], 532.0 / 1024.0);
        assert_abs_diff_eq!(values[1], 0.0);
        assert_abs_diff_eq!(values[2], 100.0 / 1024.0);
        // second left = 380
        assert_abs_diff_eq!(values[3], 260.0 / 1024.0);
        assert_abs_diff_eq!(values[4], 250.0 / 1024.0);
        assert_abs_diff_eq!(values[5], 150.0 / 1024.0);
        assert_abs_diff_eq!(values[6], 260.0 / 1024.0);
        assert_abs_diff_eq!(values[7], 0.0);
        assert_abs_diff_eq!(values[8], -100.0 / 1024.0);
        assert_abs_diff_eq!(values[9], 0.1);
    }

    #[test]
    fn missing_obstacles_are_zero() {
        let player = obstacle(0.0, 10.0);
        let observation = Observation::from_scene(&player, &[obstacle(300.0, 50.0)]);
        let values = observation.values();
        assert!(values[0] > 0.0);
        assert!(values[2] > 0.0);
        assert!(values[3..9].iter().all(|v| *v == 0.0));
        assert_eq!(values.len(), OBSERVATION_LEN);
    }

    #[test]
    fn extra_obstacles_are_ignored() {
        let player = obstacle(0.0, 0.0);
        let three: Vec<Bounds> = (1..=3).map(|i| obstacle(i as f32 * 200.0, 0.0)).collect();
        let mut four = three.clone();
        four.push(obstacle(900.0, 300.0));
        assert_eq!(
            Observation::from_scene(&player, &three),
            Observation::from_scene(&player, &four)
        );
    }

    #[test]
    fn argmax_action() {
        assert_eq!(Action::from_output(&[0.1, 0.9]), Action::Idle);
        assert_eq!(Action::from_output(&[0.9, 0.1]), Action::Jump);
        assert_eq!(Action::from_output(&[0.5, 0.5]), Action::Jump);
        assert_eq!(Action::from_output(&[0.1, 0.2, 0.7]), Action::Idle);
        assert_eq!(Action::from_output(&[]), Action::Idle);
    }

    #[test]
    fn agent_roundtrips_through_individual() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let agent = JumpAgent::new(&mut rng).unwrap();
        let individual = agent.to_individual(42).unwrap();
        assert_eq!(individual.fitness(), 42);

        let clone = JumpAgent::from_individual(&individual).unwrap();
        assert_eq!(clone.weights(), agent.weights());
    }

    #[test]
    fn custom_structure_agents() {
        use crate::networks::{HiddenActivation, OutputActivation};

        let individual = Individual::from_genes(vec![0.1; 120], 0).unwrap();
        let sigmoid = Structure::new(
            vec![10, 10, 2],
            HiddenActivation::Sigmoid,
            OutputActivation::Softmax,
            1,
            0.9,
            0.9,
        )
        .unwrap();
        let mut agent = JumpAgent::with_genome(sigmoid, &individual).unwrap();
        let neutral = Observation([0.0; OBSERVATION_LEN]);
        // Equal output weights tie, and ties jump.
        assert_eq!(agent.decide(&neutral).unwrap(), Action::Jump);

        let wide = Structure::new(
            vec![10, 12, 2],
            HiddenActivation::RectifiedLinear,
            OutputActivation::Softmax,
            1,
            0.9,
            0.9,
        )
        .unwrap();
        assert!(JumpAgent::with_genome(wide, &individual).is_err());
    }

    #[test]
    fn agent_decisions_follow_output_weights() {
        // Hidden weights of one make every hidden unit the
        // sum of the (positive) observation values.
        let mut genes = vec![1.0; 100];
        let mut output = vec![0.0; 20];
        for row in output.chunks_mut(2) {
            row[1] = 1.0;
        }
        genes.extend(output);
        let individual = Individual::from_genes(genes, 0).unwrap();
        let mut agent = JumpAgent::from_individual(&individual).unwrap();

        let player = obstacle(0.0, 100.0);
        let observation = Observation::from_scene(&player, &[obstacle(300.0, 100.0)]);
        assert_eq!(agent.decide(&observation).unwrap(), Action::Idle);

        let neutral = Observation([0.0; OBSERVATION_LEN]);
        assert_eq!(agent.decide(&neutral).unwrap(), Action::Jump);
    }
}
