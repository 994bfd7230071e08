//! # NeuroJump-NN
//! A neural network-based implementation of the `neurojump` crate's `Genome` trait.
//!
//! Provides:
//! - [`FeedForwardNetwork`]: a fixed-topology feedforward network running on
//!   externally supplied weights.
//! - [`Individual`]: a 120-gene genome encoding the weights of a `[10, 10, 2]`
//!   jump network, usable in `neurojump` `Population`s.
//! - [`Snapshot`]: a saved generation, used to seed a population.
//! - [`JumpAgent`]: a player deciding when to jump from what it observes.
//!
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//! [`Individual`]: crate::genomics::Individual
//! [`Snapshot`]: crate::genomics::Snapshot
//! [`JumpAgent`]: crate::agent::JumpAgent
//!
//! # Example usage: one generation of jump agents
//! ```
//! use neurojump::{EvolutionConfig, Population};
//! use neurojump_nn::{
//!     agent::{Bounds, JumpAgent, Observation},
//!     genomics::Individual,
//! };
//!
//! let mut rng = rand::thread_rng();
//! let mut population = Population::<Individual>::new(EvolutionConfig::default());
//!
//! let player = Bounds { x: -400.0, y: -300.0, width: 24.0, height: 24.0 };
//! let obstacle = Bounds { x: 0.0, y: -320.0, width: 40.0, height: 80.0 };
//! let observation = Observation::from_scene(&player, &[obstacle]);
//!
//! for _ in 0..EvolutionConfig::default().size.get() {
//!     let mut agent = JumpAgent::new(&mut rng).unwrap();
//!     // Score the agent somehow; here, by how often it jumps.
//!     let score = (0..10)
//!         .filter(|_| agent.decide(&observation).unwrap() == neurojump_nn::agent::Action::Jump)
//!         .count();
//!     population.add_member(&agent.weights(), score as u32).unwrap();
//! }
//!
//! let next = population.next_generation(&mut rng).unwrap();
//! assert_eq!(next.generation(), 2);
//! assert_eq!(next.len(), 100);
//! ```

pub mod agent;
pub mod genomics;
pub mod networks;
