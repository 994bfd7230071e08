//! A headless side-scroller for agents to be scored on.
//!
//! The player stands still horizontally while obstacles scroll
//! towards it: buildings standing on the ground and planes
//! flying above it. Each obstacle that scrolls off screen scores
//! a point; touching one, or flying off the top of the screen,
//! ends the run.
use neurojump::Fitness;
use neurojump_nn::agent::{Action, Bounds, JumpAgent, Observation};
use neurojump_nn::networks::NetworkError;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const SCREEN_WIDTH: f32 = 1024.0;
pub const SCREEN_HEIGHT: f32 = 768.0;
/// Height of the ground's top edge.
const GROUND: f32 = -SCREEN_HEIGHT / 2.0 + 20.0;
const PLAYER_X: f32 = -(SCREEN_WIDTH / 2.0 - 100.0);
const PLAYER_SIZE: f32 = 24.0;
/// Downward acceleration, in pixels per frame².
const GRAVITY: f32 = 0.5;
/// Upward speed gained by jumping, in pixels per frame.
const JUMP_SPEED: f32 = 9.0;
/// Leftward obstacle speed, in pixels per frame.
const SCROLL_SPEED: f32 = 6.0;
/// Frames between two obstacle-spawning attempts.
const SPAWN_INTERVAL: usize = 30;
/// Building sizes, one per texture.
const BUILDINGS: [(f32, f32); 3] = [(64.0, 96.0), (52.0, 70.0), (52.0, 48.0)];
const PLANE: (f32, f32) = (90.0, 30.0);

/// One run of the game.
#[derive(Clone, Debug)]
pub struct Course {
    rng: ChaCha8Rng,
    player: Bounds,
    velocity: f32,
    /// On-screen obstacles, oldest first.
    obstacles: Vec<Bounds>,
    frame: usize,
    score: Fitness,
    can_spawn: bool,
    crashed: bool,
}

impl Course {
    /// Creates a course whose obstacle sequence
    /// is fully determined by `seed`.
    pub fn new(seed: u64) -> Course {
        Course {
            rng: ChaCha8Rng::seed_from_u64(seed),
            player: Bounds {
                x: PLAYER_X,
                y: GROUND + PLAYER_SIZE / 2.0,
                width: PLAYER_SIZE,
                height: PLAYER_SIZE,
            },
            velocity: 0.0,
            obstacles: vec![],
            frame: 0,
            score: 0,
            can_spawn: true,
            crashed: false,
        }
    }

    /// What the player sees of the course.
    pub fn observe(&self) -> Observation {
        Observation::from_scene(&self.player, &self.obstacles)
    }

    /// Advances the course by a frame. Returns
    /// whether the player is still alive.
    pub fn step(&mut self, action: Action) -> bool {
        if self.crashed {
            return false;
        }
        if action == Action::Jump {
            // Jumps cancel any fall, even mid-air.
            self.velocity = self.velocity.max(0.0) + JUMP_SPEED;
        }
        self.velocity -= GRAVITY;
        self.player.y += self.velocity;
        let rest = GROUND + PLAYER_SIZE / 2.0;
        if self.player.y <= rest {
            self.player.y = rest;
            self.velocity = 0.0;
        }

        if self.frame % SPAWN_INTERVAL == 0 {
            self.try_spawn();
        }
        self.frame += 1;

        for obstacle in &mut self.obstacles {
            obstacle.x -= SCROLL_SPEED;
        }
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right() >= -SCREEN_WIDTH / 2.0);
        self.score += (before - self.obstacles.len()) as Fitness;

        self.crashed = self.player.lower() > SCREEN_HEIGHT / 2.0
            || self.obstacles.iter().any(|o| overlaps(&self.player, o));
        !self.crashed
    }

    /// Spawns an obstacle one attempt in three, never
    /// on two attempts in a row.
    fn try_spawn(&mut self) {
        if !self.can_spawn {
            self.can_spawn = true;
            return;
        }
        if self.rng.gen_range(0..3) != 0 {
            return;
        }
        self.can_spawn = false;

        let obstacle = if self.rng.gen::<bool>() {
            let (width, height) = BUILDINGS[self.rng.gen_range(0..BUILDINGS.len())];
            Bounds {
                x: SCREEN_WIDTH / 2.0 + width / 2.0,
                y: GROUND + height / 2.0,
                width,
                height,
            }
        } else {
            let (width, height) = PLANE;
            Bounds {
                x: SCREEN_WIDTH / 2.0 + 100.0,
                y: self.rng.gen_range(-100.0..=10.0),
                width,
                height,
            }
        };
        self.obstacles.push(obstacle);
    }

    pub fn score(&self) -> Fitness {
        self.score
    }

    pub fn frame(&self) -> usize {
        self.frame
    }
}

fn overlaps(a: &Bounds, b: &Bounds) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.lower() < b.upper() && b.lower() < a.upper()
}

/// Lets `agent` play a course until it crashes, its score
/// exceeds `max_score`, or `max_steps` frames have passed.
/// Returns the score reached.
pub fn play(
    agent: &mut JumpAgent,
    seed: u64,
    max_score: Fitness,
    max_steps: usize,
) -> Result<Fitness, NetworkError> {
    let mut course = Course::new(seed);
    while course.frame() < max_steps && course.score() <= max_score {
        let action = agent.decide(&course.observe())?;
        if !course.step(action) {
            break;
        }
    }
    Ok(course.score())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs a course with a fixed policy.
    fn run(seed: u64, mut policy: impl FnMut(&Course) -> Action, max_steps: usize) -> Course {
        let mut course = Course::new(seed);
        while course.frame() < max_steps {
            let action = policy(&course);
            if !course.step(action) {
                break;
            }
        }
        course
    }

    #[test]
    fn player_rests_on_ground() {
        let course = run(0, |_| Action::Idle, 10);
        assert_eq!(course.player.lower(), GROUND);
        assert_eq!(course.velocity, 0.0);
    }

    #[test]
    fn jumping_lifts_player() {
        let mut course = Course::new(0);
        course.step(Action::Jump);
        assert!(course.player.lower() > GROUND);
        let height = course.player.y;
        course.step(Action::Idle);
        assert!(course.player.y > height);
    }

    #[test]
    fn constant_jumping_leaves_the_screen() {
        let course = run(3, |_| Action::Jump, 10_000);
        assert!(course.crashed);
        assert!(course.player.lower() > SCREEN_HEIGHT / 2.0 || !course.obstacles.is_empty());
    }

    #[test]
    fn idle_player_eventually_crashes() {
        let course = run(11, |_| Action::Idle, 10_000);
        assert!(course.crashed);
        assert!(course.frame() < 10_000);
    }

    #[test]
    fn obstacle_sequence_depends_only_on_seed() {
        let idle = run(42, |_| Action::Idle, 100);
        let hop = run(42, |c| if c.frame() == 0 { Action::Jump } else { Action::Idle }, 100);
        assert_eq!(idle.frame(), 100);
        assert_eq!(hop.frame(), 100);
        assert_eq!(idle.obstacles, hop.obstacles);
    }

    #[test]
    fn spawns_never_on_consecutive_attempts() {
        let mut course = Course::new(5);
        let mut previous = false;
        for _ in 0..300 {
            let before = course.obstacles.len();
            course.try_spawn();
            let spawned = course.obstacles.len() > before;
            assert!(!(previous && spawned));
            previous = spawned;
        }
    }

    #[test]
    fn passing_obstacles_scores() {
        let mut course = Course::new(0);
        course.obstacles.push(Bounds {
            x: -SCREEN_WIDTH / 2.0 - 20.0,
            y: 300.0,
            width: 30.0,
            height: 10.0,
        });
        // Avoid the spawn attempt of frame 0.
        course.can_spawn = false;
        assert!(course.step(Action::Idle));
        assert_eq!(course.score(), 1);
        assert!(course.obstacles.is_empty());
    }

    #[test]
    fn play_stops_at_step_limit() {
        let mut agent = JumpAgent::new(&mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let score = play(&mut agent, 1, 95, 0).unwrap();
        assert_eq!(score, 0);
    }
}
