//! Per-frame simulation step and the frame driver
//!
//! One animation frame advances every live ball once, removes escapees and
//! spawns their replacements. The driver decides whether another frame gets
//! scheduled; the host (requestAnimationFrame on the web, a plain loop
//! natively) only asks it.

use super::collision::{BallEvent, advance};
use super::state::SimState;
use crate::consts::*;

/// Receiver for the bounce cue
///
/// Called synchronously on every wall bounce, never on escapes.
pub trait BounceSink {
    fn play_bounce(&mut self);
}

/// No audio attached
impl BounceSink for () {
    fn play_bounce(&mut self) {}
}

/// Optional collaborator: `None` silently skips the cue
impl<S: BounceSink> BounceSink for Option<S> {
    fn play_bounce(&mut self) {
        if let Some(sink) = self {
            sink.play_bounce();
        }
    }
}

impl<S: BounceSink + ?Sized> BounceSink for &mut S {
    fn play_bounce(&mut self) {
        (**self).play_bounce();
    }
}

/// Summary of one frame step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Balls that left through the opening
    pub escaped: usize,
    /// Replacement balls actually added
    pub spawned: usize,
    /// Replacement requests dropped at the population cap
    pub dropped: usize,
    /// Wall bounces (cues played)
    pub bounces: usize,
    /// Live balls after the step
    pub population: usize,
}

/// Advance the whole simulation by one frame
pub fn run_frame_step(state: &mut SimState, sink: &mut impl BounceSink) -> FrameReport {
    let mut report = FrameReport::default();
    let mut to_spawn = 0;

    // Reverse order so removal doesn't disturb unvisited indices
    for i in (0..state.balls.len()).rev() {
        match advance(&mut state.balls[i], &state.boundary, GRAVITY) {
            BallEvent::None => {}
            BallEvent::Bounce => {
                report.bounces += 1;
                sink.play_bounce();
            }
            BallEvent::Escape => {
                state.balls.remove(i);
                report.escaped += 1;
                to_spawn += SPAWNS_PER_ESCAPE;
            }
        }
    }

    for _ in 0..to_spawn {
        if state.balls.len() >= MAX_BALLS {
            break;
        }
        state.spawn_ball();
        report.spawned += 1;
    }
    report.dropped = to_spawn - report.spawned;
    report.population = state.balls.len();

    if report.escaped > 0 {
        log::debug!(
            "{} escaped, {} spawned, {} dropped, population {}",
            report.escaped,
            report.spawned,
            report.dropped,
            report.population
        );
    }

    report
}

/// Frame driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No further frames get scheduled
    Stopped,
    /// Each frame schedules exactly one successor
    #[default]
    Running,
}

/// A running animation: simulation plus the frame chain bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    pub sim: SimState,
    driver: DriverState,
    /// A frame is scheduled or executing
    chain_active: bool,
    /// Frames completed since the session was created
    pub frame_count: u64,
}

impl Session {
    /// Start a session; it is Running and expects the host to kick the first frame
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        log::info!("Session starting (seed {}, {}x{})", seed, width, height);
        Self {
            sim: SimState::new(seed, width, height),
            driver: DriverState::Running,
            chain_active: true,
            frame_count: 0,
        }
    }

    pub fn driver_state(&self) -> DriverState {
        self.driver
    }

    pub fn is_running(&self) -> bool {
        self.driver == DriverState::Running
    }

    /// Whether a frame is currently scheduled or executing
    pub fn chain_active(&self) -> bool {
        self.chain_active
    }

    /// Run one frame step
    ///
    /// Returns the step report and whether the host should schedule the next
    /// frame. A step always runs to completion, even if `stop` was requested.
    pub fn frame(&mut self, sink: &mut impl BounceSink) -> (FrameReport, bool) {
        let report = run_frame_step(&mut self.sim, sink);
        self.frame_count += 1;
        let schedule_next = self.driver == DriverState::Running;
        self.chain_active = schedule_next;
        (report, schedule_next)
    }

    /// Request the driver to stop after the current frame
    pub fn stop(&mut self) {
        if self.driver == DriverState::Running {
            log::info!("Session stopping after frame {}", self.frame_count);
        }
        self.driver = DriverState::Stopped;
    }

    /// Clear the balls, reseed one at the center and make sure the driver runs
    ///
    /// Returns true when no frame chain is active and the host must start one.
    pub fn restart(&mut self) -> bool {
        self.sim.reseed();
        self.driver = DriverState::Running;
        log::info!(
            "Session restarted at frame {} (seed {})",
            self.frame_count,
            self.sim.seed
        );

        if self.chain_active {
            false
        } else {
            self.chain_active = true;
            true
        }
    }

    /// Recompute boundary geometry for a new surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.sim.resize(width, height);
        log::info!("Boundary resized for {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::sim::state::{Ball, BallColor};
    use glam::Vec2;
    use proptest::prelude::*;

    #[derive(Default)]
    struct CountingSink {
        bounces: usize,
    }

    impl BounceSink for CountingSink {
        fn play_bounce(&mut self) {
            self.bounces += 1;
        }
    }

    /// A ball placed so that it escapes on the next step
    fn escaping_ball(state: &SimState) -> Ball {
        let boundary = &state.boundary;
        let opening = boundary.opening;
        let mid = opening.theta_start + opening.width / 2.0;
        let pos = boundary.center + polar_to_cartesian(boundary.inner_limit(BALL_RADIUS), mid);
        Ball::new(pos, polar_to_cartesian(10.0, mid), BallColor::Rose)
    }

    /// A motionless ball at the center that won't touch anything this step
    fn idle_ball(state: &SimState) -> Ball {
        Ball::new(state.boundary.center, Vec2::ZERO, BallColor::Mint)
    }

    #[test]
    fn test_escape_spawns_two() {
        let mut state = SimState::new(1, 800.0, 800.0);
        state.balls.clear();
        let ball = escaping_ball(&state);
        state.balls.push(ball);

        let report = run_frame_step(&mut state, &mut ());
        assert_eq!(report.escaped, 1);
        assert_eq!(report.spawned, 2);
        assert_eq!(report.dropped, 0);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_replacements_are_not_advanced_in_spawn_frame() {
        let mut state = SimState::new(11, 800.0, 800.0);
        state.balls.clear();
        let ball = idle_ball(&state);
        state.balls.push(ball);
        let ball = escaping_ball(&state);
        state.balls.push(ball);

        run_frame_step(&mut state, &mut ());
        assert_eq!(state.balls.len(), 3);
        // The survivor moved once; the two newcomers haven't moved yet
        assert_eq!(state.balls[0].trail.len(), 1);
        assert!(state.balls[1..].iter().all(|b| b.trail.is_empty()));
    }

    #[test]
    fn test_one_escape_from_95_fills_to_cap() {
        let mut state = SimState::new(2, 800.0, 800.0);
        state.balls.clear();
        for _ in 0..94 {
            let ball = idle_ball(&state);
            state.balls.push(ball);
        }
        let ball = escaping_ball(&state);
        state.balls.push(ball);
        assert_eq!(state.balls.len(), 95);

        let report = run_frame_step(&mut state, &mut ());
        assert_eq!(report.escaped, 1);
        assert_eq!(state.balls.len(), MAX_BALLS);
    }

    #[test]
    fn test_cap_truncates_replacements() {
        let mut state = SimState::new(12, 800.0, 800.0);
        state.balls.clear();
        for _ in 0..MAX_BALLS - 1 {
            let ball = idle_ball(&state);
            state.balls.push(ball);
        }
        let ball = escaping_ball(&state);
        state.balls.push(ball);

        let report = run_frame_step(&mut state, &mut ());
        assert_eq!(report.escaped, 1);
        assert_eq!(report.spawned, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(state.balls.len(), MAX_BALLS);
    }

    #[test]
    fn test_full_population_drops_all_replacements() {
        let mut state = SimState::new(3, 800.0, 800.0);
        state.balls.clear();
        for _ in 0..MAX_BALLS - 2 {
            let ball = idle_ball(&state);
            state.balls.push(ball);
        }
        for _ in 0..2 {
            let ball = escaping_ball(&state);
            state.balls.push(ball);
        }

        let report = run_frame_step(&mut state, &mut ());
        assert_eq!(report.escaped, 2);
        assert_eq!(report.spawned, 2);
        assert_eq!(report.dropped, 2);
        assert_eq!(state.balls.len(), MAX_BALLS);
    }

    #[test]
    fn test_surviving_balls_keep_insertion_order() {
        let mut state = SimState::new(4, 800.0, 800.0);
        state.balls.clear();
        let colors = [BallColor::Lime, BallColor::Rose, BallColor::Gold];
        for color in colors {
            let mut ball = idle_ball(&state);
            ball.color = color;
            state.balls.push(ball);
        }
        let ball = escaping_ball(&state);
        state.balls.insert(1, ball);

        run_frame_step(&mut state, &mut ());
        let survivors: Vec<BallColor> = state.balls.iter().take(3).map(|b| b.color).collect();
        assert_eq!(survivors, colors);
    }

    #[test]
    fn test_bounces_reach_sink() {
        let mut state = SimState::new(5, 800.0, 800.0);
        state.balls.clear();
        let boundary = state.boundary;
        // Head straight down into the solid wall
        let pos = boundary.center + Vec2::new(0.0, boundary.inner_limit(BALL_RADIUS) - 1.0);
        state.balls.push(Ball::new(pos, Vec2::new(0.0, 5.0), BallColor::Azure));

        let mut sink = CountingSink::default();
        let report = run_frame_step(&mut state, &mut sink);
        assert_eq!(report.bounces, 1);
        assert_eq!(sink.bounces, 1);
        assert_eq!(report.escaped, 0);
    }

    #[test]
    fn test_missing_sink_is_tolerated() {
        let mut state = SimState::new(6, 800.0, 800.0);
        let mut sink: Option<CountingSink> = None;
        for _ in 0..500 {
            run_frame_step(&mut state, &mut sink);
        }
        assert!(state.balls.len() <= MAX_BALLS);
    }

    #[test]
    fn test_empty_collection_stays_empty() {
        let mut state = SimState::new(7, 800.0, 800.0);
        state.balls.clear();
        let report = run_frame_step(&mut state, &mut ());
        assert_eq!(report, FrameReport::default());
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_session_starts_running() {
        let session = Session::new(8, 800.0, 800.0);
        assert_eq!(session.driver_state(), DriverState::Running);
        assert!(session.chain_active());
        assert_eq!(session.sim.balls.len(), 1);
    }

    #[test]
    fn test_stop_finishes_frame_then_ends_chain() {
        let mut session = Session::new(9, 800.0, 800.0);
        let (_, next) = session.frame(&mut ());
        assert!(next);

        session.stop();
        assert_eq!(session.driver_state(), DriverState::Stopped);
        let (report, next) = session.frame(&mut ());
        assert!(!next);
        assert_eq!(report.population, session.sim.balls.len());
        assert_eq!(session.frame_count, 2);
        assert!(!session.chain_active());
    }

    #[test]
    fn test_restart_reseeds_and_kicks_only_when_idle() {
        let mut session = Session::new(10, 800.0, 800.0);
        for _ in 0..50 {
            session.sim.spawn_ball();
        }

        // Chain still active: no second chain
        assert!(!session.restart());
        assert_eq!(session.sim.balls.len(), 1);
        assert_eq!(session.sim.balls[0].pos, session.sim.boundary.center);
        assert_eq!(session.sim.balls[0].color, BallColor::Cyan);

        session.stop();
        let (_, next) = session.frame(&mut ());
        assert!(!next);

        // Chain ended: restart must start it again
        assert!(session.restart());
        assert!(session.is_running());
        assert!(!session.restart());
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut session = Session::new(11, 640.0, 480.0);
        for _ in 0..5 {
            session.restart();
            assert_eq!(session.sim.balls.len(), 1);
            assert_eq!(session.sim.balls[0].pos, session.sim.boundary.center);
            assert!((session.sim.balls[0].vel.length() - RESTART_SPEED).abs() < 1e-4);
        }
    }

    proptest! {
        #[test]
        fn prop_population_within_cap(seed in 0u64..10_000, frames in 1usize..400) {
            let mut state = SimState::new(seed, 800.0, 800.0);
            for _ in 0..frames {
                let report = run_frame_step(&mut state, &mut ());
                prop_assert!(state.balls.len() <= MAX_BALLS);
                prop_assert_eq!(report.population, state.balls.len());
                prop_assert_eq!(report.spawned + report.dropped, report.escaped * SPAWNS_PER_ESCAPE);
            }
        }
    }
}
