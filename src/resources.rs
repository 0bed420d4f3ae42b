use std::path::{Path, PathBuf};
use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use thiserror::Error;

use crate::components::PursuerId;
use crate::maze::{AnchorRange, WallGenerator};

// ---------------------------------------------------------------------------
// Session config
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeSettings {
    pub width: usize,
    pub depth: usize,
    /// Inclusive bounds on the number of wall shapes placed.
    pub min_walls: u32,
    pub max_walls: u32,
    pub anchor: AnchorRange,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            width: 100,
            depth: 100,
            min_walls: 250,
            max_walls: 750,
            anchor: AnchorRange::Inclusive,
        }
    }
}

impl MazeSettings {
    pub fn wall_generator(&self) -> WallGenerator {
        WallGenerator {
            shape_count: self.min_walls..=self.max_walls,
            anchor: self.anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PursuerSettings {
    /// One pursuer is spawned per name.
    pub roster: Vec<String>,
    pub pursuit_radius: f32,
    pub capture_radius: f32,
    /// Ticks between target refreshes.
    pub refresh_interval: u64,
    pub speed_divisor: f32,
    pub sub_steps: u32,
    /// Preferred minimum spawn distance from the player.
    pub min_spawn_distance: f32,
}

impl Default for PursuerSettings {
    fn default() -> Self {
        Self {
            roster: ["cat", "christian", "eleanor", "will", "willi"]
                .into_iter()
                .map(String::from)
                .collect(),
            pursuit_radius: 30.0,
            capture_radius: 1.5,
            refresh_interval: 200,
            speed_divisor: 120.0,
            sub_steps: 10,
            min_spawn_distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerSettings {
    /// World units per tick.
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub max_stamina: f32,
    /// Stamina spent per sprinting tick.
    pub sprint_cost: f32,
    /// Stamina regained each second.
    pub stamina_regen: f32,
    pub eye_height: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            walk_speed: 0.05,
            sprint_speed: 0.15,
            max_stamina: 100.0,
            sprint_cost: 1.0,
            stamina_regen: 1.0,
            eye_height: 1.5,
        }
    }
}

/// Tunables for one hunt. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Resource, Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub maze: MazeSettings,
    pub pursuers: PursuerSettings,
    pub player: PlayerSettings,
    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        let maze = &self.maze;
        if maze.width == 0 || maze.depth == 0 {
            return invalid("maze dimensions must be non-zero");
        }
        if maze.min_walls > maze.max_walls {
            return invalid("min_walls exceeds max_walls");
        }
        let p = &self.pursuers;
        if p.pursuit_radius <= 0.0 || p.capture_radius <= 0.0 {
            return invalid("pursuit and capture radii must be positive");
        }
        if p.refresh_interval == 0 || p.sub_steps == 0 {
            return invalid("refresh_interval and sub_steps must be non-zero");
        }
        if p.speed_divisor <= 0.0 {
            return invalid("speed_divisor must be positive");
        }
        let pl = &self.player;
        if pl.walk_speed <= 0.0 || pl.sprint_speed <= 0.0 {
            return invalid("player speeds must be positive");
        }
        if pl.max_stamina < 0.0 || pl.sprint_cost < 0.0 || pl.stamina_regen < 0.0 {
            return invalid("stamina values must not be negative");
        }
        Ok(())
    }

    /// Validate, falling back to the defaults (seed kept) when invalid.
    pub fn sanitize(&mut self) -> Result<(), ConfigError> {
        let result = self.validate();
        if result.is_err() {
            *self = SessionConfig {
                seed: self.seed,
                ..Default::default()
            };
        }
        result
    }

    /// RNG for maze generation and wander targets.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-session state
// ---------------------------------------------------------------------------

/// Shared randomness for the hunt: wall layout, spawns and wander targets.
#[derive(Resource, Debug)]
pub struct MazeRng(pub StdRng);

/// Simulation ticks elapsed in the current hunt.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTick(pub u64);

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SurvivalClock {
    pub elapsed: Duration,
}

impl SurvivalClock {
    /// `MM:SS`, minutes not capped at 59.
    pub fn display(&self) -> String {
        format_mm_ss(self.elapsed)
    }
}

pub fn format_mm_ss(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Who ended the hunt and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub pursuer: PursuerId,
    pub name: String,
    pub tick: u64,
    pub survived: Duration,
}

/// One-way game-over latch. Once set it stays set for the rest of the hunt.
#[derive(Resource, Debug, Default)]
pub struct CaptureLatch(Option<CaptureReport>);

impl CaptureLatch {
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn report(&self) -> Option<&CaptureReport> {
        self.0.as_ref()
    }

    /// Returns false, leaving the first report in place, if already set.
    pub fn set(&mut self, report: CaptureReport) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(report);
        true
    }
}

/// Run condition: the hunt is still live.
pub fn hunt_active(latch: Option<Res<CaptureLatch>>) -> bool {
    latch.is_some_and(|l| !l.is_set())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_falls_back_to_defaults_keeping_seed() {
        let mut cfg = SessionConfig {
            seed: Some(99),
            ..Default::default()
        };
        cfg.pursuers.refresh_interval = 0;
        cfg.pursuers.speed_divisor = 0.0;
        assert!(matches!(cfg.sanitize(), Err(ConfigError::Invalid(_))));
        assert_eq!(
            cfg,
            SessionConfig {
                seed: Some(99),
                ..Default::default()
            }
        );

        let mut valid = SessionConfig::default();
        valid.maze.width = 12;
        assert!(valid.sanitize().is_ok());
        assert_eq!(valid.maze.width, 12);
    }

    #[test]
    fn defaults_match_classic_game() {
        let cfg = SessionConfig::default();
        assert_eq!((cfg.maze.width, cfg.maze.depth), (100, 100));
        assert_eq!(cfg.maze.wall_generator().shape_count, 250..=750);
        assert_eq!(cfg.pursuers.roster.len(), 5);
        assert_eq!(cfg.pursuers.refresh_interval, 200);
        assert!((cfg.pursuers.capture_radius - 1.5).abs() < f32::EPSILON);
        assert!((cfg.player.sprint_speed - 0.15).abs() < f32::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = SessionConfig::from_json_str(
            r#"{ "seed": 7, "maze": { "width": 20, "anchor": "exclusive" },
                 "pursuers": { "refresh_interval": 10, "capture_radius": 1.3 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.maze.width, 20);
        assert_eq!(cfg.maze.depth, 100);
        assert_eq!(cfg.maze.anchor, AnchorRange::Exclusive);
        assert_eq!(cfg.pursuers.refresh_interval, 10);
        assert_eq!(cfg.pursuers.roster.len(), 5);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "mazes": {} }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "maze": { "min_walls": 9, "max_walls": 3 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "pursuers": { "sub_steps": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "maze": { "depth": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::load(Path::new("/nonexistent/oohoos.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("oohoos.json"));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let cfg = SessionConfig {
            seed: Some(42),
            ..Default::default()
        };
        let a: u64 = cfg.rng().gen_range(0..u64::MAX);
        let b: u64 = cfg.rng().gen_range(0..u64::MAX);
        assert_eq!(a, b);
    }

    #[test]
    fn survival_clock_formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mm_ss(Duration::from_millis(65_900)), "01:05");
        assert_eq!(format_mm_ss(Duration::from_secs(3600 + 2)), "60:02");
    }

    #[test]
    fn latch_keeps_first_capture() {
        let mut latch = CaptureLatch::default();
        assert!(!latch.is_set());
        let first = CaptureReport {
            pursuer: PursuerId(2),
            name: "eleanor".into(),
            tick: 10,
            survived: Duration::from_secs(3),
        };
        assert!(latch.set(first.clone()));
        assert!(!latch.set(CaptureReport {
            pursuer: PursuerId(0),
            ..first.clone()
        }));
        assert_eq!(latch.report(), Some(&first));
    }
}
