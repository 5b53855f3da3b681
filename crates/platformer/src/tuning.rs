use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub const TUNING_ENV_VAR: &str = "PLATFORMER_TUNING";

/// Fixed tuning parameters for the simulation. Distances are in pixels,
/// speeds in pixels per second, durations in seconds; +y points down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub max_step_seconds: f32,
    pub gravity: f32,
    pub move_acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub friction_stop_speed: f32,
    pub jump_velocity: f32,
    pub viewport_margin: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_spawn_x: f32,
    pub ground_height: f32,

    pub box_hits_required: u32,
    pub box_size: f32,
    pub box_bounce_seconds: f32,
    pub box_bounce_height: f32,
    pub box_hit_score: u32,

    pub loot_size: f32,
    pub loot_spawn_lift: f32,
    pub loot_spread_speed: f32,
    pub loot_launch_speed: f32,
    pub loot_settle_seconds: f32,
    pub loot_score: u32,

    pub companion_trigger_loot: u32,
    pub companion_spawn_y: f32,
    pub companion_speed: f32,
    pub companion_jump: f32,
    pub companion_follow_deadband: f32,
    pub companion_climb_gap: f32,
    pub companion_climb_boost: f32,
    pub companion_high_climb_gap: f32,
    pub companion_high_climb_boost: f32,
    pub companion_climb_window: f32,
    pub companion_stuck_gap: f32,
    pub companion_stuck_seconds: f32,
    pub companion_rescue_distance: f32,
    pub companion_rescue_offset_x: f32,
    pub companion_rescue_lift: f32,

    pub close_distance: f32,
    pub settled_speed: f32,
    pub dialogue_close_seconds: f32,
    pub dialogue_seconds: f32,
    pub scroll_close_seconds: f32,
    pub scroll_size: f32,
    pub scroll_drop_height: f32,

    pub pets_per_player: u32,
    pub pets_per_companion: u32,
    pub pet_width: f32,
    pub pet_height: f32,
    pub pet_speed: f32,
    pub pet_follow_deadband: f32,
    pub pet_trail_offset: f32,
    pub pet_owner_loot_radius: f32,
    pub pet_seek_radius: f32,
    pub pet_jump: f32,
    pub pet_owner_climb_gap: f32,
    pub pet_owner_climb_window: f32,
    pub pet_loot_climb_gap: f32,
    pub pet_loot_climb_window: f32,

    pub softening_passes: u32,
    pub softening_max_push: f32,
    pub softening_vertical_bias: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_step_seconds: 1.0 / 30.0,
            gravity: 2200.0,
            move_acceleration: 4200.0,
            max_speed: 420.0,
            friction: 0.86,
            friction_stop_speed: 8.0,
            jump_velocity: 900.0,
            viewport_margin: 10.0,

            player_width: 50.0,
            player_height: 60.0,
            player_spawn_x: 120.0,
            ground_height: 110.0,

            box_hits_required: 3,
            box_size: 52.0,
            box_bounce_seconds: 0.14,
            box_bounce_height: 8.0,
            box_hit_score: 10,

            loot_size: 20.0,
            loot_spawn_lift: 6.0,
            loot_spread_speed: 60.0,
            loot_launch_speed: 520.0,
            loot_settle_seconds: 0.18,
            loot_score: 25,

            companion_trigger_loot: 9,
            companion_spawn_y: -200.0,
            companion_speed: 260.0,
            companion_jump: 900.0,
            companion_follow_deadband: 50.0,
            companion_climb_gap: 25.0,
            companion_climb_boost: 1.2,
            companion_high_climb_gap: 160.0,
            companion_high_climb_boost: 1.35,
            companion_climb_window: 320.0,
            companion_stuck_gap: 180.0,
            companion_stuck_seconds: 1.2,
            companion_rescue_distance: 450.0,
            companion_rescue_offset_x: 80.0,
            companion_rescue_lift: 120.0,

            close_distance: 90.0,
            settled_speed: 5.0,
            dialogue_close_seconds: 3.0,
            dialogue_seconds: 1.0,
            scroll_close_seconds: 10.0,
            scroll_size: 24.0,
            scroll_drop_height: 220.0,

            pets_per_player: 1,
            pets_per_companion: 1,
            pet_width: 28.0,
            pet_height: 24.0,
            pet_speed: 300.0,
            pet_follow_deadband: 24.0,
            pet_trail_offset: 56.0,
            pet_owner_loot_radius: 260.0,
            pet_seek_radius: 180.0,
            pet_jump: 820.0,
            pet_owner_climb_gap: 40.0,
            pet_owner_climb_window: 160.0,
            pet_loot_climb_gap: 30.0,
            pet_loot_climb_window: 90.0,

            softening_passes: 2,
            softening_max_push: 4.0,
            softening_vertical_bias: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning json at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value for {field}: expected {expected}, got {actual}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
        actual: f32,
    },
}

impl Tuning {
    /// Defaults, overridden by the JSON file named in `PLATFORMER_TUNING` if set.
    pub fn from_env() -> Result<Self, TuningError> {
        match env::var_os(TUNING_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let tuning = Self::from_path(&path)?;
                info!(path = %path.display(), "tuning_loaded");
                Ok(tuning)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, TuningError> {
        let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let tuning: Tuning = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| {
                let location = error.path().to_string();
                TuningError::Parse {
                    location: if location.is_empty() {
                        ".".to_string()
                    } else {
                        location
                    },
                    source: error.into_inner(),
                }
            },
        )?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("max_step_seconds", self.max_step_seconds),
            ("gravity", self.gravity),
            ("move_acceleration", self.move_acceleration),
            ("max_speed", self.max_speed),
            ("jump_velocity", self.jump_velocity),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("ground_height", self.ground_height),
            ("box_size", self.box_size),
            ("box_bounce_seconds", self.box_bounce_seconds),
            ("loot_size", self.loot_size),
            ("companion_speed", self.companion_speed),
            ("companion_stuck_seconds", self.companion_stuck_seconds),
            ("dialogue_close_seconds", self.dialogue_close_seconds),
            ("dialogue_seconds", self.dialogue_seconds),
            ("scroll_close_seconds", self.scroll_close_seconds),
            ("scroll_size", self.scroll_size),
            ("pet_width", self.pet_width),
            ("pet_height", self.pet_height),
            ("pet_speed", self.pet_speed),
            ("softening_max_push", self.softening_max_push),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    expected: "finite number > 0",
                    actual: value,
                });
            }
        }

        let non_negative = [
            ("friction_stop_speed", self.friction_stop_speed),
            ("viewport_margin", self.viewport_margin),
            ("player_spawn_x", self.player_spawn_x),
            ("box_bounce_height", self.box_bounce_height),
            ("loot_spawn_lift", self.loot_spawn_lift),
            ("loot_spread_speed", self.loot_spread_speed),
            ("loot_launch_speed", self.loot_launch_speed),
            ("loot_settle_seconds", self.loot_settle_seconds),
            ("companion_jump", self.companion_jump),
            ("companion_follow_deadband", self.companion_follow_deadband),
            ("companion_climb_gap", self.companion_climb_gap),
            ("companion_climb_boost", self.companion_climb_boost),
            ("companion_high_climb_gap", self.companion_high_climb_gap),
            ("companion_high_climb_boost", self.companion_high_climb_boost),
            ("companion_climb_window", self.companion_climb_window),
            ("companion_stuck_gap", self.companion_stuck_gap),
            ("companion_rescue_distance", self.companion_rescue_distance),
            ("companion_rescue_offset_x", self.companion_rescue_offset_x),
            ("companion_rescue_lift", self.companion_rescue_lift),
            ("close_distance", self.close_distance),
            ("settled_speed", self.settled_speed),
            ("scroll_drop_height", self.scroll_drop_height),
            ("pet_follow_deadband", self.pet_follow_deadband),
            ("pet_trail_offset", self.pet_trail_offset),
            ("pet_owner_loot_radius", self.pet_owner_loot_radius),
            ("pet_seek_radius", self.pet_seek_radius),
            ("pet_jump", self.pet_jump),
            ("pet_owner_climb_gap", self.pet_owner_climb_gap),
            ("pet_owner_climb_window", self.pet_owner_climb_window),
            ("pet_loot_climb_gap", self.pet_loot_climb_gap),
            ("pet_loot_climb_window", self.pet_loot_climb_window),
            ("softening_vertical_bias", self.softening_vertical_bias),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    expected: "finite number >= 0",
                    actual: value,
                });
            }
        }

        if !self.friction.is_finite() || !(0.0..=1.0).contains(&self.friction) {
            return Err(TuningError::Invalid {
                field: "friction",
                expected: "number in 0..=1",
                actual: self.friction,
            });
        }
        if !self.companion_spawn_y.is_finite() {
            return Err(TuningError::Invalid {
                field: "companion_spawn_y",
                expected: "finite number",
                actual: self.companion_spawn_y,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_pass_validation() {
        Tuning::default().validate().expect("defaults valid");
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let tuning = Tuning::from_json_str(r#"{ "gravity": 1800.0, "box_hits_required": 5 }"#)
            .expect("parse");
        assert_eq!(tuning.gravity, 1800.0);
        assert_eq!(tuning.box_hits_required, 5);
        assert_eq!(tuning.max_speed, Tuning::default().max_speed);
    }

    #[test]
    fn parse_error_reports_field_path() {
        let error = Tuning::from_json_str(r#"{ "pet_speed": "fast" }"#).expect_err("bad type");
        match error {
            TuningError::Parse { location, .. } => assert_eq!(location, "pet_speed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = Tuning::from_json_str(r#"{ "gravityy": 10.0 }"#).expect_err("unknown");
        assert!(matches!(error, TuningError::Parse { .. }));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let error = Tuning::from_json_str(r#"{ "player_width": 0.0 }"#).expect_err("invalid");
        match error {
            TuningError::Invalid { field, .. } => assert_eq!(field, "player_width"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn friction_outside_unit_range_is_rejected() {
        let tuning = Tuning {
            friction: 1.5,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "friction",
                ..
            })
        ));
    }

    #[test]
    fn loads_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "companion_trigger_loot": 4 }}"#).expect("write");
        let tuning = Tuning::from_path(file.path()).expect("load");
        assert_eq!(tuning.companion_trigger_loot, 4);
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = Tuning::from_path(&dir.path().join("missing.json")).expect_err("missing");
        assert!(matches!(error, TuningError::Read { .. }));
    }
}
