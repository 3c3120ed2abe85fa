use serde::{Deserialize, Serialize};

use crate::core::{CountLimits, GridGeometry, StandingRunnerRule, Team, ZoneGrid, ZoneShares};

use super::pitch_target::PitchSeed;

/// Setup-time configuration of a game.
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration.
///
/// # Example
///
/// ```
/// use diamond_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "jitter": 0.2 }"#).unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.limits.max_half_innings, 18);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub zone: ZoneShares,
    pub geometry: GridGeometry,
    /// Fraction of a cell's half-extent used for in-cell jitter. Clamped to `[0, 1]`.
    pub jitter: f32,
    pub limits: CountLimits,
    pub standing_runner_rule: StandingRunnerRule,
    /// Away and home team display names.
    pub teams: [String; 2],
    pub seed: Option<PitchSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            zone: ZoneShares::default(),
            geometry: GridGeometry::default(),
            jitter: 0.6,
            limits: CountLimits::default(),
            standing_runner_rule: StandingRunnerRule::default(),
            teams: ["Away".to_owned(), "Home".to_owned()],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be a percentage in [0, 100], got {value}")]
    ShareOutOfRange { name: &'static str, value: f32 },
    #[display("{name} must be finite")]
    NonFinite { name: &'static str },
    #[display("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[display("{name} must be at least 1")]
    ZeroLimit { name: &'static str },
}

impl GameConfig {
    /// Checks value ranges.
    ///
    /// Shares that sum to zero are accepted; the zone grid recovers them
    /// with its uniform fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let shares = [
            ("zone.strike_share", self.zone.strike_share),
            ("zone.center_share", self.zone.center_share),
            ("zone.inner_ball_share", self.zone.inner_ball_share),
            ("zone.outer_ball_share", self.zone.outer_ball_share),
        ];
        for (name, value) in shares {
            finite(name, value)?;
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ShareOutOfRange { name, value });
            }
        }

        let center = self.geometry.center;
        for (name, value) in [
            ("geometry.center.x", center.x),
            ("geometry.center.y", center.y),
            ("geometry.center.z", center.z),
        ] {
            finite(name, value)?;
        }
        let size = self.geometry.cell_size;
        for (name, value) in [
            ("geometry.cell_size.width", size.width),
            ("geometry.cell_size.height", size.height),
            ("geometry.cell_size.depth", size.depth),
            ("geometry.spacing", self.geometry.spacing),
        ] {
            finite(name, value)?;
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        finite("jitter", self.jitter)?;

        let limits = self.limits;
        for (name, value) in [
            ("limits.max_balls", limits.max_balls),
            ("limits.max_strikes", limits.max_strikes),
            ("limits.max_outs", limits.max_outs),
            ("limits.max_half_innings", limits.max_half_innings),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { name });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn team_name(&self, team: Team) -> &str {
        &self.teams[team.index()]
    }

    #[must_use]
    pub fn zone_grid(&self) -> ZoneGrid {
        ZoneGrid::new(&self.geometry, &self.zone)
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_nested_json_keeps_other_defaults() {
        let config: GameConfig = serde_json::from_str(
            r#"{
                "zone": { "strike_share": 40 },
                "limits": { "max_half_innings": 2 },
                "standing_runner_rule": "AllowStanding",
                "teams": ["Hawks", "Tigers"],
                "seed": "0123456789abcdeffedcba9876543210"
            }"#,
        )
        .unwrap();
        assert!((config.zone.strike_share - 40.0).abs() < f32::EPSILON);
        assert!((config.zone.center_share - 30.0).abs() < f32::EPSILON);
        assert_eq!(config.limits.max_balls, 4);
        assert_eq!(config.limits.max_half_innings, 2);
        assert_eq!(
            config.standing_runner_rule,
            StandingRunnerRule::AllowStanding
        );
        assert_eq!(config.team_name(Team::Home), "Tigers");
        assert!(config.seed.is_some());
    }

    #[test]
    fn test_rejects_share_out_of_range() {
        let mut config = GameConfig::default();
        config.zone.strike_share = 120.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ShareOutOfRange {
                name: "zone.strike_share",
                value: 120.0
            })
        );
    }

    #[test]
    fn test_zero_shares_are_accepted() {
        let mut config = GameConfig::default();
        config.zone = ZoneShares {
            strike_share: 0.0,
            center_share: 0.0,
            inner_ball_share: 0.0,
            outer_ball_share: 0.0,
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_geometry_and_limits() {
        let mut config = GameConfig::default();
        config.geometry.spacing = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "geometry.spacing",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.jitter = f32::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "jitter" })
        );

        let mut config = GameConfig::default();
        config.limits.max_outs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLimit {
                name: "limits.max_outs"
            })
        );
    }
}
