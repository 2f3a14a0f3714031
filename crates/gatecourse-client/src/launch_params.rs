//! Launch parameter parsing for the game.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;
use gatecourse::VehicleTuning;

/// Default vehicle model, relative to the asset folder.
const DEFAULT_VEHICLE_MODEL: &str = "models/car.glb";

/// Launch parameters for the game.
#[derive(Resource, Debug, Clone)]
pub struct LaunchParams {
    /// Start with collider gizmos visible.
    pub physics_debug: bool,
    /// Vehicle handling, after any command-line overrides.
    pub tuning: VehicleTuning,
    /// glTF file used for the car.
    pub vehicle_model: String,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            physics_debug: false,
            tuning: VehicleTuning::default(),
            vehicle_model: DEFAULT_VEHICLE_MODEL.to_string(),
        }
    }
}

#[cfg_attr(target_family = "wasm", allow(dead_code))]
impl LaunchParams {
    /// Apply a top speed override, keeping the defaults if it is unusable.
    fn with_max_speed(mut self, max_speed: Option<f32>) -> Self {
        let Some(max_speed) = max_speed else {
            return self;
        };

        let tuning = VehicleTuning {
            max_speed,
            ..self.tuning.clone()
        };
        match tuning.validate() {
            Ok(()) => self.tuning = tuning,
            Err(e) => tracing::warn!("Ignoring --max-speed: {e}"),
        }
        self
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    #[command(about = "Drive from the start gate to the finish gate without hitting anything")]
    pub(super) struct CliArgs {
        /// Show physics colliders on startup (toggle with F3).
        #[arg(long)]
        pub physics_debug: bool,

        /// Top speed in m/s.
        #[arg(long)]
        pub max_speed: Option<f32>,

        /// Vehicle glTF model, relative to the asset folder.
        #[arg(long, default_value = DEFAULT_VEHICLE_MODEL)]
        pub model: String,
    }

    impl From<CliArgs> for LaunchParams {
        fn from(args: CliArgs) -> Self {
            LaunchParams {
                physics_debug: args.physics_debug,
                vehicle_model: args.model,
                ..Default::default()
            }
            .with_max_speed(args.max_speed)
        }
    }

    pub fn parse() -> LaunchParams {
        CliArgs::parse().into()
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}

#[cfg(all(test, not(target_family = "wasm")))]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse_args(args: &[&str]) -> LaunchParams {
        native::CliArgs::try_parse_from(args)
            .expect("arguments should parse")
            .into()
    }

    #[test]
    fn test_defaults() {
        let params = parse_args(&["gatecourse-client"]);
        assert!(!params.physics_debug);
        assert_eq!(params.vehicle_model, DEFAULT_VEHICLE_MODEL);
        assert_eq!(params.tuning, VehicleTuning::default());
    }

    #[test]
    fn test_overrides() {
        let params = parse_args(&[
            "gatecourse-client",
            "--physics-debug",
            "--max-speed",
            "20",
            "--model",
            "models/truck.glb",
        ]);
        assert!(params.physics_debug);
        assert_eq!(params.tuning.max_speed, 20.0);
        assert_eq!(params.vehicle_model, "models/truck.glb");
    }

    #[test]
    fn test_invalid_max_speed_keeps_default() {
        let params = parse_args(&["gatecourse-client", "--max-speed", "0"]);
        assert_eq!(params.tuning.max_speed, VehicleTuning::default().max_speed);
    }
}
