//! Input action definitions and the per-frame drive snapshot.
//!
//! Keys are mapped to actions with `leafwing-input-manager`. Once per frame
//! the held driving actions are collapsed into a [`DriveInput`], which is all
//! the vehicle controller ever sees.

use bevy::{gizmos::config::GizmoConfigStore, prelude::*};
use bevy_egui::input::egui_wants_any_keyboard_input;
use gatecourse::DriveInput;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

use crate::{physics, race::RestartRequested};

// ============================================================================
// Actions
// ============================================================================

/// Everything the player can do.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum DriveAction {
    /// Throttle (W / Up).
    Forward,
    /// Reverse (S / Down).
    Backward,
    /// Steer left (A / Left).
    Left,
    /// Steer right (D / Right).
    Right,
    /// Brake (Space).
    Brake,
    /// Restart the run (R).
    Restart,
    /// Toggle collider gizmos (F3).
    ToggleDebug,
}

/// Create the default input map for driving.
pub fn default_drive_input_map() -> InputMap<DriveAction> {
    InputMap::default()
        .with(DriveAction::Forward, KeyCode::KeyW)
        .with(DriveAction::Forward, KeyCode::ArrowUp)
        .with(DriveAction::Backward, KeyCode::KeyS)
        .with(DriveAction::Backward, KeyCode::ArrowDown)
        .with(DriveAction::Left, KeyCode::KeyA)
        .with(DriveAction::Left, KeyCode::ArrowLeft)
        .with(DriveAction::Right, KeyCode::KeyD)
        .with(DriveAction::Right, KeyCode::ArrowRight)
        .with(DriveAction::Brake, KeyCode::Space)
        .with(DriveAction::Restart, KeyCode::KeyR)
        .with(DriveAction::ToggleDebug, KeyCode::F3)
}

/// Driving intents for the current frame.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CurrentDriveInput(pub DriveInput);

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the drive actions and samples them every frame.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<DriveAction>::default())
            .init_resource::<CurrentDriveInput>()
            .add_systems(Startup, spawn_input_map)
            .add_systems(
                PreUpdate,
                (
                    sample_drive_input,
                    handle_game_actions.run_if(not(egui_wants_any_keyboard_input)),
                )
                    .after(InputManagerSystem::Update),
            );
    }
}

fn spawn_input_map(mut commands: Commands) {
    commands.spawn((
        Name::new("Drive input"),
        default_drive_input_map(),
        ActionState::<DriveAction>::default(),
    ));
}

/// Collapse the held actions into a [`DriveInput`].
pub fn drive_input_from(actions: &ActionState<DriveAction>) -> DriveInput {
    DriveInput {
        forward: actions.pressed(&DriveAction::Forward),
        backward: actions.pressed(&DriveAction::Backward),
        left: actions.pressed(&DriveAction::Left),
        right: actions.pressed(&DriveAction::Right),
        brake: actions.pressed(&DriveAction::Brake),
    }
}

fn sample_drive_input(
    action_query: Query<&ActionState<DriveAction>>,
    mut current: ResMut<CurrentDriveInput>,
) {
    let Ok(actions) = action_query.single() else {
        return;
    };
    current.0 = drive_input_from(actions);
}

/// One-shot actions: restart and debug toggle.
fn handle_game_actions(
    action_query: Query<&ActionState<DriveAction>>,
    mut restart: MessageWriter<RestartRequested>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let Ok(actions) = action_query.single() else {
        return;
    };

    if actions.just_pressed(&DriveAction::Restart) {
        restart.write(RestartRequested);
    }
    if actions.just_pressed(&DriveAction::ToggleDebug) {
        physics::toggle_physics_debug(&mut config_store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state_is_no_input() {
        let actions = ActionState::<DriveAction>::default();
        assert_eq!(drive_input_from(&actions), DriveInput::default());
    }

    #[test]
    fn test_pressed_actions_map_to_intents() {
        let mut actions = ActionState::<DriveAction>::default();
        actions.press(&DriveAction::Forward);
        actions.press(&DriveAction::Right);

        let input = drive_input_from(&actions);
        assert!(input.forward);
        assert!(input.right);
        assert!(!input.backward);
        assert!(!input.left);
        assert!(!input.brake);
    }
}
