//! Third-person chase camera.

use bevy::prelude::*;

use crate::vehicle::CarVisual;

/// Plugin for the chase camera.
pub struct ChaseCameraPlugin;

impl Plugin for ChaseCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, chase_camera_system);
    }
}

/// Camera that trails the car.
#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct ChaseCamera {
    /// Offset behind and above the car, in car-local space.
    pub offset: Vec3,
    /// Look-at point above the car origin.
    pub look_height: f32,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 10.0, 15.0),
            look_height: 1.0,
            smoothing: 0.05,
        }
    }
}

impl ChaseCamera {
    /// Where the camera wants to be for a car at `target`.
    pub fn desired_position(&self, target: &Transform) -> Vec3 {
        let (yaw, _, _) = target.rotation.to_euler(EulerRot::YXZ);
        target.translation + Quat::from_rotation_y(yaw) * self.offset
    }

    pub fn look_target(&self, target: &Transform) -> Vec3 {
        target.translation + Vec3::Y * self.look_height
    }
}

fn chase_camera_system(
    car: Query<&Transform, (With<CarVisual>, Without<ChaseCamera>)>,
    mut cameras: Query<(&ChaseCamera, &mut Transform)>,
) {
    let Ok(target) = car.single() else {
        return;
    };

    for (chase, mut transform) in &mut cameras {
        let desired = chase.desired_position(target);
        transform.translation = transform.translation.lerp(desired, chase.smoothing);
        transform.look_at(chase.look_target(target), Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_follows_heading() {
        let chase = ChaseCamera::default();

        let straight = Transform::from_xyz(0.0, 0.5, 35.0);
        assert!(
            chase
                .desired_position(&straight)
                .abs_diff_eq(Vec3::new(0.0, 10.5, 50.0), 1e-4)
        );

        // Quarter turn left: the car faces -X, so the camera sits on +X.
        let turned = straight.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!(
            chase
                .desired_position(&turned)
                .abs_diff_eq(Vec3::new(15.0, 10.5, 35.0), 1e-4)
        );
    }
}
