//! Best-effort glTF overlay for placeholder visuals.
//!
//! Every visual spawns with simple translucent placeholder meshes and a
//! [`ModelOverlay`] naming the glTF scene that should replace them. The
//! request never gates physics or scoring. Once the scene loads the
//! placeholders are despawned and the scene takes their place; if it fails,
//! the placeholders stay for good. Despawning the visual drops the request.

use bevy::{asset::LoadState, gltf::GltfAssetLabel, prelude::*};

/// Plugin that resolves pending model overlays.
pub struct ModelOverlayPlugin;

impl Plugin for ModelOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, resolve_model_overlays);
    }
}

/// Pending swap of placeholder children for a glTF scene.
#[derive(Component, Debug)]
pub struct ModelOverlay {
    scene: Handle<Scene>,
    /// Transform of the scene relative to the visual root.
    transform: Transform,
}

impl ModelOverlay {
    /// Request the first scene of the glTF file at `path`.
    pub fn new(asset_server: &AssetServer, path: impl Into<String>, transform: Transform) -> Self {
        let path = path.into();
        Self {
            scene: asset_server.load(GltfAssetLabel::Scene(0).from_asset(path)),
            transform,
        }
    }
}

/// Marks a placeholder mesh that a loaded model replaces.
#[derive(Component, Debug, Default)]
pub struct Placeholder;

/// Translucent material for placeholder meshes.
pub fn placeholder_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(0.5),
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

fn resolve_model_overlays(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    overlays: Query<(Entity, &ModelOverlay)>,
    placeholders: Query<(Entity, &ChildOf), With<Placeholder>>,
) {
    for (entity, overlay) in &overlays {
        match asset_server.load_state(&overlay.scene) {
            LoadState::Loaded => {
                for (placeholder, child_of) in &placeholders {
                    if child_of.parent() == entity {
                        commands.entity(placeholder).despawn();
                    }
                }
                commands
                    .entity(entity)
                    .remove::<ModelOverlay>()
                    .with_child((SceneRoot(overlay.scene.clone()), overlay.transform));
                tracing::debug!(?entity, "model loaded, placeholder replaced");
            }
            LoadState::Failed(err) => {
                tracing::warn!("Failed to load model, keeping placeholder: {err}");
                commands.entity(entity).remove::<ModelOverlay>();
            }
            LoadState::NotLoaded | LoadState::Loading => {}
        }
    }
}
