//! Heads-up display.
//!
//! Shows speed, score and frame rate, the control reference, and the win
//! panel with a button to play again.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use gatecourse::{FrameRateSampler, ScoringRules, speed_kmh};

use crate::{
    race::{RaceState, RestartRequested, Score},
    vehicle::Car,
};

/// Plugin for the HUD overlay.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .init_resource::<FrameRate>()
            .add_systems(Update, sample_frame_rate)
            .add_systems(EguiPrimaryContextPass, hud_system);
    }
}

/// Frame rate shown on the HUD.
#[derive(Resource, Default)]
pub struct FrameRate(pub FrameRateSampler);

fn sample_frame_rate(mut frame_rate: ResMut<FrameRate>) {
    frame_rate.0.tick(web_time::Instant::now());
}

/// Render the HUD, instructions and win panel.
fn hud_system(
    mut contexts: EguiContexts,
    cars: Query<&Car>,
    score: Res<Score>,
    race: Res<RaceState>,
    frame_rate: Res<FrameRate>,
    mut restart: MessageWriter<RestartRequested>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let speed = cars
        .single()
        .map(|car| speed_kmh(car.controller.speed()))
        .unwrap_or_default();

    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(format!("Speed: {speed} km/h")).heading());
                ui.label(egui::RichText::new(format!("Score: {}", score.0.score())).heading());
                ui.label(format!("FPS: {}", frame_rate.0.fps()));
            });
        });

    let rules = score.0.rules();
    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            render_instructions(ui, rules);
        });

    if race.outcome.is_won() {
        egui::Window::new("Finished!")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("You reached the finish gate.");
                    ui.label(
                        egui::RichText::new(format!("Final score: {}", score.0.score()))
                            .heading(),
                    );
                    if ui.button("Play again").clicked() {
                        restart.write(RestartRequested);
                    }
                });
            });
    }

    Ok(())
}

fn render_instructions(ui: &mut egui::Ui, rules: &ScoringRules) {
    egui::Grid::new("controls").striped(true).show(ui, |ui| {
        for (keys, action) in [
            ("W / Up", "Accelerate"),
            ("S / Down", "Reverse"),
            ("A / Left", "Steer left"),
            ("D / Right", "Steer right"),
            ("Space", "Brake"),
            ("R", "Restart"),
            ("F3", "Show colliders"),
        ] {
            ui.label(keys);
            ui.label(action);
            ui.end_row();
        }
    });
    ui.separator();
    ui.label("Drive from the green gate to the red gate.");
    ui.label(format!(
        "Cone: -{} points, box: -{} points.",
        rules.cone_penalty, rules.box_penalty
    ));
}
