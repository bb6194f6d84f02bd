//! Bevy 2D viewer for a [`Session`]
//!
//! Everything is drawn with gizmos every frame: wells as glowing rings,
//! particles as dots with a short velocity trail (longer for a lower
//! `trail_fade`), collision bursts as fading rings.
//!
//! Controls:
//! - left click: add a well under the cursor
//! - `C`: clear wells, `R`: reset particles
//! - `Space`: pause, `P`: next palette, `1`-`9`: pick a palette
//! - `T`: request the next theme from the library
//! - `G` / `Shift+G`: gravity up / down
//! - `]` / `[`: longer / shorter trails
//! - `=` / `-`: raise / lower the particle cap
//! - `0`: back to the scenario's starting settings

use std::collections::HashMap;
use std::sync::Arc;

use bevy::color::Alpha;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::simulation::params::{SimulationConfig, Slider};
use crate::simulation::session::Session;
use crate::simulation::states::{NVec2, Viewport};
use crate::simulation::theme::{LibraryThemeService, ThemeRequest, ThemeService, ThemeStatus};

const WELL_GLOW_RADIUS: f32 = 20.0;
const WELL_GLOW_RINGS: usize = 6;
const WELL_CORE_RADIUS: f32 = 2.0;
const BURST_RADIUS: f32 = 10.0;
const BURST_FRAMES: u32 = 20;
const TRAIL_SCALE: f64 = 8.0; // trail length in frames of motion at trail_fade = 0

const PALETTE_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

#[derive(Resource)]
struct SessionRes(Session);

/// Settings the session started with, restored by `0`
#[derive(Resource)]
struct StartConfig(SimulationConfig);

#[derive(Resource)]
struct ThemeLibrary {
    service: Arc<LibraryThemeService>,
    names: Vec<String>,
    next: usize,
}

struct Burst {
    point: NVec2,
    frames_left: u32,
}

#[derive(Resource, Default)]
struct ViewerState {
    paused: bool,
    bursts: Vec<Burst>,
    theme: Option<ThemeRequest>,
}

pub fn run_2d(session: Session, themes: LibraryThemeService) {
    let viewport = *session.viewport();

    let clear = session
        .background()
        .and_then(parse_color)
        .unwrap_or(Color::BLACK);

    let names = themes.names().map(str::to_string).collect();
    let library = ThemeLibrary {
        service: Arc::new(themes),
        names,
        next: 0,
    };

    let start = StartConfig(*session.config());

    App::new()
        .insert_resource(ClearColor(clear))
        .insert_resource(start)
        .insert_resource(SessionRes(session))
        .insert_resource(library)
        .init_resource::<ViewerState>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "gravfield".into(),
                resolution: (viewport.width as f32, viewport.height as f32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_camera_system)
        .add_systems(
            Update,
            (
                resize_system,
                input_system,
                theme_poll_system,
                physics_step_system,
                draw_system,
            )
                .chain(),
        )
        .run();
}

fn setup_camera_system(mut commands: Commands, session: Res<SessionRes>) {
    let vp = session.0.viewport();
    info!(
        "viewer started at {}x{} with {} wells",
        vp.width,
        vp.height,
        session.0.wells().len()
    );
    commands.spawn(Camera2dBundle::default());
}

fn resize_system(mut events: EventReader<WindowResized>, mut session: ResMut<SessionRes>) {
    for e in events.read() {
        if let Err(err) = session.0.resize(e.width as f64, e.height as f64) {
            warn!("ignoring resize: {}", err);
        }
    }
}

fn input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<SessionRes>,
    mut state: ResMut<ViewerState>,
    mut library: ResMut<ThemeLibrary>,
    start: Res<StartConfig>,
) {
    let session = &mut session.0;

    if mouse.just_pressed(MouseButton::Left) {
        // Window cursor coordinates are top-left origin, same as the simulation
        if let Some(cursor) = windows.get_single().ok().and_then(|w| w.cursor_position()) {
            match session.add_well_at(cursor.x as f64, cursor.y as f64) {
                Ok(well) => info!("added well {} with mass {:.0}", well.id, well.mass),
                Err(err) => warn!("could not add well: {}", err),
            }
        }
    }

    if keys.just_pressed(KeyCode::KeyC) {
        session.clear_wells();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        session.reset_particles();
    }
    if keys.just_pressed(KeyCode::Space) {
        state.paused = !state.paused;
        info!("{}", if state.paused { "paused" } else { "running" });
    }
    if keys.just_pressed(KeyCode::KeyP) {
        session.cycle_palette();
    }
    for (index, key) in PALETTE_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            match session.set_palette(index) {
                Ok(()) => info!("palette {}", index + 1),
                Err(err) => warn!("{}", err),
            }
        }
    }
    if keys.just_pressed(KeyCode::Digit0) {
        match session.set_config(start.0) {
            Ok(()) => info!("settings restored"),
            Err(err) => warn!("could not restore settings: {}", err),
        }
    }

    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    let mut nudges = Vec::new();
    if keys.just_pressed(KeyCode::KeyG) {
        nudges.push((Slider::GravityConstant, if shift { -1 } else { 1 }));
    }
    // Lower fade keeps trails longer
    if keys.just_pressed(KeyCode::BracketRight) {
        nudges.push((Slider::TrailFade, -1));
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        nudges.push((Slider::TrailFade, 1));
    }
    if keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::NumpadAdd) {
        nudges.push((Slider::MaxParticles, 1));
    }
    if keys.just_pressed(KeyCode::Minus) || keys.just_pressed(KeyCode::NumpadSubtract) {
        nudges.push((Slider::MaxParticles, -1));
    }
    for (slider, steps) in nudges {
        match session.nudge(slider, steps) {
            Ok(config) => {
                let shown = (slider.value(config) * 100.0).round() / 100.0;
                info!("{} = {}", slider.name(), shown);
            }
            Err(err) => warn!("{} unchanged: {}", slider.name(), err),
        }
    }

    if keys.just_pressed(KeyCode::KeyT) && state.theme.is_none() {
        if library.names.is_empty() {
            warn!("no themes configured");
        } else {
            let prompt = library.names[library.next % library.names.len()].clone();
            library.next += 1;
            let service: Arc<dyn ThemeService> = library.service.clone();
            state.theme = Some(ThemeRequest::spawn(service, prompt));
        }
    }
}

fn theme_poll_system(
    mut state: ResMut<ViewerState>,
    mut session: ResMut<SessionRes>,
    mut clear: ResMut<ClearColor>,
) {
    let Some(request) = state.theme.as_mut() else {
        return;
    };

    match request.poll() {
        ThemeStatus::InFlight => {}
        ThemeStatus::Ready(theme) => {
            match session.0.apply_theme(&theme) {
                Ok(()) => {
                    info!("Loaded: {}", theme.theme_name);
                    if let Some(color) = parse_color(&theme.background_style) {
                        clear.0 = color;
                    }
                }
                Err(err) => warn!("theme '{}' rejected: {}", theme.theme_name, err),
            }
            state.theme = None;
        }
        ThemeStatus::Failed(err) => {
            warn!("theme generation failed: {}", err);
            state.theme = None;
        }
    }
}

fn physics_step_system(mut session: ResMut<SessionRes>, mut state: ResMut<ViewerState>) {
    if state.paused {
        return;
    }

    let report = session.0.tick();
    if let Some(event) = report.collision {
        state.bursts.push(Burst {
            point: event.point,
            frames_left: BURST_FRAMES,
        });
    }
}

fn draw_system(
    mut gizmos: Gizmos,
    session: Res<SessionRes>,
    mut state: ResMut<ViewerState>,
    mut colors: Local<HashMap<String, Color>>,
) {
    let session = &session.0;
    let vp = session.viewport();

    let mut color_of = |hex: &str| -> Color {
        *colors
            .entry(hex.to_string())
            .or_insert_with(|| parse_color(hex).unwrap_or(Color::WHITE))
    };

    for well in session.wells() {
        let center = to_world(&well.position, vp);
        let glow = color_of(well.color.as_str());
        for ring in 0..WELL_GLOW_RINGS {
            let t = ring as f32 / WELL_GLOW_RINGS as f32;
            gizmos.circle_2d(center, WELL_GLOW_RADIUS * (1.0 - t), glow.with_alpha(0.15 + 0.85 * t));
        }
        gizmos.circle_2d(center, WELL_CORE_RADIUS, Color::WHITE);
    }

    let trail = TRAIL_SCALE * (1.0 - session.config().trail_fade);
    for p in session.particles() {
        let head = to_world(&p.position, vp);
        let color = color_of(p.color.as_str());
        gizmos.circle_2d(head, p.size as f32, color);

        // Skip the trail segment across a wrap seam
        let tail_pos = p.position - p.velocity * trail;
        if tail_pos.x >= 0.0 && tail_pos.x <= vp.width && tail_pos.y >= 0.0 && tail_pos.y <= vp.height {
            gizmos.line_2d(head, to_world(&tail_pos, vp), color.with_alpha(0.35));
        }
    }

    for burst in state.bursts.iter_mut() {
        let alpha = burst.frames_left as f32 / BURST_FRAMES as f32;
        gizmos.circle_2d(to_world(&burst.point, vp), BURST_RADIUS, Color::WHITE.with_alpha(alpha));
        burst.frames_left = burst.frames_left.saturating_sub(1);
    }
    state.bursts.retain(|b| b.frames_left > 0);
}

/// Screen coordinates (top-left origin, y down) to world (centre origin, y up)
fn to_world(p: &NVec2, vp: &Viewport) -> Vec2 {
    Vec2::new((p.x - vp.width / 2.0) as f32, (vp.height / 2.0 - p.y) as f32)
}

fn parse_color(hex: &str) -> Option<Color> {
    Srgba::hex(hex).ok().map(Color::Srgba)
}
