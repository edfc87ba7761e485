//! Session lifecycle scenarios: startup, options, warnings, camera and
//! teardown.

mod common;

use common::{config_in, playing, Spy};
use tessera::core::{FpsLimitMethod, TeardownError};
use tessera::rendering::CameraKind;
use tessera::ui::{PauseScreen, ScreenState, WarningScreen};
use tessera::{Game, GameError, Options, OptionsError};

fn warning(title: &str) -> WarningScreen {
    WarningScreen::new(title, vec![String::from("body")])
}

fn active_name(game: &Game) -> Option<String> {
    game.active_screen().map(|s| s.name().to_owned())
}

// =============================================================================
// STARTUP
// =============================================================================

#[test]
fn test_startup_sequence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let game = Game::start(config_in(dir.path()), spy.collaborators()).expect("session starts");

    let calls = spy.calls();
    assert_eq!(calls[0], "make_ib");
    assert!(calls.contains(&String::from("depth:true:LessEqual")));
    assert!(calls.contains(&String::from("blend:SourceAlpha:InvSourceAlpha")));
    assert!(calls.contains(&String::from("alpha_test:Greater:0.5")));
    assert_eq!(calls.last().map(String::as_str), Some("connect:127.0.0.1:25565"));

    assert_eq!(active_name(&game), Some(String::from("loading")));
    assert_eq!(spy.with(|s| s.vsync), Some(true));
    assert!(game.screens().hud().is_initialized());
    assert!(!game.screens().hud().has_focus());
}

#[test]
fn test_refused_connection_lands_on_error_screen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    spy.with(|s| s.fail_connect = true);

    let game = Game::start(config_in(dir.path()), spy.collaborators()).expect("session starts");

    assert_eq!(active_name(&game), Some(String::from("error")));
    assert_eq!(spy.with(|s| s.map_resets), 1);
}

#[test]
fn test_startup_applies_saved_options() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("options.toml"),
        "fps_limit = \"Limit30Fps\"\nchat_lines = 99\nfield_of_view = 90\n",
    )
    .expect("write options");
    let spy = Spy::new();

    let game = Game::start(config_in(dir.path()), spy.collaborators()).expect("session starts");

    assert_eq!(game.limiter().method(), FpsLimitMethod::Limit30Fps);
    assert_eq!(spy.with(|s| s.vsync), Some(false));
    assert_eq!(game.options().chat_lines(), 30);
    assert_eq!(game.screens().hud().chat_lines(), 30);
    assert!((game.camera().settings().field_of_view - 90.0).abs() < f32::EPSILON);
    assert!(!game.options().has_changed());
}

#[test]
fn test_malformed_options_fail_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("options.toml"), "view_distance = \"far\"").expect("write");
    let spy = Spy::new();

    let result = Game::start(config_in(dir.path()), spy.collaborators());

    assert!(matches!(
        result,
        Err(GameError::Options(OptionsError::Parse { .. }))
    ));
}

// =============================================================================
// OPTIONS
// =============================================================================

#[test]
fn test_fps_limit_switch_toggles_vsync_and_resets_limiter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.set_fps_limit_method(FpsLimitMethod::Limit60Fps);
    assert_eq!(spy.with(|s| s.vsync), Some(false));
    assert!((game.limiter().target_frame_millis() - 1000.0 / 30.0).abs() < 1e-9);
    assert_eq!(game.limiter().carried_over_millis(), 0.0);

    game.set_fps_limit_method(FpsLimitMethod::LimitVSync);
    assert_eq!(spy.with(|s| s.vsync), Some(true));
    assert_eq!(game.limiter().target_frame_millis(), 0.0);
}

#[test]
fn test_view_distance_rebuilds_projection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);
    let before = game.projection().projection;

    game.set_view_distance(64);

    assert_eq!(game.options().view_distance(), 64);
    assert!((game.camera().settings().view_distance - 64.0).abs() < f32::EPSILON);
    let after = game.projection().projection;
    assert_ne!(before, after);
    assert_eq!(spy.with(|s| s.matrices.last().copied()), Some(after));
}

#[test]
fn test_changed_options_saved_on_teardown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.change_options(|o| {
        o.set_sensitivity(55);
        o.set_view_bobbing(true);
    });
    let report = game.teardown();
    assert!(report.is_clean());

    let saved = Options::load(&dir.path().join("options.toml")).expect("saved options load");
    assert_eq!(saved.sensitivity(), 55);
    assert!(saved.view_bobbing());
}

#[test]
fn test_unchanged_options_not_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.teardown();

    assert!(!dir.path().join("options.toml").exists());
}

// =============================================================================
// WARNINGS
// =============================================================================

#[test]
fn test_warnings_queue_and_share_cursor_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.show_warning(warning("A"));
    assert!(spy.with(|s| s.cursor_visible));
    game.show_warning(warning("B"));
    assert_eq!(game.screens().warning_count(), 2);

    assert!(game.dismiss_warning());
    let front = game.screens().warnings().next().expect("B remains");
    assert_eq!(front.title(), "B");
    assert!(!front.saved_cursor_visible());

    assert!(game.dismiss_warning());
    assert_eq!(game.screen_state(), ScreenState::NoActiveScreen);
    assert!(!spy.with(|s| s.cursor_visible));
    assert!(game.screens().hud().has_focus());
    assert!(!game.dismiss_warning());
}

#[test]
fn test_replacement_deferred_behind_warning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.show_warning(warning("Texture pack"));
    game.set_new_screen(Some(Box::new(PauseScreen::new())));

    assert_eq!(game.screen_state(), ScreenState::WarningQueued);
    assert_eq!(active_name(&game), Some(String::from("warning")));
    let front = game.screens().warnings().next().expect("warning");
    assert_eq!(front.pending_replacement_name(), Some("pause"));

    assert!(game.dismiss_warning());
    assert_eq!(active_name(&game), Some(String::from("pause")));
    let last = spy
        .with(|s| s.screen_changes.last().cloned())
        .expect("screen change");
    assert_eq!(last, (Some(String::from("warning")), Some(String::from("pause"))));
}

#[test]
fn test_disconnect_behind_warning_is_deferred() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.show_warning(warning("Heads up"));
    game.disconnect("Disconnected", "Timed out");

    assert_eq!(active_name(&game), Some(String::from("warning")));
    assert_eq!(spy.with(|s| s.map_resets), 1);

    game.dismiss_warning();
    assert_eq!(active_name(&game), Some(String::from("error")));
}

// =============================================================================
// CAMERA
// =============================================================================

#[test]
fn test_camera_switching_rules() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    assert_eq!(game.set_camera(true), CameraKind::ForwardThirdPerson);
    assert_eq!(game.set_camera(true), CameraKind::ThirdPerson);
    assert_eq!(game.cycle_camera(), CameraKind::FirstPerson);
    assert_eq!(game.cycle_camera(), CameraKind::ForwardThirdPerson);

    spy.with(|s| s.can_use_third_person = false);
    assert_eq!(game.set_camera(true), CameraKind::FirstPerson);

    spy.with(|s| s.can_use_third_person = true);
    game.change_options(|o| o.set_third_person_allowed(false));
    assert_eq!(game.cycle_camera(), CameraKind::FirstPerson);
}

#[test]
fn test_mouse_look_turns_player_in_camera_ticks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    game.add_mouse_delta(12.0, -4.0);
    game.on_render_frame(0.01).expect("frame");

    assert!(spy.with(|s| s.rotations) >= 1);
    assert!(game.camera().state().delta.x > 0.0);
}

// =============================================================================
// RESIZE
// =============================================================================

#[test]
fn test_resize_updates_backend_and_projection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);
    let before = game.projection().projection;

    spy.with(|s| s.size = tessera::ui::Extent::new(1920, 1080));
    game.on_resize();

    assert_eq!(spy.count("resize:1920x1080"), 1);
    assert_ne!(game.projection().projection, before);
}

// =============================================================================
// TEARDOWN
// =============================================================================

#[test]
fn test_teardown_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    let report = game.teardown();

    assert!(report.is_clean());
    assert_eq!(
        report.released,
        ["network session", "screens", "scene renderer", "default index buffer", "options"]
    );
    assert_eq!(
        spy.calls(),
        ["network_dispose", "scene_release", "delete_ib:7"]
    );
    assert!(!game.screens().hud().is_initialized());
}

#[test]
fn test_teardown_continues_past_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);
    spy.with(|s| {
        s.fail_scene_release = true;
        s.fail_ib_delete = true;
    });
    game.change_options(|o| o.set_chat_lines(5));

    let report = game.teardown();

    assert!(!report.is_clean());
    let failed: Vec<&str> = report.failures.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(failed, ["scene renderer", "default index buffer"]);
    assert!(matches!(report.failures[1].1, TeardownError::Release { .. }));
    assert_eq!(report.released, ["network session", "screens", "options"]);
    assert!(dir.path().join("options.toml").exists());
}

#[test]
fn test_teardown_runs_once_including_drop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let spy = Spy::new();
    let mut game = playing(dir.path(), &spy);

    assert!(!game.teardown().released.is_empty());
    assert!(game.teardown().released.is_empty());
    assert!(game.is_torn_down());
    drop(game);
    assert_eq!(spy.count("scene_release"), 1);

    let dropped = playing(dir.path(), &spy);
    drop(dropped);
    assert_eq!(spy.count("scene_release"), 1);
    assert_eq!(spy.count("network_dispose"), 1);
}
