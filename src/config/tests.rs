use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::audio::RepeatMode;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_player_startup_state() {
    let s = Settings::default();
    assert_eq!(s.audio.initial_volume, 0.7);
    assert_eq!(s.audio.progress_interval_ms, 1000);
    assert!(!s.playback.shuffle);
    assert!(!s.playback.shuffle_avoid_repeat);
    assert_eq!(RepeatMode::from(s.playback.repeat_mode), RepeatMode::None);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat_mode = "repeat-one"
shuffle_avoid_repeat = true

[audio]
initial_volume = 0.25
progress_interval_ms = 500
quit_fade_out_ms = 0

[controls]
seek_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
now_playing_fields = ["title", "album"]
now_playing_separator = " | "

[library]
extensions = ["mp3"]
recursive = false
likes_file = "/tmp/likes.toml"

[log]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(s.playback.shuffle_avoid_repeat);
    assert_eq!(RepeatMode::from(s.playback.repeat_mode), RepeatMode::One);
    assert_eq!(s.audio.initial_volume, 0.25);
    assert_eq!(s.audio.progress_interval_ms, 500);
    assert_eq!(s.audio.event_poll_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.seek_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert!(matches!(s.ui.now_playing_fields[0], TrackDisplayField::Title));
    assert!(matches!(s.ui.now_playing_fields[1], TrackDisplayField::Album));
    assert_eq!(s.ui.now_playing_separator, " | ");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert_eq!(
        s.library.likes_file,
        Some(std::path::PathBuf::from("/tmp/likes.toml"))
    );
    assert_eq!(s.log.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}

#[test]
fn validate_rejects_zero_intervals_and_bad_volume() {
    let mut s = Settings::default();
    s.audio.progress_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.event_poll_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());
}
