/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub terminal: TerminalConfig,
    pub snake: SnakeConfig,
    pub rain: RainConfig,
    pub contact: ContactConfig,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    /// Portfolio data read at startup.
    pub data_file: PathBuf,
    /// Source PDF the `cv` command copies from.
    pub cv_source: PathBuf,
    /// Destination the `cv` command copies to.
    pub cv_target: PathBuf,
    /// JSON-lines file the `hack` command appends to.
    pub submissions_file: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Clone, Debug)]
pub struct TerminalConfig {
    pub typing_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct SnakeConfig {
    pub tick_rate_ms: u64,
    pub tile_count: i32,
}

#[derive(Clone, Debug)]
pub struct RainConfig {
    pub enabled: bool,
    pub frame_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ContactConfig {
    pub ip_lookup: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    terminal: TomlTerminal,
    #[serde(default)]
    snake: TomlSnake,
    #[serde(default)]
    rain: TomlRain,
    #[serde(default)]
    contact: TomlContact,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_data_file")]
    data_file: String,
    #[serde(default = "default_cv_source")]
    cv_source: String,
    #[serde(default = "default_cv_target")]
    cv_target: String,
    #[serde(default = "default_submissions_file")]
    submissions_file: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlTerminal {
    #[serde(default = "default_typing_delay")]
    typing_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSnake {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_tile_count")]
    tile_count: i32,
}

#[derive(Deserialize, Debug)]
struct TomlRain {
    #[serde(default = "default_rain_enabled")]
    enabled: bool,
    #[serde(default = "default_rain_frame")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlContact {
    #[serde(default = "default_ip_lookup")]
    ip_lookup: bool,
}

// ── Defaults ──

fn default_data_file() -> String { "profile.json".into() }
fn default_cv_source() -> String { "cv.pdf".into() }
fn default_cv_target() -> String { "cv_export.pdf".into() }
fn default_submissions_file() -> String { "submissions.jsonl".into() }
fn default_log_file() -> String { "termfolio.log".into() }

fn default_typing_delay() -> u64 { 150 }

fn default_tick_rate() -> u64 { 100 }
fn default_tile_count() -> i32 { 20 }

fn default_rain_enabled() -> bool { true }
fn default_rain_frame() -> u64 { 50 }

fn default_ip_lookup() -> bool { true }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            data_file: default_data_file(),
            cv_source: default_cv_source(),
            cv_target: default_cv_target(),
            submissions_file: default_submissions_file(),
            log_file: default_log_file(),
        }
    }
}

impl Default for TomlTerminal {
    fn default() -> Self {
        TomlTerminal {
            typing_delay_ms: default_typing_delay(),
        }
    }
}

impl Default for TomlSnake {
    fn default() -> Self {
        TomlSnake {
            tick_rate_ms: default_tick_rate(),
            tile_count: default_tile_count(),
        }
    }
}

impl Default for TomlRain {
    fn default() -> Self {
        TomlRain {
            enabled: default_rain_enabled(),
            frame_ms: default_rain_frame(),
        }
    }
}

impl Default for TomlContact {
    fn default() -> Self {
        TomlContact {
            ip_lookup: default_ip_lookup(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        AppConfig::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let tile_count = toml_cfg.snake.tile_count;
        if tile_count < 2 {
            eprintln!("Warning: snake.tile_count = {tile_count} is unplayable, using 2.");
        }
        AppConfig {
            general: GeneralConfig {
                data_file: resolve_read_path(&toml_cfg.general.data_file, search_dirs),
                cv_source: resolve_read_path(&toml_cfg.general.cv_source, search_dirs),
                cv_target: PathBuf::from(&toml_cfg.general.cv_target),
                submissions_file: PathBuf::from(&toml_cfg.general.submissions_file),
                log_file: PathBuf::from(&toml_cfg.general.log_file),
            },
            terminal: TerminalConfig {
                typing_delay_ms: toml_cfg.terminal.typing_delay_ms,
            },
            snake: SnakeConfig {
                tick_rate_ms: toml_cfg.snake.tick_rate_ms,
                tile_count: tile_count.max(2),
            },
            rain: RainConfig {
                enabled: toml_cfg.rain.enabled,
                frame_ms: toml_cfg.rain.frame_ms,
            },
            contact: ContactConfig {
                ip_lookup: toml_cfg.contact.ip_lookup,
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_toml(TomlConfig::default(), &[])
    }
}

/// Files we only read are searched across the candidate dirs; write
/// targets stay as given (relative means CWD).
fn resolve_read_path(raw: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let raw_path = PathBuf::from(raw);
    if raw_path.is_absolute() {
        return raw_path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(raw))
        .find(|p| p.is_file())
        .unwrap_or(raw_path)
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/termfolio → /opt/termfolio/bin
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/termfolio)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/termfolio");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/termfolio)
    let sys = PathBuf::from("/usr/share/termfolio");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
