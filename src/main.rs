/// Entry point and frame loop.

mod config;
mod content;
mod domain;
mod logging;
mod shell;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use config::AppConfig;
use shell::session::{Key, Session};
use ui::input::InputState;
use ui::rain::MatrixRain;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = AppConfig::load();

    // Logging goes to a file; stdout belongs to the renderer.
    if let Err(e) = logging::init(&config.general.log_file) {
        eprintln!("Log init failed: {e}");
    }
    tracing::info!("termfolio {} starting", env!("CARGO_PKG_VERSION"));

    let data = content::load(&config.general.data_file);
    let mut session = Session::new(data, &config);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (term_w, term_h) = renderer.size();
    let mut rain = MatrixRain::new(term_w, term_h, rand::random());

    let result = run_loop(&mut session, &mut renderer, &mut rain, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!("terminal error: {}", e);
        eprintln!("Terminal error: {e}");
    }

    println!();
    println!("Connection closed.");
}

fn run_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    rain: &mut MatrixRain,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let rain_rate = Duration::from_millis(config.rain.frame_ms.max(1));
    let mut last_drop = Instant::now();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }

        let now = Instant::now();
        for event in kb.keys() {
            if let Some(key) = translate(event) {
                session.handle_key(key, Local::now(), now);
            }
        }

        session.poll(now);

        if config.rain.enabled && last_drop.elapsed() >= rain_rate {
            rain.advance();
            last_drop = Instant::now();
        }

        renderer.render(session, rain)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Map the terminal backend's key events onto session keys. Ctrl/Alt
/// chords do not type their character; function keys and media keys
/// are ignored.
fn translate(event: &KeyEvent) -> Option<Key> {
    let chord = event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match event.code {
        KeyCode::Char(_) if chord => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_characters_are_not_typed() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(translate(&ctrl_a), None);
        let alt_f = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::ALT);
        assert_eq!(translate(&alt_f), None);
    }

    #[test]
    fn plain_and_shifted_keys_translate() {
        let plain = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(translate(&plain), Some(Key::Char('q')));
        let shifted = KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT);
        assert_eq!(translate(&shifted), Some(Key::Char('H')));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(translate(&enter), Some(Key::Enter));
        let fkey = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(translate(&fkey), None);
    }
}
