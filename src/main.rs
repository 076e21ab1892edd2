mod app;
mod catcher;
mod energy;
mod feedback;
mod input;
mod pet;
mod quota;
mod render;
mod rng;
mod storage;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use app::App;
use feedback::{BridgeHaptics, BridgeSound, Haptics, NoopHaptics, NoopSound, SoundCue};
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, KeyInput};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

const TAP_SOUND_SRC: &str = "/assets/audio/tap-sound.mp3";

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Query the grid container's bounding rect and convert browser pixel
/// coordinates to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    // Capability seams: no-ops when the platform bridge or audio is absent.
    let haptics: Box<dyn Haptics> = match BridgeHaptics::detect() {
        Some(bridge) => Box::new(bridge),
        None => Box::new(NoopHaptics),
    };
    let sound: Box<dyn SoundCue> = match BridgeSound::detect(TAP_SOUND_SRC) {
        Some(audio) => Box::new(audio),
        None => Box::new(NoopSound),
    };

    let app = Rc::new(RefCell::new(App::new(
        storage::load_snapshot(),
        storage::load_quota(),
        storage::local_day_key(),
        js_sys::Date::now() as u64 | 1,
        haptics,
        sound,
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }

            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(action) = action {
                app.borrow_mut().dispatch(action, col, row, performance_now());
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => Some(KeyInput::Char(c.to_ascii_lowercase())),
                KeyCode::Left => Some(KeyInput::Left),
                KeyCode::Right => Some(KeyInput::Right),
                KeyCode::Esc => Some(KeyInput::Esc),
                _ => None,
            };
            if let Some(key) = key {
                app.borrow_mut().handle_key(key, performance_now());
            }
        }
    });

    // Render loop: advance clocks, draw, flush persistence requests.
    terminal.draw_web({
        let app = app.clone();
        let click_state = click_state.clone();
        let mut fx_state = render::Fx::new();
        move |f| {
            let now = performance_now();
            let mut app = app.borrow_mut();

            {
                let mut cs = click_state.borrow_mut();
                let size = f.area();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            app.env_update(
                storage::local_day_key(),
                storage::seconds_until_local_midnight(),
            );
            app.frame(now);

            {
                let mut cs = click_state.borrow_mut();
                render::render(f, &mut app, &mut cs, &mut fx_state, now);
            }

            if app.take_save_request() {
                storage::save_snapshot(&app.snapshot());
            }
            if app.take_quota_save_request() {
                storage::save_quota(app.quota.record());
            }
        }
    });

    Ok(())
}
