//! Rendering and click-target registration for all screens.
//!
//! Every renderer registers the click targets for what it draws, so visual
//! output and interactive behaviour stay co-located. Overlay renderers run
//! last; their targets win hit-testing over the base screen.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratzilla::ratatui::Frame;
use tachyonfx::{fx, Duration as FxDuration, Effect, EffectRenderer, Interpolation, Shader};

use crate::app::{actions, App, Screen, VisualEvent};
use crate::catcher::{
    CatcherPhase, CatcherSession, NutKind, BASKET_HALF_WIDTH, GAME_DURATION_SECS,
};
use crate::input::ClickState;
use crate::pet::{PetState, FLOAT_MS};
use crate::quota::format_countdown;
use crate::widgets::{meter_line, ClickableList};

/// Post-processing effects driven by one-shot app events.
pub struct Fx {
    evolve: Option<Effect>,
    game_over: Option<Effect>,
    last_frame_ms: Option<f64>,
}

impl Fx {
    pub fn new() -> Self {
        Self {
            evolve: None,
            game_over: None,
            last_frame_ms: None,
        }
    }

    fn absorb(&mut self, events: Vec<VisualEvent>) {
        for event in events {
            match event {
                VisualEvent::Evolved => {
                    // The evolved sprite materializes out of noise.
                    self.evolve = Some(fx::coalesce((1500, Interpolation::SineOut)));
                }
                VisualEvent::GameOver => {
                    self.game_over = Some(fx::fade_from_fg(
                        Color::Yellow,
                        (800, Interpolation::QuadOut),
                    ));
                }
            }
        }
    }

    /// Frame delta for effect advancement, clamped like the game clocks.
    fn delta(&mut self, now_ms: f64) -> FxDuration {
        let dt = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        FxDuration::from_millis(dt as u64)
    }
}

/// Top-level render entry, called once per animation frame.
pub fn render(f: &mut Frame, app: &mut App, cs: &mut ClickState, fx_state: &mut Fx, now_ms: f64) {
    fx_state.absorb(app.take_visual_events());
    let delta = fx_state.delta(now_ms);

    match app.screen {
        Screen::Pet => render_pet_screen(f, app, cs, fx_state, now_ms, delta),
        Screen::Catcher => render_catcher_screen(f, app, cs, fx_state, delta),
    }
}

// ── Pet screen ─────────────────────────────────────────────────

fn render_pet_screen(
    f: &mut Frame,
    app: &mut App,
    cs: &mut ClickState,
    fx_state: &mut Fx,
    now_ms: f64,
    delta: FxDuration,
) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(f, app, chunks[0]);
    render_pet_view(f, app, cs, fx_state, chunks[1], now_ms, delta);
    render_pet_footer(f, app, cs, chunks[2]);

    if app.energy_prompt_open {
        render_energy_prompt(f, app, cs, size);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let (band_current, band_max) = app.pet.progress_in_band();
    let bar_width = area.width.saturating_sub(24).clamp(10, 30);

    let lines = vec![
        meter_line(
            "ЭНЕРГИЯ",
            app.energy.rounded().max(0) as u32,
            app.energy.max(),
            bar_width,
            Color::Blue,
        ),
        Line::from(Span::styled(
            "-1 ЗА ТАП · +1 КАЖДЫЕ 3 МИН",
            Style::default().fg(Color::DarkGray),
        )),
        meter_line(
            &format!("УРОВЕНЬ {}", app.pet.level()),
            band_current,
            band_max,
            bar_width,
            Color::Yellow,
        ),
        Line::from(vec![
            Span::styled("БАЛАНС ", Style::default().fg(Color::White)),
            Span::styled(
                format!("{} ¢", app.coins),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" КРИТТЕР "),
    );
    f.render_widget(header, area);
}

fn pet_sprite(level: u32, state: PetState, bouncing: bool) -> &'static [&'static str] {
    match state {
        PetState::Sleeping => &["  (-.-) Zz ", "  /|   |\\  "],
        PetState::Transitioning => &["  * .  *   ", " .  * .  * ", "  *  . *   "],
        PetState::Active => match (level, bouncing) {
            (1, false) => &["  (\\_/)  ", "  (o.o)  ", "  /> <\\  "],
            (1, true) => &["  (\\_/)  ", "  (^.^)  ", "  /)_(\\  "],
            (_, false) => &[" (\\___/) ", " ( o.o ) ", " (  w  ) ", " (_/|\\_) "],
            (_, true) => &[" (\\___/) ", " ( ^o^ ) ", " (  w  ) ", " (_\\|/_) "],
        },
    }
}

fn render_pet_view(
    f: &mut Frame,
    app: &mut App,
    cs: &mut ClickState,
    fx_state: &mut Fx,
    area: Rect,
    now_ms: f64,
    delta: FxDuration,
) {
    let status = if app.energy.is_empty() {
        ("СПЯЩИЙ", Color::Red)
    } else {
        ("АКТИВНЫЙ", Color::Green)
    };
    let combo = app.pet.combo();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" ТАПАЙ ПО ПИТОМЦУ ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Character sprite, centered
    let sprite = pet_sprite(app.pet.level(), app.pet.state(), app.pet.bouncing(now_ms));
    let sprite_h = sprite.len() as u16;
    let sprite_w = sprite.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let sprite_x = inner.x + inner.width.saturating_sub(sprite_w) / 2;
    let sprite_y = inner.y + inner.height.saturating_sub(sprite_h) / 2;
    let sprite_area =
        Rect::new(sprite_x, sprite_y, sprite_w.max(1), sprite_h).intersection(inner);

    let sprite_lines: Vec<Line> = sprite
        .iter()
        .map(|l| Line::from(Span::styled(*l, Style::default().fg(Color::LightYellow))))
        .collect();
    f.render_widget(Paragraph::new(sprite_lines), sprite_area);

    // Evolution shimmer plays over the sprite
    if let Some(effect) = fx_state.evolve.as_mut() {
        f.render_effect(effect, sprite_area, delta);
        if effect.done() {
            fx_state.evolve = None;
        }
    }

    // Speech bubble above the sprite
    if let Some(phrase) = app.pet.phrase() {
        let w = (phrase.chars().count() as u16).min(inner.width);
        let x = inner.x + inner.width.saturating_sub(w) / 2;
        let y = sprite_area.y.saturating_sub(2).max(inner.y);
        let bubble = Rect::new(x, y, w.max(1), 1).intersection(inner);
        f.render_widget(
            Paragraph::new(Span::styled(phrase, Style::default().fg(Color::Cyan))),
            bubble,
        );
    }

    // Floating +N labels drift upward as they age
    for float in app.pet.floats() {
        let age = (now_ms - float.spawned_ms).clamp(0.0, FLOAT_MS);
        let rise = (age / FLOAT_MS * 3.0) as u16;
        let label = format!("+{}", float.points);
        let rect = Rect::new(
            float.col.min(inner.x + inner.width.saturating_sub(1)),
            float.row.saturating_sub(rise).max(inner.y),
            label.chars().count() as u16,
            1,
        )
        .intersection(inner);
        if rect.width > 0 && rect.height > 0 {
            f.render_widget(
                Paragraph::new(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                rect,
            );
        }
    }

    // Status line at the bottom of the pen
    let mut status_spans = vec![
        Span::styled("СТАТУС: ", Style::default().fg(Color::Gray)),
        Span::styled(status.0, Style::default().fg(status.1)),
    ];
    if combo > 1.0 {
        status_spans.push(Span::styled(
            format!("   КОМБО x{combo:.1}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    let status_rect = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1)
        .intersection(inner);
    f.render_widget(
        Paragraph::new(Line::from(status_spans)).alignment(Alignment::Center),
        status_rect,
    );

    // The whole pen is the tap surface; keyboard taps land on its center.
    cs.add_click_target(inner, actions::TAP_PET);
    app.tap_anchor = (
        sprite_area.x + sprite_area.width / 2,
        sprite_area.y + sprite_area.height / 2,
    );
}

fn render_pet_footer(f: &mut Frame, app: &App, cs: &mut ClickState, area: Rect) {
    let sound_label = if app.sound_enabled {
        " [S] Звук: ВКЛ "
    } else {
        " [S] Звук: ВЫКЛ "
    };
    let segments: [(&str, u16); 3] = [
        (" [SPACE] Тап ", actions::TAP_PET),
        (" [M] Мини-игра ", actions::OPEN_CATCHER),
        (sound_label, actions::TOGGLE_SOUND),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let mut spans: Vec<Span> = Vec::new();
    let mut x = inner.x;
    for (i, (label, action)) in segments.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            x += 1;
        }
        let width = Line::from(*label).width() as u16;
        spans.push(Span::styled(*label, Style::default().fg(Color::Gray)));
        let rect = Rect::new(x, area.y, width, area.height).intersection(area);
        cs.add_click_target(rect, *action);
        x += width;
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_energy_prompt(f: &mut Frame, app: &App, cs: &mut ClickState, screen: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ЭНЕРГИЯ ЗАКОНЧИЛАСЬ! ");

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "Питомец уснул без энергии.",
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(Span::styled(
        "Выберите способ восполнения:",
        Style::default().fg(Color::Gray),
    )));
    cl.push_blank();
    cl.push_clickable(
        Line::from(Span::styled(
            " [M] Сыграть в мини-игру ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        actions::EMPTY_PLAY,
    );
    cl.push_blank();
    cl.push(Line::from(Span::styled(
        "Или подождите: +1 энергия каждые 3 минуты.",
        Style::default().fg(Color::DarkGray),
    )));
    cl.push_blank();
    cl.push_clickable(
        Line::from(Span::styled(
            " [ESC] Закрыть ",
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        )),
        actions::EMPTY_CLOSE,
    );

    // Size the modal to its content (wrap-aware via Paragraph::line_count).
    let width = 44u16.min(screen.width);
    let area = overlay_rect(screen, width, cl.visual_height(width.saturating_sub(2)) + 2);
    f.render_widget(Clear, area);

    // The modal swallows stray clicks; its buttons are registered after and
    // therefore win hit-testing.
    cs.add_click_target(area, actions::NONE);
    cl.register_targets(area, cs, 1, 1, 0, 0);

    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Mini-game screen ───────────────────────────────────────────

fn render_catcher_screen(
    f: &mut Frame,
    app: &mut App,
    cs: &mut ClickState,
    fx_state: &mut Fx,
    delta: FxDuration,
) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10)])
        .split(size);

    let Some(session) = app.catcher.as_ref() else {
        return;
    };
    let phase = session.phase();

    render_catcher_header(f, session, cs, chunks[0]);
    let field_inner = render_catcher_field(f, session, cs, chunks[1]);

    // Keep the pointer→percent mapping current for basket tracking.
    app.field_cols = field_inner.width;
    app.field_origin_col = field_inner.x;

    match phase {
        CatcherPhase::Idle => render_catcher_start(f, app, cs, chunks[1]),
        CatcherPhase::Paused => render_pause_banner(f, chunks[1]),
        CatcherPhase::GameOver => {
            render_catcher_game_over(f, app, cs, chunks[1]);
            if let Some(effect) = fx_state.game_over.as_mut() {
                f.render_effect(effect, chunks[1], delta);
                if effect.done() {
                    fx_state.game_over = None;
                }
            }
        }
        CatcherPhase::Running => {}
    }
}

fn render_catcher_header(f: &mut Frame, session: &CatcherSession, cs: &mut ClickState, area: Rect) {
    let combo = session.combo();
    let mut spans = vec![
        Span::styled(
            " ЛОВИТЕЛЬ ОРЕХОВ ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" СЧЁТ {} ", session.score()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(" {} с ", session.remaining_secs()),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if combo > 1.0 {
        spans.push(Span::styled(
            format!(" x{combo:.1} "),
            Style::default().fg(Color::Yellow),
        ));
    }

    let pause_label = if session.phase() == CatcherPhase::Paused {
        " [P] Продолжить "
    } else {
        " [P] Пауза "
    };
    let close_label = " [ESC] Выход ";

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    // Right-aligned buttons with precise click rects
    let pause_w = Line::from(pause_label).width() as u16;
    let close_w = Line::from(close_label).width() as u16;
    let close_x = inner.x + inner.width.saturating_sub(close_w);
    let pause_x = close_x.saturating_sub(pause_w + 1);

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    f.render_widget(
        Paragraph::new(Span::styled(
            pause_label,
            Style::default().fg(Color::Yellow),
        )),
        Rect::new(pause_x, inner.y, pause_w, 1).intersection(inner),
    );
    f.render_widget(
        Paragraph::new(Span::styled(close_label, Style::default().fg(Color::Red))),
        Rect::new(close_x, inner.y, close_w, 1).intersection(inner),
    );

    cs.add_click_target(Rect::new(pause_x, area.y, pause_w, area.height), actions::CATCHER_PAUSE);
    cs.add_click_target(Rect::new(close_x, area.y, close_w, area.height), actions::CATCHER_CLOSE);
}

fn nut_glyph(kind: NutKind, rotation: f64) -> (&'static str, Color) {
    let spin = ((rotation / 90.0) as usize) % 2;
    match kind {
        NutKind::Acorn => (["o", "•"][spin], Color::Yellow),
        NutKind::Walnut => (["O", "0"][spin], Color::LightRed),
        NutKind::Hazelnut => (["@", "#"][spin], Color::LightMagenta),
    }
}

/// Draw the field and return its inner rect for pointer mapping.
fn render_catcher_field(
    f: &mut Frame,
    session: &CatcherSession,
    cs: &mut ClickState,
    area: Rect,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return inner;
    }

    // The whole field tracks the pointer for basket movement.
    cs.add_click_target(inner, actions::CATCHER_FIELD);

    let to_col = |x_pct: f64| -> u16 {
        inner.x + ((x_pct / 100.0) * (inner.width.saturating_sub(1)) as f64) as u16
    };
    let to_row = |y_pct: f64| -> u16 {
        inner.y + ((y_pct / 100.0) * (inner.height.saturating_sub(1)) as f64) as u16
    };

    // Thrower along the canopy; frames alternate a cheap blink
    let thrower = session.thrower();
    let sprite = match (thrower.throwing, thrower.frame % 2) {
        (true, _) => "(o,o)/",
        (false, 0) => "(o,o) ",
        (false, _) => "(-,-) ",
    };
    let t_col = to_col(thrower.x).saturating_sub(2).max(inner.x);
    f.render_widget(
        Paragraph::new(Span::styled(sprite, Style::default().fg(Color::LightRed))),
        Rect::new(t_col, inner.y, sprite.chars().count() as u16, 1).intersection(inner),
    );

    // Falling nuts
    for nut in session.nuts() {
        let (glyph, color) = nut_glyph(nut.kind, nut.rotation);
        let rect = Rect::new(to_col(nut.x), to_row(nut.y), 1, 1).intersection(inner);
        if rect.width > 0 && rect.height > 0 {
            f.render_widget(
                Paragraph::new(Span::styled(glyph, Style::default().fg(color))),
                rect,
            );
        }
    }

    // Basket along the bottom, spanning its catch width
    let basket_row = inner.y + inner.height - 1;
    let half_cells = (inner.width as f64 * BASKET_HALF_WIDTH / 100.0) as u16;
    let basket_w = (half_cells * 2 + 1).min(inner.width);
    let basket_col = to_col(session.basket_x())
        .saturating_sub(half_cells)
        .clamp(inner.x, inner.x + inner.width.saturating_sub(basket_w));
    let mut basket = String::with_capacity(basket_w as usize);
    basket.push('\\');
    for _ in 0..basket_w.saturating_sub(2) {
        basket.push('_');
    }
    basket.push('/');
    f.render_widget(
        Paragraph::new(Span::styled(
            basket,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Rect::new(basket_col, basket_row, basket_w, 1).intersection(inner),
    );

    // Catch animation above the basket
    if let Some(flash) = session.catch_flash() {
        let label = format!("✦ x{:.1}", session.combo());
        let rect = Rect::new(
            to_col(flash.x).saturating_sub(2).max(inner.x),
            basket_row.saturating_sub(1),
            label.chars().count() as u16,
            1,
        )
        .intersection(inner);
        f.render_widget(
            Paragraph::new(Span::styled(
                label,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            rect,
        );
    }

    inner
}

fn render_catcher_start(f: &mut Frame, app: &App, cs: &mut ClickState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ЛОВИТЕЛЬ ОРЕХОВ ");

    let can_play = app.quota.can_play();
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "Ловите орехи, которые сбрасывает белка!",
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(Span::styled(
        "Каждый пойманный орех даёт энергию:",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(vec![
        Span::styled("жёлудь o ×2 бонус", Style::default().fg(Color::Yellow)),
        Span::styled("  грецкий O +2", Style::default().fg(Color::LightRed)),
        Span::styled("  фундук @ +3", Style::default().fg(Color::LightMagenta)),
    ]));
    cl.push(Line::from(Span::styled(
        format!("Игра длится {GAME_DURATION_SECS} секунд, орехи ускоряются."),
        Style::default().fg(Color::Gray),
    )));
    cl.push_blank();
    cl.push(Line::from(Span::styled(
        format!(
            "Осталось игр сегодня: {}/{}",
            app.quota.remaining(),
            app.quota.limit()
        ),
        Style::default().fg(Color::White),
    )));
    cl.push(Line::from(Span::styled(
        format!("Рекорд: {}", app.high_score),
        Style::default().fg(Color::Gray),
    )));
    cl.push_blank();

    if can_play {
        cl.push_clickable(
            Line::from(Span::styled(
                " [SPACE] НАЧАТЬ ИГРУ ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            actions::CATCHER_START,
        );
    } else {
        cl.push(Line::from(Span::styled(
            "ЛИМИТ ИГР ИСЧЕРПАН",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        cl.push(Line::from(Span::styled(
            format!("Сброс через {}", format_countdown(app.secs_to_reset)),
            Style::default().fg(Color::Gray),
        )));
    }
    cl.push_blank();
    cl.push_clickable(
        Line::from(Span::styled(
            " [ESC] ВЫЙТИ ",
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        )),
        actions::CATCHER_CLOSE,
    );

    let width = 46u16.min(area.width);
    let overlay = overlay_rect(area, width, cl.visual_height(width.saturating_sub(2)) + 2);
    f.render_widget(Clear, overlay);

    cs.add_click_target(overlay, actions::NONE);
    cl.register_targets(overlay, cs, 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), overlay);
}

fn render_pause_banner(f: &mut Frame, area: Rect) {
    let overlay = overlay_rect(area, 30, 3);
    f.render_widget(Clear, overlay);
    let banner = Paragraph::new(Line::from(Span::styled(
        "ПАУЗА · [P] продолжить",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(banner, overlay);
}

fn render_catcher_game_over(f: &mut Frame, app: &App, cs: &mut ClickState, area: Rect) {
    let Some(session) = app.catcher.as_ref() else {
        return;
    };
    let overlay = overlay_rect(area, 40, 14);
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ИГРА ОКОНЧЕНА ");

    let can_play = app.quota.can_play();
    let new_record = session.score() > 0 && session.score() >= app.high_score;

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled("Счёт: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", session.score()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled("Энергия: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("+{}", session.energy_earned()),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled("Рекорд: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", app.high_score),
            Style::default().fg(Color::White),
        ),
    ]));
    if new_record {
        cl.push(Line::from(Span::styled(
            "НОВЫЙ РЕКОРД!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    cl.push_blank();

    if can_play {
        cl.push_clickable(
            Line::from(Span::styled(
                " [SPACE] ИГРАТЬ СНОВА ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            actions::CATCHER_RESTART,
        );
    } else {
        cl.push(Line::from(Span::styled(
            format!(
                "Дневной лимит исчерпан ({} из {}).",
                app.quota.games_played(),
                app.quota.limit()
            ),
            Style::default().fg(Color::Red),
        )));
        cl.push(Line::from(Span::styled(
            format!("Сброс через {}", format_countdown(app.secs_to_reset)),
            Style::default().fg(Color::Gray),
        )));
    }
    cl.push_blank();
    cl.push_clickable(
        Line::from(Span::styled(
            " [ESC] ВЫЙТИ ",
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        )),
        actions::CATCHER_EXIT,
    );

    cs.add_click_target(overlay, actions::NONE);
    cl.register_targets(overlay, cs, 1, 1, 0, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), overlay);
}

// ── Helpers ────────────────────────────────────────────────────

/// A centered overlay rect clamped to the available area.
fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
