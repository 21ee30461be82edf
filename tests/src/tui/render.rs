use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tfplan_core::build_forest;
use tfplan_tests::{fixture_forest, init_tracing};
use tfplan_tui::event::{handle_key_event, handle_mouse_event};
use tfplan_tui::{ui, App, Theme};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 12;

async fn app(fixture: &str, width: u16, height: u16) -> Result<App> {
    let forest = fixture_forest(fixture).await?;
    Ok(App::new(forest, Theme::default(), fixture, width, height))
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) -> Result<Vec<String>> {
    terminal.draw(|f| ui::ui(f, app))?;
    let buffer = terminal.backend().buffer();
    let rows = (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect();
    Ok(rows)
}

fn click(app: &mut App, row: u16) {
    handle_mouse_event(
        app,
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        },
    );
}

fn press(app: &mut App, code: KeyCode) {
    handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
}

#[tokio::test]
async fn test_full_frame_layout() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("create.json", WIDTH, HEIGHT).await?;
    let rows = draw(&mut terminal, &mut app)?;

    assert!(rows[0].contains(" tfplan "), "header: {}", rows[0]);
    assert!(rows[0].contains("create.json"));
    assert!(rows[1].starts_with("> "), "cursor marker: {}", rows[1]);
    assert!(rows[1].contains("# random_pet.name will be created"));
    assert!(
        rows[2].contains("▶ + resource \"random_pet\" \"name\" {"),
        "collapsed block: {}",
        rows[2]
    );
    assert!(rows[3].trim_start().starts_with('}'));
    assert!(rows[4].contains("Plan: 1 to add, 0 to change, 0 to destroy"));
    assert!(rows[5].trim().is_empty());

    let status = &rows[usize::from(HEIGHT) - 1];
    assert!(status.starts_with("Line 1 of 4 (25%)"), "status: {status}");
    assert!(status.contains("Press ? for help"));
    Ok(())
}

#[tokio::test]
async fn test_cursor_row_is_filled() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("create.json", WIDTH, HEIGHT).await?;
    draw(&mut terminal, &mut app)?;

    let background = app.theme.cursor_background;
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(WIDTH - 1, 1)].bg, background, "cursor row reaches the edge");
    assert_ne!(buffer[(WIDTH - 1, 2)].bg, background, "other rows stay plain");
    Ok(())
}

#[tokio::test]
async fn test_click_selects_then_toggles() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("create.json", WIDTH, HEIGHT).await?;
    draw(&mut terminal, &mut app)?;

    click(&mut app, 2);
    assert_eq!(app.navigator.cursor(), 1);
    click(&mut app, 2);
    let rows = draw(&mut terminal, &mut app)?;
    assert!(rows[2].contains("▼ + resource"), "expanded block: {}", rows[2]);
    assert!(rows[3].contains("+ name = \"x\""));

    // Header and status rows are outside the plan panel.
    click(&mut app, 0);
    click(&mut app, HEIGHT - 1);
    assert_eq!(app.navigator.cursor(), 1);
    Ok(())
}

#[tokio::test]
async fn test_long_lines_wrap_inside_panel() -> Result<()> {
    init_tracing();
    let (width, height) = (30, 20);
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    let mut app = app("mixed.json", width, height).await?;
    press(&mut app, KeyCode::Char('a'));
    let rows = draw(&mut terminal, &mut app)?;

    let plan_rows = usize::from(height) - 2;
    assert_eq!(app.row_map.len(), plan_rows);
    assert!(
        app.row_map.windows(2).any(|pair| pair[0] == pair[1]),
        "some row wraps at width {width}: {:?}",
        app.row_map
    );
    assert!(rows[1].contains("# aws_s3_bucket.logs"));
    assert!(!rows[2].starts_with('>'), "continuation has no cursor marker");
    Ok(())
}

#[tokio::test]
async fn test_horizontal_scroll_marks_hidden_columns() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("create.json", WIDTH, HEIGHT).await?;
    handle_mouse_event(
        &mut app,
        MouseEvent {
            kind: MouseEventKind::ScrollRight,
            column: 0,
            row: 1,
            modifiers: KeyModifiers::NONE,
        },
    );
    assert_eq!(app.navigator.horizontal_offset(), 20);
    let rows = draw(&mut terminal, &mut app)?;
    assert!(rows[1].starts_with("… "), "scrolled row: {}", rows[1]);
    assert!(!rows[1].contains("# random_pet"));
    Ok(())
}

#[tokio::test]
async fn test_search_status_and_help_overlay() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, 30))?;
    let mut app = app("mixed.json", WIDTH, 30).await?;

    press(&mut app, KeyCode::Char('/'));
    for c in "sg-3".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    let rows = draw(&mut terminal, &mut app)?;
    assert!(rows[29].contains("Search: sg-3|"), "typing: {}", rows[29]);

    press(&mut app, KeyCode::Enter);
    let rows = draw(&mut terminal, &mut app)?;
    assert!(rows[29].contains("Search: sg-3 (1/1 matches)"), "active: {}", rows[29]);
    assert!(rows.iter().any(|row| row.starts_with("> ") && row.contains("\"sg-3\"")));

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('?'));
    let rows = draw(&mut terminal, &mut app)?;
    assert!(rows.iter().any(|row| row.contains("expand all / collapse all")));
    Ok(())
}

#[tokio::test]
async fn test_cursor_row_drawn_below_wrapped_rows() -> Result<()> {
    init_tracing();
    let (long_before, long_after) = ("a".repeat(60), "b".repeat(60));
    let plan = format!(
        r#"{{"resource_changes":[{{"address":"t.n","type":"t","name":"n",
            "change":{{"actions":["update"],
            "before":{{"k1":"{long_before}","k2":"{long_before}","k3":"{long_before}","k4":1}},
            "after":{{"k1":"{long_after}","k2":"{long_after}","k3":"{long_after}","k4":2}}}}}}]}}"#
    );
    let (width, height) = (40, 8);
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    let mut app = App::new(build_forest(&plan), Theme::default(), "wrap", width, height);
    app.navigator.expand_all();
    app.navigator.select_index(5);
    let rows = draw(&mut terminal, &mut app)?;

    assert!(app.row_map.contains(&5), "cursor row missing: {:?}", app.row_map);
    let cursor_line = rows
        .iter()
        .find(|row| row.starts_with("> "))
        .expect("a line carries the cursor marker");
    assert!(cursor_line.contains("~ k4 = 1 -> 2"), "cursor line: {cursor_line}");

    let y = app.plan_area.y
        + u16::try_from(app.row_map.iter().position(|&row| row == 5).unwrap_or_default())?;
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(width - 1, y)].bg, app.theme.cursor_background);
    Ok(())
}

/// Columns of `phrase` in `row`; plan rows here are plain ASCII.
fn columns_of(row: &str, phrase: &str) -> std::ops::Range<u16> {
    let start = row.find(phrase).unwrap_or_else(|| panic!("{phrase:?} not in {row:?}"));
    let start = u16::try_from(start).unwrap_or(u16::MAX);
    start..start + u16::try_from(phrase.len()).unwrap_or(u16::MAX)
}

#[tokio::test]
async fn test_drift_colors_only_its_phrase() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("drift.json", WIDTH, HEIGHT).await?;
    let rows = draw(&mut terminal, &mut app)?;

    let header = "# aws_s3_bucket.logs has drifted (update)";
    let text = columns_of(&rows[1], header);
    let phrase = columns_of(&rows[1], "has drifted");
    let buffer = terminal.backend().buffer();
    for x in text {
        let fg = buffer[(x, 1)].fg;
        if phrase.contains(&x) {
            assert_eq!(fg, app.theme.drift, "column {x} inside the phrase");
        } else {
            assert_eq!(fg, ratatui::style::Color::Reset, "column {x} outside the phrase");
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_move_phrase_gets_its_own_accent() -> Result<()> {
    init_tracing();
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT))?;
    let mut app = app("moved.json", WIDTH, HEIGHT).await?;
    let rows = draw(&mut terminal, &mut app)?;

    // vpc header, its block and brace come first.
    let y = 4;
    let header = "# aws_lb.front will be updated (moved from aws_lb.legacy)";
    let text = columns_of(&rows[usize::from(y)], header);
    let phrase = columns_of(&rows[usize::from(y)], "(moved from aws_lb.legacy)");
    let buffer = terminal.backend().buffer();
    for x in text {
        let expected = if phrase.contains(&x) {
            app.theme.moved
        } else {
            app.theme.warning
        };
        assert_eq!(buffer[(x, y)].fg, expected, "column {x}");
    }
    Ok(())
}
