//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    game::{Mode, Snapshot},
    grid::{Cell, Coord},
    types::{Layer, MainMenuItem, Screen},
    App,
};

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from coordinate conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::InGame => in_game(&app.snapshot, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the centered, bordered frame of a menu and returns one row per menu item.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, title: &str, items: u16) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(items + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(title)
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); items.into()]).split(inner_space)
}

/// Renders the main menu screen, highlighting the currently selected item.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let rows = init_menu(frame, "fogmaze", 2);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (entry, row) in MainMenuItem::ALL.into_iter().zip(rows.iter()) {
        let style = if entry == item {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::styled(entry.repr(), style).centered(), *row);
    }
}

/// Renders the in-game screen: the fogged maze on a canvas and a status bar below it.
///
/// Unrevealed cells are left blank. Revealed cells are grouped into [`Layer`]s and painted in
/// layer order, with the player always on top.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn in_game(snapshot: &Snapshot, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let side = u16::try_from(snapshot.size)?;

    // Maze area on top, status bar at the bottom
    let overall_layout =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(frame.area());
    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let maze_area = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(side),
        Constraint::Min(1),
    ])
    .split(maze_content_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze area from layout")?;
    let space = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(side),
        Constraint::Min(1),
    ])
    .split(maze_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze space from horizontal layout")?;

    // Pre-compute screen coordinates to handle errors before the paint closure
    let layers = layer_coords(snapshot)
        .into_iter()
        .map(|(layer, coords)| Ok((layer, transform_to_screen_coords(&coords, snapshot.size)?)))
        .collect::<Result<Vec<_>>>()?;

    let maze = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Dot)
        .paint(|ctx| {
            for (layer, coords) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: layer.color(),
                });
            }
        });

    frame.render_widget(maze, space);

    let status = Paragraph::new(status_line(snapshot))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .block(
            Block::bordered()
                .title("(arrows/wasd) move / (g) hint / (r) restart / (h) menu / (q) quit")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Plain)
                .borders(Borders::TOP),
        );

    frame.render_widget(status, status_area);

    Ok(())
}

/// Groups the visible cells of a snapshot by drawing layer, in painting order.
pub(crate) fn layer_coords(snapshot: &Snapshot) -> Vec<(Layer, Vec<Coord>)> {
    Layer::ALL
        .into_iter()
        .map(|layer| {
            let coords = if layer == Layer::Player {
                vec![snapshot.player]
            } else {
                snapshot
                    .cells
                    .iter()
                    .filter(|cell| cell.is_revealed())
                    .filter(|cell| Layer::of(cell.kind(), cell.is_hinted()) == Some(layer))
                    .map(Cell::coord)
                    .collect()
            };
            (layer, coords)
        })
        .collect()
}

/// Converts grid coordinates into canvas coordinates centered on the origin.
///
/// Rows grow downwards on the grid but upwards on the canvas, so the row axis is flipped.
///
/// # Errors
///
/// Returns an error if a coordinate or the grid size does not fit the terminal coordinate range.
pub(crate) fn transform_to_screen_coords(
    coords: &[Coord],
    size: usize,
) -> Result<Vec<(f64, f64)>> {
    let side = f64::from(u16::try_from(size)?);

    coords
        .iter()
        .map(|coord| {
            // Row transformation: coordinate[i] = (n - 1) / 2 - i
            let screen_y = (side - 1.) / 2. - f64::from(u16::try_from(coord.y)?);

            // Column transformation: coordinate[i] = i - (n - 1) / 2
            let screen_x = f64::from(u16::try_from(coord.x)?) - (side - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Builds the text of the status bar.
pub(crate) fn status_line(snapshot: &Snapshot) -> String {
    let hint = if snapshot.hint_active {
        "shown".to_owned()
    } else if snapshot.cooldown_secs > 0 {
        format!("{}s", snapshot.cooldown_secs)
    } else {
        "ready".to_owned()
    };
    let key = match (snapshot.gated, snapshot.has_key) {
        (false, _) => "",
        (true, true) => " | key: found",
        (true, false) => " | key: missing",
    };
    let mode = match snapshot.mode {
        Mode::Playing => "",
        Mode::Victory => " | exit reached! (n) next level",
        Mode::GameOver => " | trapped! (r) restart",
    };

    format!("level {} | hint: {hint}{key}{mode}", snapshot.level)
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{app::tests::create_test_app, game::Command, grid::Direction};

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Flattens the terminal buffer into a single string.
    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draw_main_menu() {
        let app = create_test_app();
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing main menu should succeed");
        let text = screen_text(&terminal);
        assert!(text.contains("Play"), "menu should list the play item");
        assert!(text.contains("Quit"), "menu should list the quit item");
    }

    #[test]
    fn test_init_menu_rows() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            let layout = init_menu(frame, "fogmaze", 2);
            assert_eq!(layout.len(), 2, "main menu should have 2 items");
        });

        assert!(result.is_ok(), "initializing main menu should succeed");
    }

    #[test]
    fn test_draw_in_game() {
        let mut app = create_test_app();
        let mut terminal = create_test_terminal();
        app.screen = Screen::InGame;

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing in-game screen should succeed");
        assert!(screen_text(&terminal).contains("level 5"));
    }

    #[test]
    fn test_draw_in_game_on_small_terminal() {
        let app = create_test_app();
        let mut terminal =
            Terminal::new(TestBackend::new(10, 6)).expect("failed to create test terminal");

        let result = terminal.draw(|frame| {
            in_game(&app.snapshot, frame).expect("in-game should render on a tiny terminal");
        });

        assert!(result.is_ok(), "rendering on a small terminal should succeed");
    }

    #[test]
    fn test_victory_status() {
        let mut app = create_test_app();
        let route = [
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Down,
            Direction::Down,
        ];
        for direction in route {
            assert!(app.dispatch(Command::Move(direction)), "{direction:?} should be accepted");
        }

        assert_eq!(app.snapshot.mode, Mode::Victory);
        assert!(status_line(&app.snapshot).contains("next level"));
        assert!(status_line(&app.snapshot).contains("key: found"));
    }

    #[test]
    fn test_layers_hide_the_fog() {
        let app = create_test_app();

        let layers = layer_coords(&app.snapshot);
        let walls = layers
            .iter()
            .find(|(layer, _)| *layer == Layer::Wall)
            .map(|(_, coords)| coords.clone())
            .expect("wall layer should exist");
        let player = layers.last().expect("player layer should exist");

        assert!(walls.contains(&Coord::new(0, 0)), "walls next to the spawn should be visible");
        assert!(
            !walls.contains(&Coord::new(6, 6)),
            "the far corner is outside the reveal radius"
        );
        assert_eq!(player, &(Layer::Player, vec![Coord::new(1, 1)]));
    }

    #[test]
    fn test_transform_to_screen_coords_centers_the_grid() {
        let coords = [Coord::new(0, 0), Coord::new(2, 2), Coord::new(4, 0)];

        let screen = transform_to_screen_coords(&coords, 5).expect("coordinates should convert");

        assert_eq!(screen, vec![(-2.0, 2.0), (0.0, 0.0), (2.0, 2.0)]);
    }
}
