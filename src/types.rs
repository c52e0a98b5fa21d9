//! Type definitions and enums for the terminal frontend state and navigation.

use ratatui::style::Color;

use crate::grid::CellKind;

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu(MainMenuItem),
    /// In-game maze screen.
    ///
    /// This variant represents the screen where the fogged maze is displayed and played.
    InGame,
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which items
/// can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Play" menu option.
    StartGame,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Every item, in the order they are listed on screen.
    pub(crate) const ALL: [Self; 2] = [Self::StartGame, Self::Quit];

    /// Returns the label shown for the item.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::StartGame => "Play",
            Self::Quit => "Quit",
        }
    }

    /// Returns the item below this one, staying on the last item.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::StartGame | Self::Quit => Self::Quit,
        }
    }

    /// Returns the item above this one, staying on the first item.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::StartGame | Self::Quit => Self::StartGame,
        }
    }
}

/// Drawing layer of the maze canvas.
///
/// Cells are grouped into layers that are painted in declaration order, so later layers cover
/// earlier ones where they overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Layer {
    /// Revealed walls.
    Wall,
    /// Highlighted hint cells.
    Hint,
    /// The key.
    Key,
    /// The door, locked or open.
    Door,
    /// The exit.
    Exit,
    /// Revealed traps.
    Trap,
    /// The player.
    Player,
}

impl Layer {
    /// Every layer, in painting order.
    pub(crate) const ALL: [Self; 7] = [
        Self::Wall,
        Self::Hint,
        Self::Key,
        Self::Door,
        Self::Exit,
        Self::Trap,
        Self::Player,
    ];

    /// Returns the layer a revealed cell is drawn on, if any. Plain corridors stay blank unless
    /// hinted.
    pub(crate) const fn of(kind: CellKind, hinted: bool) -> Option<Self> {
        match kind {
            CellKind::Wall => Some(Self::Wall),
            CellKind::Key => Some(Self::Key),
            CellKind::Door => Some(Self::Door),
            CellKind::End => Some(Self::Exit),
            CellKind::Sin => Some(Self::Trap),
            CellKind::Path | CellKind::Start if hinted => Some(Self::Hint),
            CellKind::Path | CellKind::Start => None,
        }
    }

    /// Returns the color the layer is painted with.
    pub(crate) const fn color(self) -> Color {
        match self {
            Self::Wall => Color::Green,
            Self::Hint => Color::Cyan,
            Self::Key => Color::Yellow,
            Self::Door => Color::Magenta,
            Self::Exit => Color::White,
            Self::Trap => Color::Red,
            Self::Player => Color::LightBlue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_variants() {
        let main_menu = Screen::MainMenu(MainMenuItem::StartGame);
        let in_game = Screen::InGame;

        assert_eq!(main_menu, Screen::MainMenu(MainMenuItem::StartGame));
        assert_ne!(main_menu, in_game);
    }

    #[test]
    fn test_main_menu_navigation_stops_at_the_edges() {
        assert_eq!(MainMenuItem::StartGame.next(), MainMenuItem::Quit);
        assert_eq!(MainMenuItem::Quit.next(), MainMenuItem::Quit);
        assert_eq!(MainMenuItem::Quit.previous(), MainMenuItem::StartGame);
        assert_eq!(MainMenuItem::StartGame.previous(), MainMenuItem::StartGame);
    }

    #[test]
    fn test_main_menu_labels() {
        let labels: Vec<&str> = MainMenuItem::ALL.iter().map(|item| item.repr()).collect();

        assert_eq!(labels, vec!["Play", "Quit"]);
    }

    #[test]
    fn test_layers_for_cell_kinds() {
        assert_eq!(Layer::of(CellKind::Wall, false), Some(Layer::Wall));
        assert_eq!(Layer::of(CellKind::Sin, false), Some(Layer::Trap));
        assert_eq!(Layer::of(CellKind::Path, false), None);
        assert_eq!(Layer::of(CellKind::Path, true), Some(Layer::Hint));
        assert_eq!(Layer::of(CellKind::Door, true), Some(Layer::Door));
        assert_eq!(Layer::of(CellKind::End, false), Some(Layer::Exit));
    }

    #[test]
    fn test_player_is_painted_last() {
        assert_eq!(Layer::ALL.last(), Some(&Layer::Player));
        assert!(Layer::ALL.windows(2).all(|pair| pair.first() < pair.get(1)));
    }
}
