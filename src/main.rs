//! This crate contains the source code for the binary for the game fogmaze.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use fogmaze::{
    cli::Cli,
    game::Session,
    logging,
    progress::{FileLevelStore, LevelStore, XpTally},
    App,
};
use log::info;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let store = FileLevelStore::new(&cli.save_file);
    let level = cli.level.or_else(|| store.load_level()).unwrap_or(1);
    let rng = cli
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    info!(
        "starting at level {level} with save file {}",
        store.path().display()
    );

    let store: Box<dyn LevelStore> = Box::new(store);
    let session = Session::new(level, rng, XpTally::default(), store)?;

    let mut terminal = ratatui::init();
    let result = App::new(session).run(&mut terminal);
    ratatui::restore();

    result
}
