//! Tierlist viewer. Runs the tier_viewer app.

use bevy::log::error;
use bevy::prelude::*;
use tier_viewer::prelude::*;

fn main() -> AppExit {
    let _ = dotenvy::dotenv();
    match TierlistBuilder::new().build() {
        Ok(mut app) => app.run(),
        Err(err) => {
            error!("tierlist: {err}");
            AppExit::error()
        }
    }
}
