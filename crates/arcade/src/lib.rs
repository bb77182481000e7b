//! Extra FacePlay games, published through the entry-point table.
//!
//! The `faceplay` binary calls [`register`] at startup; the games then show
//! up in the menu as coming from this package.

use faceplay_core::games::infrastructure::entry_points::EntryPointTable;
use faceplay_core::shared::constants::ENTRY_POINT_NAMESPACE;

pub mod reaction;

pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

pub fn register(table: &mut EntryPointTable) {
    table.register(
        ENTRY_POINT_NAMESPACE,
        "reaction",
        PACKAGE_NAME,
        reaction::create,
    );
}
