//! Rules core for the game of chess: board model, legal move generation with
//! self-check filtering, attack and check detection, castling, making and
//! unmaking moves, and classification of finished games.
//!
//! The search that picks among the legal moves, the transport that talks to
//! clients and the process wiring around a game loop are deliberately left to
//! the consumers of this crate. [`chess::position::Position`] is the single
//! mutable aggregate all of them operate on.
//!
//! ```
//! use regicide::chess::game::GameResult;
//! use regicide::chess::position::Position;
//!
//! let mut position = Position::starting();
//! assert_eq!(position.generate_moves().len(), 20);
//! assert_eq!(position.classify(), GameResult::Ongoing);
//! ```

// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod chess;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full crate version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version and the build type on driver
/// startup.
pub fn print_engine_info() {
    println!("{} {}", build::PROJECT_NAME, engine_version());
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
