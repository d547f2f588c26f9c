//! Converts a JSON description of voxel-grid blocks into a line-delimited
//! script of timed ADB automation directives.
//!
//! The input document groups blocks into chunks with a shared origin. The
//! pipeline resolves every chunk-relative entry to an absolute position,
//! groups positions that differ only in their x-coordinate, compacts each
//! group into maximal runs of consecutive integers, and renders each run as
//! either a single `/setblock` or a `/fill` game command wrapped in the
//! device-input steps needed to type it into an on-screen chat field.
//!
//! The generator itself never talks to a device; the script it writes is
//! consumed by an external shell runner.

use std::path::PathBuf;

use snafu::Snafu;

pub mod compact;
pub mod document;
pub mod grid;
pub mod script;

/// An error that aborts a generation run.
///
/// Malformed individual block entries are not errors; they are skipped with
/// a warning so the rest of the document can still be processed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("could not read input file `{}`: {source}", path.display()))]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("invalid JSON in `{}`: {source}", path.display()))]
    ParseDocument {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("the `namespaces` list is missing or empty"))]
    EmptyNamespaces,
    #[snafu(display(
        "`totalBlocks` is zero or missing, but the direct-type dialect needs it for progress reporting"
    ))]
    MissingTotalBlocks,
    #[snafu(display("no valid block entries to generate commands from"))]
    NoBlocks,
    #[snafu(display("could not create output directory `{}`: {source}", path.display()))]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("could not write output file `{}`: {source}", path.display()))]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("could not read from the terminal: {source}"))]
    Prompt { source: std::io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
