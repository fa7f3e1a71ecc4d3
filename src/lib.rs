//! Core library for building printable music-quiz decks.
//!
//! Tracks are read from tagged FLAC files, bucketed into pages, drawn as
//! two-sided SVG sheets (titles on the front, QR codes on the back) and
//! merged into one PDF. The codes point at a small player website generated
//! alongside the deck.

mod audio;
mod config;
mod deck;
mod pipeline;
mod qr;
mod sheet;
mod site;
mod track;

pub use audio::{AudioError, encode_track, load_tracks, parse_metaflac_output, read_tags};
pub use config::{Config, ConfigError, LayoutSection, MissingPage, PipelineSection};
pub use deck::{DeckStats, Page, fingerprint, paginate};
pub use pipeline::{
    DocumentConverter, DocumentMerger, Inkscape, MissingPagePolicy, PdfUnite, PipelineError,
    PipelineOptions, PipelineReport, RetryPolicy, SheetPipeline,
};
pub use qr::{CodeError, CodeGenerator, CodeSymbol, MODULE_MM, QUIET_ZONE, QrCodeGenerator};
pub use sheet::{
    CARD_SIDE_MM, Line, MAX_LINE_CHARS, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Rect, SheetLayout, Side,
    escape, fit_lines, num, render_page,
};
pub use site::{PlayerPage, SiteError, Texts, index_json, load_texts, write_site};
pub use track::{IndexEntry, Track, TrackError};
