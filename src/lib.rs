//! Bloodline turns a flat horse registry (one CSV row per horse with sire and dam keys) into
//! pedigree charts.
//!
//! - Load records into a [`PedigreeRecordStore`]
//! - Build an [`AncestorNode`] tree and an [`InbreedingReport`] with [`PedigreeChart::prepare`]
//! - Place nodes with [`TabularLayout`] or [`CircularLayout`]
//! - Render a spreadsheet, an HTML table, a circular PNG, or a rotating GIF
#![forbid(unsafe_code)]

pub mod animation;
pub mod chart;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod pedigree;
pub mod render;

pub use crate::animation::rotation::RotationSequence;
pub use crate::chart::PedigreeChart;
pub use crate::encode::gif::{GifConfig, GifOutcome, encode_gif, render_rotating_gif};
pub use crate::foundation::core::{AncestorPath, Generations, ParentSide};
pub use crate::foundation::error::{BloodlineError, BloodlineResult};
pub use crate::layout::circular::{CircularLayout, CircularSlot};
pub use crate::layout::tabular::{TabularLayout, TabularSlot};
pub use crate::layout::{Layout, LayoutMode, Slot};
pub use crate::pedigree::inbreeding::{
    InbreedingDetector, InbreedingEntry, InbreedingReport, InbreedingSide,
};
pub use crate::pedigree::record::{HorseRecord, Sex};
pub use crate::pedigree::store::PedigreeRecordStore;
pub use crate::pedigree::tree::{AncestorNode, AncestryTreeBuilder};
pub use crate::render::FrameRGBA;
pub use crate::render::circle::CircularChart;
pub use crate::render::html::render_html;
pub use crate::render::settings::{AnimationSettings, ChartColors, ChartSettings};
pub use crate::render::xlsx::{build_workbook, write_xlsx, xlsx_bytes};
