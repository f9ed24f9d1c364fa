use std::path::Path;

use anyhow::Context;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::{
    chart::PedigreeChart,
    foundation::error::{BloodlineError, BloodlineResult},
    render::label::{inbreeding_summary, title_label},
    render::settings::{ChartSettings, parse_hex_rgb},
    render::table::{CellFill, TableCell, TablePlan},
};

/// Excel's hard row limit.
pub const EXCEL_MAX_ROWS: u64 = 1_048_576;

/// Title and summary rows above the pedigree.
const HEADER_ROWS: u64 = 2;

struct CellColors {
    male: u32,
    female: u32,
    unknown: u32,
    border: u32,
}

impl CellColors {
    fn from_settings(settings: &ChartSettings) -> BloodlineResult<Self> {
        let c = &settings.colors;
        Ok(Self {
            male: parse_hex_rgb(&c.male_fill)?,
            female: parse_hex_rgb(&c.female_fill)?,
            unknown: parse_hex_rgb(&c.unknown_fill)?,
            border: parse_hex_rgb(&c.inbred_cell_border)?,
        })
    }

    fn format_for(&self, cell: &TableCell) -> Format {
        let mut format = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();
        let fill = match cell.fill {
            CellFill::Male => Some(self.male),
            CellFill::Female => Some(self.female),
            CellFill::Unknown => Some(self.unknown),
            CellFill::Plain => None,
        };
        if let Some(rgb) = fill {
            format = format.set_background_color(Color::RGB(rgb));
        }
        if cell.inbred {
            format = format
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::RGB(self.border));
        }
        format
    }
}

/// Build the pedigree workbook: title row, inbreeding summary row, then one column per
/// generation with each ancestor merged over its row band.
#[tracing::instrument(skip(chart, settings), fields(root = %chart.root_key))]
pub fn build_workbook(chart: &PedigreeChart, settings: &ChartSettings) -> BloodlineResult<Workbook> {
    let plan = TablePlan::from_chart(chart)?;
    if plan.rows + HEADER_ROWS > EXCEL_MAX_ROWS {
        return Err(BloodlineError::render(format!(
            "too many rows for a spreadsheet ({} > {EXCEL_MAX_ROWS}); lower the generation count",
            plan.rows + HEADER_ROWS
        )));
    }
    let colors = CellColors::from_settings(settings)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Pedigree").context("name worksheet")?;

    let last_col = to_col(plan.columns.saturating_sub(1))?;
    for col in 0..=last_col {
        sheet
            .set_column_width(col, settings.column_width)
            .context("set column width")?;
    }

    let header = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);
    write_span(sheet, 0, 0, 0, last_col, &title_label(&chart.tree), &header)?;
    write_span(sheet, 1, 0, 1, last_col, &inbreeding_summary(chart), &header)?;

    for cell in &plan.cells {
        let first = to_row(cell.first_row + HEADER_ROWS)?;
        let last = to_row(cell.last_row + HEADER_ROWS)?;
        let col = to_col(cell.column)?;
        write_span(sheet, first, col, last, col, &cell.text, &colors.format_for(cell))?;
    }

    tracing::debug!(cells = plan.cells.len(), rows = plan.rows, "built pedigree sheet");
    Ok(workbook)
}

/// Write the workbook to `path`.
pub fn write_xlsx(chart: &PedigreeChart, settings: &ChartSettings, path: &Path) -> BloodlineResult<()> {
    let mut workbook = build_workbook(chart, settings)?;
    workbook
        .save(path)
        .with_context(|| format!("write xlsx '{}'", path.display()))?;
    Ok(())
}

/// Serialized `.xlsx` bytes.
pub fn xlsx_bytes(chart: &PedigreeChart, settings: &ChartSettings) -> BloodlineResult<Vec<u8>> {
    let mut workbook = build_workbook(chart, settings)?;
    let bytes = workbook.save_to_buffer().context("serialize xlsx")?;
    Ok(bytes)
}

fn write_span(
    sheet: &mut Worksheet,
    first_row: u32,
    first_col: u16,
    last_row: u32,
    last_col: u16,
    text: &str,
    format: &Format,
) -> BloodlineResult<()> {
    if first_row == last_row && first_col == last_col {
        sheet
            .write_string_with_format(first_row, first_col, text, format)
            .with_context(|| format!("write cell ({first_row}, {first_col})"))?;
    } else {
        sheet
            .merge_range(first_row, first_col, last_row, last_col, text, format)
            .with_context(|| format!("merge cells ({first_row}, {first_col})..({last_row}, {last_col})"))?;
    }
    Ok(())
}

fn to_row(row: u64) -> BloodlineResult<u32> {
    u32::try_from(row).map_err(|_| BloodlineError::render(format!("row {row} out of range")))
}

fn to_col(col: u32) -> BloodlineResult<u16> {
    u16::try_from(col).map_err(|_| BloodlineError::render(format!("column {col} out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/xlsx.rs"]
mod tests;
