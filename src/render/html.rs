use std::{collections::HashMap, fmt::Write as _};

use crate::{
    chart::PedigreeChart,
    foundation::error::{BloodlineError, BloodlineResult},
    render::label::{escape_markup, inbreeding_summary, title_label},
    render::settings::ChartSettings,
    render::table::{CellFill, TableCell, TablePlan},
};

/// Most `<tr>` rows a page may hold (16 generations).
pub const HTML_MAX_ROWS: u64 = 1 << 16;

/// Standalone HTML page with the pedigree as a `rowspan` table.
///
/// Columns past the deepest ancestor actually present are left out. Tables taller than
/// [`HTML_MAX_ROWS`] are rejected with a render error.
#[tracing::instrument(skip(chart, settings), fields(root = %chart.root_key))]
pub fn render_html(chart: &PedigreeChart, settings: &ChartSettings) -> BloodlineResult<String> {
    let plan = TablePlan::from_chart(chart)?;
    if plan.rows > HTML_MAX_ROWS {
        return Err(BloodlineError::render(format!(
            "too many rows for an html table ({} > {HTML_MAX_ROWS}); lower the generation count",
            plan.rows
        )));
    }
    let columns = reached_columns(&plan);
    let table_rows = render_rows(&plan, columns);
    let colors = &settings.colors;
    let col_width = 100.0 / f64::from(columns);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: "Hiragino Kaku Gothic ProN", "Meiryo", {font}; background: #f5f6f8; }}
    .pedigree {{ border-collapse: separate; border-spacing: 2px; width: 100%; max-width: 1100px; margin: 12px auto 24px; }}
    .pedigree td {{ background: #fff; border: 1px solid #d7d7d7; padding: 8px; font-size: 13px; line-height: 1.3; vertical-align: middle; width: {col_width:.2}%; }}
    .pedigree .b_ml {{ background: {male}; }}
    .pedigree .b_fml {{ background: {female}; }}
    .pedigree .b_unknown {{ background: {unknown}; color: #777; }}
    .pedigree .b_empty {{ background: #fafafa; color: #bbb; }}
    .pedigree .inbred {{ border: 2px solid {border}; }}
    .pedigree a {{ color: #1a4fb4; text-decoration: none; }}
    .title, .summary {{ max-width: 1100px; margin: 24px auto 0; }}
    .title {{ font-size: 18px; font-weight: bold; }}
  </style>
</head>
<body>
  <div class="title">{title} ({generations} generations)</div>
  <div class="summary">{summary}</div>
  <table class="pedigree">
{table_rows}  </table>
</body>
</html>
"#,
        title = escape_markup(&title_label(&chart.tree)),
        font = settings.font_family,
        male = colors.male_fill,
        female = colors.female_fill,
        unknown = colors.unknown_fill,
        border = colors.inbred_cell_border,
        generations = chart.generations,
        summary = escape_markup(&inbreeding_summary(chart)),
    );
    Ok(out)
}

fn reached_columns(plan: &TablePlan) -> u32 {
    plan.cells
        .iter()
        .map(|c| c.column + 1)
        .max()
        .unwrap_or(1)
        .min(plan.columns)
}

fn render_rows(plan: &TablePlan, columns: u32) -> String {
    let starts: HashMap<(u64, u32), &TableCell> = plan
        .cells
        .iter()
        .map(|c| ((c.first_row, c.column), c))
        .collect();

    // Remaining rows still covered by an open rowspan, per column.
    let mut covered = vec![0u64; columns as usize];
    let mut out = String::new();
    for row in 0..plan.rows {
        out.push_str("    <tr>");
        for col in 0..columns {
            let open = &mut covered[col as usize];
            if *open > 0 {
                *open -= 1;
                continue;
            }
            let Some(cell) = starts.get(&(row, col)) else {
                out.push_str(r#"<td class="b_empty">&nbsp;</td>"#);
                continue;
            };
            let span = cell.last_row - cell.first_row + 1;
            *open = span - 1;
            let _ = write!(
                out,
                r#"<td class="{}" rowspan="{span}">{}</td>"#,
                cell_class(cell),
                cell_body(cell)
            );
        }
        out.push_str("</tr>\n");
    }
    out
}

fn cell_class(cell: &TableCell) -> String {
    let base = match cell.fill {
        CellFill::Male => "b_ml",
        CellFill::Female => "b_fml",
        CellFill::Unknown if cell.text.is_empty() => "b_empty",
        CellFill::Unknown => "b_unknown",
        CellFill::Plain => "b_plain",
    };
    if cell.inbred {
        format!("{base} inbred")
    } else {
        base.to_string()
    }
}

fn cell_body(cell: &TableCell) -> String {
    if cell.text.is_empty() {
        return "&nbsp;".to_string();
    }
    let text = escape_markup(&cell.text);
    match &cell.url {
        Some(url) => format!(r#"<a href="{}">{text}</a>"#, escape_markup(url)),
        None => text,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/html.rs"]
mod tests;
