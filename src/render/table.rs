use crate::{
    chart::PedigreeChart,
    foundation::core::ParentSide,
    foundation::error::BloodlineResult,
    layout::tabular::TabularLayout,
    pedigree::record::Sex,
    pedigree::tree::AncestorNode,
    render::label::display_label,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Semantic fill of a cell; renderers map it to colours.
pub enum CellFill {
    Male,
    Female,
    Unknown,
    /// Known horse with no recorded sex and no parent side (the root).
    Plain,
}

impl CellFill {
    pub fn for_node(node: &AncestorNode) -> Self {
        let Some(rec) = &node.record else {
            return CellFill::Unknown;
        };
        match (rec.sex, node.path.last()) {
            (Sex::Male, _) => CellFill::Male,
            (Sex::Female, _) => CellFill::Female,
            (Sex::Unknown, Some(ParentSide::Sire)) => CellFill::Male,
            (Sex::Unknown, Some(ParentSide::Dam)) => CellFill::Female,
            (Sex::Unknown, None) => CellFill::Plain,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One merged cell of the pedigree table. Rows are relative to the first pedigree row.
pub struct TableCell {
    pub first_row: u64,
    pub last_row: u64,
    pub column: u32,
    pub text: String,
    pub fill: CellFill,
    /// Repeated ancestor that should get the highlight border.
    pub inbred: bool,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Cell plan shared by the spreadsheet and HTML renderers.
pub struct TablePlan {
    pub rows: u64,
    pub columns: u32,
    /// Cells in pre-order (sire before dam).
    pub cells: Vec<TableCell>,
}

impl TablePlan {
    pub fn from_chart(chart: &PedigreeChart) -> BloodlineResult<Self> {
        let layout = TabularLayout::new(chart.generations)?;
        let mut cells = Vec::with_capacity(chart.tree.node_count());
        for node in chart.tree.walk() {
            let slot = layout.slot_for(node)?;
            let inbred = node
                .primary_key()
                .is_some_and(|k| chart.inbreeding.flag_for(k).is_some());
            cells.push(TableCell {
                first_row: slot.band_first,
                last_row: slot.band_last,
                column: slot.column,
                text: display_label(node),
                fill: CellFill::for_node(node),
                inbred,
                url: node
                    .record
                    .as_ref()
                    .map(|r| r.url.clone())
                    .filter(|u| !u.is_empty()),
            });
        }
        Ok(Self {
            rows: layout.total_rows(),
            columns: layout.columns(),
            cells,
        })
    }

    /// Cell whose band starts at `row` in `column`.
    pub fn cell_starting_at(&self, row: u64, column: u32) -> Option<&TableCell> {
        self.cells
            .iter()
            .find(|c| c.first_row == row && c.column == column)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/table.rs"]
mod tests;
