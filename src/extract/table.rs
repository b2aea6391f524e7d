// src/extract/table.rs

use scraper::{ElementRef, Html};
use tracing::debug;

use super::{collapse_ws, selector, Extraction, Schema};
use crate::error::PipelineError;

fn nearest_table(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Cell text without the text of any table nested inside the cell.
fn cell_text(cell: ElementRef<'_>) -> String {
    let joined: String = cell
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let nested = node
                .ancestors()
                .take_while(|a| a.id() != cell.id())
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().name() == "table");
            (!nested).then_some(&**text)
        })
        .collect();
    collapse_ws(&joined)
}

/// Extract the first `<table>` of `markup`.
///
/// Only the table's own rows count; rows of nested tables are ignored. The
/// schema is the last row of only `<th>` cells before the first data row, so
/// caption or grouping rows above the real header are skipped. Every row with at
/// least one `<td>` is a data row; its direct `<td>`/`<th>` children are the fields.
pub fn extract_table(markup: &str) -> Result<Extraction, PipelineError> {
    let doc = Html::parse_document(markup);
    let table_sel = selector("table")?;
    let tr_sel = selector("tr")?;

    let table = doc
        .select(&table_sel)
        .next()
        .ok_or_else(|| PipelineError::structure("no <table> in document"))?;

    let mut header: Option<Schema> = None;
    let mut candidates = Vec::new();

    let own_rows = table
        .select(&tr_sel)
        .filter(|row| nearest_table(*row).map_or(false, |t| t.id() == table.id()));

    for row in own_rows {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "td" | "th"))
            .collect();
        let has_td = cells.iter().any(|c| c.value().name() == "td");

        if has_td {
            candidates.push(cells.into_iter().map(cell_text).collect::<Vec<_>>());
        } else if candidates.is_empty() && !cells.is_empty() {
            header = Some(Schema::new(cells.into_iter().map(cell_text).collect()));
        }
    }

    let schema = header.ok_or_else(|| PipelineError::structure("table has no header cells"))?;
    let extraction = Extraction::from_candidates(schema, candidates);
    debug!(
        columns = extraction.schema.len(),
        rows = extraction.rows.len(),
        dropped = extraction.dropped,
        "extracted table"
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMISSIONS_PAGE: &str = r#"
<html><body>
<h1>CO2 Emissions</h1>
<table class="table">
  <thead>
    <tr><th>Year</th><th> Fossil CO2
        Emissions (tons) </th><th>Change</th></tr>
  </thead>
  <tbody>
    <tr><td>2020</td><td>4,715,691,000</td><td>-10.5%</td></tr>
    <tr><td>2019</td><td>5,259,144,000</td><td>-2.6%</td></tr>
    <tr><td>broken row</td></tr>
    <tr><td>1965</td><td>3,270,000,000</td><td>4.1%</td></tr>
  </tbody>
</table>
<table><tr><th>Other</th></tr><tr><td>ignored</td></tr></table>
</body></html>"#;

    #[test]
    fn test_extract_table_rows_in_document_order() {
        let ex = extract_table(EMISSIONS_PAGE).unwrap();
        assert_eq!(
            ex.schema.fields(),
            ["Year", "Fossil CO2 Emissions (tons)", "Change"]
        );
        let years: Vec<&str> = ex.rows.iter().filter_map(|r| r.get(0)).collect();
        assert_eq!(years, ["2020", "2019", "1965"]);
        assert_eq!(ex.rows[0].get(1), Some("4,715,691,000"));
        assert_eq!(ex.dropped, 1);
    }

    #[test]
    fn test_extract_table_without_table_fails() {
        let err = extract_table("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, PipelineError::StructureNotFound { .. }));
    }

    #[test]
    fn test_extract_table_without_header_fails() {
        let err = extract_table("<table><tr><td>1</td></tr></table>").unwrap_err();
        assert!(matches!(err, PipelineError::StructureNotFound { .. }));
    }

    #[test]
    fn test_extract_table_header_only_is_empty() {
        let ex = extract_table("<table><tr><th>Year</th><th>Tons</th></tr></table>").unwrap();
        assert_eq!(ex.schema.len(), 2);
        assert!(ex.rows.is_empty());
        assert_eq!(ex.dropped, 0);
    }

    #[test]
    fn test_extract_table_row_header_cells_count_as_fields() {
        let html = r#"<table>
            <tr><th>Country</th><th>Tons</th></tr>
            <tr><th>China</th><td>11,000</td></tr>
            <tr><td>India</td><td>2,400</td></tr>
        </table>"#;
        let ex = extract_table(html).unwrap();
        assert_eq!(ex.rows.len(), 2);
        assert_eq!(ex.rows[0].fields(), ["China", "11,000"]);
    }

    #[test]
    fn test_extract_table_ignores_nested_tables() {
        let html = r#"<table>
            <tr><th>Year</th><th>Tons</th></tr>
            <tr><td>2020</td><td><table><tr><td>a</td><td>b</td></tr></table></td></tr>
        </table>"#;
        let ex = extract_table(html).unwrap();
        assert_eq!(ex.rows.len(), 1);
        assert_eq!(ex.rows[0].fields(), ["2020", ""]);
        assert_eq!(ex.dropped, 0);
    }

    #[test]
    fn test_extract_table_skips_caption_row_above_header() {
        let html = r#"<table>
            <thead>
              <tr><th colspan="2">US CO2 Emissions</th></tr>
              <tr><th>Year</th><th>Tons</th></tr>
            </thead>
            <tbody>
              <tr><td>2020</td><td>4,715,691,000</td></tr>
              <tr><th>Year</th><th>Tons</th></tr>
              <tr><td>2019</td><td>5,259,144,000</td></tr>
            </tbody>
        </table>"#;
        let ex = extract_table(html).unwrap();
        assert_eq!(ex.schema.fields(), ["Year", "Tons"]);
        assert_eq!(ex.rows.len(), 2);
        assert_eq!(ex.dropped, 0);
    }

    #[test]
    fn test_extract_table_k_rows_property() {
        for k in [0usize, 1, 7, 40] {
            let body: String = (0..k)
                .map(|i| format!("<tr><td>{}</td><td>{}</td></tr>", 1900 + i, i * 10))
                .collect();
            let html = format!("<table><tr><th>Year</th><th>Tons</th></tr>{body}</table>");
            let ex = extract_table(&html).unwrap();
            assert_eq!(ex.rows.len(), k);
            assert_eq!(ex.schema.len(), 2);
            if k > 0 {
                assert_eq!(ex.rows[k - 1].get(0), Some((1900 + k - 1).to_string().as_str()));
            }
        }
    }
}
