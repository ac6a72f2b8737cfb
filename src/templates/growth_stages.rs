//! Growth-stage fill: one output row per tree and observed BBCH stage.

use chrono::NaiveDate;

use crate::constants::vocab;
use crate::data_mgmt::models::CellValue;
use crate::data_mgmt::table::SourceTable;

use super::table::TemplateTable;
use super::TemplateError;

/// Tracked stage columns of the measurement sheet and the template columns
/// they map onto.
const STAGE_COLUMNS: [(&str, &str); 4] = [
    ("stade C", vocab::VAR_BBCH54),
    ("stade E", vocab::VAR_BBCH59),
    ("stade F", vocab::VAR_BBCH65),
    ("stade G", vocab::VAR_BBCH67),
];

const NAME_COLUMN: &str = "Nom";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn fill(template: &mut TemplateTable, source: &SourceTable) -> Result<(), TemplateError> {
    let target_idx = column_index(template, vocab::COL_TARGET)?;
    let date_idx = column_index(template, vocab::COL_DATE)?;

    let mut output_rows = Vec::new();
    for row in source.rows() {
        let Some(target) = row.optional(NAME_COLUMN) else {
            log::warn!("Row {}: no '{NAME_COLUMN}' value; skipped", row.index());
            continue;
        };
        let target = target.to_cell_string();

        for (stage_column, template_column) in STAGE_COLUMNS {
            let Some(cell) = row.optional(stage_column) else {
                continue;
            };
            let Some(date) = stage_date(cell) else {
                log::warn!(
                    "Row {}: cannot read a date from '{stage_column}' ({cell:?})",
                    row.index()
                );
                continue;
            };

            let stage_idx = column_index(template, template_column)?;
            let mut out = template.blank_row();
            out[target_idx] = target.clone();
            out[date_idx] = date.clone();
            out[stage_idx] = date;
            output_rows.push(out);
        }
    }

    template.ensure_data_capacity(output_rows.len());
    for (i, row) in output_rows.into_iter().enumerate() {
        template.set_data_row(i, row);
    }
    Ok(())
}

fn column_index(template: &TemplateTable, name: &str) -> Result<usize, TemplateError> {
    template
        .column_index(name)
        .ok_or_else(|| TemplateError::MissingTemplateColumn(name.to_string()))
}

/// Stage cells are native XLSX dates or ISO text; anything else is treated
/// as absent.
fn stage_date(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.format(DATE_FORMAT).to_string()),
        CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .ok()
            .map(|d| d.format(DATE_FORMAT).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;

    use crate::data_mgmt::models::Row;

    fn template() -> TemplateTable {
        let headers = vec![
            vocab::COL_TARGET.to_string(),
            vocab::COL_DATE.to_string(),
            vocab::VAR_BBCH54.to_string(),
            vocab::VAR_BBCH59.to_string(),
            vocab::VAR_BBCH65.to_string(),
            vocab::VAR_BBCH67.to_string(),
        ];
        let metadata = vec![
            vec!["## metadata".to_string()],
            vec!["## units".to_string()],
            vec!["## methods".to_string()],
        ];
        TemplateTable::from_parts(headers, metadata)
    }

    fn xlsx_date(iso: &str) -> CellValue {
        let dt = NaiveDateTime::parse_from_str(&format!("{iso} 00:00:00"), "%Y-%m-%d %H:%M:%S")
            .unwrap();
        CellValue::DateTime(dt)
    }

    fn source() -> SourceTable {
        let mut first = Row::new(0);
        first.set_cell("Nom".into(), CellValue::Text("PX_10_RG_5".into()));
        first.set_cell("stade C".into(), xlsx_date("2023-04-03"));
        first.set_cell("stade F".into(), CellValue::Text("2023-04-26".into()));

        let mut second = Row::new(1);
        second.set_cell("Nom".into(), CellValue::Text("PX_10_RG_6".into()));
        second.set_cell("stade G".into(), xlsx_date("2023-05-11"));

        SourceTable::from_rows(
            vec![
                "Nom".into(),
                "stade C".into(),
                "stade E".into(),
                "stade F".into(),
                "stade G".into(),
            ],
            vec![first, second],
        )
    }

    #[test]
    fn one_output_row_per_tree_and_stage() {
        let mut template = template();
        fill(&mut template, &source()).unwrap();

        // 2 stages on the first tree + 1 on the second
        assert_eq!(template.row_count(), 6);

        let first = template.data_row(0);
        assert_eq!(first[0], "PX_10_RG_5");
        assert_eq!(first[1], "2023-04-03");
        assert_eq!(first[2], "2023-04-03"); // stade C -> BBCH 54
        assert!(first[3].is_empty() && first[4].is_empty() && first[5].is_empty());

        let second = template.data_row(1);
        assert_eq!(second[1], "2023-04-26");
        assert_eq!(second[4], "2023-04-26"); // stade F -> BBCH 65

        let third = template.data_row(2);
        assert_eq!(third[0], "PX_10_RG_6");
        assert_eq!(third[5], "2023-05-11"); // stade G -> BBCH 67
    }

    #[test]
    fn each_output_row_has_exactly_one_stage_column() {
        let mut template = template();
        fill(&mut template, &source()).unwrap();

        for i in 0..3 {
            let row = template.data_row(i);
            let populated_stages = row[2..].iter().filter(|c| !c.is_empty()).count();
            assert_eq!(populated_stages, 1, "data row {i}");
            assert!(!row[0].is_empty() && !row[1].is_empty());
        }
    }

    #[test]
    fn metadata_rows_are_untouched() {
        let mut template = template();
        fill(&mut template, &source()).unwrap();
        assert_eq!(template.row(0)[0], "## metadata");
        assert_eq!(template.row(1)[0], "## units");
        assert_eq!(template.row(2)[0], "## methods");
    }

    #[test]
    fn missing_template_column_is_an_error() {
        let mut template = TemplateTable::from_parts(vec![vocab::COL_TARGET.to_string()], vec![]);
        let err = fill(&mut template, &source()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingTemplateColumn(_)));
    }

    #[test]
    fn unreadable_stage_cell_is_dropped_not_fatal() {
        let mut row = Row::new(0);
        row.set_cell("Nom".into(), CellValue::Text("PX_10_RG_5".into()));
        row.set_cell("stade C".into(), CellValue::Text("soon".into()));
        let source = SourceTable::from_rows(vec!["Nom".into(), "stade C".into()], vec![row]);

        let mut template = template();
        fill(&mut template, &source).unwrap();
        // Nothing written beyond the reserved rows
        assert_eq!(template.row_count(), 3);
    }
}
