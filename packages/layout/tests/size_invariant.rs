use folio_layout::{distribute, normalize, LayoutOptions};
use folio_model::{Cell, PluginRef, Row};
use proptest::prelude::*;

fn size() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![Just(None), (0u32..30).prop_map(Some)]
}

fn leaf() -> impl Strategy<Value = Cell> {
    ("[a-z]{1,4}", size()).prop_map(|(id, size)| {
        let mut cell = Cell::new(id).with_plugin(PluginRef::new("text"));
        cell.size = size;
        cell
    })
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    let cell = leaf().prop_recursive(3, 32, 4, |inner| {
        (
            "[a-z]{1,4}",
            size(),
            prop::collection::vec(prop::collection::vec(inner, 0..5), 0..3),
        )
            .prop_map(|(id, size, rows)| {
                let mut cell = Cell::new(id).with_rows(
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, cells)| Row::new(format!("n{}", i), cells))
                        .collect(),
                );
                cell.size = size;
                cell
            })
    });

    prop::collection::vec(prop::collection::vec(cell, 0..5), 0..4).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, cells)| Row::new(format!("r{}", i), cells))
            .collect()
    })
}

fn check_rows(rows: &[Row], columns: u32) -> Result<(), TestCaseError> {
    for row in rows {
        prop_assert!(!row.cells.is_empty());
        let total: u32 = row.cells.iter().map(|c| c.size.unwrap_or(0)).sum();
        prop_assert_eq!(total, columns);
        for cell in &row.cells {
            prop_assert!(cell.size.is_some());
            check_rows(&cell.rows, columns)?;
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn distributed_sizes_sum_to_columns(
        sizes in prop::collection::vec(size(), 1..20),
        columns in 1u32..30,
    ) {
        let widths = distribute(&sizes, columns);
        prop_assert_eq!(widths.len(), sizes.len());
        prop_assert_eq!(widths.iter().sum::<u32>(), columns);
        if sizes.len() as u32 <= columns {
            prop_assert!(widths.iter().all(|&w| w >= 1));
        }
    }

    #[test]
    fn normalized_rows_are_full_width(rows in rows()) {
        let options = LayoutOptions::default();
        check_rows(&normalize(&rows, &options), options.columns)?;
    }

    #[test]
    fn normalize_is_idempotent(rows in rows()) {
        let options = LayoutOptions::default();
        let once = normalize(&rows, &options);
        prop_assert_eq!(normalize(&once, &options), once);
    }
}
