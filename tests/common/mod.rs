//! Fixture workbooks built with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Formula, Workbook};
use std::path::Path;

/// Value written into a fixture cell
pub enum V {
    N(f64),
    S(&'static str),
    B(bool),
    /// Excel serial date shown as yyyy-mm-dd
    D(f64),
    /// Formula with its cached numeric result
    F(&'static str, f64),
}

/// (0-based row, 0-based col, value)
pub type Cells = Vec<(u32, u16, V)>;

/// Write `sheets` to `path`, in order
pub fn write_book(path: &Path, sheets: &[(&str, Cells)]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (name, cells) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row, col, value) in cells {
            match value {
                V::N(n) => {
                    worksheet.write_number(*row, *col, *n).unwrap();
                }
                V::S(s) => {
                    worksheet.write_string(*row, *col, *s).unwrap();
                }
                V::B(b) => {
                    worksheet.write_boolean(*row, *col, *b).unwrap();
                }
                V::D(serial) => {
                    worksheet
                        .write_number_with_format(*row, *col, *serial, &date_format)
                        .unwrap();
                }
                V::F(formula, result) => {
                    worksheet
                        .write_formula(
                            *row,
                            *col,
                            Formula::new(*formula).set_result(result.to_string()),
                        )
                        .unwrap();
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Baseline used across tests:
/// Sheet1 = Name/Qty header, apple=10; Legacy = 1
pub fn old_fixture(path: &Path) {
    write_book(
        path,
        &[
            (
                "Sheet1",
                vec![
                    (0, 0, V::S("Name")),
                    (0, 1, V::S("Qty")),
                    (1, 0, V::S("apple")),
                    (1, 1, V::N(10.0)),
                ],
            ),
            ("Legacy", vec![(0, 0, V::N(1.0))]),
        ],
    );
}

/// Revision: apple=12, pear row added, Legacy dropped, Extra added
pub fn new_fixture(path: &Path) {
    write_book(
        path,
        &[
            (
                "Sheet1",
                vec![
                    (0, 0, V::S("Name")),
                    (0, 1, V::S("Qty")),
                    (1, 0, V::S("apple")),
                    (1, 1, V::N(12.0)),
                    (2, 0, V::S("pear")),
                    (2, 1, V::N(5.0)),
                ],
            ),
            ("Extra", vec![(0, 0, V::S("x"))]),
        ],
    );
}
