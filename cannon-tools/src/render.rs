/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::Display;

use cannon_utils::SquareMatrix;

/// Render a matrix as tab-separated rows, one line per row, with a trailing
/// blank line.
pub fn render_matrix<T: Display>(matrix: &SquareMatrix<T>) -> String {
    let mut out = String::new();
    for row in 0..matrix.dim() {
        let mut first = true;
        for value in matrix.row(row) {
            if !first {
                out.push('\t');
            }
            out.push_str(&value.to_string());
            first = false;
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tab_separated_rows() {
        let m =
            SquareMatrix::from_parts(vec![1i32, 2, 3, 4].into_boxed_slice(), 2).unwrap();
        assert_eq!(render_matrix(&m), "1\t2\n3\t4\n\n");
    }
}
