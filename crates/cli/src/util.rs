/// Compact display form for a matrix entry or stat: integers without a
/// trailing ".0", everything else rounded to 4 decimal places with
/// trailing zeros trimmed.
pub(crate) fn fmt_num(n: f64) -> String {
    if !n.is_finite() {
        return format!("{}", n);
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        // -0.0 reads badly in a readout.
        return format!("{}", (n + 0.0) as i64);
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Right-align a string to `width` columns.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - s.len()), s)
    }
}

/// Render a matrix as aligned rows, one per line, e.g. `[ 2  0 ]`.
pub(crate) fn fmt_matrix_rows(rows: &[Vec<f64>]) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|e| fmt_num(*e)).collect())
        .collect();
    let width = cells
        .iter()
        .flatten()
        .map(|s| s.len())
        .max()
        .unwrap_or(1);
    cells
        .iter()
        .map(|row| {
            let body = row
                .iter()
                .map(|s| pad_left(s, width))
                .collect::<Vec<_>>()
                .join("  ");
            format!("[ {} ]", body)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_integers() {
        assert_eq!(fmt_num(2.0), "2");
        assert_eq!(fmt_num(-1.0), "-1");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn fmt_num_fractions() {
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(1.4142135), "1.4142");
        assert_eq!(fmt_num(-2.25), "-2.25");
        assert_eq!(fmt_num(2.8284271247461903), "2.8284");
    }

    #[test]
    fn fmt_num_non_finite() {
        assert_eq!(fmt_num(f64::NAN), "NaN");
        assert_eq!(fmt_num(f64::INFINITY), "inf");
    }

    #[test]
    fn pad_left_aligns() {
        assert_eq!(pad_left("2", 3), "  2");
        assert_eq!(pad_left("abcd", 3), "abcd");
    }

    #[test]
    fn matrix_rows_align() {
        let lines = fmt_matrix_rows(&[vec![2.0, 0.0], vec![0.0, -1.5]]);
        assert_eq!(lines, vec!["[    2     0 ]", "[    0  -1.5 ]"]);
    }
}
