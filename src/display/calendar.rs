//! Month calendar rendering

use crate::services::calendar::{Cell, MonthCursor, Week};

/// Render a month grid.
///
/// Days with a bill due are marked with `*`, the selected day is wrapped in
/// brackets.
pub fn format_month_grid(month: MonthCursor, weeks: &[Week]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:^35}\n", month.label()));
    output.push_str("  Su   Mo   Tu   We   Th   Fr   Sa\n");

    for week in weeks {
        let row: Vec<String> = week.iter().map(format_cell).collect();
        output.push_str(row.join("").trim_end());
        output.push('\n');
    }

    output
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "     ".to_string(),
        Cell::Day(day) => {
            let mark = if day.marked { '*' } else { ' ' };
            if day.selected {
                format!("[{:>2}]{}", day.day, mark)
            } else {
                format!(" {:>2} {}", day.day, mark)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::calendar::build_month_grid;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    #[test]
    fn test_renders_header_and_weeks() {
        let month = MonthCursor::new(2024, 0);
        let marked: HashSet<NaiveDate> =
            [NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()].into_iter().collect();
        let selected = NaiveDate::from_ymd_opt(2024, 1, 15);

        let weeks = build_month_grid(month, &marked, selected);
        let output = format_month_grid(month, &weeks);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].contains("January 2024"));
        assert!(lines[1].starts_with("  Su"));
        assert_eq!(lines.len(), 2 + weeks.len());
        // 2024-01-01 is a Monday: one blank cell
        assert!(lines[2].starts_with("       1"));
        assert!(output.contains(" 10 *"));
        assert!(output.contains("[15]"));
    }
}
