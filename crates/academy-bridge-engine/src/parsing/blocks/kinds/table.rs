/// Pipe table rows.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    pub fn is_row(line: &str) -> bool {
        line.trim_start().starts_with(Self::PIPE)
    }

    /// Cell texts of a row with the outer pipes removed; `\|` stays in a cell.
    pub fn cells(line: &str) -> Vec<String> {
        let t = line.trim();
        let t = t.strip_prefix(Self::PIPE).unwrap_or(t);
        let t = match t.strip_suffix(Self::PIPE) {
            Some(inner) if !inner.ends_with('\\') => inner,
            _ => t,
        };

        let mut cells = vec![];
        let mut cell = String::new();
        let mut chars = t.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&Self::PIPE) => {
                    cell.push(Self::PIPE);
                    chars.next();
                }
                Self::PIPE => cells.push(std::mem::take(&mut cell).trim().to_string()),
                _ => cell.push(c),
            }
        }
        cells.push(cell.trim().to_string());
        cells
    }

    /// `|---|:--:|` style alignment rows.
    pub fn is_separator(line: &str) -> bool {
        let cells = Self::cells(line);
        !cells.is_empty()
            && cells.iter().all(|c| {
                let c = c.trim_matches(':');
                !c.is_empty() && c.chars().all(|ch| ch == '-')
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_strip_outer_pipes() {
        assert_eq!(Table::cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(Table::cells("|a|b"), vec!["a", "b"]);
    }

    #[test]
    fn escaped_pipe_stays_in_cell() {
        assert_eq!(Table::cells(r"| a \| b | c |"), vec!["a | b", "c"]);
    }

    #[test]
    fn separator_rows() {
        assert!(Table::is_separator("|---|:--:|--:|"));
        assert!(!Table::is_separator("| a | --- |"));
        assert!(!Table::is_separator("|  |"));
    }
}
