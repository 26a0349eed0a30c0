use colored::Colorize;

/// Display utilities for the CLI interface
#[derive(Debug, Clone, Copy)]
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    pub fn auto(no_color: bool) -> Self {
        let use_color =
            !no_color && atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none();
        Self::new(use_color)
    }

    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[OK] {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "✗".red().bold(), message);
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARN] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    pub fn section_header(&self, title: &str) {
        if self.use_color {
            println!("\n{}", title.bold().underline());
        } else {
            println!("\n=== {} ===", title);
        }
    }

    pub fn format_repo(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    pub fn format_branch(&self, branch: &str) -> String {
        if self.use_color {
            branch.green().to_string()
        } else {
            format!("'{}'", branch)
        }
    }

    pub fn print_indented(&self, message: &str, level: usize) {
        println!("{}{}", "  ".repeat(level), message);
    }

    pub fn print_table(&self, headers: &[&str], rows: &[Vec<String>]) {
        print!("{}", self.render_table(headers, rows));
    }

    /// Left-aligned columns separated by two spaces, with a rule under the
    /// header row. Empty when there are no rows.
    pub fn render_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        out.push_str(&self.render_row(&header_cells, &widths, true));

        let rule = if self.use_color { "─" } else { "-" };
        let separator: Vec<String> = widths.iter().map(|w| rule.repeat(*w)).collect();
        out.push_str(separator.join("  ").trim_end());
        out.push('\n');

        for row in rows {
            out.push_str(&self.render_row(row, &widths, false));
        }
        out
    }

    fn render_row(&self, cells: &[String], widths: &[usize], header: bool) -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let width = widths.get(i).copied().unwrap_or(0);
            let padding = " ".repeat(width.saturating_sub(cell.chars().count()));
            if header && self.use_color {
                line.push_str(&cell.bold().to_string());
            } else {
                line.push_str(cell);
            }
            line.push_str(&padding);
        }
        let mut line = line.trim_end().to_string();
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_table_aligns_columns() {
        let display = DisplayHelper::new(false);
        let rows = vec![
            vec!["android".to_string(), "cordova-android".to_string()],
            vec!["js".to_string(), "cordova-js".to_string()],
        ];
        let table = display.render_table(&["ID", "Repo"], &rows);
        assert_eq!(
            table,
            "ID       Repo\n\
             -------  ---------------\n\
             android  cordova-android\n\
             js       cordova-js\n"
        );
    }

    #[test]
    fn test_render_table_without_rows_is_empty() {
        let display = DisplayHelper::new(false);
        assert_eq!(display.render_table(&["ID"], &[]), "");
    }
}
