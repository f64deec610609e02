//! Plain HTML rendering of the raw sheet grid for `/htmltable`.

const PAGE_HEAD: &str = r#"<html>
  <head>
    <style>
      table { border-collapse: collapse; width: 100%; }
      th, td { border: 1px solid black; padding: 8px; text-align: left; }
      th { background-color: #f2f2f2; }
    </style>
  </head>
  <body>
    <table>
"#;

const PAGE_TAIL: &str = "    </table>
  </body>
</html>
";

/// Minimal escaping for text placed inside an element.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `<tr>` per grid row, one `<td>` per cell, header row included.
pub fn render_grid_table(grid: &[Vec<String>]) -> String {
    let mut page = String::from(PAGE_HEAD);
    for row in grid {
        page.push_str("      <tr>");
        for cell in row {
            page.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        page.push_str("</tr>\n");
    }
    page.push_str(PAGE_TAIL);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_every_cell() {
        let grid = vec![
            vec!["Player".to_string(), "Team".to_string()],
            vec!["A".to_string(), "BOS".to_string()],
        ];
        let html = render_grid_table(&grid);
        assert!(html.contains("<tr><td>Player</td><td>Team</td></tr>"));
        assert!(html.contains("<tr><td>A</td><td>BOS</td></tr>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_cells_are_escaped() {
        let grid = vec![vec!["<script>alert('x')</script> & co".to_string()]];
        let html = render_grid_table(&grid);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_grid_renders_empty_table() {
        let html = render_grid_table(&[]);
        assert!(html.contains("<table>"));
        assert!(!html.contains("<tr>"));
    }
}
