//! CSV and printable exporters
//!
//! Both exporters write readings in stored order (most recently entered
//! first), not in the date order used by the history table.

use std::io;

use crate::models::Reading;

/// CSV header row
pub const CSV_HEADER: [&str; 3] = ["Type", "Date", "Reading (m³)"];

/// Title of the printable document
pub const PRINT_TITLE: &str = "Water and Gas Readings";

/// How CSV fields are escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvQuoting {
    /// Quote fields containing a delimiter, quote or newline
    Standard,
    /// Write fields verbatim
    Never,
}

impl From<bool> for CsvQuoting {
    fn from(quote: bool) -> Self {
        if quote {
            CsvQuoting::Standard
        } else {
            CsvQuoting::Never
        }
    }
}

/// Write readings as CSV
pub fn write_csv<W: io::Write>(
    writer: W,
    readings: &[Reading],
    quoting: CsvQuoting,
) -> Result<(), csv::Error> {
    let quote_style = match quoting {
        CsvQuoting::Standard => csv::QuoteStyle::Necessary,
        CsvQuoting::Never => csv::QuoteStyle::Never,
    };
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for reading in readings {
        let value = reading.display_value();
        wtr.write_record([
            reading.category.label(),
            reading.date.as_str(),
            value.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render readings as CSV bytes
pub fn to_csv(readings: &[Reading], quoting: CsvQuoting) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_csv(&mut buf, readings, quoting)?;
    Ok(buf)
}

/// Render the printable HTML document
///
/// The document opens the print dialog as soon as it is loaded.
pub fn printable_document(readings: &[Reading]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", PRINT_TITLE));
    html.push_str(
        "<style>table{width:100%;border-collapse:collapse;}\
         th,td{border:1px solid #ccc;padding:8px;text-align:center;}\
         th{background:#f0f8ff;}</style>",
    );
    html.push_str("<script>window.addEventListener('load',function(){window.print();});</script>");
    html.push_str("</head><body>\n");
    html.push_str(&format!("<h2>{}</h2>\n", PRINT_TITLE));
    html.push_str("<table><thead><tr>");
    for heading in CSV_HEADER {
        html.push_str(&format!("<th>{}</th>", escape_html(heading)));
    }
    html.push_str("</tr></thead><tbody>\n");
    for reading in readings {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(reading.category.label()),
            escape_html(&reading.date),
            reading.display_value()
        ));
    }
    html.push_str("</tbody></table>\n</body></html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_csv_single_gas_reading() {
        let csv = to_csv(
            &[Reading::new(Category::Gas, "2024-03-01", 50.0)],
            CsvQuoting::Standard,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Type,Date,Reading (m³)\nGás,2024-03-01,50\n"
        );
    }

    #[test]
    fn test_csv_keeps_stored_order() {
        let readings = [
            Reading::new(Category::Water, "2024-01-01", 100.0),
            Reading::new(Category::Water, "2024-03-01", 140.5),
        ];
        let csv = String::from_utf8(to_csv(&readings, CsvQuoting::Standard).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            [
                "Type,Date,Reading (m³)",
                "Água,2024-01-01,100",
                "Água,2024-03-01,140.5"
            ]
        );
    }

    #[test]
    fn test_csv_quoting_modes() {
        let readings = [Reading::new(Category::Gas, "1 Mar, 2024", 5.0)];

        let quoted = String::from_utf8(to_csv(&readings, CsvQuoting::Standard).unwrap()).unwrap();
        assert!(quoted.ends_with("Gás,\"1 Mar, 2024\",5\n"));

        let raw = String::from_utf8(to_csv(&readings, CsvQuoting::Never).unwrap()).unwrap();
        assert!(raw.ends_with("Gás,1 Mar, 2024,5\n"));
    }

    #[test]
    fn test_printable_document_contents() {
        let html = printable_document(&[
            Reading::new(Category::Water, "2024-01-01", 100.0),
            Reading::new(Category::Gas, "2024-02-01", 8.5),
        ]);

        assert!(html.contains("<title>Water and Gas Readings</title>"));
        assert!(html.contains("<th>Type</th><th>Date</th><th>Reading (m³)</th>"));
        assert!(html.contains("<tr><td>Água</td><td>2024-01-01</td><td>100</td></tr>"));
        assert!(html.contains("<tr><td>Gás</td><td>2024-02-01</td><td>8.5</td></tr>"));
        assert!(html.contains("window.print()"));
        // No consumption column
        assert_eq!(html.matches("<th>").count(), 3);
    }

    #[test]
    fn test_printable_document_escapes_cells() {
        let html = printable_document(&[Reading::new(
            Category::Unknown("<b>".to_string()),
            "2024 & co",
            1.0,
        )]);
        assert!(html.contains("<td>&lt;b&gt;</td><td>2024 &amp; co</td>"));
    }
}
