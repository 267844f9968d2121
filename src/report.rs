use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::select::ScoreRange;

/// Summary of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_pairs: u64,
    pub requested_pairs: u64,
    pub selected_pairs: u64,
    /// Seed actually used for tie-breaking
    pub seed: u64,
    pub phred_offset: u8,
    pub score_range: Option<ScoreRange>,
    pub selected_score_range: Option<ScoreRange>,
    pub outputs: [PathBuf; 2],
}

pub fn write_json_report(path: &Path, report: &RunReport) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, report)?;
    w.flush()?;
    Ok(())
}

fn fmt_range(r: &Option<ScoreRange>) -> String {
    match r {
        Some(r) => format!("{:.2} - {:.2}", r.min, r.max),
        None => "-".to_string(),
    }
}

fn escape_html(text: &str) -> String {
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

pub fn write_html_report(path: &Path, report: &RunReport) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);

    writeln!(f, "<!DOCTYPE html>")?;
    writeln!(f, "<html>")?;
    writeln!(f, "<head>")?;
    writeln!(f, "<title>fastq-subset report</title>")?;
    writeln!(f, "<style>")?;
    writeln!(f, "body {{ font-family: Arial, sans-serif; margin: 20px; }}")?;
    writeln!(f, "table {{ border-collapse: collapse; width: 100%; max-width: 800px; }}")?;
    writeln!(f, "th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}")?;
    writeln!(f, "th {{ background-color: #f2f2f2; }}")?;
    writeln!(f, "</style>")?;
    writeln!(f, "</head>")?;
    writeln!(f, "<body>")?;

    writeln!(f, "<h1>fastq-subset report</h1>")?;
    writeln!(f, "<table>")?;
    writeln!(f, "<tr><th>Metric</th><th>Value</th></tr>")?;
    writeln!(f, "<tr><td>Total Pairs</td><td>{}</td></tr>", report.total_pairs)?;
    writeln!(f, "<tr><td>Requested Pairs</td><td>{}</td></tr>", report.requested_pairs)?;
    writeln!(f, "<tr><td>Selected Pairs</td><td>{}</td></tr>", report.selected_pairs)?;
    writeln!(f, "<tr><td>Seed</td><td>{}</td></tr>", report.seed)?;
    writeln!(f, "<tr><td>Phred Offset</td><td>{}</td></tr>", report.phred_offset)?;
    writeln!(f, "<tr><td>Quality Range</td><td>{}</td></tr>", fmt_range(&report.score_range))?;
    writeln!(f, "<tr><td>Selected Quality Range</td><td>{}</td></tr>", fmt_range(&report.selected_score_range))?;
    for (i, out) in report.outputs.iter().enumerate() {
        writeln!(f, "<tr><td>Output R{}</td><td>{}</td></tr>", i + 1, escape_html(&out.display().to_string()))?;
    }
    writeln!(f, "</table>")?;

    writeln!(f, "</body>")?;
    writeln!(f, "</html>")?;
    f.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_range() {
        assert_eq!(fmt_range(&Some(ScoreRange { min: 20.0, max: 35.5 })), "20.00 - 35.50");
        assert_eq!(fmt_range(&None), "-");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("out/a<b>&'c\""), "out/a&lt;b&gt;&amp;&#39;c&quot;");
        assert_eq!(escape_html("plain_1.fq.gz"), "plain_1.fq.gz");
    }
}
