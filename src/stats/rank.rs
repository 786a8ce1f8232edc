use super::aggregate::FileTypeHistogram;
use crate::model::RankedFileType;
use console::style;
use std::io::{self, Write};

/// All extensions, highest count first. Equal counts fall back to extension
/// name so the order is stable between runs.
pub fn rank_file_types(histogram: &FileTypeHistogram) -> Vec<RankedFileType> {
    let mut ranked: Vec<RankedFileType> = histogram
        .iter()
        .map(|(extension, count)| RankedFileType {
            extension: extension.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    ranked
}

pub fn top_file_types(histogram: &FileTypeHistogram, limit: usize) -> Vec<RankedFileType> {
    let mut ranked = rank_file_types(histogram);
    ranked.truncate(limit);
    ranked
}

pub fn write_table<W: Write>(ranked: &[RankedFileType], colored: bool, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<16} {:>10}",
        style("Extension").bold().force_styling(colored),
        style("Changes").bold().force_styling(colored)
    )?;
    writeln!(out, "{}", "─".repeat(27))?;
    if ranked.is_empty() {
        writeln!(out, "No file changes in range")?;
        return Ok(());
    }
    for entry in ranked {
        writeln!(out, "{:<16} {:>4} files", entry.extension, entry.count)?;
    }
    Ok(())
}
