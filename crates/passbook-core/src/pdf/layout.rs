//! Table reconstruction from column-aligned page text.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{RawRow, RawTable};
use crate::statement::rules::patterns::WIDE_GAP;

/// A text run on a line, with its starting character column.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    start: usize,
    text: String,
}

impl Segment {
    fn centre(&self) -> f32 {
        self.start as f32 + self.text.chars().count() as f32 / 2.0
    }
}

fn char_offset(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

fn segments(line: &str) -> Vec<Segment> {
    let mut result = Vec::new();
    let mut last = 0;
    let mut push = |from: usize, to: usize| {
        let raw = &line[from..to];
        let text = raw.trim();
        if !text.is_empty() {
            let leading = raw.len() - raw.trim_start().len();
            result.push(Segment {
                start: char_offset(line, from + leading),
                text: text.to_string(),
            });
        }
    };

    for gap in WIDE_GAP.find_iter(line) {
        push(last, gap.start());
        last = gap.end();
    }
    push(last, line.len());
    result
}

/// Finds runs of aligned multi-column lines and turns them into tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTableDetector {
    min_rows: usize,
    min_columns: usize,
}

impl Default for LayoutTableDetector {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 3,
        }
    }
}

impl LayoutTableDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_rows(mut self, rows: usize) -> Self {
        self.min_rows = rows.max(1);
        self
    }

    pub fn with_min_columns(mut self, columns: usize) -> Self {
        self.min_columns = columns.max(2);
        self
    }

    /// Detect tables in one page of text.
    pub fn detect(&self, text: &str) -> Vec<RawTable> {
        let mut tables = Vec::new();
        let mut block: Vec<Vec<Segment>> = Vec::new();

        for line in text.lines() {
            let line_segments = segments(line);
            if line_segments.len() >= self.min_columns {
                block.push(line_segments);
            } else {
                self.flush(&mut block, &mut tables);
            }
        }
        self.flush(&mut block, &mut tables);

        tables
    }

    fn flush(&self, block: &mut Vec<Vec<Segment>>, tables: &mut Vec<RawTable>) {
        if block.len() >= self.min_rows {
            let table = align(block);
            trace!("Layout table: {} rows", table.len());
            tables.push(table);
        }
        block.clear();
    }
}

// The widest line fixes the columns; other segments go to the nearest centre.
fn align(block: &[Vec<Segment>]) -> RawTable {
    let anchor = block
        .iter()
        .fold(&block[0], |widest, line| if line.len() > widest.len() { line } else { widest });
    let centres: Vec<f32> = anchor.iter().map(Segment::centre).collect();

    let rows = block
        .iter()
        .map(|line| {
            let mut row: RawRow = vec![None; centres.len()];
            for segment in line {
                let column = nearest(&centres, segment.centre());
                row[column] = Some(match row[column].take() {
                    Some(existing) => format!("{} {}", existing, segment.text),
                    None => segment.text.clone(),
                });
            }
            row
        })
        .collect();

    RawTable::new(rows)
}

fn nearest(centres: &[f32], centre: f32) -> usize {
    centres
        .iter()
        .enumerate()
        .fold((0, f32::MAX), |(best, distance), (index, c)| {
            let d = (c - centre).abs();
            if d < distance { (index, d) } else { (best, distance) }
        })
        .0
}
