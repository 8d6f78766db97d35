use std::collections::HashMap;

/// Delimiters we accept in CSV files, in order of preference.
pub const CANDIDATES: [char; 2] = [',', ';'];

// Helper struct to count frequencies of potential delimiter characters.
#[derive(Debug)]
struct DelimiterCounter {
    char: char,
    // How often a certain count per row is found.
    row_counter: HashMap<usize, usize>,
}

impl DelimiterCounter {
    fn new(char: char) -> Self {
        Self {
            char,
            row_counter: HashMap::new(),
        }
    }

    fn count_line(&mut self, line: &str) {
        let count = line.chars().filter(|chr| *chr == self.char).count();
        *self.row_counter.entry(count).or_default() += 1;
    }

    /// The most common non-zero count per row and how many rows share it.
    fn mode(&self) -> Option<(usize, usize)> {
        self.row_counter
            .iter()
            .filter(|(count, _)| **count > 0)
            .map(|(count, rows)| (*count, *rows))
            // Prefer more rows, then more columns.
            .max_by_key(|(count, rows)| (*rows, *count))
    }
}

/// Guess the delimiter of raw CSV text.
///
/// For every candidate we count its occurrences per line and pick the
/// candidate whose most common count is shared by the most lines. Comment
/// lines (starting with `#`) and empty lines are ignored. If no candidate
/// occurs at all, the file is treated as a single column separated by `,`.
pub fn sniff_delimiter(raw_input: &str) -> char {
    let mut counters: Vec<DelimiterCounter> =
        CANDIDATES.iter().map(|c| DelimiterCounter::new(*c)).collect();

    for line in raw_input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        for counter in counters.iter_mut() {
            counter.count_line(line);
        }
    }

    let mut best: Option<(char, usize)> = None;
    for counter in counters.iter() {
        if let Some((_, rows)) = counter.mode() {
            log::trace!("delimiter {:?}: consistent in {rows} rows", counter.char);
            // Strictly greater, so ties keep the earlier candidate.
            if best.map_or(true, |(_, best_rows)| rows > best_rows) {
                best = Some((counter.char, rows));
            }
        }
    }

    let delimiter = best.map(|(chr, _)| chr).unwrap_or(CANDIDATES[0]);
    log::debug!("sniffed delimiter {:?}", delimiter);
    delimiter
}
