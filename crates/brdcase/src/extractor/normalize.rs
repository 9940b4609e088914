//! Lossy text normalization applied after extraction.
//!
//! Layout is not preserved. The output keeps just enough line structure for a
//! language model to read the document coherently.

/// Consecutive blank lines kept before further ones are dropped.
const MAX_BLANK_RUN: usize = 2;

pub fn clean_text(text: &str) -> String {
    let collapsed = collapse_blank_lines(text);
    let single_spaced = collapsed.split_whitespace().collect::<Vec<_>>().join(" ");
    single_spaced.replace(". ", ".\n").trim().to_string()
}

fn collapse_blank_lines(text: &str) -> String {
    let mut kept = Vec::new();
    let mut blank_run = 0;

    for line in text.split('\n') {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run <= MAX_BLANK_RUN {
                kept.push(line);
            }
        } else {
            blank_run = 0;
            kept.push(line);
        }
    }

    kept.join("\n")
}
