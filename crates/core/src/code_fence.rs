//! Code fence tracking for the code line length check.
//!
//! This is a line-oriented heuristic, not a CommonMark fence grammar: only
//! backtick fences are recognised, nesting and fence lengths are ignored.

use crate::LineLengthWarning;

const FENCE: &str = "```";

/// Number of characters of an offending line quoted in a warning.
pub const EXCERPT_LEN: usize = 30;

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents (the opening line included).
    InsideFence,
}

/// Advance the fence phase based on a single line of text.
pub fn advance_fence_state(line: &str, phase: FencePhase) -> FencePhase {
    let trimmed = line.trim();
    if !trimmed.starts_with(FENCE) {
        return phase;
    }

    match phase {
        FencePhase::Outside if is_single_line_fence(trimmed) => FencePhase::Outside,
        FencePhase::Outside => FencePhase::InsideFence,
        FencePhase::InsideFence => FencePhase::Outside,
    }
}

/// A fence opened and closed on the same line: something other than a bare
/// fence whose last fence marker ends exactly at the end of the line.
fn is_single_line_fence(trimmed: &str) -> bool {
    trimmed != FENCE
        && trimmed
            .rfind(FENCE)
            .is_some_and(|pos| pos + FENCE.len() == trimmed.len())
}

/// Reports lines inside fenced code blocks longer than `max_len` characters.
///
/// Lines are split on `\n` only and numbered from 1. Every warning is also
/// logged; the source is not modified.
pub fn check_code_lines(source: &str, file: &str, max_len: usize) -> Vec<LineLengthWarning> {
    let mut phase = FencePhase::default();
    let mut warnings = Vec::new();

    for (index, line) in source.split('\n').enumerate() {
        phase = advance_fence_state(line, phase);
        if phase != FencePhase::InsideFence {
            continue;
        }

        let length = line.chars().count();
        if length > max_len {
            let warning = LineLengthWarning {
                file: file.to_string(),
                line: index + 1,
                length,
                max: max_len,
                excerpt: line.trim().chars().take(EXCERPT_LEN).collect(),
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    warnings
}
