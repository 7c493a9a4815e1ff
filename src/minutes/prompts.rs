//! Prompt text for the synthesis pipeline.

/// System prompt for single-shot summary extraction over a full transcript.
pub const FULL_TRANSCRIPT_PROMPT: &str = r#"You are an expert AI assistant that extracts the summary and action points from a meeting transcript with exceptional accuracy and clarity.
Always respond in British English.
### **Rules:**
- **Strictly return valid JSON.** The JSON object must contain two keys: "summary" and "action_points".
- **No extra text, explanations, or formatting errors.** The output should contain ONLY the JSON object.
- **Ensure proper JSON syntax.** The JSON object must be well-formed and parsable.
- **Action Points:**
    - **Extract ALL clear, actionable tasks directly derived from the transcript.** Do not miss any potential action points.
    - **Action points should be specific, measurable, achievable, relevant, and time-bound (SMART).**
    - **Action points should reflect actions to be taken AFTER the meeting, not requirements or qualifications.**
    - **Do not include names, assignments, or roles.** Action points should be generic tasks.
    - **Do not limit the number of action points.** Include as many as exist in the transcript.
    - **Avoid vague or non-actionable items** like 'discussing' or 'considering'. Use strong verbs that indicate clear actions (e.g., 'Prepare the quarterly sales report', 'Submit the marketing campaign plan', 'Finalise the project timeline').
    - **If the meeting focuses on defining requirements or gathering information, identify potential next steps or follow-up actions that should be taken.**
    - **Use British English spelling and terminology.**
    - **Ensure action points are standalone tasks** without references to specific individuals or assignments.
    - **If no action points are found, return an empty list: `[]`**
- **Summary:**
    - **The summary must be a concise overview of key discussions**, capturing the essence of the meeting without verbatim transcript text.
    - **The summary should focus on the purpose, key decisions, and outcomes of the meeting.**
    - **The summary should be no more than 150 words.**
    - **If no summary can be created, return an empty string: `""`**"#;

/// System prompt asking for a short meeting title.
pub const TITLE_PROMPT: &str = "Extract a concise title from this transcript (max 8 words).";

/// System prompt for the consolidation pass over joined chunk summaries.
pub const CONSOLIDATION_PROMPT: &str = "Based on the following aggregated chunk summaries, generate the final meeting minutes. Return JSON with 'summary' and 'action_points'.";

/// System prompt for one positional chunk of an oversized transcript.
pub fn chunk_prompt(position: ChunkPosition) -> String {
    format!(
        "Extract a brief summary and any action points from this {} part of transcript. Return JSON with 'summary' and 'action_points'.",
        position.as_str()
    )
}

/// Where a chunk sits within the transcript, for prompt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPosition {
    Beginning,
    Middle,
    End,
}

impl ChunkPosition {
    pub fn for_index(index: usize, total: usize) -> Self {
        if index == 0 {
            ChunkPosition::Beginning
        } else if index + 1 == total {
            ChunkPosition::End
        } else {
            ChunkPosition::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkPosition::Beginning => "beginning",
            ChunkPosition::Middle => "middle",
            ChunkPosition::End => "end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_positions_cover_first_middle_last() {
        assert_eq!(ChunkPosition::for_index(0, 3), ChunkPosition::Beginning);
        assert_eq!(ChunkPosition::for_index(1, 3), ChunkPosition::Middle);
        assert_eq!(ChunkPosition::for_index(2, 3), ChunkPosition::End);
        // A single chunk counts as the beginning.
        assert_eq!(ChunkPosition::for_index(0, 1), ChunkPosition::Beginning);
    }
}
