/// Fixed persona prompt for every generation call: preamble, instruction
/// clause, literal target text, trailing cue. The structure must stay stable;
/// views differ only in what they pass as `text` and `instruction`.
pub fn commentary(text: &str, instruction: &str) -> String {
    format!(
        r#"Please begin by introducing yourself as Barbosa, then provide a commentary on the following text, focusing on: {instruction}

Text:
{text}

Commentary:"#
    )
}

/// Instruction used for every chatbot turn.
pub const CHAT_INSTRUCTION: &str = "answering the question";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_instruction_and_text_verbatim() {
        let p = commentary("Lorem ipsum", "tone: neutral");
        assert!(p.contains("tone: neutral"));
        assert!(p.contains("Lorem ipsum"));
        assert!(p.contains("Barbosa"));
        assert!(p.trim_end().ends_with("Commentary:"));
    }
}
