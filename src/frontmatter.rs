/// Removes a leading `---` delimited metadata block.
///
/// Input without a complete block is returned unchanged.
pub fn strip_front_matter(text: &str) -> String {
    match split_front_matter(text) {
        (Some(_), body) => body.to_owned(),
        (None, _) => text.to_owned(),
    }
}

/// Splits `text` into the raw front matter block (between the delimiters)
/// and the trimmed body after the closing delimiter.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start();
    let mut lines = trimmed.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text);
    };
    if first.trim_end() != "---" {
        return (None, text);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == "---" {
            let block = &trimmed[block_start..offset];
            let body = trimmed[offset + line.len()..].trim();
            return (Some(block), body);
        }
        offset += line.len();
    }

    (None, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_block_and_trims_body() {
        let input = "---\ntitle: Intro\nms.date: 2024-01-01\n---\n\n# Intro\n\nBody text.\n";
        assert_eq!(strip_front_matter(input), "# Intro\n\nBody text.");
    }

    #[test]
    fn leading_whitespace_before_delimiter_is_allowed() {
        let input = "\n\n  ---\ntitle: x\n---\nbody";
        assert_eq!(strip_front_matter(input), "body");
    }

    #[test]
    fn missing_closing_delimiter_returns_input_unchanged() {
        let input = "---\ntitle: x\n# Heading\n";
        assert_eq!(strip_front_matter(input), input);
    }

    #[test]
    fn text_without_front_matter_is_unchanged() {
        let input = "  # Heading\n\nSome --- dashes\n---\n";
        assert_eq!(strip_front_matter(input), input);
    }

    #[test]
    fn opening_dashes_do_not_close_the_block() {
        let (block, body) = split_front_matter("---\n---\nafter");
        assert_eq!(block, Some(""));
        assert_eq!(body, "after");
    }

    #[test]
    fn split_returns_raw_yaml_block() {
        let (block, body) = split_front_matter("---\r\ntitle: Hello\r\n---\r\nBody");
        assert_eq!(block, Some("title: Hello\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn stripping_is_idempotent() {
        let inputs = [
            "---\na: 1\n---\n# Title\ntext",
            "# No front matter\n",
            "---\nunterminated",
            "",
        ];
        for input in inputs {
            let once = strip_front_matter(input);
            assert_eq!(strip_front_matter(&once), once, "input: {input:?}");
        }
    }
}
