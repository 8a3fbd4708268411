use crate::engine::{NameBuffer, MAX_LINE_LENGTH, MAX_STR_LENGTH};

/// longest prefix of `text` that fits in `max` bytes without splitting a character
pub(crate) fn truncate_to(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// truncate a name to the fixed name length
pub(crate) fn truncate_name(name: &str) -> &str {
    truncate_to(name, MAX_STR_LENGTH)
}

/// truncate or space-pad an info record to exactly the fixed line length
pub(crate) fn pad_line(line: &str) -> String {
    let line = truncate_to(line, MAX_LINE_LENGTH);
    let mut padded = String::with_capacity(MAX_LINE_LENGTH);
    padded.push_str(line);
    padded.extend(std::iter::repeat(' ').take(MAX_LINE_LENGTH - line.len()));
    padded
}

/// copy `name` into a fixed buffer, NUL padding the remainder
pub(crate) fn fill_name(buffer: &mut NameBuffer, name: &str) {
    let name = truncate_name(name).as_bytes();
    buffer.fill(0);
    buffer[..name.len()].copy_from_slice(name);
}

/// read a name back out of a fixed buffer.
///
/// Everything after the first NUL is garbage, trailing blanks are padding. An all-blank
/// buffer yields the empty string.
pub(crate) fn trim_name(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|b| *b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).trim_end().to_string()
}

/// convert a count reported by the engine into a buffer length, negative counts are empty
pub(crate) fn len_of<T: TryInto<usize>>(count: T) -> usize {
    count.try_into().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_char_boundaries() {
        assert_eq!(truncate_to("abcdef", 3), "abc");
        assert_eq!(truncate_to("ab", 3), "ab");
        // `é` is two bytes wide, cutting at 2 would split it
        assert_eq!(truncate_to("aé", 2), "a");
    }

    #[test]
    fn info_lines_are_padded_and_truncated() {
        let short = pad_line("test1");
        assert_eq!(short.len(), MAX_LINE_LENGTH);
        assert!(short.starts_with("test1 "));

        let long = "x".repeat(MAX_LINE_LENGTH + 20);
        assert_eq!(pad_line(&long).len(), MAX_LINE_LENGTH);
    }

    #[test]
    fn names_round_trip_through_buffers() {
        let mut buffer = [0xff; MAX_STR_LENGTH + 1];
        fill_name(&mut buffer, "left");
        assert_eq!(trim_name(&buffer), "left");

        let long = "n".repeat(MAX_STR_LENGTH * 2);
        fill_name(&mut buffer, &long);
        assert_eq!(trim_name(&buffer).len(), MAX_STR_LENGTH);
    }

    #[test]
    fn blank_buffers_are_empty_names() {
        assert_eq!(trim_name(&[0; MAX_STR_LENGTH + 1]), "");
        assert_eq!(trim_name(b"    \0garbage"), "");
        assert_eq!(trim_name(b"top  \0xx"), "top");
    }

    #[test]
    fn negative_counts_have_no_length() {
        assert_eq!(len_of(-1_i32), 0);
        assert_eq!(len_of(4_i64), 4);
    }
}
