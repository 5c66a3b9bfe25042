use crate::model::todo::TodoFile;

/// Serialize a todo file back to text, reproducing each line's ending and
/// the final newline.
pub fn serialize_todo(file: &TodoFile) -> String {
    if file.lines.is_empty() {
        return if file.trailing_newline {
            file.line_ending(0).to_string()
        } else {
            String::new()
        };
    }
    let last = file.lines.len() - 1;
    let mut out = String::new();
    for (idx, line) in file.lines.iter().enumerate() {
        out.push_str(line);
        if idx < last || file.trailing_newline {
            out.push_str(file.line_ending(idx));
        }
    }
    out
}
