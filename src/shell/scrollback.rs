/// Scrollback buffer backing the terminal panel.
/// Append-only; `clear` is the only truncation. The renderer mirrors
/// it 1:1, pinned to the newest entry.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineKind {
    /// Echo of what the user typed.
    Input,
    /// Normal command output.
    Output,
    /// Not-found messages, refusals, game-over summaries.
    Error,
}

#[derive(Clone, Debug)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

/// One record per append. A record may carry embedded newlines (ASCII
/// boxes and such) and still counts as a single line for buffer
/// purposes; it renders as several visual rows.
#[derive(Default)]
pub struct Scrollback {
    lines: Vec<Line>,
}

impl Scrollback {
    pub fn new() -> Self {
        Scrollback { lines: Vec::new() }
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(Line { kind, text: text.into() });
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order_with_kinds() {
        let mut sb = Scrollback::new();
        sb.push(LineKind::Input, "help");
        sb.push(LineKind::Output, "Available commands:");
        sb.push(LineKind::Error, "nope");
        let kinds: Vec<LineKind> = sb.lines().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Input, LineKind::Output, LineKind::Error]);
        assert_eq!(sb.lines()[0].text, "help");
    }

    #[test]
    fn clear_truncates_to_empty() {
        let mut sb = Scrollback::new();
        sb.push(LineKind::Output, "a");
        sb.push(LineKind::Output, "b");
        assert_eq!(sb.len(), 2);
        sb.clear();
        assert!(sb.is_empty());
    }

    #[test]
    fn multi_row_block_is_one_record() {
        let mut sb = Scrollback::new();
        sb.push(LineKind::Output, "top\nmiddle\nbottom");
        assert_eq!(sb.len(), 1);
        assert_eq!(sb.lines()[0].text.lines().count(), 3);
    }
}
