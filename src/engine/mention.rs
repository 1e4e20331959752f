use crate::model::guess::GOD_LABELS;

/// Decode a god label (case-insensitive) into its target index.
pub fn label_to_index(label: char) -> Option<usize> {
    GOD_LABELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(&label))
}

/// What a live edit of the question buffer means for targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveScan {
    /// Nothing targeting-related in the text.
    None,
    /// The text ends in a bare `@`; the target picker should open.
    OpenPicker,
    /// A complete `@<label>` token was typed; the token is already stripped
    /// from the returned text.
    Resolve { target: usize, text: String },
}

/// Scan the buffer after every edit for an inline targeting token.
pub fn scan_live(text: &str) -> LiveScan {
    if text.ends_with('@') {
        return LiveScan::OpenPicker;
    }

    let Some(at) = text.rfind('@') else {
        return LiveScan::None;
    };

    let after = &text[at + 1..];
    let mut chars = after.chars();
    let Some(target) = chars.next().and_then(label_to_index) else {
        return LiveScan::None;
    };

    // The label must close the token: end of input or whitespace right after.
    let tail = chars.as_str();
    if !tail.is_empty() && !tail.starts_with(char::is_whitespace) {
        return LiveScan::None;
    }

    let mut stripped = String::with_capacity(text.len());
    stripped.push_str(&text[..at]);
    stripped.push_str(tail);
    LiveScan::Resolve { target, text: stripped }
}

/// On submit, honor a leading `@<label>` that auto-resolution never fired on
/// (e.g. pasted text). Returns the target and the remaining question text.
pub fn split_submit(text: &str) -> Option<(usize, String)> {
    let rest = text.strip_prefix('@')?;
    let mut chars = rest.chars();
    let target = chars.next().and_then(label_to_index)?;

    let remainder = chars.as_str();
    if !remainder.is_empty() && !remainder.starts_with(char::is_whitespace) {
        return None;
    }

    Some((target, remainder.trim_start().to_string()))
}

/// Drop the pending bare `@` the picker was opened on.
pub fn strip_pending_mention(text: &str) -> String {
    text.strip_suffix('@').unwrap_or(text).to_string()
}

/// Keyboard-driven god picker, opened by a trailing `@` in the question box.
#[derive(Debug, Default)]
pub struct TargetPicker {
    pub open: bool,
    pub highlighted: usize,
}

impl TargetPicker {
    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.highlighted = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn cycle_up(&mut self) {
        self.highlighted = (self.highlighted + GOD_LABELS.len() - 1) % GOD_LABELS.len();
    }

    pub fn cycle_down(&mut self) {
        self.highlighted = (self.highlighted + 1) % GOD_LABELS.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_token_splits_on_submit() {
        assert_eq!(split_submit("@b is the truth"), Some((1, "is the truth".to_string())));
        assert_eq!(split_submit("@B"), Some((1, String::new())));
        assert_eq!(split_submit("@A  spaced out"), Some((0, "spaced out".to_string())));
    }

    #[test]
    fn non_token_prefixes_do_not_split() {
        assert_eq!(split_submit("is @b the truth"), None);
        assert_eq!(split_submit("@d nope"), None);
        assert_eq!(split_submit("@about"), None);
    }

    #[test]
    fn bare_trailing_at_opens_picker() {
        assert_eq!(scan_live("hello @"), LiveScan::OpenPicker);
        assert_eq!(scan_live("@"), LiveScan::OpenPicker);
    }

    #[test]
    fn completed_token_resolves_and_strips() {
        assert_eq!(
            scan_live("hello @c"),
            LiveScan::Resolve { target: 2, text: "hello ".to_string() }
        );
        assert_eq!(
            scan_live("@b"),
            LiveScan::Resolve { target: 1, text: String::new() }
        );
    }

    #[test]
    fn token_mid_word_is_ignored() {
        assert_eq!(scan_live("mail@beta.example"), LiveScan::None);
        assert_eq!(scan_live("plain question"), LiveScan::None);
    }

    #[test]
    fn picker_cycles_with_wraparound() {
        let mut picker = TargetPicker::default();
        picker.open();
        assert_eq!(picker.highlighted, 0);

        picker.cycle_up();
        assert_eq!(picker.highlighted, 2);

        picker.cycle_down();
        picker.cycle_down();
        assert_eq!(picker.highlighted, 1);
    }

    #[test]
    fn pending_mention_strips_only_trailing_at() {
        assert_eq!(strip_pending_mention("hello @"), "hello ");
        assert_eq!(strip_pending_mention("hello"), "hello");
    }
}
