use std::borrow::Cow;

/// SMTP servers often reply with multi-line text, operator output should stay one line per message
pub fn make_single_line(s: &str) -> Cow<str> {
    if s.contains('\n') {
        Cow::Owned(s.trim_end().replace("\r\n", "↵").replace('\n', "↵"))
    } else {
        Cow::Borrowed(s)
    }
}
