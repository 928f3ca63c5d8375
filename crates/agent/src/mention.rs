//! Leading mention markup removal.
//!
//! Slack renders mentions as `<@U123>`, `<!here>` or `<#C123|general>`. Only
//! tokens at the very start of a message are markup addressed to the bot;
//! anything after the first non-mention character is content and is kept,
//! including `<` and `>` characters.

/// Strip every leading mention token and trim the rest.
///
/// Idempotent: the result never starts with a mention token or whitespace.
pub fn strip_mentions(text: &str) -> &str {
    let mut rest = text.trim();
    while let Some(after) = leading_mention(rest) {
        rest = after.trim_start();
    }
    rest
}

/// If `text` starts with a complete mention token, return what follows it.
fn leading_mention(text: &str) -> Option<&str> {
    let body = text.strip_prefix('<')?;
    if !body.starts_with(['@', '!', '#']) {
        return None;
    }
    let close = body.find('>')?;
    let token = &body[..close];
    if token.contains(char::is_whitespace) {
        return None;
    }
    Some(&body[close + 1..])
}
