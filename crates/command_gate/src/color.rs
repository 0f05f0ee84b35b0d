//! Legacy colour-code translation.
//!
//! Chat hosts render `§` followed by a code character as a colour or style.
//! Configuration files use a typeable stand-in, conventionally `&`, which
//! [`translate_color_codes`] rewrites before the text reaches a user.
//!
//! ```rust
//! use command_gate::color::{translate_color_codes, ALTERNATE_COLOR_CHAR};
//!
//! let rendered = translate_color_codes(ALTERNATE_COLOR_CHAR, "&cNo permission");
//! assert_eq!(rendered, "§cNo permission");
//! ```

/// The character hosts interpret as the start of a colour code
pub const COLOR_CHAR: char = '§';

/// The conventional stand-in for [`COLOR_CHAR`] in configuration text
pub const ALTERNATE_COLOR_CHAR: char = '&';

/// Characters that may follow a colour marker
const CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

fn is_code(c: char) -> bool {
    CODES.contains(c)
}

/// Replace `marker` + code pairs with [`COLOR_CHAR`] + lower-cased code
///
/// The text is scanned once, left to right, rewriting in place. A marker not
/// followed by a valid code is left as-is. Since the scan advances one
/// character at a time, a rewritten code that equals `marker` can open the
/// next pair.
pub fn translate_color_codes(marker: char, text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    for i in 1..chars.len() {
        if chars[i - 1] == marker && is_code(chars[i]) {
            chars[i - 1] = COLOR_CHAR;
            chars[i] = chars[i].to_ascii_lowercase();
        }
    }

    chars.into_iter().collect()
}

/// Remove every [`COLOR_CHAR`] + code pair
pub fn strip_color(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == COLOR_CHAR && is_code(next) => {
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}
