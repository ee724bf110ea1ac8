//! Typed keyboard input
//!
//! Plain text, special keys and modifier chords are distinct inputs. They are only turned into
//! WebDriver code points at the wire boundary.

use phf::phf_map;
use std::fmt;

/// Special keys from the WebDriver key table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Null,
    Backspace,
    Tab,
    Enter,
    Shift,
    Control,
    Alt,
    Escape,
    Space,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Delete,
    Meta,
}

static KEYS_BY_CODE_POINT: phf::Map<char, Key> = phf_map! {
    '\u{E000}' => Key::Null,
    '\u{E003}' => Key::Backspace,
    '\u{E004}' => Key::Tab,
    '\u{E007}' => Key::Enter,
    '\u{E008}' => Key::Shift,
    '\u{E009}' => Key::Control,
    '\u{E00A}' => Key::Alt,
    '\u{E00C}' => Key::Escape,
    '\u{E00D}' => Key::Space,
    '\u{E012}' => Key::ArrowLeft,
    '\u{E013}' => Key::ArrowUp,
    '\u{E014}' => Key::ArrowRight,
    '\u{E015}' => Key::ArrowDown,
    '\u{E017}' => Key::Delete,
    '\u{E03D}' => Key::Meta,
};

impl Key {
    /// WebDriver code point
    pub fn code_point(self) -> char {
        match self {
            Key::Null => '\u{E000}',
            Key::Backspace => '\u{E003}',
            Key::Tab => '\u{E004}',
            Key::Enter => '\u{E007}',
            Key::Shift => '\u{E008}',
            Key::Control => '\u{E009}',
            Key::Alt => '\u{E00A}',
            Key::Escape => '\u{E00C}',
            Key::Space => '\u{E00D}',
            Key::ArrowLeft => '\u{E012}',
            Key::ArrowUp => '\u{E013}',
            Key::ArrowRight => '\u{E014}',
            Key::ArrowDown => '\u{E015}',
            Key::Delete => '\u{E017}',
            Key::Meta => '\u{E03D}',
        }
    }

    /// Reverse lookup of a code point
    pub fn from_code_point(ch: char) -> Option<Key> {
        KEYS_BY_CODE_POINT.get(&ch).copied()
    }

    /// Modifiers stay held until released by [`Key::Null`]
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Meta)
    }
}

/// One unit of keyboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// Literal characters
    Text(String),
    /// A single special key press
    Key(Key),
    /// Modifiers held while `text` is typed, then released
    Chord { modifiers: Vec<Key>, text: String },
}

impl KeyInput {
    pub fn text<S: Into<String>>(text: S) -> Self {
        KeyInput::Text(text.into())
    }

    /// Single-modifier chord such as control+b
    pub fn chord<S: Into<String>>(modifier: Key, text: S) -> Self {
        KeyInput::Chord {
            modifiers: vec![modifier],
            text: text.into(),
        }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        KeyInput::Key(key)
    }
}

impl From<&str> for KeyInput {
    fn from(text: &str) -> Self {
        KeyInput::Text(text.to_string())
    }
}

/// Ordered keyboard input sent in one call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySequence {
    inputs: Vec<KeyInput>,
}

impl KeySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<I: Into<KeyInput>>(mut self, input: I) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn inputs(&self) -> &[KeyInput] {
        &self.inputs
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Encode as the `text` payload of a WebDriver send-keys command
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for input in &self.inputs {
            match input {
                KeyInput::Text(text) => out.push_str(text),
                KeyInput::Key(key) => out.push(key.code_point()),
                KeyInput::Chord { modifiers, text } => {
                    for modifier in modifiers {
                        out.push(modifier.code_point());
                    }
                    out.push_str(text);
                    out.push(Key::Null.code_point());
                }
            }
        }
        out
    }

    /// Decode an encoded payload into keystrokes
    ///
    /// Modifier code points stay held until the next NULL.
    pub fn decode(encoded: &str) -> Vec<Keystroke> {
        let mut held: Vec<Key> = Vec::new();
        let mut strokes = Vec::new();

        for ch in encoded.chars() {
            match Key::from_code_point(ch) {
                Some(Key::Null) => held.clear(),
                Some(key) if key.is_modifier() => {
                    if !held.contains(&key) {
                        held.push(key);
                    }
                }
                Some(key) => strokes.push(Keystroke::Key(key)),
                None if held.is_empty() => strokes.push(Keystroke::Char(ch)),
                None => strokes.push(Keystroke::Chord(held.clone(), ch)),
            }
        }

        strokes
    }
}

impl From<&str> for KeySequence {
    fn from(text: &str) -> Self {
        KeySequence::new().then(text)
    }
}

impl From<Key> for KeySequence {
    fn from(key: Key) -> Self {
        KeySequence::new().then(key)
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .inputs
            .iter()
            .map(|input| match input {
                KeyInput::Text(text) => format!("{:?}", text),
                KeyInput::Key(key) => format!("{:?}", key),
                KeyInput::Chord { modifiers, text } => {
                    let mods: Vec<String> = modifiers.iter().map(|m| format!("{:?}", m)).collect();
                    format!("{}+{:?}", mods.join("+"), text)
                }
            })
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A decoded keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Key(Key),
    Chord(Vec<Key>, char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_encoding_releases_modifiers() {
        let keys = KeySequence::new()
            .then(KeyInput::chord(Key::Control, "b"))
            .then("Automation");
        assert_eq!(keys.encode(), "\u{E009}b\u{E000}Automation");
    }

    #[test]
    fn test_decode_distinguishes_chords_from_text() {
        let keys = KeySequence::new()
            .then(Key::Space)
            .then(KeyInput::chord(Key::Control, "u"))
            .then("Te");
        let strokes = KeySequence::decode(&keys.encode());
        assert_eq!(
            strokes,
            vec![
                Keystroke::Key(Key::Space),
                Keystroke::Chord(vec![Key::Control], 'u'),
                Keystroke::Char('T'),
                Keystroke::Char('e'),
            ]
        );
    }

    #[test]
    fn test_code_point_lookup() {
        assert_eq!(Key::from_code_point('\u{E009}'), Some(Key::Control));
        assert_eq!(Key::from_code_point('a'), None);
        assert!(Key::Shift.is_modifier());
        assert!(!Key::Enter.is_modifier());
    }
}
