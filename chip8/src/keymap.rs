use std::collections::HashMap;

use sdl2::keyboard::Keycode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub const KEYMAP: [(Keycode, u8); 16] = [
    (Keycode::X, 0x0),
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Q, 0x4),
    (Keycode::W, 0x5),
    (Keycode::E, 0x6),
    (Keycode::A, 0x7),
    (Keycode::S, 0x8),
    (Keycode::D, 0x9),
    (Keycode::Z, 0xA),
    (Keycode::C, 0xB),
    (Keycode::Num4, 0xC),
    (Keycode::R, 0xD),
    (Keycode::F, 0xE),
    (Keycode::V, 0xF),
];

/// Lookup from keyboard keys to keypad keys, built once from a table like `KEYMAP`
pub struct KeyBindings {
    keys: HashMap<Keycode, u8>,
}

impl KeyBindings {
    pub fn new(table: &[(Keycode, u8)]) -> Self {
        KeyBindings {
            keys: table.iter().copied().collect(),
        }
    }

    pub fn get(&self, key: Keycode) -> Option<u8> {
        self.keys.get(&key).copied()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings::new(&KEYMAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_is_bound_once() {
        let bindings = KeyBindings::default();
        let mut keys: Vec<u8> = KEYMAP
            .iter()
            .filter_map(|(code, _)| bindings.get(*code))
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, (0x0..=0xF).collect::<Vec<u8>>());
    }

    #[test]
    fn test_layout() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(Keycode::Num1), Some(0x1));
        assert_eq!(bindings.get(Keycode::Num4), Some(0xC));
        assert_eq!(bindings.get(Keycode::X), Some(0x0));
        assert_eq!(bindings.get(Keycode::V), Some(0xF));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(KeyBindings::default().get(Keycode::Space), None);
    }
}
