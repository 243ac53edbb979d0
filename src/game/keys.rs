//! Keyboard input mapping.
//!
//! Maps winit key events to the small set of actions the app understands.

use winit::keyboard::{Key, NamedKey};

/// Actions triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Plan and run a scramble (S).
    Scramble,
    /// Restore the solved cube (R).
    Reset,
    /// Exit the application (Escape or Q).
    Quit,
}

/// Converts a winit logical key to a [`GameKey`], if it is bound.
pub fn winit_key_to_game_key(key: &Key) -> Option<GameKey> {
    match key {
        Key::Named(NamedKey::Escape) => Some(GameKey::Quit),
        Key::Character(c) => match c.as_str() {
            "s" | "S" => Some(GameKey::Scramble),
            "r" | "R" => Some(GameKey::Reset),
            "q" | "Q" => Some(GameKey::Quit),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn bound_keys_map_to_actions() {
        assert_eq!(
            winit_key_to_game_key(&Key::Character(SmolStr::new("s"))),
            Some(GameKey::Scramble)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Character(SmolStr::new("R"))),
            Some(GameKey::Reset)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::Escape)),
            Some(GameKey::Quit)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(winit_key_to_game_key(&Key::Character(SmolStr::new("z"))), None);
        assert_eq!(winit_key_to_game_key(&Key::Named(NamedKey::Space)), None);
    }
}
