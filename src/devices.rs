use crate::{definitions::keyboard, display::Framebuffer};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the display
    fn clear_display(&mut self);
    /// Will display all from the pixels
    fn display(&mut self, frame: &Framebuffer);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    fn keyboard(&self) -> [bool; keyboard::SIZE];
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the beeper
pub trait SoundCommands {
    fn start_beep(&mut self);
    fn stop_beep(&mut self);
}

/// Will store the state of the keyboard together with the last key that was
/// pressed down.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    keys: [bool; keyboard::SIZE],
    /// The first key that went from released to pressed since the last
    /// time it was taken.
    pressed: Option<u8>,
}

impl InputState {
    pub fn new() -> Self {
        InputState::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self, key: usize, to: bool) {
        if to && !self.keys[key] && self.pressed.is_none() {
            self.pressed = Some(key as u8);
        }
        self.keys[key] = to;
    }

    /// Will set the value of the given key, keys outside of `0x0-0xF` are ignored.
    pub fn set_key(&mut self, key: usize, to: bool) {
        if key >= keyboard::SIZE {
            log::warn!("Ignoring input for the unknown key {:#X}", key);
            return;
        }
        self.update(key, to);
    }

    pub fn toggle_key(&mut self, key: usize) {
        if key < keyboard::SIZE {
            self.update(key, !self.keys[key]);
        }
    }

    /// Will overwrite the whole keyboard.
    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        for (key, to) in keys.iter().enumerate() {
            self.update(key, *to);
        }
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys[key % keyboard::SIZE]
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys[..]
    }

    /// Takes the first key pressed since the last take, if any.
    pub fn take_pressed(&mut self) -> Option<u8> {
        self.pressed.take()
    }

    /// Forgets key presses that happened until now.
    pub fn clear_pressed(&mut self) {
        self.pressed = None;
    }
}
