//! Keyboard, mouse, gamepad and joystick input vocabulary.

use bitflags::bitflags;

/// A digital input transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// The button or key was released.
    #[default]
    Release,
    /// The button or key was pressed.
    Press,
}

/// A keyboard input transition, which additionally reports auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// The key was released.
    Release,
    /// The key was pressed.
    Press,
    /// The key is being held and auto-repeated.
    Repeat,
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// A shift key.
        const SHIFT = 0x0001;
        /// A control key.
        const CONTROL = 0x0002;
        /// An alt key.
        const ALT = 0x0004;
        /// A super (logo) key.
        const SUPER = 0x0008;
        /// Caps lock is engaged.
        const CAPS_LOCK = 0x0010;
        /// Num lock is engaged.
        const NUM_LOCK = 0x0020;
    }
}

bitflags! {
    /// Position of a joystick hat.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HatState: u8 {
        /// Deflected up.
        const UP = 1;
        /// Deflected right.
        const RIGHT = 2;
        /// Deflected down.
        const DOWN = 4;
        /// Deflected left.
        const LEFT = 8;
        /// Up and right.
        const RIGHT_UP = Self::RIGHT.bits() | Self::UP.bits();
        /// Down and right.
        const RIGHT_DOWN = Self::RIGHT.bits() | Self::DOWN.bits();
        /// Up and left.
        const LEFT_UP = Self::LEFT.bits() | Self::UP.bits();
        /// Down and left.
        const LEFT_DOWN = Self::LEFT.bits() | Self::DOWN.bits();
    }
}

impl HatState {
    /// The centered (neutral) hat position.
    pub const CENTERED: Self = Self::empty();
}

/// Mouse buttons, numbered as the wrapped library numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MouseButton {
    /// Button 1, conventionally the left button.
    Button1 = 0,
    /// Button 2, conventionally the right button.
    Button2 = 1,
    /// Button 3, conventionally the middle button.
    Button3 = 2,
    /// Button 4.
    Button4 = 3,
    /// Button 5.
    Button5 = 4,
    /// Button 6.
    Button6 = 5,
    /// Button 7.
    Button7 = 6,
    /// Button 8.
    Button8 = 7,
}

impl MouseButton {
    /// Alias for [`MouseButton::Button1`].
    pub const LEFT: Self = Self::Button1;
    /// Alias for [`MouseButton::Button2`].
    pub const RIGHT: Self = Self::Button2;
    /// Alias for [`MouseButton::Button3`].
    pub const MIDDLE: Self = Self::Button3;
}

/// Gamepad buttons in standard layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum GamepadButton {
    /// The A (cross) button.
    A = 0,
    /// The B (circle) button.
    B = 1,
    /// The X (square) button.
    X = 2,
    /// The Y (triangle) button.
    Y = 3,
    /// The left bumper.
    LeftBumper = 4,
    /// The right bumper.
    RightBumper = 5,
    /// The back button.
    Back = 6,
    /// The start button.
    Start = 7,
    /// The guide button.
    Guide = 8,
    /// Click of the left thumbstick.
    LeftThumb = 9,
    /// Click of the right thumbstick.
    RightThumb = 10,
    /// D-pad up.
    DpadUp = 11,
    /// D-pad right.
    DpadRight = 12,
    /// D-pad down.
    DpadDown = 13,
    /// D-pad left.
    DpadLeft = 14,
}

/// Gamepad analog axes in standard layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum GamepadAxis {
    /// Left stick horizontal axis.
    LeftX = 0,
    /// Left stick vertical axis.
    LeftY = 1,
    /// Right stick horizontal axis.
    RightX = 2,
    /// Right stick vertical axis.
    RightY = 3,
    /// Left trigger.
    LeftTrigger = 4,
    /// Right trigger.
    RightTrigger = 5,
}

/// Number of buttons in the standard gamepad layout.
pub const GAMEPAD_BUTTON_COUNT: usize = 15;
/// Number of axes in the standard gamepad layout.
pub const GAMEPAD_AXIS_COUNT: usize = 6;

/// A full snapshot of a gamepad's mapped input state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadState {
    /// Per-button state, indexed by [`GamepadButton`].
    pub buttons: [Action; GAMEPAD_BUTTON_COUNT],
    /// Per-axis deflection in `-1.0..=1.0`, indexed by [`GamepadAxis`].
    pub axes: [f32; GAMEPAD_AXIS_COUNT],
}

impl GamepadState {
    /// State of one button.
    pub fn button(&self, button: GamepadButton) -> Action {
        self.buttons[button as usize]
    }

    /// Deflection of one axis.
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        self.axes[axis as usize]
    }
}

/// One element of a gamepad mapping: how a hardware control feeds a
/// standard-layout button or axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamepadMappingElement {
    /// Source kind (button, axis or hat).
    pub kind: u8,
    /// Index of the source control.
    pub index: u8,
    /// Scale applied to axis sources.
    pub axis_scale: i8,
    /// Offset applied to axis sources.
    pub axis_offset: i8,
}

/// A complete mapping from one hardware gamepad to the standard layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GamepadMapping {
    /// Human-readable device name.
    pub name: String,
    /// Stable device GUID.
    pub guid: String,
    /// Button mapping elements, indexed by [`GamepadButton`].
    pub buttons: [GamepadMappingElement; GAMEPAD_BUTTON_COUNT],
    /// Axis mapping elements, indexed by [`GamepadAxis`].
    pub axes: [GamepadMappingElement; GAMEPAD_AXIS_COUNT],
}

/// Keyboard keys. Discriminants follow the wrapped library's layout-
/// independent key tokens (printable keys match their ASCII uppercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum Key {
    Unknown = -1,
    Space = 32,
    Apostrophe = 39,
    Comma = 44,
    Minus = 45,
    Period = 46,
    Slash = 47,
    Num0 = 48,
    Num1 = 49,
    Num2 = 50,
    Num3 = 51,
    Num4 = 52,
    Num5 = 53,
    Num6 = 54,
    Num7 = 55,
    Num8 = 56,
    Num9 = 57,
    Semicolon = 59,
    Equal = 61,
    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,
    LeftBracket = 91,
    Backslash = 92,
    RightBracket = 93,
    GraveAccent = 96,
    World1 = 161,
    World2 = 162,
    Escape = 256,
    Enter = 257,
    Tab = 258,
    Backspace = 259,
    Insert = 260,
    Delete = 261,
    Right = 262,
    Left = 263,
    Down = 264,
    Up = 265,
    PageUp = 266,
    PageDown = 267,
    Home = 268,
    End = 269,
    CapsLock = 280,
    ScrollLock = 281,
    NumLock = 282,
    PrintScreen = 283,
    Pause = 284,
    F1 = 290,
    F2 = 291,
    F3 = 292,
    F4 = 293,
    F5 = 294,
    F6 = 295,
    F7 = 296,
    F8 = 297,
    F9 = 298,
    F10 = 299,
    F11 = 300,
    F12 = 301,
    F13 = 302,
    F14 = 303,
    F15 = 304,
    F16 = 305,
    F17 = 306,
    F18 = 307,
    F19 = 308,
    F20 = 309,
    F21 = 310,
    F22 = 311,
    F23 = 312,
    F24 = 313,
    F25 = 314,
    Kp0 = 320,
    Kp1 = 321,
    Kp2 = 322,
    Kp3 = 323,
    Kp4 = 324,
    Kp5 = 325,
    Kp6 = 326,
    Kp7 = 327,
    Kp8 = 328,
    Kp9 = 329,
    KpDecimal = 330,
    KpDivide = 331,
    KpMultiply = 332,
    KpSubtract = 333,
    KpAdd = 334,
    KpEnter = 335,
    KpEqual = 336,
    LeftShift = 340,
    LeftControl = 341,
    LeftAlt = 342,
    LeftSuper = 343,
    RightShift = 344,
    RightControl = 345,
    RightAlt = 346,
    RightSuper = 347,
    Menu = 348,
}

impl Key {
    /// The printable character this key produces in a US layout, if any.
    pub fn printable(self) -> Option<char> {
        let token = self as i32;
        match token {
            32..=96 => char::from_u32(token as u32),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hat_state_composites() {
        assert_eq!(HatState::RIGHT_UP, HatState::RIGHT | HatState::UP);
        assert_eq!(HatState::CENTERED, HatState::empty());
    }

    #[test]
    fn test_printable_keys() {
        assert_eq!(Key::A.printable(), Some('A'));
        assert_eq!(Key::Space.printable(), Some(' '));
        assert_eq!(Key::F1.printable(), None);
        assert_eq!(Key::Unknown.printable(), None);
    }

    #[test]
    fn test_mouse_button_aliases() {
        assert_eq!(MouseButton::LEFT, MouseButton::Button1);
        assert_eq!(MouseButton::MIDDLE, MouseButton::Button3);
    }
}
