/// The two orthogonal toggles driving copy/cut routing and key handling.
///
/// Yank mode decides whether copy/cut events also feed the yank stack.
/// Command mode is a transient multi-keystroke input state the host enters
/// explicitly and which drops the moment an unrelated command fires.
///
/// This struct only tracks the flags; consequences of flipping them (such
/// as discarding the yank stack when leaving explicit yank mode) are the
/// dispatcher's job, since it owns the stacks.
#[derive(Debug)]
pub struct ModeState {
    yank_mode: bool,
    command_mode: bool,
}

impl ModeState {
    /// When explicit yank mode is off, copying to the yank stack is allowed
    /// from the start, so yank mode begins enabled.
    pub fn new(explicit_yank_mode: bool) -> Self {
        Self {
            yank_mode: !explicit_yank_mode,
            command_mode: false,
        }
    }

    pub fn yank_mode(&self) -> bool {
        self.yank_mode
    }

    pub fn command_mode(&self) -> bool {
        self.command_mode
    }

    /// Flip yank mode, returning the new state.
    pub fn toggle_yank_mode(&mut self) -> bool {
        self.yank_mode = !self.yank_mode;
        self.yank_mode
    }

    pub fn enter_command_mode(&mut self) {
        self.command_mode = true;
    }

    /// Returns true if command mode was active and is now exited.
    pub fn exit_command_mode(&mut self) -> bool {
        let was_active = self.command_mode;
        self.command_mode = false;
        was_active
    }
}
