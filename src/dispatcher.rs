//! Command dispatch over the two clip stacks and the register store.
//!
//! The dispatcher owns the process-lifetime state: the main history, the
//! yank stack, the registers, and the mode flags. The host feeds it
//! `Command`s and the copy/cut bridge events; it answers through the
//! `HostUi` collaborator and mirrors the active clip to the clipboard
//! device.

use regex::Regex;

use crate::config::{DisplayMode, Settings};
use crate::display;
use crate::error::ClipResult;
use crate::history::ClipHistory;
use crate::host::{write_and_confirm, ClipboardDevice, HostUi};
use crate::modes::ModeState;
use crate::register_file;
use crate::registers::{is_valid_register_key, RegisterCategory, RegisterStore};

const QUOTED_EXCERPT_PATTERN: &str = r#"(?s)^“(.*?)”\s+Excerpt From:.*$"#;

/// What a register key prompt will do once the host supplies the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterMode {
    /// Copy the current selection into the register.
    Copy,
    /// Paste the register into the view.
    Paste { indent: bool },
    /// Only set the live clipboard to the register.
    SetClipboard,
}

/// Externally invokable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Paste { indent: bool, pop: bool },
    ChooseAndPaste { indent: bool, pop: bool },
    Yank { choose: bool },
    Next,
    Previous,
    NextAndPaste,
    PreviousAndPaste,
    PasteAndNext,
    PasteAndPrevious,
    PasteAndDisplay,
    ClearHistory,
    ClearYank,
    ToggleYankMode,
    EnterCommandMode,
    Register(RegisterMode),
    ResetRegisters(RegisterCategory),
    ExportRegisters(RegisterCategory),
    ImportRegisters(RegisterCategory),
    EraseRegisterFile(RegisterCategory),
    ShowHistory { yank: bool },
    ShowRegisters,
    StripQuotedExcerpts,
}

/// An input request handed to the host, waiting for its resolve call.
/// At most one request is outstanding; resolving consumes it.
#[derive(Debug)]
enum PendingInput {
    Choice { yanking: bool, indent: bool, pop: bool },
    RegisterKey(RegisterMode),
}

pub struct Dispatcher<C: ClipboardDevice, U: HostUi> {
    clipboard: C,
    ui: U,
    settings: Settings,
    history: ClipHistory,
    yank: ClipHistory,
    registers: RegisterStore,
    modes: ModeState,
    /// Where a chooser jump left the yank traversal, so plain yanks can
    /// resume one position above it instead of the bottom.
    resume_idx: Option<usize>,
    pending: Option<PendingInput>,
    // per-invocation paste flags
    indent: bool,
    pop: bool,
}

impl<C: ClipboardDevice, U: HostUi> Dispatcher<C, U> {
    /// Build the dispatcher, seed the history with the live clipboard, and
    /// load the register file when configured to.
    pub fn new(mut clipboard: C, mut ui: U, settings: Settings) -> ClipResult<Self> {
        let mut history = ClipHistory::new(settings.max_history_size);
        let yank = ClipHistory::new(settings.max_history_size);
        let mut registers = RegisterStore::new();

        let seed = clipboard.read()?;
        if !seed.is_empty() {
            history.append(&seed, ui.current_syntax(), settings.allow_history_duplicates);
        }

        if settings.import_registers {
            match register_file::load(&settings.register_file) {
                Ok(entries) => registers.replace_all(entries),
                Err(e) => {
                    // a broken file must not take the whole plugin down
                    ui.status_message(&format!("Could not load registers: {e}"));
                }
            }
        }

        let modes = ModeState::new(settings.explicit_yank_mode);
        Ok(Self {
            clipboard,
            ui,
            settings,
            history,
            yank,
            registers,
            modes,
            resume_idx: None,
            pending: None,
            indent: false,
            pop: false,
        })
    }

    pub fn dispatch(&mut self, command: Command) -> ClipResult<()> {
        match command {
            Command::Paste { indent, pop } => {
                self.indent = indent;
                self.pop = pop;
                self.paste(false)?;
            }
            Command::ChooseAndPaste { indent, pop } => {
                self.indent = indent;
                self.pop = pop;
                self.choose_and_paste(false);
            }
            Command::Yank { choose } => {
                self.indent = false;
                self.pop = true;
                self.yank_step(choose)?;
            }
            Command::Next => self.cycle(true)?,
            Command::Previous => self.cycle(false)?,
            Command::NextAndPaste => {
                self.set_default_flags();
                self.cycle(true)?;
                self.paste(false)?;
            }
            Command::PreviousAndPaste => {
                self.set_default_flags();
                self.cycle(false)?;
                self.paste(false)?;
            }
            Command::PasteAndNext => {
                self.set_default_flags();
                self.paste(false)?;
                self.cycle(true)?;
            }
            Command::PasteAndPrevious => {
                self.set_default_flags();
                self.paste(false)?;
                self.cycle(false)?;
            }
            Command::PasteAndDisplay => {
                self.set_default_flags();
                self.paste(false)?;
                self.display_current()?;
            }
            Command::ClearHistory => {
                self.history.reset();
                self.ui.status_message("Clipboard history cleared");
                self.ui.show_popup("Clipboard history cleared");
            }
            Command::ClearYank => {
                self.yank.reset();
                self.resume_idx = None;
                self.ui.status_message("Yank history cleared");
                self.ui.show_popup("Yank history cleared");
            }
            Command::ToggleYankMode => self.toggle_yank_mode(),
            Command::EnterCommandMode => {
                self.modes.enter_command_mode();
                self.ui.status_message("Clipboard Manager: awaiting command");
            }
            Command::Register(mode) => self.begin_register_prompt(mode),
            Command::ResetRegisters(category) => {
                self.registers.reset_category(category);
                let listing = display::render_registers(&self.registers);
                self.ui.update_panel(&listing);
            }
            Command::ExportRegisters(category) => {
                if !self.settings.import_registers {
                    self.ui
                        .status_message("Attention: import from file is currently disabled.");
                }
                let subset = self.registers.export_category(category);
                if let Err(e) = register_file::save(&self.settings.register_file, &subset) {
                    self.ui.status_message(&format!("Register export failed: {e}"));
                    return Err(e);
                }
            }
            Command::ImportRegisters(category) => {
                if !self.settings.import_registers {
                    self.ui
                        .status_message("Attention: import from file is currently disabled.");
                }
                match register_file::load_category(&self.settings.register_file, category) {
                    Ok(entries) => {
                        self.registers.merge(entries);
                        let listing = display::render_registers(&self.registers);
                        self.ui.update_panel(&listing);
                    }
                    Err(e) => {
                        self.ui.status_message(&format!("Register import failed: {e}"));
                        return Err(e);
                    }
                }
            }
            Command::EraseRegisterFile(category) => {
                if let Err(e) = register_file::erase_category(&self.settings.register_file, category)
                {
                    self.ui.status_message(&format!("Register erase failed: {e}"));
                    return Err(e);
                }
            }
            Command::ShowHistory { yank } => {
                let stack = if yank { &self.yank } else { &self.history };
                let title = if yank { "YANK" } else { "CLIPBOARD" };
                let listing = display::render_history(stack, title);
                self.ui.update_panel(&listing);
            }
            Command::ShowRegisters => {
                let listing = display::render_registers(&self.registers);
                self.ui.update_panel(&listing);
            }
            Command::StripQuotedExcerpts => self.strip_quoted_excerpts(),
        }
        Ok(())
    }

    /// Copy/cut bridge: route the fresh clipboard value into the stacks.
    /// With yank mode on, the yank stack records it; explicit yank mode
    /// additionally bypasses the main history.
    pub fn on_copy_or_cut(&mut self) -> ClipResult<()> {
        let clip = self.clipboard.read()?;
        let syntax = self.ui.current_syntax();
        let allow_duplicates = self.settings.allow_history_duplicates;

        if self.modes.yank_mode() {
            self.yank.append(&clip, syntax.clone(), allow_duplicates);
            if self.settings.explicit_yank_mode {
                self.refresh_panel(true);
                return Ok(());
            }
        }
        self.history.append(&clip, syntax, allow_duplicates);
        self.refresh_panel(false);
        Ok(())
    }

    /// Any host command that is not one of ours drops command mode and
    /// closes our transient surfaces. Hosts holding the configured
    /// non-stop guard key simply do not forward the event.
    pub fn on_foreign_command(&mut self) {
        if self.modes.exit_command_mode() {
            self.ui.close_panels();
        }
    }

    /// Host answer to `begin_choice_menu`. `None` means the menu was
    /// cancelled, which snaps the cursor back to the newest entry and
    /// mirrors it to the clipboard, undoing any preview moves.
    pub fn resolve_choice(&mut self, selection: Option<usize>) -> ClipResult<()> {
        let (yanking, indent, pop) = match &self.pending {
            Some(PendingInput::Choice { yanking, indent, pop }) => (*yanking, *indent, *pop),
            _ => return Ok(()),
        };
        self.pending = None;

        match selection {
            Some(idx) => {
                self.resume_idx = Some(idx);
                self.indent = indent;
                self.pop = pop;
                self.stack_mut(yanking).select_at(idx);
                self.paste(yanking)?;
                if yanking {
                    self.maybe_end_yank_mode();
                }
            }
            None => {
                let newest = self.stack_mut(yanking).select_newest().map(|e| e.text.clone());
                if let Some(text) = newest {
                    write_and_confirm(&mut self.clipboard, &text)?;
                }
            }
        }
        self.ui.close_panels();
        Ok(())
    }

    /// Preview hook while the chooser is open: move the cursor to the
    /// highlighted entry and display it without pasting.
    pub fn preview_choice(&mut self, index: usize) -> ClipResult<()> {
        let yanking = match &self.pending {
            Some(PendingInput::Choice { yanking, .. }) => *yanking,
            _ => return Ok(()),
        };
        self.stack_mut(yanking).select_at(index);
        let stack = if yanking { &self.yank } else { &self.history };
        if let Some(entry) = stack.current() {
            let preview = display::popup_preview(&entry.text, &entry.syntax.preview_lang);
            self.ui.show_popup(&preview);
        }
        Ok(())
    }

    /// Host answer to `begin_key_prompt`. `None` aborts the prompt.
    pub fn resolve_register_key(&mut self, key: Option<char>) -> ClipResult<()> {
        let mode = match &self.pending {
            Some(PendingInput::RegisterKey(mode)) => *mode,
            _ => return Ok(()),
        };
        self.pending = None;
        let Some(key) = key else {
            return Ok(());
        };
        if !is_valid_register_key(key) {
            self.ui.status_message("Not a valid key.");
            return Ok(());
        }

        match mode {
            RegisterMode::Copy => {
                self.ui.run_native_copy();
                let content = self.clipboard.read()?;
                self.registers.set(key, content.clone());
                let preview = display::popup_preview(&content, &self.ui.current_syntax().preview_lang);
                self.ui
                    .show_popup(&format!("Set Clipboard Register \"{key}\" to:\n\n{preview}"));
                let listing = display::render_registers(&self.registers);
                self.ui.update_panel(&listing);
                self.ui.status_message(&format!("Registered in {key}"));
            }
            RegisterMode::Paste { indent } => {
                let Some(text) = self.registers.get(key).map(str::to_string) else {
                    self.ui.status_message("Not a valid register");
                    return Ok(());
                };
                self.ui.status_message(&format!("Pasted register {key}"));
                write_and_confirm(&mut self.clipboard, &text)?;
                self.ui.run_native_paste(indent);
            }
            RegisterMode::SetClipboard => {
                let Some(text) = self.registers.get(key).map(str::to_string) else {
                    self.ui.status_message("Not a valid register");
                    return Ok(());
                };
                self.ui
                    .status_message(&format!("Clipboard set to register '{key}'"));
                write_and_confirm(&mut self.clipboard, &text)?;
            }
        }
        Ok(())
    }

    /// Pick up changed settings at runtime without rebuilding the stacks.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.history.set_max_clips(settings.max_history_size);
        self.yank.set_max_clips(settings.max_history_size);
        self.settings = settings;
    }

    pub fn history(&self) -> &ClipHistory {
        &self.history
    }

    pub fn yank_stack(&self) -> &ClipHistory {
        &self.yank
    }

    pub fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    // -----------------------------------------------------------------

    fn set_default_flags(&mut self) {
        self.indent = false;
        self.pop = false;
    }

    fn stack_mut(&mut self, yanking: bool) -> &mut ClipHistory {
        if yanking {
            &mut self.yank
        } else {
            &mut self.history
        }
    }

    fn empty_message(yanking: bool) -> &'static str {
        if yanking {
            "Nothing in yank stack"
        } else {
            "Nothing in history"
        }
    }

    /// Write the current entry to the clipboard, have the host paste it,
    /// and consume the entry when popping.
    fn paste(&mut self, yanking: bool) -> ClipResult<()> {
        let msg = Self::empty_message(yanking);
        let Some(clip) = self.stack_mut(yanking).current().map(|e| e.text.clone()) else {
            self.ui.show_popup(msg);
            return Ok(());
        };

        write_and_confirm(&mut self.clipboard, &clip)?;
        self.ui.run_native_paste(self.indent);
        self.ui.close_panels();

        if self.pop {
            let stack = self.stack_mut(yanking);
            stack.remove_payload(&clip);
            if stack.is_empty() {
                self.ui.show_popup(msg);
            }
        }

        self.refresh_panel(yanking);
        Ok(())
    }

    /// One step of the consuming yank traversal.
    ///
    /// Normally consumes the oldest remaining entry. After a chooser jump
    /// the saved resume index takes over: each step selects one position
    /// above the last and decrements it, and when it would go negative the
    /// traversal falls back to the bottom for good.
    fn yank_step(&mut self, choose: bool) -> ClipResult<()> {
        if self.yank.is_empty() {
            self.ui.show_popup("Nothing to yank");
            return Ok(());
        }

        if choose {
            self.choose_and_paste(true);
            return Ok(());
        }

        match self.resume_idx {
            Some(0) => {
                self.resume_idx = None;
                self.yank.select_oldest();
            }
            Some(idx) if idx < self.yank.len() => {
                self.resume_idx = Some(idx - 1);
                self.yank.select_at(idx - 1);
            }
            _ => {
                self.yank.select_oldest();
            }
        }
        self.paste(true)?;
        self.maybe_end_yank_mode();
        Ok(())
    }

    fn maybe_end_yank_mode(&mut self) {
        if self.modes.yank_mode()
            && self.yank.is_empty()
            && self.settings.explicit_yank_mode
            && self.settings.end_yank_mode_on_emptied_stack
        {
            self.toggle_yank_mode();
        }
    }

    fn toggle_yank_mode(&mut self) {
        let on = self.modes.toggle_yank_mode();
        self.ui
            .status_message(&format!("YANK MODE: {}", if on { "On" } else { "Off" }));

        // leaving explicit yank mode discards unconsumed yanks rather than
        // merging them into history
        if !on && self.settings.explicit_yank_mode {
            self.yank.reset();
            self.resume_idx = None;
        }
    }

    fn choose_and_paste(&mut self, yanking: bool) {
        let stack = if yanking { &self.yank } else { &self.history };
        if stack.is_empty() {
            self.ui.show_popup(Self::empty_message(yanking));
            return;
        }
        let labels: Vec<String> = stack.iter().map(|e| display::menu_label(&e.text)).collect();
        self.pending = Some(PendingInput::Choice {
            yanking,
            indent: self.indent,
            pop: self.pop,
        });
        self.ui.begin_choice_menu(&labels);
    }

    fn begin_register_prompt(&mut self, mode: RegisterMode) {
        let msg = match mode {
            RegisterMode::Copy => "Register in registers key?",
            RegisterMode::Paste { .. } => "Paste from registers key?",
            RegisterMode::SetClipboard => "Set clipboard to registers key?",
        };
        self.ui.status_message(msg);
        self.pending = Some(PendingInput::RegisterKey(mode));
        self.ui.begin_key_prompt("Enter a key (0-9, a-Z):");
    }

    /// Move the history cursor and mirror the new current entry to the
    /// clipboard and the configured display surface.
    fn cycle(&mut self, toward_newest: bool) -> ClipResult<()> {
        if toward_newest {
            self.history.select_next();
        } else {
            self.history.select_previous();
        }
        self.mirror_current_to_clipboard()?;
        self.refresh_panel(false);
        self.display_current()?;
        Ok(())
    }

    fn mirror_current_to_clipboard(&mut self) -> ClipResult<()> {
        match self.history.current().map(|e| e.text.clone()) {
            Some(text) => write_and_confirm(&mut self.clipboard, &text),
            None => {
                self.ui.show_popup("Nothing in history");
                Ok(())
            }
        }
    }

    fn display_current(&mut self) -> ClipResult<()> {
        let mode = if self.modes.command_mode() {
            self.settings.command_mode_display_mode
        } else {
            self.settings.display_mode
        };

        let Some(entry) = self.history.current() else {
            return Ok(());
        };
        match mode {
            DisplayMode::Panel => {
                let text = entry.text.clone();
                self.ui.update_panel(&text);
            }
            DisplayMode::Popup => {
                let preview = display::popup_preview(&entry.text, &entry.syntax.preview_lang);
                self.ui.show_popup(&preview);
            }
            DisplayMode::StatusBar => {
                let line = display::status_line(&entry.text);
                self.ui.status_message(&line);
            }
            DisplayMode::None => {}
        }
        Ok(())
    }

    fn refresh_panel(&mut self, yanking: bool) {
        let stack = if yanking { &self.yank } else { &self.history };
        let title = if yanking { "YANK" } else { "CLIPBOARD" };
        let listing = display::render_history(stack, title);
        self.ui.update_panel(&listing);
    }

    /// Strip e-book "Excerpt From" wrappers, keeping only the quoted body.
    fn strip_quoted_excerpts(&mut self) {
        let Ok(re) = Regex::new(QUOTED_EXCERPT_PATTERN) else {
            return;
        };
        let cleaned = self.history.rewrite_payloads(|text| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        });
        if cleaned > 0 {
            self.ui.status_message(&format!("{cleaned} entries cleaned"));
        }
    }
}
