//! Text rendering for the host's panel, popup, and status bar surfaces.
//!
//! Everything here is pure string building; the dispatcher decides which
//! surface receives the result based on the configured display mode.

use unicode_width::UnicodeWidthChar;

use crate::history::ClipHistory;
use crate::registers::RegisterStore;

/// Longest chooser label, in display columns.
const MENU_LABEL_WIDTH: usize = 64;

/// Preview truncation: payloads over `PREVIEW_LIMIT` characters are cut at
/// `PREVIEW_KEEP` with an ellipsis line.
const PREVIEW_LIMIT: usize = 500;
const PREVIEW_KEEP: usize = 350;

/// Numbered history listing with a marker at the current index.
pub fn render_history(history: &ClipHistory, title: &str) -> String {
    let count = history.len();
    let mut out = format!(" {title} HISTORY ({count})\n");
    out.push_str(&format!("===================={}==\n", "=".repeat(count.to_string().len())));

    for (i, entry) in history.iter().enumerate() {
        if history.current_index() == Some(i) {
            out.push_str("--> ");
        } else {
            out.push_str("    ");
        }
        let item = flow_lines(&entry.text, "\n       > ");
        // keep the listing aligned past 999 entries by showing the last
        // three digits only
        let number = (i + 1).to_string();
        let number = &number[number.len().saturating_sub(3)..];
        out.push_str(&format!("{number:>3}. {item}\n"));
    }
    out
}

/// `key: value` listing of every register.
pub fn render_registers(store: &RegisterStore) -> String {
    let count = store.len();
    let mut out = format!(" CLIPBOARD REGISTERS ({count})\n");
    out.push_str(&format!("====================={}==\n", "=".repeat(count.to_string().len())));

    for (key, text) in store.iter() {
        let item = flow_lines(text, "\n > ");
        out.push_str(&format!("{key}: {item}\n"));
    }
    out
}

/// Fenced code block for a popup. The language tag only applies to
/// multi-line payloads; single lines render as plain text.
pub fn popup_preview(text: &str, lang: &str) -> String {
    let lang = if text.contains('\n') { lang } else { "" };
    let body = if text.chars().count() > PREVIEW_LIMIT {
        let cut: String = text.chars().take(PREVIEW_KEEP).collect();
        format!("{cut}\n...\n")
    } else {
        text.to_string()
    };
    format!("```{lang}\n{body}\n```")
}

/// One-line status bar message for the current clip.
pub fn status_line(text: &str) -> String {
    let escaped = text
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("Set Clipboard to \"{escaped}\"")
}

/// Chooser menu label: newlines flattened, clipped to a fixed width.
pub fn menu_label(text: &str) -> String {
    let flat = text.replace('\n', "\\n");
    let mut label = String::new();
    let mut width = 0;
    for c in flat.chars() {
        width += c.width().unwrap_or(0);
        if width > MENU_LABEL_WIDTH {
            break;
        }
        label.push(c);
    }
    label
}

/// Normalize line endings and escape tabs, then prefix continuation lines.
fn flow_lines(text: &str, continuation: &str) -> String {
    text.replace('\t', "\\t")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', continuation)
}
