use std::io::{Write, stdout};

use base64::Engine;

use crate::app::{App, Message, Model, ToastLevel};
use crate::scratch::ScratchBuffer;
use crate::story::export::write_export;

impl App {
    /// Run the side effects a message asks for, after `update` has
    /// already applied its state changes.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::Export => export_story(model),
            Message::CopyJson => copy_json(model),
            _ => {}
        }
    }
}

/// Serialize the story and write it under the export directory.
fn export_story(model: &mut Model) {
    match write_export(&model.story, &model.export_dir) {
        Ok(path) => {
            crate::trace::log_event("export.write", format!("path={}", path.display()));
            model.show_toast(ToastLevel::Info, format!("Exported {}", path.display()));
            model.last_export = Some(path);
        }
        Err(err) => {
            crate::trace::log_event("export.error", format!("err={err}"));
            model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
        }
    }
}

/// Copy the JSON scratch buffer to the system clipboard.
fn copy_json(model: &mut Model) {
    let Some(text) = model.json_buffer.as_ref().map(ScratchBuffer::text) else {
        return;
    };
    match copy_to_clipboard(&text) {
        Ok(()) => model.show_toast(ToastLevel::Info, "Copied JSON to clipboard"),
        Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
