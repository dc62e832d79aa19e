//! Copying code blocks to the clipboard.
//!
//! [`copy_text`] tries a primary clipboard and falls back to a secondary one
//! when the primary is absent or fails. Only a failure of both is logged as an
//! error. On the command line the primary is the platform's clipboard tool
//! ([`SystemClipboard`]) and the fallback is the OSC 52 terminal escape
//! ([`Osc52Clipboard`]), which most terminal emulators forward to the system
//! clipboard.
//!
//! [`ensure_copy_buttons`] adds the copy control to every code container of a
//! page that does not have one yet.

use crate::markup::{self, element_bounds};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use maud::html;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, error};

pub const CODE_CONTAINER_CLASS: &str = "code-container";
pub const COPY_BUTTON_CLASS: &str = "copy-btn";

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard tool available (tried {0})")]
    Unavailable(String),
    #[error("{program} exited with {status}")]
    Command { program: String, status: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub trait Clipboard {
    fn name(&self) -> &str;
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Which clipboard ended up holding the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    CopiedWithFallback,
}

pub fn copy_text(
    primary: Option<&dyn Clipboard>,
    fallback: &dyn Clipboard,
    text: &str,
) -> Result<CopyOutcome, ClipboardError> {
    match primary {
        Some(clipboard) => match clipboard.write_text(text) {
            Ok(()) => return Ok(CopyOutcome::Copied),
            Err(e) => debug!(clipboard = clipboard.name(), error = %e, "primary copy failed"),
        },
        None => debug!("no primary clipboard, using fallback"),
    }

    fallback
        .write_text(text)
        .map(|()| CopyOutcome::CopiedWithFallback)
        .inspect_err(|e| error!(clipboard = fallback.name(), error = %e, "failed to copy text"))
}

/// The platform clipboard, through the first clipboard tool that is installed.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl SystemClipboard {
    pub fn new(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }

    fn platform_candidates() -> Vec<(String, Vec<String>)> {
        let raw: &[(&str, &[&str])] = if cfg!(target_os = "macos") {
            &[("pbcopy", &[])]
        } else if cfg!(windows) {
            &[("clip", &[])]
        } else {
            &[
                ("wl-copy", &[]),
                ("xclip", &["-selection", "clipboard"]),
                ("xsel", &["--clipboard", "--input"]),
                ("clip.exe", &[]),
            ]
        };
        raw.iter()
            .map(|(program, args)| {
                (
                    program.to_string(),
                    args.iter().map(|a| a.to_string()).collect(),
                )
            })
            .collect()
    }

    fn run(program: &str, args: &[String], text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Command {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(Self::platform_candidates())
    }
}

impl Clipboard for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in &self.candidates {
            match Self::run(program, args, text) {
                Ok(()) => {
                    debug!(%program, "copied via clipboard tool");
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        let tried: Vec<&str> = self.candidates.iter().map(|(p, _)| p.as_str()).collect();
        Err(ClipboardError::Unavailable(tried.join(", ")))
    }
}

/// Writes the OSC 52 "set clipboard" escape to a terminal.
pub struct Osc52Clipboard<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The escape sequence that places `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn name(&self) -> &str {
        "osc52"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Add a copy button to every code container that holds code but has no
/// button. Returns the new markup and the number of buttons added.
pub fn ensure_copy_buttons(html: &str) -> (String, usize) {
    let button = html! { button.copy-btn type="button" { "Copy" } }.into_string();

    let mut insert_at: Vec<usize> = markup::tags(html)
        .filter(|t| t.is_start() && t.has_class(CODE_CONTAINER_CLASS))
        .filter_map(|t| element_bounds(html, &t))
        .filter(|bounds| {
            let inner = &html[bounds.inner.clone()];
            let mut has_code = false;
            let mut has_button = false;
            for tag in markup::tags(inner).filter(|t| t.is_start()) {
                has_code |= tag.name == "code";
                has_button |= tag.has_class(COPY_BUTTON_CLASS);
            }
            has_code && !has_button
        })
        .map(|bounds| bounds.end_tag.start)
        .collect();
    insert_at.sort_unstable();

    let mut out = String::with_capacity(html.len() + insert_at.len() * button.len());
    let mut cursor = 0;
    for &pos in &insert_at {
        out.push_str(&html[cursor..pos]);
        out.push_str(&button);
        cursor = pos;
    }
    out.push_str(&html[cursor..]);
    (out, insert_at.len())
}
