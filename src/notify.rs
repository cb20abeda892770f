//! Desktop notifications
//!
//! Delivery is best effort: a notifier reports whether the message reached
//! the user, and callers never fail a run because it did not.

use crate::logging::{StructuredLogger, get_logger};
use std::process::{Command, Stdio};

/// Something that can show a short titled message to the user
pub trait Notifier: Send + Sync {
    /// Returns `true` when the message was delivered through any channel
    fn notify(&self, title: &str, message: &str) -> bool;
}

/// Prints `NOTIFICATION: title - message` to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) -> bool {
        println!("{}", console_line(title, message));
        true
    }
}

pub fn console_line(title: &str, message: &str) -> String {
    format!("NOTIFICATION: {} - {}", title, message)
}

/// Platform notification command, falling back to the console
pub struct DesktopNotifier {
    logger: StructuredLogger,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            logger: get_logger("notify"),
        }
    }

    fn try_platform(&self, title: &str, message: &str) -> bool {
        let Some(mut command) = platform_command(title, message) else {
            return false;
        };
        match command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => true,
            Ok(status) => {
                self.logger
                    .debug(&format!("Notification command exited with {}", status));
                false
            }
            Err(e) => {
                self.logger
                    .debug(&format!("Notification command unavailable: {}", e));
                false
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) -> bool {
        if self.try_platform(title, message) {
            self.logger.info("Desktop notification sent");
            return true;
        }
        let delivered = ConsoleNotifier.notify(title, message);
        self.logger.info("Desktop notification unavailable, printed to console");
        delivered
    }
}

/// Escape for a double-quoted AppleScript string
fn applescript_quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape for a single-quoted PowerShell string
fn powershell_quote(text: &str) -> String {
    text.replace('\'', "''")
}

fn platform_command(title: &str, message: &str) -> Option<Command> {
    if cfg!(target_os = "linux") {
        let mut cmd = Command::new("notify-send");
        cmd.args(["--app-name=strompris", title, message]);
        Some(cmd)
    } else if cfg!(target_os = "macos") {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            applescript_quote(message),
            applescript_quote(title)
        );
        let mut cmd = Command::new("osascript");
        cmd.args(["-e", script.as_str()]);
        Some(cmd)
    } else if cfg!(target_os = "windows") {
        let script = format!(
            "Add-Type -AssemblyName System.Windows.Forms; \
             $n = New-Object System.Windows.Forms.NotifyIcon; \
             $n.Icon = [System.Drawing.SystemIcons]::Information; \
             $n.Visible = $true; \
             $n.ShowBalloonTip(10000, '{}', '{}', 'Info'); \
             Start-Sleep -Seconds 5; $n.Dispose()",
            powershell_quote(title),
            powershell_quote(message)
        );
        let mut cmd = Command::new("powershell");
        cmd.args(["-NoProfile", "-Command", script.as_str()]);
        Some(cmd)
    } else {
        None
    }
}
