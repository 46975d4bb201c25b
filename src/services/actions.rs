use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::dispatch::params::StatKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeControl {
    Up,
    Down,
    Mute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaControl {
    PlayPause,
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessControl {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowControl {
    MinimizeAll,
    Switch,
}

/// OS-level action collaborators. The router only selects and invokes
/// these; whether the OS actually honored the request is the
/// implementation's problem, reported through the returned message.
#[async_trait]
pub trait OsActions: Send + Sync {
    async fn open_app(&self, name: &str) -> Result<String>;
    async fn close_app(&self, name: &str) -> Result<String>;
    async fn volume(&self, control: VolumeControl) -> Result<String>;
    async fn media(&self, control: MediaControl) -> Result<String>;
    async fn brightness(&self, control: BrightnessControl) -> Result<String>;
    async fn lock_screen(&self) -> Result<String>;
    async fn empty_recycle_bin(&self) -> Result<String>;
    async fn system_stats(&self, kind: StatKind) -> Result<String>;
    async fn window(&self, control: WindowControl) -> Result<String>;
    async fn local_ip(&self) -> Result<String>;
    async fn open_url(&self, url: &str) -> Result<String>;
}

/// Best-effort desktop implementation built on external commands. Coverage
/// varies per platform; anything unsupported comes back as an error the
/// router turns into a spoken failure message.
pub struct DesktopActions;

impl DesktopActions {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!("os action: {program} {args:?}");
        let status = tokio::process::Command::new(program)
            .args(args)
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("{program} exited with {status}"))
        }
    }

    async fn spawn(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!("os spawn: {program} {args:?}");
        tokio::process::Command::new(program).args(args).spawn()?;
        Ok(())
    }
}

impl Default for DesktopActions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OsActions for DesktopActions {
    async fn open_app(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(anyhow!("no application name given"));
        }
        let result = match std::env::consts::OS {
            "windows" => self.spawn("cmd", &["/C", "start", "", name]).await,
            "macos" => self.spawn("open", &["-a", name]).await,
            _ => self.spawn(name, &[]).await,
        };
        result.map(|_| format!("Opened {name}"))
    }

    async fn close_app(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(anyhow!("no application name given"));
        }
        let result = match std::env::consts::OS {
            "windows" => {
                let image = format!("{name}.exe");
                self.run("taskkill", &["/im", &image, "/f"]).await
            }
            _ => self.run("pkill", &["-f", name]).await,
        };
        result.map(|_| format!("Closed {name}"))
    }

    async fn volume(&self, control: VolumeControl) -> Result<String> {
        let (args, message): (&[&str], &str) = match control {
            VolumeControl::Up => (
                &["set-sink-volume", "@DEFAULT_SINK@", "+10%"],
                "Volume increased.",
            ),
            VolumeControl::Down => (
                &["set-sink-volume", "@DEFAULT_SINK@", "-10%"],
                "Volume decreased.",
            ),
            VolumeControl::Mute => (&["set-sink-mute", "@DEFAULT_SINK@", "1"], "Volume muted."),
        };
        match std::env::consts::OS {
            "linux" => self.run("pactl", args).await.map(|_| message.to_string()),
            "macos" => {
                let script = match control {
                    VolumeControl::Up => "set volume output volume ((output volume of (get volume settings)) + 10)",
                    VolumeControl::Down => "set volume output volume ((output volume of (get volume settings)) - 10)",
                    VolumeControl::Mute => "set volume output muted true",
                };
                self.run("osascript", &["-e", script])
                    .await
                    .map(|_| message.to_string())
            }
            other => Err(anyhow!("volume control not supported on {other}")),
        }
    }

    async fn media(&self, control: MediaControl) -> Result<String> {
        let (arg, message) = match control {
            MediaControl::PlayPause => ("play-pause", "Toggled media playback."),
            MediaControl::Next => ("next", "Skipped to next track."),
            MediaControl::Prev => ("previous", "Returned to previous track."),
        };
        self.run("playerctl", &[arg]).await.map(|_| message.to_string())
    }

    async fn brightness(&self, control: BrightnessControl) -> Result<String> {
        let (arg, message) = match control {
            BrightnessControl::Up => ("+20%", "Brightness increased."),
            BrightnessControl::Down => ("20%-", "Brightness decreased."),
        };
        self.run("brightnessctl", &["set", arg])
            .await
            .map(|_| message.to_string())
    }

    async fn lock_screen(&self) -> Result<String> {
        let result = match std::env::consts::OS {
            "windows" => {
                self.run("rundll32.exe", &["user32.dll,LockWorkStation"])
                    .await
            }
            "macos" => self.run("pmset", &["displaysleepnow"]).await,
            _ => self.run("loginctl", &["lock-session"]).await,
        };
        result.map(|_| "Locked the screen.".to_string())
    }

    async fn empty_recycle_bin(&self) -> Result<String> {
        match std::env::consts::OS {
            "windows" => self
                .run(
                    "powershell",
                    &["-NoProfile", "-Command", "Clear-RecycleBin -Force"],
                )
                .await
                .map(|_| "Recycle bin emptied.".to_string()),
            other => Err(anyhow!("recycle bin control not supported on {other}")),
        }
    }

    async fn system_stats(&self, kind: StatKind) -> Result<String> {
        match kind {
            StatKind::Cpu => {
                let load = tokio::fs::read_to_string("/proc/loadavg").await?;
                let one_minute = load.split_whitespace().next().unwrap_or("?").to_string();
                Ok(format!("CPU load average is {one_minute}."))
            }
            StatKind::Memory => {
                let info = tokio::fs::read_to_string("/proc/meminfo").await?;
                let total = meminfo_kb(&info, "MemTotal:");
                let available = meminfo_kb(&info, "MemAvailable:");
                match (total, available) {
                    (Some(total), Some(available)) if total > 0 => {
                        let used_pct = 100 - (available * 100 / total);
                        Ok(format!("RAM usage is at {used_pct} percent."))
                    }
                    _ => Err(anyhow!("could not read memory info")),
                }
            }
            StatKind::Battery => {
                let capacity =
                    tokio::fs::read_to_string("/sys/class/power_supply/BAT0/capacity").await;
                match capacity {
                    Ok(pct) => Ok(format!("Battery is at {} percent.", pct.trim())),
                    Err(_) => Ok("No battery detected.".to_string()),
                }
            }
            StatKind::General => {
                let cpu = self.system_stats(StatKind::Cpu).await.unwrap_or_default();
                let mem = self.system_stats(StatKind::Memory).await.unwrap_or_default();
                Ok(format!("{cpu} {mem}").trim().to_string())
            }
        }
    }

    async fn window(&self, control: WindowControl) -> Result<String> {
        let (keys, message) = match control {
            WindowControl::MinimizeAll => ("super+d", "Toggled desktop."),
            WindowControl::Switch => ("alt+Tab", "Switched window."),
        };
        self.run("xdotool", &["key", keys])
            .await
            .map(|_| message.to_string())
    }

    async fn local_ip(&self) -> Result<String> {
        // Routing trick: connecting a UDP socket picks the outbound
        // interface without sending anything.
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip().to_string())
    }

    async fn open_url(&self, url: &str) -> Result<String> {
        let result = match std::env::consts::OS {
            "windows" => self.spawn("cmd", &["/C", "start", "", url]).await,
            "macos" => self.spawn("open", &[url]).await,
            _ => self.spawn("xdg-open", &[url]).await,
        };
        result.map(|_| format!("Opened {url}"))
    }
}

fn meminfo_kb(info: &str, field: &str) -> Option<u64> {
    info.lines()
        .find(|line| line.starts_with(field))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}
