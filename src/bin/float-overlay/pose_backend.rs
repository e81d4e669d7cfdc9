use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Deserialize;

use float_overlay::Frame;
use float_overlay::hand::HandObservation;
use float_overlay::pipeline::PoseProvider;

#[derive(Deserialize, Debug)]
struct DetectionReply {
    hands: Vec<HandObservation>,
}

/// Hand-landmark estimation delegated to an external sidecar process.
///
/// Per tick: a `width height` header line plus the raw RGB plane go to the
/// child's stdin; one JSON line (`{"hands":[{"handedness":...,"points":
/// [[x,y],...]}]}`) comes back on its stdout. Request/response is blocking,
/// matching the one-frame-in-flight tick model.
pub struct SidecarDetector {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl SidecarDetector {
    pub fn spawn(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("pose command is empty"))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn pose detector \"{command}\""))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("pose detector has no stdin pipe"))?;
        let stdout = BufReader::new(
            child
                .stdout
                .take()
                .ok_or_else(|| anyhow!("pose detector has no stdout pipe"))?,
        );

        info!("Pose detector running: {}", command);
        Ok(SidecarDetector {
            child,
            stdin,
            stdout,
        })
    }
}

impl PoseProvider for SidecarDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandObservation>> {
        writeln!(self.stdin, "{} {}", frame.width(), frame.height())
            .context("failed to write frame header to pose detector")?;
        self.stdin
            .write_all(frame.as_raw())
            .context("failed to write frame pixels to pose detector")?;
        self.stdin.flush()?;

        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .context("failed to read from pose detector")?;
        if read == 0 {
            return Err(anyhow!("pose detector closed its stdout"));
        }

        let reply: DetectionReply = serde_json::from_str(line.trim())
            .context("failed to parse pose detector reply")?;
        Ok(reply.hands)
    }
}

impl Drop for SidecarDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
