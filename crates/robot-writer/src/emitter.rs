//! Handing motion commands to the robot.
//!
//! Layout produces commands lazily; [`drive`] pulls them one at a time and
//! passes each to a [`MotionEmitter`] before computing the next. The
//! [`SerialEmitter`] blocks after every command until the robot acknowledges
//! it, which is the flow control the hardware requires.

use std::{
    convert::Infallible,
    io::{self, BufRead, BufReader, Read, Write},
    thread,
    time::Duration,
};

use robot_writer_core::MotionCommand;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::gcode::{Gcode, PREAMBLE};

/// Consumer of motion commands.
pub trait MotionEmitter {
    type Error;

    /// Transmit a single command. Returns once the command has been accepted.
    fn emit(&mut self, command: &MotionCommand) -> Result<(), Self::Error>;
}

/// Pull every command from `commands` into `emitter`, stopping at the first
/// failure. Returns how many commands were emitted.
pub fn drive<I, E>(commands: I, emitter: &mut E) -> Result<usize, E::Error>
where
    I: IntoIterator<Item = MotionCommand>,
    E: MotionEmitter + ?Sized,
{
    let mut sent = 0;
    for command in commands {
        emitter.emit(&command)?;
        sent += 1;
    }
    Ok(sent)
}

impl MotionEmitter for Vec<MotionCommand> {
    type Error = Infallible;

    fn emit(&mut self, command: &MotionCommand) -> Result<(), Infallible> {
        self.push(*command);
        Ok(())
    }
}

/// Writes G-code to any output without waiting for a reply.
#[derive(Debug)]
pub struct GcodeWriter<W> {
    out: W,
}

impl<W: Write> GcodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MotionEmitter for GcodeWriter<W> {
    type Error = io::Error;

    fn emit(&mut self, command: &MotionCommand) -> io::Result<()> {
        write!(self.out, "{}", Gcode(command))?;
        self.out.flush()
    }
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("serial I/O failed")]
    Io(#[from] io::Error),

    #[error("robot rejected {command:?}: {reply}")]
    Rejected { command: String, reply: String },

    #[error("robot closed the connection")]
    Disconnected,
}

/// Timing and acknowledgement settings for [`SerialEmitter`].
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Pause after each acknowledged command.
    pub settle: Duration,
    /// Reply line the robot sends once a command is accepted.
    pub ack: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            ack: "ok".to_owned(),
        }
    }
}

/// Marker the robot prints once it has woken up and is ready for commands.
const READY_MARKER: u8 = b'$';

/// Sends commands over a bidirectional byte stream such as a serial port and
/// waits for the robot's acknowledgement after each one.
#[derive(Debug)]
pub struct SerialEmitter<T: Read> {
    port: BufReader<T>,
    config: EmitterConfig,
}

impl<T: Read + Write> SerialEmitter<T> {
    pub fn new(port: T, config: EmitterConfig) -> Self {
        Self {
            port: BufReader::new(port),
            config,
        }
    }

    /// Wake the robot and block until it reports that it is ready.
    pub fn wake(&mut self) -> Result<(), EmitError> {
        info!("waking robot");
        self.write(b"\n")?;
        thread::sleep(self.config.settle);

        let mut banner = Vec::new();
        self.port.read_until(READY_MARKER, &mut banner)?;
        if banner.last() != Some(&READY_MARKER) {
            return Err(EmitError::Disconnected);
        }

        debug!(banner = %String::from_utf8_lossy(&banner).trim(), "robot ready");
        Ok(())
    }

    /// Home the robot, enable the spindle, and lift the pen.
    pub fn initialise(&mut self) -> Result<(), EmitError> {
        for line in PREAMBLE {
            self.send(&format!("{line}\n"))?;
        }
        Ok(())
    }

    /// Send one unit of text and wait for its acknowledgement.
    pub fn send(&mut self, unit: &str) -> Result<(), EmitError> {
        trace!(unit = unit.trim_end(), "sending");
        self.write(unit.as_bytes())?;
        self.wait_for_ack(unit)?;
        thread::sleep(self.config.settle);
        Ok(())
    }

    pub fn into_inner(self) -> T {
        self.port.into_inner()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let port = self.port.get_mut();
        port.write_all(bytes)?;
        port.flush()
    }

    fn wait_for_ack(&mut self, unit: &str) -> Result<(), EmitError> {
        let mut reply = String::new();
        loop {
            reply.clear();
            if self.port.read_line(&mut reply)? == 0 {
                return Err(EmitError::Disconnected);
            }

            let reply = reply.trim();
            if reply.eq_ignore_ascii_case(&self.config.ack) {
                return Ok(());
            }
            if reply.starts_with("error") {
                return Err(EmitError::Rejected {
                    command: unit.trim_end().to_owned(),
                    reply: reply.to_owned(),
                });
            }
            if !reply.is_empty() {
                debug!(reply, "robot says");
            }
        }
    }
}

impl<T: Read + Write> MotionEmitter for SerialEmitter<T> {
    type Error = EmitError;

    fn emit(&mut self, command: &MotionCommand) -> Result<(), EmitError> {
        self.send(&Gcode(command).to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use robot_writer_core::Position;
    use std::io::Cursor;

    /// A fake robot: replies come from a script, writes are recorded.
    pub(crate) struct ScriptedPort {
        replies: Cursor<Vec<u8>>,
        pub(crate) written: Vec<u8>,
    }

    impl ScriptedPort {
        pub(crate) fn new(replies: &str) -> Self {
            Self {
                replies: Cursor::new(replies.as_bytes().to_vec()),
                written: Vec::new(),
            }
        }

        pub(crate) fn written(&self) -> String {
            String::from_utf8_lossy(&self.written).into_owned()
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.replies.read(buf)
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn no_delay() -> EmitterConfig {
        EmitterConfig {
            settle: Duration::ZERO,
            ..EmitterConfig::default()
        }
    }

    #[test]
    fn drive_records_every_command() {
        let commands = [
            MotionCommand::travel(Position::new(1.0, -1.0)),
            MotionCommand::draw(Position::new(2.0, -1.0)),
            MotionCommand::home(),
        ];
        let mut recorded: Vec<MotionCommand> = Vec::new();

        let sent = drive(commands, &mut recorded).unwrap();
        assert_eq!(sent, 3);
        assert_eq!(recorded, commands);
    }

    #[test]
    fn writer_emits_units_back_to_back() {
        let mut writer = GcodeWriter::new(Vec::new());
        drive(
            [MotionCommand::draw(Position::new(1.0, -2.0)), MotionCommand::home()],
            &mut writer,
        )
        .unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "S1000\nG1 X1.00 Y-2.00\nS0\nG0 X0.00 Y0.00\n");
    }

    #[test]
    fn waits_for_ack_after_each_unit() {
        let port = ScriptedPort::new("ok\n[MSG: busy]\nok\n");
        let mut emitter = SerialEmitter::new(port, no_delay());

        emitter.emit(&MotionCommand::draw(Position::new(1.0, -2.0))).unwrap();
        emitter.emit(&MotionCommand::home()).unwrap();

        let port = emitter.into_inner();
        assert_eq!(port.written(), "S1000\nG1 X1.00 Y-2.00\nS0\nG0 X0.00 Y0.00\n");
    }

    #[test]
    fn missing_ack_is_disconnect() {
        let mut emitter = SerialEmitter::new(ScriptedPort::new("ok\n"), no_delay());
        let commands = [MotionCommand::home(), MotionCommand::home()];

        let err = drive(commands, &mut emitter).unwrap_err();
        assert!(matches!(err, EmitError::Disconnected));
    }

    #[test]
    fn error_reply_is_rejection() {
        let mut emitter = SerialEmitter::new(ScriptedPort::new("error:20\n"), no_delay());

        let err = emitter.emit(&MotionCommand::home()).unwrap_err();
        match err {
            EmitError::Rejected { command, reply } => {
                assert_eq!(command, "S0\nG0 X0.00 Y0.00");
                assert_eq!(reply, "error:20");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wake_then_initialise() {
        let port = ScriptedPort::new("\r\nGrbl 1.1f ['$' for help]\r\nok\r\nok\r\nok\r\n");
        let mut emitter = SerialEmitter::new(port, no_delay());

        emitter.wake().unwrap();
        emitter.initialise().unwrap();

        let port = emitter.into_inner();
        assert_eq!(port.written(), "\nG1 X0 Y0 F1000\nM3\nS0\n");
    }

    #[test]
    fn wake_fails_without_ready_marker() {
        let mut emitter = SerialEmitter::new(ScriptedPort::new("Grbl 1.1f\r\n"), no_delay());
        assert!(matches!(emitter.wake(), Err(EmitError::Disconnected)));
    }
}
