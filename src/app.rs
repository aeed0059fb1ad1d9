// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Application context and scheduler tasks.
//!
//! [`App`] owns all runtime state: the supervisor (mode, type, plant), the PID controller, the
//! published plant input/output, the terminal session and the board. The firmware root owns the
//! one instance and lends it to the scheduler, which runs the tasks in [`App::TASKS`] one at a
//! time. No task ever runs concurrently with another, so nothing in here needs a lock.
//!
//! The terminal output is best effort: write errors are dropped.

use core::fmt::Write;

use crate::config::{
    DEFAULT_KD, DEFAULT_KI, DEFAULT_KP, DEFAULT_REFERENCE, INT_MAX, INT_MIN, OUT_MAX, OUT_MIN,
    REF_MAX, STREAM_LINES_PER_SCREEN, TS,
};
use crate::control::Pid;
use crate::converter::{ConverterType, Effect, Mode, Supervisor, Transition};
use crate::hw::{Board, Debouncer};
use crate::protocol::{self, Command, CommandError, LineEditor, COMMANDS};
use crate::sched::scheduler::Task;
use crate::terminal::{self, Color};

const SEPARATOR_1: &str = "===============================================";
const SEPARATOR_2: &str = "  -----------------------------------------------";

/// Latest plant input and output, published by the control loop.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    /// Controller output.
    pub u: f32,
    /// Plant output.
    pub y: f32,
}

/// Who may change the mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiOwner {
    /// Button and terminal both allowed.
    Shared,
    /// The terminal entered CONFIG. The button is locked out until CONFIG is left.
    Serial,
}

impl UiOwner {
    const fn describe(self) -> &'static str {
        match self {
            UiOwner::Shared => "none (button + terminal)",
            UiOwner::Serial => "terminal (button locked)",
        }
    }
}

#[derive(Debug, Default)]
struct Stream {
    on: bool,
    lines: u16,
}

pub struct App<B: Board> {
    board: B,
    supervisor: Supervisor,
    pid: Pid,
    outputs: Outputs,
    owner: UiOwner,
    stream: Stream,
    editor: LineEditor,
    button: Debouncer,
}

impl<B: Board> App<B> {
    /// Task table, highest priority first. Indices match [`crate::sched::TaskId`].
    pub const TASKS: [Task<Self>; 4] = [
        Self::control_loop,
        Self::serial_rx,
        Self::button,
        Self::print_output,
    ];

    pub fn new(board: B) -> Self {
        let pid = Pid::new(DEFAULT_KP, DEFAULT_KI, DEFAULT_KD, TS)
            .with_integral_limits(INT_MIN, INT_MAX)
            .with_output_limits(OUT_MIN, OUT_MAX)
            .with_reference(DEFAULT_REFERENCE);

        Self {
            board,
            supervisor: Supervisor::new(),
            pid,
            outputs: Outputs::default(),
            owner: UiOwner::Shared,
            stream: Stream::default(),
            editor: LineEditor::new(),
            button: Debouncer::new(),
        }
    }

    /// Put hardware and state into IDLE and paint the startup screen.
    pub fn start(&mut self) {
        let effects = self.supervisor.init();
        self.apply(effects);
        self.startup_screen();
        info!("converter controller up");
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// One control period: shape reference, PID, input mapping, plant step, PWM.
    pub fn control_loop(&mut self) {
        // A tick can still be pending when the loop timer is disarmed.
        if self.supervisor.mode() != Mode::Mod {
            return;
        }

        let reference = self.supervisor.shape_reference(self.pid.reference());
        let u = self.pid.update(reference, self.outputs.y);
        let input = self.supervisor.plant_input(u);
        let y = self.supervisor.step(input);

        self.outputs = Outputs { u, y };
        let duty = self.supervisor.topology().duty_percent(u);
        self.board.set_duty_percent(duty);
    }

    /// Drain received bytes through the line editor.
    pub fn serial_rx(&mut self) {
        while let Some(byte) = self.board.receive_byte() {
            if self.stream.on {
                // The LF trailing the CR that started the stream is not a keypress.
                if self.editor.absorb_line_feed(byte) {
                    continue;
                }
                self.stream.on = false;
                info!("stream stopped by keypress");
                let _ = terminal::new_line(&mut self.board);
                let _ = self.board.write_str("  Streaming stopped.");
                self.end_response();
                continue;
            }

            if let Some(line) = self.editor.push(byte, &mut self.board) {
                let _ = terminal::new_line(&mut self.board);
                self.handle_line(&line);
            }
        }
    }

    /// Debounced button sample. A press cycles IDLE → CONFIG → MOD → IDLE.
    pub fn button(&mut self) {
        let level = self.board.is_pressed();
        if !self.button.sample(level) {
            return;
        }

        let _ = terminal::new_line(&mut self.board);
        if self.owner == UiOwner::Serial {
            warn!("button ignored, terminal holds CONFIG");
            let _ = self
                .board
                .write_str("  Button ignored: terminal holds CONFIG (type 'exit').");
            self.end_response();
            return;
        }

        let target = self.supervisor.mode().next();
        info!("button press -> {}", target.name());
        self.change_mode(target);
        let _ = write!(self.board, "  Button: mode {}", target);
        self.end_response();
    }

    /// Streamed output line, when streaming.
    pub fn print_output(&mut self) {
        if !self.stream.on {
            return;
        }

        let reference = if self.supervisor.topology().is_inverter() {
            self.supervisor.shaped_reference()
        } else {
            self.pid.reference()
        };
        let _ = write!(
            self.board,
            "  Output Voltage: {:6.2} V, Reference Voltage: {:6.2} V",
            self.outputs.y, reference
        );
        let _ = terminal::new_line(&mut self.board);

        self.stream.lines += 1;
        if self.stream.lines >= STREAM_LINES_PER_SCREEN {
            self.stream.lines = 0;
            let _ = terminal::clear(&mut self.board);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Interpret one completed terminal line.
    pub fn handle_line(&mut self, line: &str) {
        let tokens = protocol::tokenize(line);
        if tokens.is_empty() {
            let _ = terminal::prompt(&mut self.board);
            return;
        }

        let result = protocol::parse(&tokens).and_then(|cmd| self.execute(cmd));
        match result {
            // Streaming owns the terminal until a key is pressed.
            Ok(()) if self.stream.on => return,
            Ok(()) => {}
            Err(e) => {
                debug!("command rejected: {}", e);
                let _ = write!(self.board, "  Error: {}", e);
                let _ = terminal::new_line(&mut self.board);
            }
        }
        let _ = terminal::prompt(&mut self.board);
    }

    /// Run a decoded command. Mode permissions are checked here; a rejected command changes
    /// nothing.
    pub fn execute(&mut self, cmd: Command) -> Result<(), CommandError> {
        let mode = self.supervisor.mode();
        match cmd {
            Command::Help => {
                self.show_commands();
                self.show_notes();
            }
            Command::Status => self.show_status(),
            Command::Mode(target) => {
                if let Transition::Unchanged(m) = self.change_mode(target) {
                    return Err(CommandError::AlreadyInMode(m));
                }
                if target == Mode::Config {
                    self.owner = UiOwner::Serial;
                }
                let _ = write!(self.board, "  Mode: {}", target);
                let _ = terminal::new_line(&mut self.board);
            }
            Command::Type(id) => {
                // Mode first: outside CONFIG the id is never looked at.
                self.supervisor.get_type()?;
                let ty = ConverterType::from_id(id).ok_or(CommandError::UnknownType)?;
                self.supervisor.set_type(ty)?;
                let _ = write!(self.board, "  Converter type: {}", ty);
                let _ = terminal::new_line(&mut self.board);
            }
            Command::Kp(v) | Command::Ki(v) | Command::Kd(v) => {
                let name = match cmd {
                    Command::Kp(_) => "kp",
                    Command::Ki(_) => "ki",
                    _ => "kd",
                };
                if mode != Mode::Config {
                    return Err(CommandError::NotAllowed {
                        command: name,
                        mode,
                    });
                }
                match cmd {
                    Command::Kp(_) => self.pid.set_kp(v),
                    Command::Ki(_) => self.pid.set_ki(v),
                    _ => self.pid.set_kd(v),
                }
                let _ = write!(self.board, "  {} set to {:.6}", name, v);
                let _ = terminal::new_line(&mut self.board);
            }
            Command::Ref(v) => {
                if mode == Mode::Idle {
                    return Err(CommandError::NotAllowed {
                        command: "ref",
                        mode,
                    });
                }
                if self.pid.set_reference(v) {
                    warn!("reference clamped");
                    let _ = write!(
                        self.board,
                        "  Warning: reference limited to +/-{:.1} V",
                        REF_MAX
                    );
                    let _ = terminal::new_line(&mut self.board);
                }
                let _ = write!(self.board, "  Reference: {:.2} V", self.pid.reference());
                let _ = terminal::new_line(&mut self.board);
            }
            Command::Stream => {
                if mode != Mode::Mod {
                    return Err(CommandError::NotAllowed {
                        command: "stream",
                        mode,
                    });
                }
                info!("stream started");
                self.stream = Stream { on: true, lines: 0 };
            }
            Command::Exit => {
                if mode != Mode::Config {
                    return Err(CommandError::NotAllowed {
                        command: "exit",
                        mode,
                    });
                }
                self.change_mode(Mode::Idle);
                let _ = write!(self.board, "  Mode: {}", Mode::Idle);
                let _ = terminal::new_line(&mut self.board);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mode changes
    // ------------------------------------------------------------------

    /// Single entry point for mode changes from the terminal and the button.
    fn change_mode(&mut self, target: Mode) -> Transition {
        let transition = self.supervisor.set_mode(target);
        if transition.is_change() {
            self.apply(transition.effects());
            if target != Mode::Config {
                self.owner = UiOwner::Shared;
            }
        }
        transition
    }

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::ArmLoopTimer => self.board.arm(),
                Effect::DisarmLoopTimer => self.board.disarm(),
                Effect::EnablePwm => self.board.enable(),
                Effect::DisablePwm => {
                    self.board.set_duty_percent(0.0);
                    self.board.disable();
                }
                Effect::ZeroOutputs => self.outputs = Outputs::default(),
                // Applied by the supervisor.
                Effect::ResetPlant => {}
                Effect::ResetController => self.pid.reset(),
                Effect::StopStream => self.stream = Stream::default(),
                Effect::Indicate(mode) => {
                    self.board.show_mode(mode);
                    let _ = terminal::set_color(&mut self.board, Color::for_mode(mode));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Screens
    // ------------------------------------------------------------------

    /// Close an unprompted message with a fresh prompt, redrawing any half-typed line.
    fn end_response(&mut self) {
        let _ = terminal::new_line(&mut self.board);
        let _ = terminal::prompt(&mut self.board);
        let _ = self.board.write_str(self.editor.pending());
    }

    fn startup_screen(&mut self) {
        let _ = terminal::clear(&mut self.board);

        let _ = terminal::set_color(&mut self.board, Color::Cyan);
        let _ = write!(
            self.board,
            "{0}\r\n  Nucleo-F767ZI - Converter Control Interface\r\n{0}\r\n",
            SEPARATOR_1
        );
        self.restore_mode_color();
        let _ = terminal::new_line(&mut self.board);

        self.show_status();
        let _ = terminal::new_line(&mut self.board);
        self.show_commands();
        let _ = terminal::new_line(&mut self.board);
        self.show_notes();
        let _ = terminal::new_line(&mut self.board);
        let _ = terminal::prompt(&mut self.board);
    }

    fn show_status(&mut self) {
        let mode = self.supervisor.mode();
        let ty: ConverterType = self.supervisor.topology();

        let _ = terminal::set_color(&mut self.board, Color::Green);
        let _ = write!(self.board, "  System Status\r\n{}\r\n", SEPARATOR_2);
        let _ = write!(self.board, "  mode : {}\r\n", mode);
        let _ = write!(self.board, "  type : {}\r\n", ty);
        let _ = write!(self.board, "  kp : {:.6}\r\n", self.pid.kp());
        let _ = write!(self.board, "  ki : {:.6}\r\n", self.pid.ki());
        let _ = write!(self.board, "  kd : {:.6}\r\n", self.pid.kd());
        let _ = write!(self.board, "  reference : {:.2} V\r\n", self.pid.reference());
        let _ = write!(
            self.board,
            "  stream : {}\r\n",
            if self.stream.on { "on" } else { "off" }
        );
        let _ = write!(self.board, "  owner : {}\r\n", self.owner.describe());
        self.restore_mode_color();
    }

    fn show_commands(&mut self) {
        let _ = write!(self.board, "  Available commands\r\n{}\r\n", SEPARATOR_2);
        for entry in COMMANDS.iter() {
            let _ = write!(
                self.board,
                "  {:<6} {:<18} - {}\r\n",
                entry.name,
                entry.usage,
                entry.summary
            );
        }
        let _ = self.board.write_str("  Converter types\r\n");
        for ty in ConverterType::ALL {
            let _ = write!(self.board, "    {}\r\n", ty);
        }
    }

    fn show_notes(&mut self) {
        const NOTES: [&str; 3] = [
            "'mode config' from the terminal locks the button until CONFIG is left.",
            "The button cycles IDLE -> CONFIG -> MOD -> IDLE.",
            "Type 'help' at any time to reprint this summary.",
        ];

        let _ = write!(self.board, "  Notes\r\n{}\r\n", SEPARATOR_2);
        for note in NOTES {
            let _ = write!(self.board, "  - {}\r\n", note);
        }
    }

    fn restore_mode_color(&mut self) {
        let _ = terminal::reset_color(&mut self.board);
        let color = Color::for_mode(self.supervisor.mode());
        let _ = terminal::set_color(&mut self.board, color);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn mode(&self) -> Mode {
        self.supervisor.mode()
    }

    #[inline]
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    #[inline]
    pub fn outputs(&self) -> Outputs {
        self.outputs
    }

    #[inline]
    pub fn owner(&self) -> UiOwner {
        self.owner
    }

    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.stream.on
    }

    #[inline]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[inline]
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}
