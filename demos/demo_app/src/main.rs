use std::fmt;
use std::io::{self, Read, Write as _};

use serial_config::*;
use serial_core::SerialCommands;
use serial_macros::command_tree;

use usercode::commands as uc;

command_tree! {
    mod commands;
    help() -> uc::help : "List all commands";
    led(int[0..=1] "state") -> uc::led : "Switch the led on or off";
    set() : "Device settings" {
        gain(float[-10..=10] "db") -> uc::gain : "Set the input gain";
        name(string "name") -> uc::name : "Set the device name";
    }
    motor(int[1..=4] "id") : "Motor control" {
        speed(int[-1000..=1000] "rpm") -> uc::motor_speed : "Set a motor's speed";
        stop() -> uc::motor_stop : "Stop a motor";
        whoami() -> uc::whoami : "Show this command's usage";
    }
    greet(string "who") -> uc::greet : "Say hello";
}

/// Stdout as a `fmt::Write` sink, standing in for a UART.
struct Console(io::Stdout);

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

fn prompt(console: &mut Console) {
    let _ = console.0.write_all(PROMPT.as_bytes());
    let _ = console.0.flush();
}

fn main() {
    let mut shell: SerialCommands<'_, Console, LINE_BUFFER_LEN> =
        SerialCommands::new(commands::tree(), Console(io::stdout()));

    println!("{}", BANNER);
    prompt(shell.out());

    for byte in io::stdin().lock().bytes() {
        let Ok(byte) = byte else { break };
        let line_done = !matches!(shell.read_byte(byte), Ok(None));
        if line_done {
            prompt(shell.out());
        }
    }
}
