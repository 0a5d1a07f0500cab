#[macro_use]
extern crate colorify;

use std::fs::File;
use std::io;
use std::process;

use clap::{App, Arg};

use compita::interpreter::Interpreter;
use compita::program::Program;
use compita::state::DEFAULT_RAM_SIZE;

fn main() {
    let matches = App::new("compita")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs a tagged-word register/stack virtual machine program")
        .arg(
            Arg::with_name("program")
                .help("path to an assembly source file")
                .required(true)
                .index(1),
        )
        .get_matches();

    let path = matches.value_of("program").expect("program is required");

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            printlnc!(red: "could not open '{}': {}", path, e);
            process::exit(1);
        }
    };

    let program = match Program::from_reader(&mut file) {
        Ok(program) => program,
        Err(e) => {
            printlnc!(red: "{}", e);
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(DEFAULT_RAM_SIZE);
    interpreter.load_program(&program);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    if let Err(e) = interpreter.run(&mut input, &mut output) {
        printlnc!(red: "{}", e);
        process::exit(1);
    }
}
