//!
//! rollcall CLI binary
//! -------------------
//! Drives the session flow against a local profile directory. Runs one command from the
//! arguments, or an interactive interpreter with `--repl`.

use std::env;
use std::io::{self, Write};

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use rollcall::cli::{command_words, Command, Shell, HELP};
use rollcall::config::{has_flag, PortalConfig};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--dir <path>] [--key <name>] <command> [args]\n  {program} --repl [--dir <path>] [--key <name>]\n\nFlags:\n  --dir <path>    Profile directory holding the session record (env: ROLLCALL_SESSION_DIR, default .rollcall)\n  --key <name>    Session key / file stem (env: ROLLCALL_SESSION_KEY, default user)\n  --repl          Start interactive mode\n  -h, --help      Show this help\n\n{HELP}\n\nExamples:\n  {program} login '{{\"role\":\"student\",\"full_name\":\"Jane Doe\"}}'\n  {program} whoami\n  {program} logout"
    );
}

fn run_repl(shell: &Shell) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("rollcall shell. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        if stdin.read_line(&mut input)? == 0 { break; }
        let Some(cmd) = Command::parse(&input) else { continue; };
        if cmd == Command::Quit { break; }
        match shell.execute(cmd) {
            Ok(out) => { if !out.is_empty() { println!("{}", out); } }
            Err(e) => eprintln!("error: {:#}", e),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    let _ = fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "rollcall_cli".to_string());
    let args: Vec<String> = argv.collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage(&program);
        return Ok(());
    }

    let config = PortalConfig::from_env().apply_args(&args);
    let shell = Shell::open(&config)?;
    shell.start();

    if has_flag(&args, "--repl") {
        return run_repl(&shell);
    }

    let words = command_words(&args);
    if words.is_empty() {
        print_usage(&program);
        std::process::exit(2);
    }
    let Some(cmd) = Command::parse(&words.join(" ")) else {
        print_usage(&program);
        std::process::exit(2);
    };
    match shell.execute(cmd) {
        Ok(out) => {
            if !out.is_empty() { println!("{}", out); }
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    }
}
