use anyhow::Context;
use argh::FromArgs;
use dom_shell::Interpreter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Build and edit an XML document from the command line.
struct Args {
    #[argh(positional)]
    /// autoexec script whose commands run before the interactive prompt.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut sh = Interpreter::with_terminal().context("failed to start the session")?;
    sh.greet()?;
    sh.run(args.script.as_deref()).context("session ended abnormally")?;
    Ok(())
}
