use std::process::ExitCode;

fn main() -> ExitCode {
    ndawonga_cli::run()
}
