//! cashledger-check - Decode a GnuCash book and summarize it.

fn main() -> std::process::ExitCode {
    cashledger::cmd::check::main()
}
