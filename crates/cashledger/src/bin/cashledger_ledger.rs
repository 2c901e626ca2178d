//! cashledger-ledger - Render a GnuCash book as ledger-cli text.

fn main() -> std::process::ExitCode {
    cashledger::cmd::ledger::main()
}
