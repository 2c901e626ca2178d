//! cashledger-accounts - Print the account tree of a GnuCash book.

fn main() -> std::process::ExitCode {
    cashledger::cmd::accounts::main()
}
