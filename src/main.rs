fn main() {
    if let Err(err) = vmready::cli::run() {
        vmready::ui::eprintln_error(&err);
        std::process::exit(vmready::exit::exit_code(&err));
    }
}
