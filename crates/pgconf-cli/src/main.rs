pub fn main() {
    std::process::exit(pgconf_cli::run_with_args(std::env::args_os()));
}
