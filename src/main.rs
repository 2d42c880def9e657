use std::process;

fn main() {
    if let Err(err) = rformat_lib::run() {
        eprintln!("rformat: {}", err);
        process::exit(1);
    }
}
