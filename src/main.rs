use std::process::exit;

fn main() {
    match investments::app::run_cli() {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}
