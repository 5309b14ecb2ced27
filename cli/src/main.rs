//! Binary entrypoint for glyphfind (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = glyphfind_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
