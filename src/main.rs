//! Host-side helper: `cargo run` compiles the stage to WASM with wasm-pack
//! into `static/pkg` and serves `static/` on a local HTTP port.

use std::process::{Command, ExitCode, Stdio};
use std::{env, io};

const DEFAULT_PORT: &str = "8000";

fn build_wasm() -> io::Result<bool> {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()?;
    Ok(status.success())
}

fn serve(port: &str) -> io::Result<()> {
    println!("Serving static/ at http://127.0.0.1:{port} …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()?;
    server.wait()?;
    Ok(())
}

fn main() -> ExitCode {
    let port = env::var("SCROLLFOLIO_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());

    match build_wasm() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("wasm-pack finished with errors.");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/). Serving existing static/pkg, which may be stale.");
        }
    }

    if let Err(err) = serve(&port) {
        eprintln!("failed to start http server: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
