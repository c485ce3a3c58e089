use std::process::ExitCode;

/// Entry point of the docker image hook.
///
/// Runs the given arguments as a container command with the current directory
/// mounted at `/src`, prints the command's output and exits with its exit code.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug docker-image-hook hadolint/hadolint hadolint Dockerfile
/// ```
fn main() -> ExitCode {
    env_logger::init();
    let code = docker_image_hook::run(
        std::env::args_os().skip(1),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
